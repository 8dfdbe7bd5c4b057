//! # Mock Transports
//!
//! Utilities for testing navigation without a network.
//!
//! | Feature | MockTransport | ChannelTransport |
//! |---------|---------------|------------------|
//! | **Responses** | Queued up front | Sent by the test while the request is pending |
//! | **Determinism** | 100% deterministic | Test controls when each GET completes |
//! | **Use Case** | Cache / traversal behavior | Concurrency (overlapping fetches) |
//!
//! ```rust
//! use std::sync::Arc;
//! use hal_navigator::{Processor, ProcessorConfig};
//! use hal_navigator::transport::mock::MockTransport;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/orders/523")
//!         .return_ok(json!({ "_links": { "self": { "href": "/orders/523" } }, "total": 10.2 }));
//!
//!     let hal = Processor::new(Arc::new(mock.clone()), ProcessorConfig::default());
//!     let order = hal.link("/orders/523").fetch_resource().await.unwrap();
//!     assert_eq!(order.properties()["total"], 10.2);
//!
//!     mock.verify(); // every expectation was consumed
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{RequestOptions, Response, Transport, TransportFailure};
use crate::document::RawDocument;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected `GET` and the answer to give.
struct Expectation {
    uri: String,
    response: Result<Response, TransportFailure>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<String>,
}

/// A transport that answers from a queue of expectations, in order.
///
/// Cloning shares the queue, so a test can keep one handle for [`verify`](Self::verify)
/// and give the other to a [`Processor`](crate::Processor).
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Expects a `GET` of `uri`.
    pub fn expect_get(&self, uri: impl Into<String>) -> GetExpectationBuilder {
        GetExpectationBuilder {
            uri: uri.into(),
            state: self.state.clone(),
        }
    }

    /// Every uri requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of `GET`s issued so far.
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.state().expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, uri: &str, _options: &RequestOptions) -> Result<Response, TransportFailure> {
        let expectation = {
            let mut state = self.state();
            state.calls.push(uri.to_string());
            state.expectations.pop_front()
        };
        match expectation {
            Some(expected) if expected.uri == uri => expected.response,
            Some(expected) => panic!("Unexpected GET {uri}, expected GET {}", expected.uri),
            None => panic!("Unexpected GET {uri}, no expectations left"),
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    uri: String,
    state: Arc<Mutex<MockState>>,
}

impl GetExpectationBuilder {
    fn push(self, response: Result<Response, TransportFailure>) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.expectations.push_back(Expectation {
            uri: self.uri,
            response,
        });
    }

    /// Answers with `200` and the given document.
    pub fn return_ok(self, data: RawDocument) {
        self.push(Ok(Response::ok(data)));
    }

    /// Answers with a failure carrying `status`.
    pub fn return_err(self, status: u16) {
        let message = format!("GET {} failed", self.uri);
        self.push(Err(TransportFailure::new(status, message)));
    }

    /// Answers with a prepared failure.
    pub fn return_failure(self, failure: TransportFailure) {
        self.push(Err(failure));
    }
}

// =============================================================================
// CHANNEL TRANSPORT
// =============================================================================

/// Response channel for one pending `GET`.
pub type Responder = oneshot::Sender<Result<Response, TransportFailure>>;

/// A `GET` waiting for the test to answer it.
#[derive(Debug)]
pub struct TransportRequest {
    pub uri: String,
    pub options: RequestOptions,
    pub respond_to: Responder,
}

/// A transport that forwards every request to a channel the test reads from.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<TransportRequest>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn get(&self, uri: &str, options: &RequestOptions) -> Result<Response, TransportFailure> {
        let (respond_to, response) = oneshot::channel();
        let request = TransportRequest {
            uri: uri.to_string(),
            options: options.clone(),
            respond_to,
        };
        self.sender
            .send(request)
            .await
            .map_err(|_| TransportFailure::new(0, "Transport closed"))?;
        response
            .await
            .map_err(|_| TransportFailure::new(0, "Transport dropped response channel"))?
    }
}

/// Creates a channel transport and the receiver its requests arrive on.
///
/// # Testing Strategy
/// Each `GET` stays pending until the test sends a value through its [`Responder`], which
/// makes overlapping fetches observable.
pub fn create_channel_transport(buffer_size: usize) -> (ChannelTransport, mpsc::Receiver<TransportRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelTransport { sender }, receiver)
}

/// Helper to receive the next pending `GET`.
pub async fn expect_get(receiver: &mut mpsc::Receiver<TransportRequest>) -> Option<(String, Responder)> {
    receiver
        .recv()
        .await
        .map(|request| (request.uri, request.respond_to))
}
