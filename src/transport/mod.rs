//! # Transport
//!
//! The navigator never talks to the network itself. A [`Transport`] is handed to the
//! [`Processor`](crate::Processor) at construction time and is asked to `GET` hrefs on cache
//! misses.
//!
//! # Implementations
//!
//! - [`mock::MockTransport`]: fluent expectations for tests
//! - [`mock::ChannelTransport`]: hands each request to the test over a channel
//! - `http::ReqwestTransport`: production client, behind the `http` feature

pub mod mock;

#[cfg(feature = "http")]
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::RawDocument;

/// Per-request options. The navigator itself always sends the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Extra headers to send with the request.
    pub headers: Vec<(String, String)>,
}

/// A successful GET.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub data: RawDocument,
    pub status: u16,
}

impl Response {
    pub fn ok(data: RawDocument) -> Self {
        Self { data, status: 200 }
    }
}

/// A failed GET. `status` is `0` when no HTTP status was received.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} (status: {status})")]
pub struct TransportFailure {
    pub status: u16,
    /// Response body, if the server sent one.
    pub data: Option<Value>,
    pub message: String,
}

impl TransportFailure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            data: None,
            message: message.into(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Asynchronous `GET` abstraction used by [`Link::fetch`](crate::Link::fetch).
///
/// Implementations own retries, timeouts and cancellation; the navigator performs none.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str, options: &RequestOptions) -> Result<Response, TransportFailure>;
}
