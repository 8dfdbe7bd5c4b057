//! # HAL Navigator
//!
//! > **Browse a HAL API by relation name instead of by hard-coded URI.**
//!
//! This crate is a client-side processor for the
//! [Hypertext Application Language](https://datatracker.ietf.org/doc/html/draft-kelly-json-hal).
//! It parses HAL documents, normalizes relation names through curies, expands templated
//! links, and follows links through a per-processor cache that fetches each href at most once.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One processor, one cache universe
//! A [`Processor`] owns exactly one [`ResourceCache`](cache::ResourceCache). Every link and
//! resource it creates reads and writes that cache, and nothing else does. Two processors
//! pointed at the same API never see each other's resources.
//!
//! ### Embedded means cached
//! When a document embeds sub-resources, they are parsed and registered in the cache while
//! the parent is being parsed. Following a link to an embedded resource is a cache hit.
//!
//! ### Collaborators are traits
//! The network ([`Transport`]), URI templates ([`Expander`](template::Expander)) and the
//! failure log ([`Logger`](logging::Logger)) are injected at construction time. Tests swap
//! in [`MockTransport`](transport::mock::MockTransport).
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hal_navigator::{Processor, ProcessorConfig};
//! use hal_navigator::transport::mock::MockTransport;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hal_navigator::HalError> {
//!     let transport = MockTransport::new();
//!     let hal = Processor::new(Arc::new(transport.clone()), ProcessorConfig::default());
//!
//!     let orders = hal.resource(json!({
//!         "_links": {
//!             "self": { "href": "/orders" },
//!             "find": { "href": "/orders{?id}", "templated": true }
//!         },
//!         "_embedded": {
//!             "orders": [{ "_links": { "self": { "href": "/orders/123" } }, "total": 30.0 }]
//!         },
//!         "shippedToday": 20
//!     }))?;
//!
//!     assert_eq!(orders.properties()["shippedToday"], 20);
//!     assert_eq!(orders.link("find")?.instantiate(&json!({ "id": 42 })), "/orders?id=42");
//!
//!     // Embedded, so no GET is issued.
//!     let order = hal.link("/orders/123").fetch_resource().await?;
//!     assert_eq!(order.properties()["total"], 30.0);
//!     assert_eq!(transport.call_count(), 0);
//!     Ok(())
//! }
//! ```
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Transport failures are values by default
//! A failed `GET` is logged once and returned as [`Fetched::Failure`] inside `Ok`. Set
//! [`FailureMode::Reject`] to get [`HalError::Transport`] instead.
//!
//! ### 2. Missing relations are errors
//! [`Resource::link`], [`Resource::links`] and the `follow*` family return
//! [`HalError::RelationNotFound`] with the normalized relation name.
//!
//! ### 3. Concurrency
//! The cache is lock-guarded and every href has its own async fetch lock, so overlapping
//! fetches of one href issue a single `GET` unless `revalidate` is set.
//!
//! ### 4. Observability
//! `tracing` events with structured fields on cache hits, misses and fetches. See
//! [`logging`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`processor`]: the factory and its configuration
//! - [`resource`], [`link`]: the navigation API
//! - [`curie`], [`template`]: relation normalization and URI templates
//! - [`cache`]: the href → resource map
//! - [`transport`]: the `GET` abstraction, mocks, and the `http` feature's reqwest client
//! - [`document`], [`error`], [`logging`]: supporting types

pub mod cache;
pub mod curie;
pub mod document;
pub mod error;
pub mod link;
pub mod logging;
pub mod processor;
pub mod resource;
pub mod template;
pub mod transport;

pub use document::{LinkDescriptor, LinkEntry, RawDocument};
pub use error::HalError;
pub use link::{FetchOptions, Fetched, Link, LinkSpec};
pub use processor::{FailureMode, Processor, ProcessorConfig};
pub use resource::Resource;
pub use transport::{RequestOptions, Response, Transport, TransportFailure};
