//! # Navigator Errors
//!
//! This module defines the error type shared by links, resources and the processor.
//! Transport failures only show up here when the processor runs in
//! [`FailureMode::Reject`](crate::processor::FailureMode::Reject); in the default forward
//! mode they travel as [`Fetched::Failure`](crate::link::Fetched::Failure) instead.

/// Errors that can occur while navigating a HAL resource graph.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum HalError {
    /// No link or embedded resource exists under the (normalized) relation.
    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    /// The relation exists but none of its links carries the requested name.
    #[error("No link named {name:?} in relation {relation}")]
    NameNotFound { relation: String, name: String },

    /// The raw document does not have the shape of a HAL resource.
    #[error("Invalid HAL document: {0}")]
    InvalidDocument(String),

    /// The transport failed to GET the href.
    #[error("GET failed for {href} (status: {status})")]
    Transport { href: String, status: u16 },

    /// The processor that created this resource no longer exists.
    #[error("Processor dropped")]
    ProcessorDropped,
}

impl From<serde_json::Error> for HalError {
    fn from(e: serde_json::Error) -> Self {
        HalError::InvalidDocument(e.to_string())
    }
}
