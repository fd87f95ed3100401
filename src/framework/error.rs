//! # Framework Errors
//!
//! This module defines the error types shared by every resource class and
//! transport. Transport failures are never interpreted by the core: they are
//! wrapped once in [`ResourceError::Transport`] and bubble straight to the
//! caller of `create`/`find`/`filter`/`save`.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::framework::Transport) implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (connect, timeout, TLS...).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded as a JSON:API document.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The transport could not be built from its configuration.
    #[error("Invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Returns true if the server reported that the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Errors that can occur while mapping remote resources to local entities.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    /// Any failure from the transport collaborator, propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A type name or relationship could not be mapped to a registered resource class.
    #[error("Unresolved resource type: {0}")]
    UnresolvedType(String),

    /// The `id` of a record cannot be coerced to an integer.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// The schema never declared this relationship (or declared it with another kind).
    #[error("Unknown relationship `{name}` on {resource_type}")]
    UnknownRelationship { resource_type: String, name: String },

    /// The response `data` does not have the shape the operation expects.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ResourceError {
    /// Returns true if the underlying transport reported a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::Transport(e) if e.is_not_found())
    }
}
