//! Error types for the wire codec.

use thiserror::Error;

/// Reasons an inbound payload is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Payload is valid JSON but not an object
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// A required field is absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required field has the wrong type
    #[error("invalid field: {0}")]
    InvalidField(String),
}

/// Failure to serialize an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode message: {0}")]
pub struct EncodeError(pub String);
