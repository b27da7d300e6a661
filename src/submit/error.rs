//! Reasons a registration is refused.

use crate::connection::{ChannelError, ConnectionState};
use crate::protocol::EncodeError;
use thiserror::Error;

/// Errors surfaced to the operator when submitting a registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("cannot register while the channel is {0}")]
    NotConnected(ConnectionState),

    #[error("site name cannot be empty")]
    EmptyName,

    #[error("interval must be a positive whole number of seconds, got '{0}'")]
    InvalidInterval(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
