//! Error types for the dashboard channel.

use super::ConnectionState;
use thiserror::Error;

/// Errors reported by the channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// WebSocket handshake failed
    #[error("failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    /// WebSocket handshake did not finish in time
    #[error("connection timeout after {0}s")]
    ConnectTimeout(u64),

    /// Read or write on an established channel failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Sending requires a connected channel
    #[error("channel is {0}, not connected")]
    NotConnected(ConnectionState),

    /// The session task has already gone away
    #[error("channel closed")]
    Closed,
}
