//! Connection lifecycle state machine.
//!
//! ```text
//! Connecting ──established──> Connected
//!     ▲                         │    │
//!     │                   error │    │ close
//!     │                         ▼    │
//!     │                     Errored  │
//!     │                         │    │
//!     │                   close ▼    ▼
//!     └──backoff elapsed─── Disconnected
//! ```
//!
//! Transitions are driven only by channel lifecycle events. Reconnection is
//! itself a transition: an abrupt close yields the delay after which the next
//! attempt starts.

use super::config::ReconnectConfig;
use super::error::ChannelError;
use std::fmt;
use std::time::Duration;

/// Observable state of the dashboard channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Handshake in progress
    #[default]
    Connecting,
    /// Channel is open
    Connected,
    /// Channel is closed
    Disconnected,
    /// Channel reported an error and is expected to close
    Errored,
}

impl ConnectionState {
    /// Text shown on the dashboard's connection indicator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Errored => "websocket error",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a channel ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseKind {
    /// Close handshake completed
    Clean { code: u16, reason: String },
    /// Connection dropped without a close handshake
    Abrupt,
}

/// Lifecycle bookkeeping for one dashboard channel.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: ConnectionState,
    /// Consecutive abrupt closes since the last successful handshake
    attempt: u32,
    reconnect: ReconnectConfig,
    /// Set once the owner tears the channel down; suppresses reconnection
    shut_down: bool,
}

impl Lifecycle {
    pub fn new(reconnect: ReconnectConfig) -> Self {
        Self {
            state: ConnectionState::Connecting,
            attempt: 0,
            reconnect,
            shut_down: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// A (re)connection attempt has started.
    pub fn on_connecting(&mut self, attempt: u32) {
        tracing::info!(attempt, "Reconnecting");
        self.state = ConnectionState::Connecting;
    }

    /// The handshake completed.
    pub fn on_established(&mut self) {
        if self.attempt > 0 {
            tracing::info!(attempts = self.attempt, "Channel re-established");
        } else {
            tracing::info!("Channel established");
        }
        self.state = ConnectionState::Connected;
        self.attempt = 0;
    }

    /// The channel reported an error. Recovery waits for the close that follows.
    pub fn on_error(&mut self, error: &ChannelError) {
        tracing::error!(error = %error, "Channel error");
        self.state = ConnectionState::Errored;
    }

    /// The channel closed.
    ///
    /// Returns the delay before the next connection attempt, or `None` when no
    /// reconnection should happen.
    pub fn on_closed(&mut self, kind: &CloseKind) -> Option<Duration> {
        self.state = ConnectionState::Disconnected;

        if self.shut_down {
            tracing::debug!("Channel closed after shutdown");
            return None;
        }

        match kind {
            CloseKind::Clean { code, reason } => {
                tracing::info!(code, reason = %reason, "Channel closed cleanly");
                None
            }
            CloseKind::Abrupt => {
                self.attempt += 1;
                if !self.reconnect.should_retry(self.attempt) {
                    tracing::warn!(
                        attempts = self.attempt - 1,
                        "Channel died, reconnection attempts exhausted"
                    );
                    return None;
                }

                let delay = self.reconnect.delay_for_attempt(self.attempt);
                tracing::warn!(
                    attempt = self.attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Channel died, scheduling reconnect"
                );
                Some(delay)
            }
        }
    }

    /// The owner tore the channel down. Idempotent.
    pub fn shut_down(&mut self) {
        self.shut_down = true;
        self.state = ConnectionState::Disconnected;
    }
}
