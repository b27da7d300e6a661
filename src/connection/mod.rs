//! Connection manager for the dashboard channel.
//!
//! Owns the single WebSocket channel to the monitoring server: opens it,
//! tracks its [`ConnectionState`], reconnects with bounded backoff after an
//! abrupt termination and tears it down on request.
//!
//! Socket I/O runs in a spawned session task. The session never mutates state;
//! it reports lifecycle events over an mpsc queue, and the owner of the
//! manager feeds them back through [`ConnectionManager::handle_event`] from its
//! single event loop.

mod config;
mod error;
mod session;
mod state;


pub use config::*;
pub use error::*;
pub use state::*;

use session::{spawn_session, SessionParams};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Something observed on the channel, tagged with the session that saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    /// Session generation; events from superseded sessions are ignored
    pub generation: u64,
    pub kind: ChannelEventKind,
}

/// Channel lifecycle and data events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEventKind {
    /// A reconnect attempt is starting
    Connecting { attempt: u32 },
    /// Handshake completed
    Opened,
    /// Text frame received
    Message(String),
    /// Channel ended
    Closed(CloseKind),
    /// Channel failed; a `Closed` event follows
    Error(ChannelError),
}

/// Outbound side of a channel, as seen by code that only needs to send.
pub trait MessageChannel {
    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Queue one text message for transmission. Fire-and-forget.
    fn send(&self, payload: String) -> Result<(), ChannelError>;
}

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    /// Dropped as soon as the channel errors so nothing more can be written
    outbound: Option<mpsc::UnboundedSender<String>>,
}

/// Supervises the dashboard channel.
pub struct ConnectionManager {
    config: ChannelConfig,
    lifecycle: Lifecycle,
    events: mpsc::UnboundedSender<ChannelEvent>,
    session: Option<Session>,
    /// Session task still flushing after `close`
    closing: Option<JoinHandle<()>>,
    generation: u64,
}

impl ConnectionManager {
    /// Create a manager and the queue its sessions report into.
    ///
    /// The channel is not opened until [`open`](Self::open) is called.
    pub fn new(
        config: ChannelConfig,
        reconnect: ReconnectConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let manager = Self {
            config,
            lifecycle: Lifecycle::new(reconnect),
            events,
            session: None,
            closing: None,
            generation: 0,
        };
        (manager, rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Generation of the current session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consecutive failed attempts since the last successful handshake.
    pub fn reconnect_attempt(&self) -> u32 {
        self.lifecycle.attempt()
    }

    /// Whether a session is running or scheduled.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start establishing the channel. Must be called inside a Tokio runtime.
    pub fn open(&mut self) {
        if self.session.is_some() {
            tracing::warn!("Channel already open, ignoring open request");
            return;
        }
        if self.lifecycle.is_shut_down() {
            tracing::warn!("Channel was closed, ignoring open request");
            return;
        }

        tracing::info!(endpoint = %self.config.endpoint, "Opening channel");
        self.start_session(Duration::ZERO, 0);
    }

    fn start_session(&mut self, delay: Duration, attempt: u32) {
        if let Some(old) = self.session.take() {
            old.cancel.cancel();
        }

        self.generation += 1;
        let cancel = CancellationToken::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let handle = spawn_session(
            SessionParams {
                generation: self.generation,
                endpoint: self.config.endpoint.clone(),
                connect_timeout: Duration::from_secs(self.config.connect_timeout_seconds),
                delay,
                attempt,
            },
            self.events.clone(),
            outbound_rx,
            cancel.clone(),
        );

        self.session = Some(Session {
            cancel,
            handle,
            outbound: Some(outbound_tx),
        });
    }

    /// Apply one channel event.
    ///
    /// Returns the payload of an inbound text message for the caller to
    /// decode; every other event only updates connection state.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<String> {
        if event.generation != self.generation {
            tracing::debug!(
                generation = event.generation,
                current = self.generation,
                "Dropping event from superseded channel"
            );
            return None;
        }

        match event.kind {
            ChannelEventKind::Connecting { attempt } => {
                self.lifecycle.on_connecting(attempt);
                None
            }
            ChannelEventKind::Opened => {
                self.lifecycle.on_established();
                None
            }
            ChannelEventKind::Message(payload) => Some(payload),
            ChannelEventKind::Error(error) => {
                self.lifecycle.on_error(&error);
                if let Some(session) = self.session.as_mut() {
                    session.outbound = None;
                }
                None
            }
            ChannelEventKind::Closed(kind) => {
                match self.lifecycle.on_closed(&kind) {
                    Some(delay) => {
                        let attempt = self.lifecycle.attempt();
                        self.start_session(delay, attempt);
                    }
                    None => self.session = None,
                }
                None
            }
        }
    }

    /// Tear the channel down. Calling this on a closed channel is a no-op.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!("Closing channel");
            session.cancel.cancel();
            self.closing = Some(session.handle);
        }
        self.lifecycle.shut_down();
        // Late events from the cancelled session become stale
        self.generation += 1;
    }

    /// Wait for a closed session to flush queued messages and send its close
    /// frame. Returns immediately if nothing is pending.
    pub async fn wait_closed(&mut self, timeout: Duration) {
        if let Some(handle) = self.closing.take() {
            if tokio::time::timeout(timeout, handle).await.is_err() {
                tracing::warn!("Channel did not close in time");
            }
        }
    }
}

impl MessageChannel for ConnectionManager {
    fn state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    fn send(&self, payload: String) -> Result<(), ChannelError> {
        let state = self.lifecycle.state();
        if !state.is_connected() {
            return Err(ChannelError::NotConnected(state));
        }

        let outbound = self
            .session
            .as_ref()
            .and_then(|s| s.outbound.as_ref())
            .ok_or(ChannelError::Closed)?;

        outbound.send(payload).map_err(|_| ChannelError::Closed)
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
        }
    }
}
