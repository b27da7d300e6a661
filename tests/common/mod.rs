//! Shared test utilities for uptime-dash integration tests.
//!
//! Provides a scripted WebSocket monitoring server and a driver that feeds
//! channel events through an [`AppContext`] the way the event loop does.

#![allow(dead_code)]

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use uptime_dash::app::{AppContext, AppEvent, View};
use uptime_dash::connection::{
    ChannelConfig, ChannelEvent, ConnectionManager, ConnectionState, ReconnectConfig,
};
use uptime_dash::table::{StatusTable, TableRow};

/// How long a test waits for something to happen before failing.
pub const WAIT: Duration = Duration::from_secs(5);

// =============================================================================
// Scripted monitoring server
// =============================================================================

/// What the server should do to every open connection.
#[derive(Debug, Clone)]
enum Command {
    /// Send a text frame
    Text(String),
    /// Drop the socket without a closing handshake
    Drop,
    /// Close the socket with a normal close frame
    Close,
}

struct ServerState {
    received: Mutex<Vec<String>>,
    connections: AtomicUsize,
    commands: broadcast::Sender<Command>,
}

/// In-process WebSocket server standing in for the monitoring server.
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    /// Bind on an ephemeral port and start serving `/echo`.
    pub async fn start() -> Self {
        let (commands, _) = broadcast::channel(64);
        let state = Arc::new(ServerState {
            received: Mutex::new(Vec::new()),
            connections: AtomicUsize::new(0),
            commands,
        });

        let app = Router::new()
            .route("/echo", get(ws_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("ws://{}/echo", self.addr)
    }

    /// Text frames received from clients, in arrival order.
    pub fn received(&self) -> Vec<String> {
        self.state.received.lock().unwrap().clone()
    }

    /// Number of WebSocket connections accepted so far.
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Push a text frame to every open connection.
    pub fn push(&self, text: &str) {
        let _ = self.state.commands.send(Command::Text(text.to_string()));
    }

    /// Kill every open connection without a close frame.
    pub fn drop_connections(&self) {
        let _ = self.state.commands.send(Command::Drop);
    }

    /// Close every open connection cleanly.
    pub fn close_connections(&self) {
        let _ = self.state.commands.send(Command::Close);
    }

    /// Wait until at least `count` frames have been received.
    pub async fn wait_for_received(&self, count: usize) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + WAIT;
        loop {
            let received = self.received();
            if received.len() >= count || tokio::time::Instant::now() >= deadline {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    // Subscribe before the handshake completes so no push can be missed
    let commands = state.commands.subscribe();
    state.connections.fetch_add(1, Ordering::SeqCst);
    ws.on_upgrade(move |socket| handle_socket(socket, state, commands))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<ServerState>,
    mut commands: broadcast::Receiver<Command>,
) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Ok(Command::Text(text)) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        return;
                    }
                }
                Ok(Command::Drop) | Err(_) => return,
                Ok(Command::Close) => {
                    let frame = CloseFrame {
                        code: 1000,
                        reason: "bye".into(),
                    };
                    let _ = sender.send(Message::Close(Some(frame))).await;
                    // Let the client answer before the socket goes away
                    while let Some(Ok(msg)) = receiver.next().await {
                        if matches!(msg, Message::Close(_)) {
                            break;
                        }
                    }
                    return;
                }
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    state.received.lock().unwrap().push(text);
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => {}
            },
        }
    }
}

// =============================================================================
// Client side
// =============================================================================

/// Records everything the dashboard presents.
#[derive(Default)]
pub struct RecordingView {
    pub states: Vec<ConnectionState>,
    pub renders: usize,
    pub notices: Vec<String>,
}

impl View for RecordingView {
    fn connection_changed(&mut self, state: ConnectionState) {
        self.states.push(state);
    }

    fn table_changed(&mut self, _table: &StatusTable) {
        self.renders += 1;
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Fast reconnects so tests do not sit in backoff.
pub fn fast_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        initial_delay_ms: 50,
        max_delay_ms: 200,
        max_attempts: 5,
        jitter: false,
        ..ReconnectConfig::default()
    }
}

pub fn channel_config(endpoint: &str) -> ChannelConfig {
    ChannelConfig {
        endpoint: endpoint.to_string(),
        connect_timeout_seconds: 2,
    }
}

/// Two sites with ids 1 and 2, both last seen up.
pub fn two_site_table() -> StatusTable {
    let mut table = StatusTable::new();
    for id in ["1", "2"] {
        table.push_row(TableRow::new(vec![
            id.to_string(),
            format!("site-{}", id),
            format!("http://site-{}.test", id),
            "200".to_string(),
        ]));
    }
    table
}

/// Feeds channel events into an [`AppContext`] one at a time.
pub struct Driver {
    pub ctx: AppContext<RecordingView>,
    events: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl Driver {
    /// Build a context against `endpoint` and open the channel.
    pub fn start(endpoint: &str, reconnect: ReconnectConfig) -> Self {
        let (connection, events) = ConnectionManager::new(channel_config(endpoint), reconnect);
        let mut ctx = AppContext::new(connection, two_site_table(), RecordingView::default());
        ctx.start();
        Self { ctx, events }
    }

    /// Process channel events until `done` holds. Returns false on timeout.
    pub async fn until<F>(&mut self, done: F) -> bool
    where
        F: Fn(&AppContext<RecordingView>) -> bool,
    {
        let deadline = tokio::time::Instant::now() + WAIT;
        while !done(&self.ctx) {
            let next = tokio::time::timeout_at(deadline, self.events.recv()).await;
            match next {
                Ok(Some(event)) => {
                    let _ = self.ctx.handle(AppEvent::Channel(event));
                }
                Ok(None) | Err(_) => return false,
            }
        }
        true
    }

    pub async fn until_connected(&mut self) -> bool {
        self.until(|ctx| ctx.connection().state() == ConnectionState::Connected)
            .await
    }

    /// Process whatever arrives within `window`.
    pub async fn settle(&mut self, window: Duration) {
        let deadline = tokio::time::Instant::now() + window;
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, self.events.recv()).await {
            let _ = self.ctx.handle(AppEvent::Channel(event));
        }
    }
}
