//! WebSocket session task.
//!
//! A session owns the socket for one connection attempt. It performs no state
//! transitions itself: everything it observes is forwarded to the event loop
//! as a [`ChannelEvent`] tagged with the session's generation.

use super::error::ChannelError;
use super::state::CloseKind;
use super::{ChannelEvent, ChannelEventKind};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Parameters for one session.
pub(crate) struct SessionParams {
    pub generation: u64,
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Wait before dialing; non-zero for reconnect attempts
    pub delay: Duration,
    /// Reconnect attempt number, 0 for the initial connection
    pub attempt: u32,
}

/// Spawn a session task.
pub(crate) fn spawn_session(
    params: SessionParams,
    events: mpsc::UnboundedSender<ChannelEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_session(params, events, outbound, cancel))
}

async fn run_session(
    params: SessionParams,
    events: mpsc::UnboundedSender<ChannelEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) {
    let generation = params.generation;
    let emit = |kind: ChannelEventKind| {
        // The loop may already be gone during shutdown
        let _ = events.send(ChannelEvent { generation, kind });
    };

    if params.attempt > 0 {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(params.delay) => {}
        }
        emit(ChannelEventKind::Connecting {
            attempt: params.attempt,
        });
    }

    tracing::debug!(endpoint = %params.endpoint, generation, "Dialing channel");

    let connect = tokio::time::timeout(
        params.connect_timeout,
        tokio_tungstenite::connect_async(params.endpoint.as_str()),
    );
    let connected = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connect => result,
    };

    let stream = match connected {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(e)) => {
            emit(ChannelEventKind::Error(ChannelError::Connect {
                endpoint: params.endpoint.clone(),
                message: e.to_string(),
            }));
            emit(ChannelEventKind::Closed(CloseKind::Abrupt));
            return;
        }
        Err(_) => {
            emit(ChannelEventKind::Error(ChannelError::ConnectTimeout(
                params.connect_timeout.as_secs(),
            )));
            emit(ChannelEventKind::Closed(CloseKind::Abrupt));
            return;
        }
    };

    emit(ChannelEventKind::Opened);
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // Local teardown: flush what was queued before the close, then say goodbye
                while let Ok(payload) = outbound.try_recv() {
                    if sink.send(Message::Text(payload.into())).await.is_err() {
                        return;
                    }
                }
                let _ = sink.send(Message::Close(None)).await;
                return;
            }
            Some(payload) = outbound.recv() => {
                if let Err(e) = sink.send(Message::Text(payload.into())).await {
                    emit(ChannelEventKind::Error(ChannelError::Transport(e.to_string())));
                    emit(ChannelEventKind::Closed(CloseKind::Abrupt));
                    return;
                }
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(ChannelEventKind::Message(text.to_string()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((1005, String::new()));
                    // Flush the close reply queued by the protocol layer
                    let _ = sink.close().await;
                    emit(ChannelEventKind::Closed(CloseKind::Clean { code, reason }));
                    return;
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!(bytes = data.len(), "Ignoring binary frame");
                }
                Some(Ok(_)) => {
                    // Ping/pong are answered by the protocol layer
                }
                Some(Err(e)) => {
                    emit(ChannelEventKind::Error(ChannelError::Transport(e.to_string())));
                    emit(ChannelEventKind::Closed(CloseKind::Abrupt));
                    return;
                }
                None => {
                    emit(ChannelEventKind::Closed(CloseKind::Abrupt));
                    return;
                }
            }
        }
    }
}
