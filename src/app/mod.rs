//! Application context and event loop.
//!
//! [`AppContext`] owns everything the dashboard mutates: the connection
//! manager, the status table and the view that presents them. [`run`] is the
//! single thread of control; it takes one [`AppEvent`] at a time and hands it
//! to a synchronous handler, so every state mutation completes within one
//! invocation.

mod view;

pub use view::View;

use crate::connection::{ChannelEvent, ConnectionManager, ConnectionState};
use crate::protocol::decode_status_update;
use crate::submit::{submit, RegistrationForm};
use crate::table::{reconcile, ReconcileOutcome, StatusTable};
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Everything the event loop reacts to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Lifecycle or data event from the channel
    Channel(ChannelEvent),
    /// Operator submitted the registration form
    Submit(RegistrationForm),
    /// Stop the loop and close the channel
    Shutdown,
}

/// Explicit application state, owned by the event loop.
pub struct AppContext<V: View> {
    connection: ConnectionManager,
    table: StatusTable,
    view: V,
    last_state: ConnectionState,
}

impl<V: View> AppContext<V> {
    pub fn new(connection: ConnectionManager, table: StatusTable, view: V) -> Self {
        let last_state = connection.state();
        Self {
            connection,
            table,
            view,
            last_state,
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn table(&self) -> &StatusTable {
        &self.table
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Present the initial state and open the channel.
    pub fn start(&mut self) {
        self.view.connection_changed(self.last_state);
        self.view.table_changed(&self.table);
        self.connection.open();
    }

    /// Handle one event. Returns `Break` once the dashboard should stop.
    pub fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Channel(event) => self.on_channel_event(event),
            AppEvent::Submit(form) => self.on_submit(&form),
            AppEvent::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn on_channel_event(&mut self, event: ChannelEvent) {
        let payload = self.connection.handle_event(event);
        self.sync_state();

        if let Some(payload) = payload {
            self.on_message(&payload);
        }
    }

    fn on_message(&mut self, payload: &str) {
        let event = match decode_status_update(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, payload_len = payload.len(), "Discarding inbound message");
                return;
            }
        };

        if reconcile(&mut self.table, &event) == ReconcileOutcome::Updated {
            self.view.table_changed(&self.table);
        }
    }

    fn on_submit(&mut self, form: &RegistrationForm) {
        match submit(form, &self.connection) {
            Ok(request) => {
                self.view
                    .notify(&format!("Registration sent for '{}'", request.name));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration refused");
                self.view.notify(&format!("Registration refused: {}", e));
            }
        }
    }

    /// Close the channel. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.connection.close();
        self.sync_state();
    }

    fn sync_state(&mut self) {
        let state = self.connection.state();
        if state != self.last_state {
            self.last_state = state;
            self.view.connection_changed(state);
        }
    }
}

/// Drive the dashboard until shutdown.
///
/// Channel events and UI events are interleaved in arrival order. The loop
/// ends on [`AppEvent::Shutdown`], when the UI queue closes, or when `cancel`
/// fires; the channel is closed in every case. The context is returned so the
/// caller can inspect final state.
pub async fn run<V: View>(
    mut ctx: AppContext<V>,
    mut channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
    mut ui_events: mpsc::Receiver<AppEvent>,
    cancel: CancellationToken,
) -> AppContext<V> {
    ctx.start();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            Some(event) = channel_events.recv() => AppEvent::Channel(event),
            event = ui_events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        if ctx.handle(event).is_break() {
            break;
        }
    }

    ctx.shutdown();
    ctx.connection.wait_closed(CLOSE_TIMEOUT).await;
    ctx
}
