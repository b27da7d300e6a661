//! Register command implementation
//!
//! Opens the channel, waits until it is connected, submits one registration
//! and closes the channel again.

use crate::cli::watch::{init_tracing, load_config_with_overrides};
use crate::cli::RegisterArgs;
use crate::connection::{ChannelEvent, ConnectionManager, ConnectionState};
use crate::protocol::MonitorRegistrationRequest;
use crate::submit::{submit, RegistrationForm, SubmitError};
use std::time::Duration;
use tokio::sync::mpsc;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Drive `connection` until it is connected or no progress is possible.
pub async fn wait_until_connected(
    connection: &mut ConnectionManager,
    events: &mut mpsc::UnboundedReceiver<ChannelEvent>,
    timeout: Duration,
) -> ConnectionState {
    let wait = async {
        while !connection.state().is_connected() {
            let Some(event) = events.recv().await else {
                break;
            };
            connection.handle_event(event);

            // Disconnected without a pending reconnect: give up
            if connection.state() == ConnectionState::Disconnected && !connection.is_active() {
                break;
            }
        }
    };

    if tokio::time::timeout(timeout, wait).await.is_err() {
        tracing::warn!(timeout_s = timeout.as_secs(), "Timed out waiting for channel");
    }
    connection.state()
}

/// Open a channel, send one registration and close.
pub async fn register_once(
    connection: &mut ConnectionManager,
    events: &mut mpsc::UnboundedReceiver<ChannelEvent>,
    form: &RegistrationForm,
    timeout: Duration,
) -> Result<MonitorRegistrationRequest, SubmitError> {
    // Reject bad input before touching the network
    form.to_request()?;

    connection.open();
    wait_until_connected(connection, events, timeout).await;

    let result = submit(form, &*connection);
    connection.close();
    connection.wait_closed(CLOSE_TIMEOUT).await;
    result
}

/// Main register command handler
pub async fn run_register(args: RegisterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connect)?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let (mut connection, mut events) =
        ConnectionManager::new(config.channel.clone(), config.reconnect.clone());
    let form = RegistrationForm::new(args.name, args.url, args.interval);

    let request = register_once(
        &mut connection,
        &mut events,
        &form,
        Duration::from_secs(args.wait),
    )
    .await?;

    println!(
        "✓ Registered '{}' ({}) every {}s",
        request.name, request.url, request.interval
    );
    Ok(())
}
