//! Watch command implementation

use crate::app::{self, AppContext, AppEvent};
use crate::cli::output::TerminalView;
use crate::cli::{ConnectArgs, WatchArgs};
use crate::config::{DashConfig, LogFormat};
use crate::connection::ConnectionManager;
use crate::submit::RegistrationForm;
use crate::table::StatusTable;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const HELP: &str = "commands: add <name> <url> <interval> | help | quit";

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ConnectArgs,
) -> Result<DashConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        DashConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        DashConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref endpoint) = args.endpoint {
        config.channel.endpoint = endpoint.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_reconnect {
        config.reconnect.enabled = false;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
///
/// Logs go to stderr so they never interleave with the rendered table.
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Parse one line typed by the operator.
///
/// Returns `Ok(None)` for blank lines and `Err` with a usage hint for
/// anything that is not a command.
pub fn parse_command(line: &str) -> Result<Option<AppEvent>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };

    match command.to_lowercase().as_str() {
        "add" => {
            let args: Vec<&str> = parts.collect();
            match args.as_slice() {
                [name, url, interval] => Ok(Some(AppEvent::Submit(RegistrationForm::new(
                    *name, *url, *interval,
                )))),
                _ => Err("usage: add <name> <url> <interval>".to_string()),
            }
        }
        "quit" | "exit" => Ok(Some(AppEvent::Shutdown)),
        "help" => Err(HELP.to_string()),
        other => Err(format!("unknown command '{}'; {}", other, HELP)),
    }
}

/// Forward stdin commands into the event loop until stdin closes.
///
/// A closed stdin only ends command input; the dashboard keeps running until
/// `quit` or a signal.
async fn read_commands(ui_events: mpsc::Sender<AppEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(event)) => {
                if ui_events.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(hint) => eprintln!("{}", hint),
        }
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connect)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    tracing::info!(endpoint = %config.channel.endpoint, "Starting dashboard");
    tracing::debug!(?config, "Loaded configuration");

    let (connection, channel_events) =
        ConnectionManager::new(config.channel.clone(), config.reconnect.clone());
    let table = StatusTable::from_sites(&config.sites);
    let ctx = AppContext::new(connection, table, TerminalView::stdout());

    let (ui_tx, ui_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    // Held for the whole run so a closed stdin does not stop the dashboard
    let _ui_tx = ui_tx.clone();
    tokio::spawn(read_commands(ui_tx));
    tokio::spawn(shutdown_signal(cancel.clone()));

    eprintln!("{}", HELP);
    app::run(ctx, channel_events, ui_rx, cancel).await;

    tracing::info!("Dashboard stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn connect_args(config: PathBuf) -> ConnectArgs {
        ConnectArgs {
            config,
            endpoint: None,
            log_level: None,
            no_reconnect: false,
        }
    }

    #[test]
    fn test_watch_config_loading() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[[sites]]\nid = 5\nname = \"blog\"\nurl = \"http://blog.test\"\ninterval = 30\n",
        )
        .unwrap();

        let config = load_config_with_overrides(&connect_args(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].id, 5);
    }

    #[test]
    fn test_watch_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[channel]\nendpoint = \"ws://file:1/echo\"").unwrap();

        let mut args = connect_args(temp.path().to_path_buf());
        args.endpoint = Some("ws://cli:2/echo".to_string());
        args.no_reconnect = true;

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.channel.endpoint, "ws://cli:2/echo");
        assert!(!config.reconnect.enabled);
    }

    #[test]
    fn test_watch_works_without_config_file() {
        let args = connect_args(PathBuf::from("nonexistent.toml"));
        let config = load_config_with_overrides(&args).unwrap();
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_parse_add_command() {
        let event = parse_command("add example http://example.com 30")
            .unwrap()
            .unwrap();
        match event {
            AppEvent::Submit(form) => {
                assert_eq!(form, RegistrationForm::new("example", "http://example.com", "30"));
            }
            other => panic!("Expected Submit, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_keeps_raw_interval() {
        // Interval validation belongs to the submitter
        let event = parse_command("add x http://x.test soon").unwrap().unwrap();
        assert!(matches!(event, AppEvent::Submit(form) if form.interval == "soon"));
    }

    #[test]
    fn test_parse_add_wrong_arity() {
        assert!(parse_command("add example").is_err());
        assert!(parse_command("add a b c d").is_err());
    }

    #[test]
    fn test_parse_quit_and_blank() {
        assert!(matches!(
            parse_command("QUIT"),
            Ok(Some(AppEvent::Shutdown))
        ));
        assert!(matches!(parse_command("   "), Ok(None)));
        assert!(parse_command("frobnicate").is_err());
    }
}
