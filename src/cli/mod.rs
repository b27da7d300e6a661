//! CLI module for the dashboard
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `watch` - Show the live status table and accept registrations from stdin
//! - `register` - Register one site and exit
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch the default endpoint
//! uptime-dash watch
//!
//! # Register a site against a remote monitor
//! uptime-dash register example http://example.com 30 --endpoint ws://monitor.lan:8080/echo
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod register;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// uptime-dash - live website uptime dashboard
#[derive(Parser, Debug)]
#[command(
    name = "uptime-dash",
    version,
    about = "Real-time dashboard client for a website uptime monitor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show live site status
    Watch(WatchArgs),
    /// Register a site to be monitored
    Register(RegisterArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that open the channel
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "uptime-dash.toml")]
    pub config: PathBuf,

    /// Override the monitoring server endpoint
    #[arg(short, long, env = "UPTIME_DASH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "UPTIME_DASH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Do not reconnect after the channel dies
    #[arg(long)]
    pub no_reconnect: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name for the site
    pub name: String,

    /// URL to monitor
    pub url: String,

    /// Polling interval in seconds
    pub interval: String,

    /// Seconds to wait for the channel before giving up
    #[arg(short, long, default_value = "10")]
    pub wait: u64,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "uptime-dash.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
