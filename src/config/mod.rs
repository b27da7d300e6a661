//! Configuration module for the dashboard
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`UPTIME_DASH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use uptime_dash::config::DashConfig;
//!
//! let config = DashConfig::default();
//! assert_eq!(config.channel.endpoint, "ws://localhost:8080/echo");
//!
//! let toml = r#"
//! [channel]
//! endpoint = "ws://monitor.lan:8080/echo"
//! "#;
//! let config: DashConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.channel.endpoint, "ws://monitor.lan:8080/echo");
//! ```

pub mod error;
pub mod logging;
pub mod site;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use site::SiteConfig;

// Channel settings live with the connection manager
pub use crate::connection::{ChannelConfig, ReconnectConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashConfig {
    /// Channel endpoint settings
    pub channel: ChannelConfig,
    /// Reconnection policy
    pub reconnect: ReconnectConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Sites shown in the table at startup
    pub sites: Vec<SiteConfig>,
}

impl DashConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("UPTIME_DASH_ENDPOINT") {
            self.channel.endpoint = endpoint;
        }

        if let Ok(level) = std::env::var("UPTIME_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("UPTIME_DASH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(reconnect) = std::env::var("UPTIME_DASH_RECONNECT") {
            self.reconnect.enabled = reconnect.to_lowercase() == "true";
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.channel.endpoint;
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(ConfigError::Validation {
                field: "channel.endpoint".to_string(),
                message: format!("expected a ws:// or wss:// URL, got '{}'", endpoint),
            });
        }

        if self.channel.connect_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "channel.connect_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if self.reconnect.max_delay_ms == 0 {
            return Err(ConfigError::Validation {
                field: "reconnect.max_delay_ms".to_string(),
                message: "max delay must be non-zero".to_string(),
            });
        }
        if self.reconnect.backoff_multiplier < 1.0 {
            return Err(ConfigError::Validation {
                field: "reconnect.backoff_multiplier".to_string(),
                message: "multiplier must be at least 1.0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, site) in self.sites.iter().enumerate() {
            if site.name.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("sites[{}].name", i),
                    message: "name cannot be empty".to_string(),
                });
            }
            if !seen.insert(site.id) {
                return Err(ConfigError::DuplicateSiteId(site.id));
            }
        }

        Ok(())
    }
}
