//! Configuration for the dashboard channel and its reconnection policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint the dashboard connects to when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/echo";

/// Channel endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// WebSocket URL of the monitoring server
    pub endpoint: String,
    /// Seconds to wait for the WebSocket handshake
    pub connect_timeout_seconds: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_seconds: 10,
        }
    }
}

/// Backoff policy applied after the channel terminates abruptly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Whether to reconnect at all
    pub enabled: bool,
    /// Delay before the first reconnect attempt
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay
    pub max_delay_ms: u64,
    /// Growth factor between consecutive attempts
    pub backoff_multiplier: f64,
    /// Attempts before giving up (always bounded)
    pub max_attempts: u32,
    /// Add up to 25% random spread to each delay
    pub jitter: bool,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            max_attempts: 10,
            jitter: true,
        }
    }
}

impl ReconnectConfig {
    /// Delay before the given attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let delay = if self.jitter {
            capped * (1.0 + rand_jitter() * 0.25)
        } else {
            capped
        };

        Duration::from_millis(delay as u64)
    }

    /// Whether attempt number `attempt` (1-based) may still be made.
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.enabled && attempt <= self.max_attempts
    }
}

/// Cheap spread in `[0, 1)` taken from the clock's sub-second nanos.
fn rand_jitter() -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
