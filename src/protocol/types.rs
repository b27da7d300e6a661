//! Message types carried by the dashboard channel

use serde::{Deserialize, Serialize};

/// Request asking the monitoring server to start watching a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRegistrationRequest {
    /// Display name for the site
    pub name: String,
    /// URL to poll; the server decides whether it is valid
    pub url: String,
    /// Polling interval in seconds
    pub interval: u32,
}

/// Latest observed status for one monitored site, pushed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateEvent {
    /// Server-assigned site identifier
    pub id: i64,
    /// HTTP status code from the most recent check
    pub status_code: i64,
}

impl StatusUpdateEvent {
    pub(crate) const REQUIRED_FIELDS: &'static [&'static str] = &["id", "status_code"];
}
