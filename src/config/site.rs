//! Sites shown in the status table at startup

use serde::{Deserialize, Serialize};

/// A monitored site known to the dashboard before any update arrives.
///
/// Mirrors one row of the server-rendered table: the server assigns `id`,
/// and the remaining fields are display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: i64,
    pub name: String,
    pub url: String,
    /// Polling interval in seconds
    pub interval: u32,
    /// Last known status code, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
}
