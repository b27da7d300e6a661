//! uptime-dash - real-time dashboard client for a website uptime monitor
//!
//! This library keeps a WebSocket channel to the monitoring server open,
//! reconciles inbound status updates into a status table and sends site
//! registrations upstream.

pub mod app;
pub mod cli;
pub mod config;
pub mod connection;
pub mod logging;
pub mod protocol;
pub mod submit;
pub mod table;
