//! Wire contracts for the dashboard channel.
//!
//! Two JSON message shapes travel over the channel:
//! - outbound [`MonitorRegistrationRequest`] asking the server to watch a site
//! - inbound [`StatusUpdateEvent`] reporting the latest status code for a site
//!
//! Decoding is forward-compatible: unknown fields are ignored, missing or
//! mistyped required fields are rejected with a [`DecodeError`].

mod error;
mod types;

pub use error::*;
pub use types::*;

/// Serialize a registration request into the outbound text frame.
///
/// # Examples
///
/// ```
/// use uptime_dash::protocol::{encode_registration, MonitorRegistrationRequest};
///
/// let request = MonitorRegistrationRequest {
///     name: "example".to_string(),
///     url: "http://example.com".to_string(),
///     interval: 30,
/// };
/// let json = encode_registration(&request).unwrap();
/// assert_eq!(json, r#"{"name":"example","url":"http://example.com","interval":30}"#);
/// ```
pub fn encode_registration(request: &MonitorRegistrationRequest) -> Result<String, EncodeError> {
    serde_json::to_string(request).map_err(|e| EncodeError(e.to_string()))
}

/// Decode one inbound text frame into a status update.
pub fn decode_status_update(payload: &str) -> Result<StatusUpdateEvent, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
    for &field in StatusUpdateEvent::REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(DecodeError::MissingField(field));
        }
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidField(e.to_string()))
}
