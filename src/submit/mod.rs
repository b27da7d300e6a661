//! Registration submitter.
//!
//! Turns the operator's form input into exactly one outbound
//! [`MonitorRegistrationRequest`] per submit. Submission is refused before
//! anything is sent when the channel is not connected or the input is invalid.

mod error;

pub use error::SubmitError;

use crate::connection::MessageChannel;
use crate::protocol::{encode_registration, MonitorRegistrationRequest};

/// Raw values of the registration form, as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub url: String,
    pub interval: String,
}

impl RegistrationForm {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            interval: interval.into(),
        }
    }

    /// Validate the fields and build the request.
    ///
    /// The URL is passed through untouched; the server decides whether it is
    /// usable.
    pub fn to_request(&self) -> Result<MonitorRegistrationRequest, SubmitError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }

        let interval = parse_interval(&self.interval)?;

        Ok(MonitorRegistrationRequest {
            name: name.to_string(),
            url: self.url.clone(),
            interval,
        })
    }
}

fn parse_interval(raw: &str) -> Result<u32, SubmitError> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(SubmitError::InvalidInterval(raw.to_string())),
        Ok(seconds) => Ok(seconds),
    }
}

/// Submit the form over `channel`.
///
/// Sends exactly one message on success and nothing on error.
pub fn submit<C: MessageChannel + ?Sized>(
    form: &RegistrationForm,
    channel: &C,
) -> Result<MonitorRegistrationRequest, SubmitError> {
    let state = channel.state();
    if !state.is_connected() {
        return Err(SubmitError::NotConnected(state));
    }

    let request = form.to_request()?;
    let payload = encode_registration(&request)?;
    channel.send(payload)?;

    tracing::info!(
        name = %request.name,
        url = %request.url,
        interval = request.interval,
        "Registration sent"
    );
    Ok(request)
}
