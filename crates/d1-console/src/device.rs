//! HTTP client for the device's D1 API.

use smol_str::SmolStr;

use crate::error::DeviceError;
use crate::pin::{PinAction, PinState};

/// Base origin of the device, e.g. `http://192.168.4.20`.
#[derive(Debug, Clone)]
pub struct DeviceEndpoint {
    base: SmolStr,
}

impl DeviceEndpoint {
    pub fn parse(text: &str) -> Result<Self, DeviceError> {
        let trimmed = text.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"));
        match host {
            Some(host) if !host.is_empty() => Ok(Self {
                base: SmolStr::new(trimmed),
            }),
            _ => Err(DeviceError::InvalidEndpoint(SmolStr::new(text.trim()))),
        }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

/// Payload of `GET /api/status`. The firmware also reports its configured
/// latch period alongside the pin value; it is surfaced when present.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub pin: PinState,
    pub latch_seconds: Option<u64>,
}

/// Blocking HTTP client. No explicit timeouts and no retries; the
/// controller decides what a failure means.
#[derive(Debug)]
pub struct DeviceClient {
    endpoint: DeviceEndpoint,
    agent: ureq::Agent,
}

impl DeviceClient {
    #[must_use]
    pub fn new(endpoint: DeviceEndpoint) -> Self {
        Self {
            endpoint,
            agent: ureq::agent(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &DeviceEndpoint {
        &self.endpoint
    }

    /// Fetches and validates the current pin state.
    pub fn status(&self) -> Result<StatusReport, DeviceError> {
        let response = self
            .agent
            .get(&self.endpoint.url("/api/status"))
            .call()
            .map_err(map_transport_error)?;
        let body = response
            .into_string()
            .map_err(|err| DeviceError::Network(SmolStr::new(err.to_string())))?;
        parse_status(&body)
    }

    /// Posts `/api/on` or `/api/off` with an empty body. A 2xx response
    /// is the only success signal; the response body is ignored.
    pub fn send(&self, action: PinAction) -> Result<(), DeviceError> {
        self.agent
            .post(&self.endpoint.url(&format!("/api/{}", action.as_str())))
            .send_bytes(&[])
            .map_err(map_transport_error)?;
        Ok(())
    }
}

fn map_transport_error(err: ureq::Error) -> DeviceError {
    match err {
        ureq::Error::Status(code, _) => DeviceError::HttpStatus(code),
        ureq::Error::Transport(transport) => {
            DeviceError::Network(SmolStr::new(transport.to_string()))
        }
    }
}

fn parse_status(body: &str) -> Result<StatusReport, DeviceError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|err| {
        DeviceError::ParseStatus(SmolStr::new(format!("failed to parse status JSON: {err}")))
    })?;
    let pin = value
        .get("d1")
        .and_then(serde_json::Value::as_f64)
        .map(PinState::from_wire)
        .ok_or(DeviceError::MalformedStatus)?;
    let latch_seconds = value.get("latch").and_then(serde_json::Value::as_u64);
    Ok(StatusReport { pin, latch_seconds })
}
