//! Console configuration loading.

use std::path::Path;

use smol_str::SmolStr;

use crate::device::DeviceEndpoint;
use crate::error::DeviceError;

pub const DEFAULT_CONFIG_FILE: &str = "d1-console.toml";
pub const ENDPOINT_ENV_VAR: &str = "D1_ENDPOINT";

/// Optional settings from `d1-console.toml`. Loading is lenient: a
/// missing file or an unreadable value falls back to defaults, the same
/// way the console treats every other non-fatal problem.
#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    pub endpoint: Option<SmolStr>,
    pub latch_seconds: Option<u64>,
}

impl ConsoleConfig {
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        let value: toml::Value = match text.parse() {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };
        let endpoint = value
            .get("device")
            .and_then(|device| device.get("endpoint"))
            .and_then(toml::Value::as_str)
            .map(SmolStr::new);
        let latch_seconds = value
            .get("console")
            .and_then(|console| console.get("latch_seconds"))
            .and_then(toml::Value::as_integer)
            .and_then(|raw| u64::try_from(raw).ok());
        Self {
            endpoint,
            latch_seconds,
        }
    }
}

/// Resolution order: explicit flag, then `D1_ENDPOINT`, then the config
/// file. No endpoint anywhere is a configuration error.
pub fn resolve_endpoint(
    flag: Option<&str>,
    config: &ConsoleConfig,
) -> Result<DeviceEndpoint, DeviceError> {
    if let Some(text) = flag {
        return DeviceEndpoint::parse(text);
    }
    if let Ok(text) = std::env::var(ENDPOINT_ENV_VAR) {
        return DeviceEndpoint::parse(&text);
    }
    if let Some(text) = config.endpoint.as_deref() {
        return DeviceEndpoint::parse(text);
    }
    Err(DeviceError::InvalidConfig(SmolStr::new(
        "no device endpoint configured (use --endpoint, D1_ENDPOINT, or d1-console.toml)",
    )))
}
