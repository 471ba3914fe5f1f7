//! Device and configuration error taxonomy.

use smol_str::SmolStr;
use thiserror::Error;

/// Everything that can go wrong talking to (or locating) the device.
///
/// Status-fetch errors are contained by the controller; action-send
/// errors propagate one level so the applier can abort its sequence.
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("device returned HTTP {0}")]
    HttpStatus(u16),
    #[error("{0}")]
    ParseStatus(SmolStr),
    #[error("malformed status response")]
    MalformedStatus,
    #[error("network error: {0}")]
    Network(SmolStr),
    #[error("invalid endpoint '{0}' (expected http://host[:port])")]
    InvalidEndpoint(SmolStr),
    #[error("invalid config: {0}")]
    InvalidConfig(SmolStr),
}
