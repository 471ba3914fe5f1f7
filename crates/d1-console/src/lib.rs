//! Operator console for a single relay/GPIO output ("D1") exposed by a
//! remote device over HTTP.
//!
//! The library carries the whole controller: status refresh, on/off
//! sequencing, and the single restartable latch reversal. The terminal
//! front end and the one-shot CLI subcommands both drive the same
//! [`Controller`], so everything the operator can do is testable without
//! a terminal attached.

pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod latch;
pub mod log;
pub mod pin;
pub mod ui;

pub use controller::{Controller, StatusView};
pub use device::{DeviceClient, DeviceEndpoint, StatusReport};
pub use error::DeviceError;
pub use pin::{Command, PinAction, PinState};
