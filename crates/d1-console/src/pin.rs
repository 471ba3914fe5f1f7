//! Pin state, wire-level actions, and operator commands.

use std::fmt;

/// Logical state of the D1 output. The device reports it as a JSON
/// number; exactly `1` means on, every other number means off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinState {
    #[default]
    Off,
    On,
}

impl PinState {
    /// Normalizes a wire value. Anything that is not exactly `1` is off.
    #[must_use]
    pub fn from_wire(raw: f64) -> Self {
        if raw == 1.0 {
            Self::On
        } else {
            Self::Off
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

/// A concrete command the device accepts: `POST /api/on` or `POST /api/off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinAction {
    On,
    Off,
}

impl PinAction {
    /// The reversal a latch timer fires for this action.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Path segment under `/api/`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    #[must_use]
    pub fn target_state(self) -> PinState {
        match self {
            Self::On => PinState::On,
            Self::Off => PinState::Off,
        }
    }
}

impl fmt::Display for PinAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-level request. `Toggle` resolves against the last known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
    Toggle,
}

impl Command {
    /// Maps `Toggle` to the action opposing `last`; on/off pass through.
    #[must_use]
    pub fn resolve(self, last: PinState) -> PinAction {
        match self {
            Self::On => PinAction::On,
            Self::Off => PinAction::Off,
            Self::Toggle => {
                if last == PinState::On {
                    PinAction::Off
                } else {
                    PinAction::On
                }
            }
        }
    }
}
