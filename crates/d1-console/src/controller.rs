//! Controller session: status refresh, action sequencing, latch policy.
//!
//! The controller is owned by a single event-loop thread (console or
//! one-shot CLI) and processes one operator/timer event at a time, so
//! the cancel-latch, send, refresh, log sequence of [`Controller::apply_state`]
//! can never interleave with another command.

use std::time::{Duration, Instant};

use crate::device::DeviceClient;
use crate::error::DeviceError;
use crate::latch::LatchTimer;
use crate::log::DebugLog;
use crate::pin::{Command, PinAction, PinState};

/// What the status line currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusView {
    #[default]
    Unknown,
    Pin(PinState),
    Error,
}

impl StatusView {
    #[must_use]
    pub fn text(self) -> String {
        match self {
            Self::Unknown => "Status: unknown".to_string(),
            Self::Pin(state) => format!("D1 is {}", state.label()),
            Self::Error => "Status: ERROR".to_string(),
        }
    }
}

pub struct Controller {
    client: DeviceClient,
    last_state: PinState,
    status: StatusView,
    latch: Option<LatchTimer>,
    device_latch_seconds: Option<u64>,
    synced: bool,
    log: DebugLog,
}

impl Controller {
    #[must_use]
    pub fn new(client: DeviceClient) -> Self {
        Self {
            client,
            last_state: PinState::Off,
            status: StatusView::Unknown,
            latch: None,
            device_latch_seconds: None,
            synced: false,
            log: DebugLog::new(),
        }
    }

    #[must_use]
    pub fn last_state(&self) -> PinState {
        self.last_state
    }

    #[must_use]
    pub fn status(&self) -> StatusView {
        self.status
    }

    /// True once at least one refresh has succeeded; button highlighting
    /// only ever changes on a successful refresh.
    #[must_use]
    pub fn synced(&self) -> bool {
        self.synced
    }

    #[must_use]
    pub fn log(&self) -> &DebugLog {
        &self.log
    }

    #[must_use]
    pub fn latch_pending(&self) -> bool {
        self.latch.is_some()
    }

    #[must_use]
    pub fn latch_remaining(&self, now: Instant) -> Option<Duration> {
        self.latch.as_ref().map(|latch| latch.remaining(now))
    }

    /// Latch period the device itself reports, when the status payload
    /// carries one.
    #[must_use]
    pub fn device_latch_seconds(&self) -> Option<u64> {
        self.device_latch_seconds
    }

    #[must_use]
    pub fn endpoint_base(&self) -> &str {
        self.client.endpoint().base()
    }

    /// Refreshes the displayed state from the device. Every failure is
    /// contained here: logged, status shown as ERROR, and `last_state`
    /// left at its last-known-good value. Nothing retries automatically.
    pub fn refresh(&mut self) {
        match self.client.status() {
            Ok(report) => {
                self.last_state = report.pin;
                self.status = StatusView::Pin(report.pin);
                self.device_latch_seconds = report.latch_seconds;
                self.synced = true;
                self.log.push("Status refreshed");
            }
            Err(err @ DeviceError::ParseStatus(_)) => {
                self.log.push(err.to_string());
                self.status = StatusView::Error;
            }
            Err(DeviceError::MalformedStatus) => {
                self.log.push("Malformed status response");
                self.status = StatusView::Error;
            }
            Err(err) => {
                self.log.push(format!("Status refresh failed: {err}"));
                self.status = StatusView::Error;
            }
        }
    }

    /// Posts an action to the device. This is the one place a device
    /// error is re-raised: the applier needs it to abort the latch
    /// sequence.
    fn send_action(&mut self, action: PinAction) -> Result<(), DeviceError> {
        self.client.send(action).map_err(|err| {
            self.log.push(format!("API request failed: {err}"));
            err
        })
    }

    /// Applies an on/off action with the latch sequencing policy:
    ///
    /// 1. disarm any pending latch, before the outcome of the new action
    ///    is known, so a stale reversal can never fire afterwards;
    /// 2. send the action;
    /// 3. on success, refresh (the device is the source of truth) and
    ///    log the action;
    /// 4. on failure, log and stop, leaving the status display as it was;
    /// 5. arm a reversal only when requested and the duration is nonzero.
    pub fn apply_state(
        &mut self,
        action: PinAction,
        schedule_latch: bool,
        latch_ms: u64,
        now: Instant,
    ) {
        self.latch = None;

        if let Err(err) = self.send_action(action) {
            self.log.push(format!("Action failed: {err}"));
            return;
        }
        self.refresh();
        self.log.push(format!("Action: {action}"));

        if !schedule_latch || latch_ms == 0 {
            return;
        }
        self.latch = Some(LatchTimer::arm(now, latch_ms, action.opposite()));
    }

    /// Resolves an operator command against the last known state and
    /// applies it with latching enabled.
    pub fn set_state(&mut self, command: Command, latch_ms: u64, now: Instant) {
        let action = command.resolve(self.last_state);
        self.apply_state(action, true, latch_ms, now);
    }

    /// Fires a due latch reversal. The timer clears on firing and the
    /// reversal runs with latching disabled, so one arm produces exactly
    /// one bounce.
    pub fn tick(&mut self, now: Instant) {
        let Some(latch) = self.latch else {
            return;
        };
        if !latch.due(now) {
            return;
        }
        self.latch = None;
        let revert = latch.revert_action();
        self.log.push(format!(
            "Latch expired, reverting to {}",
            revert.target_state().label()
        ));
        self.apply_state(revert, false, 0, now);
    }
}
