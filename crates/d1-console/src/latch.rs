//! Restartable one-shot latch timer.

use std::time::{Duration, Instant};

use crate::pin::PinAction;

/// Deadline for an automatic reversal. The controller holds at most one;
/// arming a new command always drops the previous handle first, so a
/// stale reversal can never fire after a newer command.
#[derive(Debug, Clone, Copy)]
pub struct LatchTimer {
    deadline: Instant,
    revert: PinAction,
}

impl LatchTimer {
    #[must_use]
    pub fn arm(now: Instant, delay_ms: u64, revert: PinAction) -> Self {
        Self {
            deadline: now + Duration::from_millis(delay_ms),
            revert,
        }
    }

    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    #[must_use]
    pub fn revert_action(&self) -> PinAction {
        self.revert
    }

    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

/// Resolves the latch-seconds input field to milliseconds. The field is
/// free text; only a positive whole number of seconds arms a latch, and
/// everything else means "no latch".
#[must_use]
pub fn latch_millis_from_input(input: &str) -> u64 {
    match input.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => u64::try_from(seconds).unwrap_or(0).saturating_mul(1000),
        _ => 0,
    }
}
