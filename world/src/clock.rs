//! Simulation clock that gates logical ticks.

use std::time::Duration;

use snake_arcade_core::{SessionState, TimerPolicy};

/// Tracks simulation time and the time accrued toward the next logical tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Clock {
    elapsed: Duration,
    since_step: Duration,
    steps: u64,
}

impl Clock {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accrues `dt` according to the session state and pause policy.
    ///
    /// Returns `true` when simulation time moved.
    pub(crate) fn advance(&mut self, dt: Duration, state: SessionState, policy: TimerPolicy) -> bool {
        match (state, policy) {
            (SessionState::Playing, _) => {
                self.elapsed = self.elapsed.saturating_add(dt);
                self.since_step = self.since_step.saturating_add(dt);
                true
            }
            (SessionState::Paused, TimerPolicy::RealTime) => {
                self.elapsed = self.elapsed.saturating_add(dt);
                true
            }
            _ => false,
        }
    }

    /// Consumes the accrued time when it covers `interval`.
    ///
    /// At most one step is granted per call and any remainder is dropped, so
    /// a long frame never produces a burst of catch-up ticks.
    pub(crate) fn take_step(&mut self, interval: Duration) -> bool {
        if self.since_step < interval {
            return false;
        }
        self.since_step = Duration::ZERO;
        self.steps = self.steps.saturating_add(1);
        true
    }

    pub(crate) const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) const fn steps(&self) -> u64 {
        self.steps
    }
}
