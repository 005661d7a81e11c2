//! Time-based debouncing for a single digital input.
//!
//! A raw sample that differs from the settled state starts a settle
//! window. The change is committed only if the raw value still differs
//! once the window has elapsed; returning to the settled value inside the
//! window cancels it.
//!
//! The caller samples at its own cadence (the main loop runs well above
//! 100 Hz), so a bounce shorter than one sampling interval can go unseen.

use embassy_time::{Duration, Instant};

/// Debounce state for one monitored input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceState {
    stable_state: bool,
    debouncing: bool,
    debounce_deadline: Instant,
}

impl DebounceState {
    /// Create a settled, released (`false`) input.
    pub const fn new() -> Self {
        Self {
            stable_state: false,
            debouncing: false,
            debounce_deadline: Instant::from_ticks(0),
        }
    }

    /// Settled value of the input.
    pub fn stable_state(&self) -> bool {
        self.stable_state
    }

    /// Whether a change is waiting out its settle window.
    pub fn is_debouncing(&self) -> bool {
        self.debouncing
    }

    /// Feed one raw sample taken at `now`.
    ///
    /// Returns `true` iff the settled state changed with this sample.
    pub fn sample(&mut self, raw: bool, now: Instant, settle_time: Duration) -> bool {
        if raw == self.stable_state {
            self.debouncing = false;
            return false;
        }

        if !self.debouncing {
            self.debouncing = true;
            self.debounce_deadline = now + settle_time;
            return false;
        }

        if now >= self.debounce_deadline {
            self.stable_state = raw;
            self.debouncing = false;
            return true;
        }

        false
    }
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new()
    }
}
