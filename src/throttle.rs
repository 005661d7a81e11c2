//! Fixed-rate gate for the cooperative main loop.
//!
//! Periodic work never sleeps; each pass asks whether its next deadline
//! has passed and returns immediately if not.

use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Throttle {
    next: Instant,
    interval: Duration,
}

impl Throttle {
    /// First pass is due immediately.
    pub const fn new(interval: Duration) -> Self {
        Self {
            next: Instant::from_ticks(0),
            interval,
        }
    }

    /// Returns `true` once per interval and schedules the next pass.
    ///
    /// Deadlines advance by whole intervals so the cadence does not drift.
    /// After a stall longer than one interval the schedule restarts from
    /// `now` instead of running a burst of catch-up passes.
    pub fn is_due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        let next = self.next + self.interval;
        self.next = if next <= now { now + self.interval } else { next };
        true
    }
}
