//! Display power management.
//!
//! The OLED goes into power save after [`DISPLAY_OFF_TIMEOUT`] without
//! input and wakes on the next input change. Every frame keeps being
//! rendered while the panel is dark, so it wakes with current content.

use embassy_time::Instant;

use crate::config::DISPLAY_OFF_TIMEOUT;

/// Power transition the caller must apply to the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerChange {
    Wake,
    Sleep,
}

/// Tracks whether the panel is lit and when it should go dark.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayPower {
    powered: bool,
    off_deadline: Instant,
}

impl DisplayPower {
    /// Panel lit at `now`, with the inactivity timer armed.
    pub fn new(now: Instant) -> Self {
        Self {
            powered: true,
            off_deadline: now + DISPLAY_OFF_TIMEOUT,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Apply one frame's worth of policy.
    ///
    /// `input_changed` re-arms the timer and wakes a dark panel; otherwise
    /// a lit panel past its deadline goes dark.
    pub fn update(&mut self, input_changed: bool, now: Instant) -> Option<PowerChange> {
        if input_changed {
            self.off_deadline = now + DISPLAY_OFF_TIMEOUT;
            if !self.powered {
                self.powered = true;
                info!("Display: waking");
                return Some(PowerChange::Wake);
            }
        } else if self.powered && now >= self.off_deadline {
            self.powered = false;
            info!("Display: power save");
            return Some(PowerChange::Sleep);
        }
        None
    }
}
