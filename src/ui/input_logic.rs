use crate::input::InputState;

/// Move a cursor by `delta` steps around `count` items, wrapping both ways.
pub fn cycle_selection(selected: u8, delta: i8, count: u8) -> u8 {
    if count == 0 {
        return 0;
    }
    (selected as i16 + delta as i16).rem_euclid(count as i16) as u8
}

/// Navigation input between two consecutive UI polls.
///
/// Only encoder 0 drives the menus; its button acts on release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavInput {
    /// Button went from pressed to released.
    pub button_falling: bool,
    /// Detents turned since the previous poll (wrapping counter difference).
    pub encoder_delta: i8,
}

impl NavInput {
    pub fn between(previous: &InputState, current: &InputState) -> Self {
        Self {
            button_falling: previous.encoder_0_button && !current.encoder_0_button,
            encoder_delta: current.encoder_0.wrapping_sub(previous.encoder_0) as i8,
        }
    }
}
