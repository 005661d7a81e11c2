//! Quadrature decoding for the two rotary encoders.
//!
//! Each A/B edge is looked up as an (old, new) state pair; valid Gray-code
//! steps count ±1, a repeated state or a skipped state (both lines moved at
//! once) counts 0. One detent is [`ENCODER_TRANSITIONS_PER_STEP`]
//! transitions.

use crate::config::ENCODER_TRANSITIONS_PER_STEP;

/// Indexed by `old << 2 | new`, with a state encoded as `A << 1 | B`.
/// Clockwise is 00 → 10 → 11 → 01 → 00.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    state: u8,
    transitions: i8,
    count: u8,
}

impl QuadratureDecoder {
    /// Start from the current line levels with the counter at zero.
    pub const fn new(a: bool, b: bool) -> Self {
        Self {
            state: encode(a, b),
            transitions: 0,
            count: 0,
        }
    }

    /// Wrapping detent counter.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Feed the line levels after an edge. Returns the new counter value
    /// when a full detent has been turned.
    pub fn update(&mut self, a: bool, b: bool) -> Option<u8> {
        let next = encode(a, b);
        let index = ((self.state << 2) | next) as usize;
        self.state = next;
        self.transitions += TRANSITIONS[index];

        if self.transitions >= ENCODER_TRANSITIONS_PER_STEP {
            self.transitions -= ENCODER_TRANSITIONS_PER_STEP;
            self.count = self.count.wrapping_add(1);
            Some(self.count)
        } else if self.transitions <= -ENCODER_TRANSITIONS_PER_STEP {
            self.transitions += ENCODER_TRANSITIONS_PER_STEP;
            self.count = self.count.wrapping_sub(1);
            Some(self.count)
        } else {
            None
        }
    }
}

const fn encode(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOCKWISE: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];

    fn turn(decoder: &mut QuadratureDecoder, steps: &[(bool, bool)]) -> Vec<u8> {
        steps
            .iter()
            .filter_map(|&(a, b)| decoder.update(a, b))
            .collect()
    }

    #[test]
    fn one_detent_per_four_transitions() {
        let mut decoder = QuadratureDecoder::new(false, false);
        assert_eq!(turn(&mut decoder, &CLOCKWISE[..3]), Vec::<u8>::new());
        assert_eq!(turn(&mut decoder, &CLOCKWISE[3..]), vec![1]);
        assert_eq!(turn(&mut decoder, &CLOCKWISE), vec![2]);
    }

    #[test]
    fn counter_clockwise_wraps_below_zero() {
        let mut decoder = QuadratureDecoder::new(false, false);
        let mut ccw = CLOCKWISE;
        ccw.reverse();
        // Reversed sequence starts at 00; rotate so it leaves 00 first.
        ccw.rotate_left(1);
        assert_eq!(turn(&mut decoder, &ccw), vec![255]);
        assert_eq!(decoder.count(), 255);
    }

    #[test]
    fn contact_bounce_cancels_out() {
        let mut decoder = QuadratureDecoder::new(false, false);
        let bounce = [(true, false), (false, false), (true, false), (false, false)];
        assert_eq!(turn(&mut decoder, &bounce), Vec::<u8>::new());
        assert_eq!(turn(&mut decoder, &CLOCKWISE), vec![1]);
    }

    #[test]
    fn skipped_state_is_ignored() {
        let mut decoder = QuadratureDecoder::new(false, false);
        assert_eq!(decoder.update(true, true), None);
        assert_eq!(decoder.update(false, false), None);
        assert_eq!(decoder.count(), 0);
    }
}
