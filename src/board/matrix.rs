//! 3×4 key matrix scan.
//!
//! Rows are driven low one at a time; columns have pull-ups, so a held key
//! reads low on its column. Every key goes through its own
//! [`DebounceState`] and the 12-bit mask is published when a settled key
//! changes.

use defmt::debug;
use embassy_nrf::gpio::{Input, Output};
use embassy_time::{Instant, Timer};

use macropad::config::{key_bit, KEY_COUNT, KEY_SETTLE_TIME, MATRIX_COLS, MATRIX_ROWS};
use macropad::debounce::DebounceState;
use macropad::{InputSnapshot, InputUpdate};

pub struct Matrix<'a> {
    rows: [Output<'a>; MATRIX_ROWS],
    cols: [Input<'a>; MATRIX_COLS],
    keys: [DebounceState; KEY_COUNT],
    mask: u16,
}

impl<'a> Matrix<'a> {
    /// Rows must start high (idle).
    pub fn new(rows: [Output<'a>; MATRIX_ROWS], cols: [Input<'a>; MATRIX_COLS]) -> Self {
        Self {
            rows,
            cols,
            keys: [DebounceState::new(); KEY_COUNT],
            mask: 0,
        }
    }

    /// One pass over all rows. Returns the new mask if any settled key
    /// changed.
    pub async fn scan(&mut self) -> Option<u16> {
        let mut changed = false;

        for (row, pin) in self.rows.iter_mut().enumerate() {
            pin.set_low();
            // Let the row settle before reading the columns.
            Timer::after_micros(5).await;
            let now = Instant::now();

            for (col, input) in self.cols.iter().enumerate() {
                let bit = key_bit(row, col);
                let key = &mut self.keys[bit];
                if key.sample(input.is_low(), now, KEY_SETTLE_TIME) {
                    if key.stable_state() {
                        self.mask |= 1 << bit;
                    } else {
                        self.mask &= !(1 << bit);
                    }
                    changed = true;
                }
            }

            pin.set_high();
        }

        changed.then_some(self.mask)
    }

    /// Scan forever at ~1 kHz, publishing every change.
    pub async fn run(mut self, inputs: &'static InputSnapshot) -> ! {
        loop {
            if let Some(mask) = self.scan().await {
                debug!("Matrix: 0x{:03x}", mask);
                inputs.set(InputUpdate::new().key_matrix(mask));
            }
            Timer::after_millis(1).await;
        }
    }
}
