//! Rotary encoder tasks.
//!
//! Waits on edges of either quadrature line, decodes them and publishes
//! the wrapping detent counter for the encoder's role.

use defmt::{debug, Format};
use embassy_futures::select::select;
use embassy_nrf::gpio::Input;

use macropad::quadrature::QuadratureDecoder;
use macropad::{InputSnapshot, InputUpdate};

/// Which snapshot field an encoder feeds.
#[derive(Clone, Copy, PartialEq, Eq, Format)]
pub enum EncoderRole {
    /// Encoder 0, drives the menus.
    Navigation,
    /// Encoder 1, reported to the host.
    Host,
}

impl EncoderRole {
    fn update(self, count: u8) -> InputUpdate {
        match self {
            EncoderRole::Navigation => InputUpdate::new().encoder_0(count),
            EncoderRole::Host => InputUpdate::new().encoder_1(count),
        }
    }
}

pub async fn run(
    role: EncoderRole,
    mut a: Input<'static>,
    mut b: Input<'static>,
    inputs: &'static InputSnapshot,
) -> ! {
    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;

        if let Some(count) = decoder.update(a.is_high(), b.is_high()) {
            debug!("Encoder {}: {}", role, count);
            inputs.set(role.update(count));
        }
    }
}
