//! Screen rendering for the 128×32 monochrome OLED.
//!
//! Every function draws into any `embedded-graphics` target so the UI can
//! be rendered into a RAM framebuffer in tests. Clearing and flushing are
//! the caller's job.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::config::{key_bit, DISPLAY_WIDTH, MATRIX_COLS, MATRIX_ROWS};
use crate::error::Error;
use crate::input::InputState;
use crate::profile::Profile;

/// Firmware name shown on the splash and version screens.
pub const APP_NAME: &str = "Macropad";

/// Crate version and short git revision, baked in at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = env!("MACROPAD_GIT_SHA");

/// A display the UI can draw to, flush, and power down.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Push the frame buffer to the glass.
    fn flush(&mut self) -> Result<(), Error>;

    /// Leave (`true`) or enter (`false`) power save.
    fn set_powered(&mut self, on: bool) -> Result<(), Error>;
}

fn text_style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

fn inverted_style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::Off)
        .background_color(BinaryColor::On)
        .build()
}

fn style(font: &'static MonoFont<'static>, inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
    if inverted {
        inverted_style(font)
    } else {
        text_style(font)
    }
}

/// Start-up screen shown before the first frame.
pub fn draw_splash<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::new(APP_NAME, Point::new(0, 8), text_style(&FONT_6X10)).draw(display)?;

    let mut line: heapless::String<24> = heapless::String::new();
    let _ = write!(line, "Firmware {}", VERSION);
    Text::new(line.as_str(), Point::new(0, 20), text_style(&FONT_6X10)).draw(display)?;
    Ok(())
}

pub fn draw_version<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::new(APP_NAME, Point::new(0, 8), text_style(&FONT_6X10)).draw(display)?;

    let sha = GIT_SHA.get(..6).unwrap_or(GIT_SHA);
    let mut line: heapless::String<30> = heapless::String::new();
    let _ = write!(line, "{} ({})", VERSION, sha);
    Text::new(line.as_str(), Point::new(0, 20), text_style(&FONT_6X10)).draw(display)?;
    Ok(())
}

/// Live key grid plus both encoder counters.
///
/// Pressed keys are filled boxes; an encoder value is drawn inverted
/// while its button is held.
pub fn draw_input_debug<D>(display: &mut D, state: &InputState) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    const KEY_SIDE: u32 = 6;
    const KEY_PITCH: i32 = KEY_SIDE as i32 + 2;

    let filled = PrimitiveStyle::with_fill(BinaryColor::On);
    let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    for row in 0..MATRIX_ROWS {
        for col in 0..MATRIX_COLS {
            let origin = Point::new(2 + col as i32 * KEY_PITCH, 2 + row as i32 * KEY_PITCH);
            let key = Rectangle::new(origin, Size::new(KEY_SIDE, KEY_SIDE));
            let key_style = if state.key_pressed(key_bit(row, col)) {
                filled
            } else {
                outline
            };
            key.into_styled(key_style).draw(display)?;
        }
    }

    for (y, value, pressed) in [
        (8, state.encoder_0, state.encoder_0_button),
        (20, state.encoder_1, state.encoder_1_button),
    ] {
        let mut text: heapless::String<4> = heapless::String::new();
        let _ = write!(text, "{}", value);
        Text::new(text.as_str(), Point::new(60, y), style(&FONT_6X10, pressed)).draw(display)?;
    }
    Ok(())
}

/// Horizontal menu, selected item inverted.
pub fn draw_menu<D>(display: &mut D, items: &[&str], selected: usize) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    const ITEMS_PER_ROW: usize = 3;
    const ITEM_W: i32 = 40;
    const ITEM_H: i32 = 8;

    for (i, &label) in items.iter().enumerate() {
        let row = (i / ITEMS_PER_ROW) as i32;
        let col = (i % ITEMS_PER_ROW) as i32;
        let position = Point::new(col * (ITEM_W + 2), (row + 1) * (ITEM_H + 2));
        Text::new(label, position, style(&FONT_6X10, i == selected)).draw(display)?;
    }
    Ok(())
}

/// Current event-sending status and the Enable/Disable choice.
pub fn draw_usb_config<D>(display: &mut D, enabled: bool, selected: usize) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let status = if enabled {
        "HID events enabled"
    } else {
        "HID events disabled"
    };
    Text::new(status, Point::new(0, 8), text_style(&FONT_6X10)).draw(display)?;
    Text::new("Enable", Point::new(0, 20), style(&FONT_6X10, selected == 0)).draw(display)?;
    Text::new("Disable", Point::new(64, 20), style(&FONT_6X10, selected == 1)).draw(display)?;
    Ok(())
}

/// Profile name in a large font, falling back to the small one when the
/// name would not fit.
pub fn draw_profile_name<D>(display: &mut D, profile: &Profile) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let name = profile.name();
    let large_fits =
        name.len() as u32 * FONT_10X20.character_size.width <= DISPLAY_WIDTH;

    if large_fits {
        Text::with_baseline(name, Point::new(0, 6), text_style(&FONT_10X20), Baseline::Top)
            .draw(display)?;
    } else {
        Text::with_baseline(name, Point::new(0, 11), text_style(&FONT_6X10), Baseline::Top)
            .draw(display)?;
    }
    Ok(())
}

/// 3×4 grid of key labels; held keys are drawn inverted.
pub fn draw_keymap<D>(display: &mut D, profile: &Profile, state: &InputState) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    const CELL_W: u32 = 32;
    const CELL_H: u32 = 10;
    const ROW_PITCH: i32 = CELL_H as i32 + 1;
    // 4 glyphs of 5 px, centred in the cell.
    const TEXT_INSET: i32 = 6;

    for row in 0..MATRIX_ROWS {
        for col in 0..MATRIX_COLS {
            let origin = Point::new(col as i32 * CELL_W as i32, row as i32 * ROW_PITCH);
            let pressed = state.key_pressed(key_bit(row, col));
            if pressed {
                Rectangle::new(origin, Size::new(CELL_W, CELL_H))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(display)?;
            }

            let label = profile.key_label(row * MATRIX_COLS + col).unwrap_or("");
            Text::with_baseline(
                label,
                origin + Point::new(TEXT_INSET, 1),
                style(&FONT_5X8, pressed),
                Baseline::Top,
            )
            .draw(display)?;
        }
    }
    Ok(())
}
