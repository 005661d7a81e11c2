//! Board peripherals: key matrix, encoders and the OLED.
//!
//! Pin assignment is listed in `macropad::config`.

pub mod encoder;
pub mod matrix;
pub mod oled;
