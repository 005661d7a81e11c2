//! Outbound input reports: keypad state (#1) and encoder state (#2).
//!
//! Layouts (report id byte not included):
//! ```text
//! Keypad  (2 bytes): u16 little-endian, bit i = key i pressed,
//!                    bits 12..16 always zero
//! Encoder (2 bytes): Byte 0 = rotation counter (wrapping 0-255)
//!                    Byte 1 = button, 0x01 pressed / 0x00 released
//! ```

use crate::config::KEY_MASK;

/// Keypad report size in bytes.
pub const KEYPAD_REPORT_SIZE: usize = 2;

/// Encoder report size in bytes.
pub const ENCODER_REPORT_SIZE: usize = 2;

/// Pressed-key bitmask report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadReport {
    /// Key bitmask, top 4 bits clear.
    pub keys: u16,
}

impl KeypadReport {
    pub const fn new(keys: u16) -> Self {
        Self {
            keys: keys & KEY_MASK,
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYPAD_REPORT_SIZE {
            return 0;
        }
        buf[..KEYPAD_REPORT_SIZE].copy_from_slice(&self.keys.to_le_bytes());
        KEYPAD_REPORT_SIZE
    }
}

/// Host-facing encoder report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderReport {
    pub rotation: u8,
    pub button: bool,
}

impl EncoderReport {
    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < ENCODER_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.rotation;
        buf[1] = if self.button { 0x01 } else { 0x00 };
        ENCODER_REPORT_SIZE
    }
}
