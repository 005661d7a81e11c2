//! Application-wide constants and compile-time configuration.
//!
//! Matrix geometry, timing parameters, and protocol constants live here
//! so they can be tuned in one place.

use embassy_time::Duration;

// Key matrix

/// Columns in the key matrix.
pub const MATRIX_COLS: usize = 4;

/// Rows in the key matrix.
pub const MATRIX_ROWS: usize = 3;

/// Total number of keys (one bit each in the key mask).
pub const KEY_COUNT: usize = MATRIX_COLS * MATRIX_ROWS;

/// Mask covering every valid key bit.
pub const KEY_MASK: u16 = (1 << KEY_COUNT) - 1;

/// Bit index in the key mask for the key drawn at `row`, `col`.
///
/// The matrix is wired bottom row first, so display row 0 lives in the
/// top nibble of the 12-bit mask.
pub const fn key_bit(row: usize, col: usize) -> usize {
    (MATRIX_ROWS - 1 - row) * MATRIX_COLS + col
}

// Profile

/// Maximum profile name length in bytes.
pub const PROFILE_NAME_LEN: usize = 18;

/// Characters per key label.
pub const KEY_LABEL_LEN: usize = 4;

/// Size of the concatenated key label block.
pub const KEY_LABELS_LEN: usize = KEY_LABEL_LEN * KEY_COUNT;

// HID

/// Outbound keypad state report.
pub const REPORT_ID_KEYPAD: u8 = 1;

/// Outbound encoder state report.
pub const REPORT_ID_ENCODER: u8 = 2;

/// Inbound profile name report.
pub const REPORT_ID_PROFILE_NAME: u8 = 3;

/// Inbound key label report.
pub const REPORT_ID_KEY_LABELS: u8 = 4;

/// Name bytes carried by a profile name report.
pub const PROFILE_NAME_REPORT_BYTES: usize = 8;

/// Full length of a profile name report (reserved byte + name).
pub const PROFILE_NAME_REPORT_LEN: usize = 1 + PROFILE_NAME_REPORT_BYTES;

/// Full length of a key label report (reserved byte + labels).
pub const KEY_LABELS_REPORT_LEN: usize = 1 + KEY_LABELS_LEN;

/// Outbound report cadence (100 Hz).
pub const HID_SEND_INTERVAL: Duration = Duration::from_millis(10);

// UI

/// Frame period of the display loop (20 Hz).
pub const UI_FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Inactivity timeout before the OLED is put into power save.
pub const DISPLAY_OFF_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the profile name stays up before switching to the keymap.
pub const PROFILE_OVERLAY_TIMEOUT: Duration = Duration::from_millis(700);

/// Panel width in pixels.
pub const DISPLAY_WIDTH: u32 = 128;

/// Panel height in pixels.
pub const DISPLAY_HEIGHT: u32 = 32;

// Inputs

/// Settle time for the encoder push-buttons.
pub const BUTTON_SETTLE_TIME: Duration = Duration::from_millis(5);

/// Settle time for each key in the matrix scan.
pub const KEY_SETTLE_TIME: Duration = Duration::from_millis(5);

/// Quadrature transitions per encoder detent.
pub const ENCODER_TRANSITIONS_PER_STEP: i8 = 4;

// USB

/// USB VID/PID expected by the host-side profile tools.
pub const USB_VID: u16 = 0x2E8A;
pub const USB_PID: u16 = 0xFFEE;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "macropad";
pub const USB_PRODUCT: &str = "USB Macropad";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 5;

// GPIO pin assignments (nRF52840-DK headers)
//
//   Matrix rows     → P0.03, P0.04, P0.28
//   Matrix columns  → P0.29, P0.30, P0.31, P1.15
//   Encoder 0 A/B   → P1.01, P1.02,  button → P1.03
//   Encoder 1 A/B   → P1.04, P1.05,  button → P1.06
//   I²C SDA         → P0.26
//   I²C SCL         → P0.27
