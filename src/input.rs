//! Shared input state between the interrupt-side producers and the
//! main loop.
//!
//! Every field has exactly one producer (matrix scan, one encoder each,
//! one debounced button each) and is stored in its own atomic, so
//! producers never block each other or the consumer. A snapshot taken by
//! [`InputSnapshot::poll`] may mix field values from slightly different
//! instants; consumers tolerate that.
//!
//! Change tracking is a bitmask of per-consumer dirty flags. Producers
//! only ever OR bits in; each consumer clears its own bit exactly once
//! per read, before loading the fields, so a write racing with the read
//! re-marks the snapshot and is never lost.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use crate::config::KEY_MASK;

/// UI poll loop: any field changed.
const DIRTY_UI: u8 = 1 << 0;
/// HID keypad report: key matrix changed.
const DIRTY_KEYPAD: u8 = 1 << 1;
/// HID encoder report: host-facing encoder (encoder 1) changed.
const DIRTY_ENCODER: u8 = 1 << 2;

/// Plain copy of all inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputState {
    /// One bit per key, 12 bits used.
    pub key_matrix: u16,
    /// Wrapping rotation counter of encoder 0 (UI navigation).
    pub encoder_0: u8,
    pub encoder_0_button: bool,
    /// Wrapping rotation counter of encoder 1 (reported to the host).
    pub encoder_1: u8,
    pub encoder_1_button: bool,
}

impl InputState {
    /// Whether the key at `bit` is held.
    pub fn key_pressed(&self, bit: usize) -> bool {
        (self.key_matrix >> bit) & 1 != 0
    }
}

/// A partial update: only the fields set here are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputUpdate {
    pub key_matrix: Option<u16>,
    pub encoder_0: Option<u8>,
    pub encoder_0_button: Option<bool>,
    pub encoder_1: Option<u8>,
    pub encoder_1_button: Option<bool>,
}

impl InputUpdate {
    pub const fn new() -> Self {
        Self {
            key_matrix: None,
            encoder_0: None,
            encoder_0_button: None,
            encoder_1: None,
            encoder_1_button: None,
        }
    }

    pub const fn key_matrix(mut self, mask: u16) -> Self {
        self.key_matrix = Some(mask);
        self
    }

    pub const fn encoder_0(mut self, rotation: u8) -> Self {
        self.encoder_0 = Some(rotation);
        self
    }

    pub const fn encoder_0_button(mut self, pressed: bool) -> Self {
        self.encoder_0_button = Some(pressed);
        self
    }

    pub const fn encoder_1(mut self, rotation: u8) -> Self {
        self.encoder_1 = Some(rotation);
        self
    }

    pub const fn encoder_1_button(mut self, pressed: bool) -> Self {
        self.encoder_1_button = Some(pressed);
        self
    }
}

/// Writer/reader pair for the live input state.
///
/// Meant to live in a `static`; all methods take `&self`.
pub struct InputSnapshot {
    key_matrix: AtomicU16,
    encoder_0: AtomicU8,
    encoder_0_button: AtomicBool,
    encoder_1: AtomicU8,
    encoder_1_button: AtomicBool,
    dirty: AtomicU8,
}

impl InputSnapshot {
    /// All inputs idle. The HID flags start set so the first report after
    /// enumeration carries the current state.
    pub const fn new() -> Self {
        Self {
            key_matrix: AtomicU16::new(0),
            encoder_0: AtomicU8::new(0),
            encoder_0_button: AtomicBool::new(false),
            encoder_1: AtomicU8::new(0),
            encoder_1_button: AtomicBool::new(false),
            dirty: AtomicU8::new(DIRTY_KEYPAD | DIRTY_ENCODER),
        }
    }

    /// Write the fields present in `update`. Safe to call from any
    /// producer context; never blocks.
    pub fn set(&self, update: InputUpdate) {
        let mut dirty = DIRTY_UI;

        if let Some(mask) = update.key_matrix {
            self.key_matrix.store(mask & KEY_MASK, Ordering::Relaxed);
            dirty |= DIRTY_KEYPAD;
        }
        if let Some(rotation) = update.encoder_0 {
            self.encoder_0.store(rotation, Ordering::Relaxed);
        }
        if let Some(pressed) = update.encoder_0_button {
            self.encoder_0_button.store(pressed, Ordering::Relaxed);
        }
        if let Some(rotation) = update.encoder_1 {
            self.encoder_1.store(rotation, Ordering::Relaxed);
            dirty |= DIRTY_ENCODER;
        }
        if let Some(pressed) = update.encoder_1_button {
            self.encoder_1_button.store(pressed, Ordering::Relaxed);
            dirty |= DIRTY_ENCODER;
        }

        self.dirty.fetch_or(dirty, Ordering::Release);
    }

    /// Copy out the current state for the UI poll.
    ///
    /// Returns the state and whether anything was written since the
    /// previous `poll`. Only the UI loop may call this.
    pub fn poll(&self) -> (InputState, bool) {
        let changed = self.take(DIRTY_UI);
        (self.load(), changed)
    }

    /// Read-and-clear the keypad report flag.
    pub fn take_keypad_dirty(&self) -> bool {
        self.take(DIRTY_KEYPAD)
    }

    /// Read-and-clear the encoder report flag.
    pub fn take_encoder_dirty(&self) -> bool {
        self.take(DIRTY_ENCODER)
    }

    /// Current state without touching any dirty flag.
    pub fn load(&self) -> InputState {
        InputState {
            key_matrix: self.key_matrix.load(Ordering::Relaxed),
            encoder_0: self.encoder_0.load(Ordering::Relaxed),
            encoder_0_button: self.encoder_0_button.load(Ordering::Relaxed),
            encoder_1: self.encoder_1.load(Ordering::Relaxed),
            encoder_1_button: self.encoder_1_button.load(Ordering::Relaxed),
        }
    }

    fn take(&self, bit: u8) -> bool {
        self.dirty.fetch_and(!bit, Ordering::Acquire) & bit != 0
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
