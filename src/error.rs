//! Unified error type for the macropad core.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // HID inbound
    /// A configuration report arrived with the wrong length.
    MalformedReport { report_id: u8, len: usize },

    /// A report id we have no handler for.
    UnknownReport(u8),

    // HID outbound
    /// The USB device is not configured (or is suspended).
    TransportNotReady,

    /// The outbound report queue refused the report.
    TransportFull,

    // Display
    /// Drawing to or flushing the panel failed.
    Display,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}
