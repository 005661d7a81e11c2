//! USB Device subsystem - presents the macropad HID interface to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. A single HID interface carries every report:
//!
//! - Report 1 (input):   keypad bitmask
//! - Report 2 (input):   host-facing encoder
//! - Report 3 (feature): profile name
//! - Report 4 (feature): key labels
//!
//! Outbound reports are queued by the main loop and written by a
//! dedicated task; SET_REPORT requests are queued the other way and
//! drained by the main loop.

pub mod hid_device;
