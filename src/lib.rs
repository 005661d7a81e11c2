//! Control core of a USB macropad: 12 keys, two rotary encoders with push
//! buttons, and a 128×32 OLED.
//!
//! Everything here is hardware-independent and runs on the host under
//! `cargo test`. The embedded binary (`src/main.rs`, `embedded` feature)
//! supplies the producers, the USB transport and the panel driver, and
//! drives the two periodic loops:
//!
//! - [`hid::HidLayer::tick`] at 100 Hz, sending keypad and encoder reports
//! - [`ui::UiStateMachine::tick`] at 20 Hz, running menus and the display
//!
//! Both read the lock-free [`input::InputSnapshot`]. Profile configuration
//! from the host arrives through [`hid::on_report_received`].
//!
//! Usage: `cargo test` (host) or `cargo run --release --features embedded`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod config;
pub mod debounce;
pub mod error;
pub mod hid;
pub mod input;
pub mod power;
pub mod profile;
pub mod quadrature;
pub mod throttle;
pub mod ui;

pub use error::Error;
pub use hid::{on_report_received, HidLayer, ProfileObserver, ReportSink};
pub use input::{InputSnapshot, InputState, InputUpdate};
pub use profile::Profile;
pub use ui::{Screen, UiStateMachine};
