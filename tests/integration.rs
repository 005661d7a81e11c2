//! Integration tests for the macropad control core.
//!
//! Drives the library the way the firmware main loop does: producers write
//! the snapshot, then the HID and UI ticks run every millisecond.

use core::convert::Infallible;

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use macropad::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use macropad::ui::display::Panel;
use macropad::ui::MenuItem;
use macropad::{
    on_report_received, Error, HidLayer, InputSnapshot, InputUpdate, Profile, ReportSink, Screen,
    UiStateMachine,
};

struct FrameBuffer {
    pixels: Vec<bool>,
    powered: bool,
}

impl FrameBuffer {
    fn new() -> Self {
        Self {
            pixels: vec![false; (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize],
            powered: false,
        }
    }

    fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&on| on).count()
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..DISPLAY_WIDTH as i32).contains(&point.x)
                && (0..DISPLAY_HEIGHT as i32).contains(&point.y)
            {
                let index = point.y as usize * DISPLAY_WIDTH as usize + point.x as usize;
                self.pixels[index] = color.is_on();
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl Panel for FrameBuffer {
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn set_powered(&mut self, on: bool) -> Result<(), Error> {
        self.powered = on;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Vec<(u8, Vec<u8>)>,
}

impl ReportSink for RecordingSink {
    fn is_ready(&self) -> bool {
        true
    }

    fn send(&mut self, report_id: u8, report: &[u8]) -> Result<(), Error> {
        self.sent.push((report_id, report.to_vec()));
        Ok(())
    }
}

/// Everything the firmware main loop owns.
struct Device {
    inputs: InputSnapshot,
    hid: HidLayer,
    ui: UiStateMachine,
    profile: Profile,
    panel: FrameBuffer,
    sink: RecordingSink,
    now: Instant,
    encoder_0: u8,
}

impl Device {
    fn boot() -> Self {
        let now = Instant::from_millis(0);
        let mut panel = FrameBuffer::new();
        let mut ui = UiStateMachine::new(now);
        ui.show_splash(&mut panel).unwrap();

        Self {
            inputs: InputSnapshot::new(),
            hid: HidLayer::new(),
            ui,
            profile: Profile::new(),
            panel,
            sink: RecordingSink::default(),
            now,
            encoder_0: 0,
        }
    }

    /// Run the main loop for `ms` milliseconds.
    fn run_for(&mut self, ms: u64) {
        for _ in 0..ms {
            self.now += Duration::from_millis(1);
            self.hid.tick(self.now, &self.inputs, &mut self.sink);
            self.ui
                .tick(self.now, &self.inputs, &mut self.hid, &self.profile, &mut self.panel)
                .unwrap();
        }
    }

    fn click(&mut self) {
        self.inputs.set(InputUpdate::new().encoder_0_button(true));
        self.run_for(60);
        self.inputs.set(InputUpdate::new().encoder_0_button(false));
        self.run_for(60);
    }

    fn turn(&mut self, detents: i8) {
        self.encoder_0 = self.encoder_0.wrapping_add(detents as u8);
        self.inputs.set(InputUpdate::new().encoder_0(self.encoder_0));
        self.run_for(60);
    }

    fn receive(&mut self, report_id: u8, payload: &[u8]) {
        on_report_received(report_id, payload, &mut self.profile, &mut self.ui, self.now);
    }
}

fn name_report(name: &[u8]) -> Vec<u8> {
    let mut report = vec![3u8; 9];
    report[1..].fill(0);
    report[1..1 + name.len()].copy_from_slice(name);
    report
}

#[test]
fn reports_flow_only_after_enabling_from_usb_config() {
    let mut device = Device::boot();
    device.run_for(10);

    device.inputs.set(InputUpdate::new().key_matrix(0x001));
    device.run_for(20);
    assert!(device.sink.sent.is_empty());

    // Version → Menu → USBConf → Enable.
    device.click();
    device.turn(1);
    device.click();
    assert_eq!(device.ui.screen(), Screen::UsbConfig);
    assert_eq!(device.ui.usb_config_selection(), 0);
    device.click();
    assert!(device.hid.is_event_sending_enabled());
    assert_eq!(device.ui.screen(), Screen::Menu);
    assert_eq!(device.ui.menu_selection(), MenuItem::UsbConfig);

    // Nothing stale is flushed on enable.
    assert!(device.sink.sent.is_empty());

    device.inputs.set(InputUpdate::new().key_matrix(0x801));
    device.inputs.set(InputUpdate::new().encoder_1(3));
    device.run_for(20);
    assert_eq!(
        device.sink.sent,
        vec![(1, vec![0x01, 0x08]), (2, vec![3, 0x00])]
    );
}

#[test]
fn profile_name_overlay_then_keymap() {
    let mut device = Device::boot();
    device.run_for(10);
    device.click();
    assert_eq!(device.ui.screen(), Screen::Menu);

    let mut labels = [b' '; 49];
    labels[0] = 4;
    labels[1..5].copy_from_slice(b"Undo");
    device.receive(4, &labels);
    device.receive(3, &name_report(b"Macros"));
    assert!(matches!(device.ui.screen(), Screen::ProfileName { .. }));
    assert_eq!(device.profile.name(), "Macros");

    device.run_for(690);
    assert!(matches!(device.ui.screen(), Screen::ProfileName { .. }));

    device.run_for(60);
    assert_eq!(device.ui.screen(), Screen::Keymap);
    assert_eq!(device.profile.key_label(0), Some("Undo"));
    assert!(device.panel.lit() > 0);

    // A malformed name report changes nothing.
    device.receive(3, &[3, b'X']);
    device.run_for(60);
    assert_eq!(device.ui.screen(), Screen::Keymap);
    assert_eq!(device.profile.name(), "Macros");
}

#[test]
fn profile_change_during_input_debug_updates_store_only() {
    let mut device = Device::boot();
    device.run_for(10);
    device.click();
    device.click();
    assert_eq!(device.ui.screen(), Screen::InputDebug);

    device.receive(3, &name_report(b"Photo"));
    device.run_for(800);
    assert_eq!(device.ui.screen(), Screen::InputDebug);
    assert_eq!(device.profile.name(), "Photo");
}

#[test]
fn display_powers_down_when_idle() {
    let mut device = Device::boot();
    assert!(device.panel.powered);

    device.run_for(5_100);
    assert!(!device.panel.powered);

    device.inputs.set(InputUpdate::new().key_matrix(0x010));
    device.run_for(60);
    assert!(device.panel.powered);
}
