//! Unit tests for the HID protocol layer.
//!
//! These tests run on the host (not embedded) and verify report
//! layout, outbound gating, and inbound validation.

use super::config_report::ConfigReport;
use super::descriptor::{ReportLayout, MACROPAD_REPORT_DESCRIPTOR};
use super::keypad::{EncoderReport, KeypadReport, ENCODER_REPORT_SIZE, KEYPAD_REPORT_SIZE};
use super::{on_report_received, HidLayer, ProfileObserver, ReportSink};
use crate::config::{HID_SEND_INTERVAL, KEY_LABELS_LEN};
use crate::error::Error;
use crate::input::{InputSnapshot, InputUpdate};
use crate::profile::Profile;
use embassy_time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════════════

struct RecordingSink {
    ready: bool,
    refuse: bool,
    sent: Vec<(u8, Vec<u8>)>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            ready: true,
            refuse: false,
            sent: Vec::new(),
        }
    }

    fn ids(&self) -> Vec<u8> {
        self.sent.iter().map(|(id, _)| *id).collect()
    }
}

impl ReportSink for RecordingSink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send(&mut self, report_id: u8, report: &[u8]) -> Result<(), Error> {
        if self.refuse {
            return Err(Error::TransportFull);
        }
        self.sent.push((report_id, report.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
struct CountingObserver {
    calls: Vec<Instant>,
}

impl ProfileObserver for CountingObserver {
    fn on_profile_changed(&mut self, now: Instant) {
        self.calls.push(now);
    }
}

/// Tick timestamps spaced one send interval apart.
fn tick_at(n: u64) -> Instant {
    Instant::from_millis(0) + HID_SEND_INTERVAL * n as u32
}

/// Snapshot with the boot-time HID flags already consumed.
fn quiet_snapshot() -> InputSnapshot {
    let inputs = InputSnapshot::new();
    inputs.take_keypad_dirty();
    inputs.take_encoder_dirty();
    inputs
}

// ═══════════════════════════════════════════════════════════════════════════
// Report layout
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keypad_report_is_little_endian_twelve_bits() {
    let mut buf = [0u8; 2];
    let written = KeypadReport::new(0xFA5).serialize(&mut buf);
    assert_eq!(written, KEYPAD_REPORT_SIZE);
    assert_eq!(buf, [0xA5, 0x0F]);

    KeypadReport::new(0xFFFF).serialize(&mut buf);
    assert_eq!(buf, [0xFF, 0x0F]);
}

#[test]
fn encoder_report_button_byte() {
    let mut buf = [0u8; 2];
    let pressed = EncoderReport {
        rotation: 200,
        button: true,
    };
    assert_eq!(pressed.serialize(&mut buf), ENCODER_REPORT_SIZE);
    assert_eq!(buf, [200, 0x01]);

    let released = EncoderReport {
        rotation: 0,
        button: false,
    };
    released.serialize(&mut buf);
    assert_eq!(buf, [0, 0x00]);
}

#[test]
fn report_serialize_buffer_too_small() {
    let mut small_buf = [0u8; 1];
    assert_eq!(KeypadReport::new(1).serialize(&mut small_buf), 0);
    assert_eq!(EncoderReport::default().serialize(&mut small_buf), 0);
}

#[test]
fn descriptor_matches_wire_sizes() {
    let layout = ReportLayout::parse(MACROPAD_REPORT_DESCRIPTOR).unwrap();

    assert_eq!(layout.input_len(1), Some(KEYPAD_REPORT_SIZE));
    assert_eq!(layout.input_len(2), Some(ENCODER_REPORT_SIZE));
    assert_eq!(layout.feature_len(3), Some(8));
    assert_eq!(layout.feature_len(4), Some(KEY_LABELS_LEN));

    assert_eq!(layout.feature_len(1), None);
    assert_eq!(layout.input_len(3), None);
    assert!(layout.report(5).is_none());
}

#[test]
fn descriptor_walker_rejects_truncated_item() {
    // Logical Maximum with a 2-byte value but only one byte present.
    assert!(ReportLayout::parse(&[0x05, 0x01, 0x26, 0xFF]).is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Outbound gating
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn disabled_sending_emits_nothing_but_clears_flags() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    let mut sink = RecordingSink::new();

    for (n, mask) in [0x001u16, 0x003, 0x007, 0x00F].iter().enumerate() {
        inputs.set(InputUpdate::new().key_matrix(*mask));
        hid.tick(tick_at(n as u64), &inputs, &mut sink);
    }
    assert!(sink.sent.is_empty());
    assert!(!inputs.take_keypad_dirty());

    // Re-enable: nothing is flushed until the next real change, and then
    // only the latest state goes out.
    hid.set_event_sending_enabled(true);
    hid.tick(tick_at(4), &inputs, &mut sink);
    assert!(sink.sent.is_empty());

    inputs.set(InputUpdate::new().key_matrix(0x010));
    hid.tick(tick_at(5), &inputs, &mut sink);
    assert_eq!(sink.sent, vec![(1, vec![0x10, 0x00])]);
}

#[test]
fn enabled_sending_emits_keypad_and_encoder_reports() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    hid.set_event_sending_enabled(true);
    let mut sink = RecordingSink::new();

    inputs.set(InputUpdate::new().key_matrix(0x801));
    inputs.set(InputUpdate::new().encoder_1(42).encoder_1_button(true));
    hid.tick(tick_at(0), &inputs, &mut sink);

    assert_eq!(
        sink.sent,
        vec![(1, vec![0x01, 0x08]), (2, vec![42, 0x01])]
    );
}

#[test]
fn clean_flags_send_nothing() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    hid.set_event_sending_enabled(true);
    let mut sink = RecordingSink::new();

    hid.tick(tick_at(0), &inputs, &mut sink);
    // Encoder 0 is UI-only and never reaches the host.
    inputs.set(InputUpdate::new().encoder_0(5).encoder_0_button(true));
    hid.tick(tick_at(1), &inputs, &mut sink);
    assert!(sink.sent.is_empty());
}

#[test]
fn tick_is_throttled_to_send_interval() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    hid.set_event_sending_enabled(true);
    let mut sink = RecordingSink::new();

    inputs.set(InputUpdate::new().key_matrix(1));
    hid.tick(tick_at(0), &inputs, &mut sink);
    inputs.set(InputUpdate::new().key_matrix(2));
    hid.tick(tick_at(0) + Duration::from_millis(3), &inputs, &mut sink);
    assert_eq!(sink.ids(), vec![1]);

    hid.tick(tick_at(1), &inputs, &mut sink);
    assert_eq!(sink.sent.last(), Some(&(1, vec![0x02, 0x00])));
}

#[test]
fn not_ready_transport_keeps_flags_set() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    hid.set_event_sending_enabled(true);
    let mut sink = RecordingSink::new();
    sink.ready = false;

    inputs.set(InputUpdate::new().key_matrix(0x004));
    hid.tick(tick_at(0), &inputs, &mut sink);
    assert!(sink.sent.is_empty());

    sink.ready = true;
    hid.tick(tick_at(1), &inputs, &mut sink);
    assert_eq!(sink.sent, vec![(1, vec![0x04, 0x00])]);
}

#[test]
fn refused_send_is_not_retried() {
    let inputs = quiet_snapshot();
    let mut hid = HidLayer::new();
    hid.set_event_sending_enabled(true);
    let mut sink = RecordingSink::new();
    sink.refuse = true;

    inputs.set(InputUpdate::new().key_matrix(0x020));
    hid.tick(tick_at(0), &inputs, &mut sink);

    sink.refuse = false;
    for n in 1..10 {
        hid.tick(tick_at(n), &inputs, &mut sink);
    }
    assert!(sink.sent.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Inbound validation
// ═══════════════════════════════════════════════════════════════════════════

fn name_report(name: &[u8; 8]) -> [u8; 9] {
    let mut report = [0u8; 9];
    report[0] = 3;
    report[1..].copy_from_slice(name);
    report
}

#[test]
fn parse_profile_name_report() {
    let report = name_report(b"ABCDEFGH");
    assert_eq!(
        ConfigReport::parse(3, &report),
        Ok(ConfigReport::ProfileName(*b"ABCDEFGH"))
    );
}

#[test]
fn parse_rejects_wrong_lengths() {
    assert_eq!(
        ConfigReport::parse(3, &[3; 8]),
        Err(Error::MalformedReport {
            report_id: 3,
            len: 8
        })
    );
    assert_eq!(
        ConfigReport::parse(3, &[3; 10]),
        Err(Error::MalformedReport {
            report_id: 3,
            len: 10
        })
    );
    assert_eq!(
        ConfigReport::parse(4, &[4; 48]),
        Err(Error::MalformedReport {
            report_id: 4,
            len: 48
        })
    );
    assert_eq!(
        ConfigReport::parse(4, &[]),
        Err(Error::MalformedReport {
            report_id: 4,
            len: 0
        })
    );
}

#[test]
fn parse_rejects_unknown_id() {
    assert_eq!(ConfigReport::parse(7, &[0; 9]), Err(Error::UnknownReport(7)));
}

#[test]
fn valid_name_report_updates_profile_and_notifies() {
    let mut profile = Profile::new();
    let mut observer = CountingObserver::default();
    let now = Instant::from_millis(1234);

    on_report_received(3, &name_report(b"Blender\0"), &mut profile, &mut observer, now);

    assert_eq!(profile.name(), "Blender");
    assert_eq!(observer.calls, vec![now]);
}

#[test]
fn malformed_name_report_leaves_profile_unchanged() {
    let mut profile = Profile::new();
    profile.set_name(b"Keep");
    let mut observer = CountingObserver::default();

    on_report_received(3, &[3, b'X', b'Y'], &mut profile, &mut observer, Instant::from_millis(0));

    assert_eq!(profile.name(), "Keep");
    assert!(observer.calls.is_empty());
}

#[test]
fn key_label_report_updates_labels_without_notifying() {
    let mut report = [b'Q'; 49];
    report[0] = 4;
    report[1] = 0x07;
    let mut profile = Profile::new();
    let mut observer = CountingObserver::default();

    on_report_received(4, &report, &mut profile, &mut observer, Instant::from_millis(0));

    assert_eq!(profile.key_label(0), Some(" QQQ"));
    assert_eq!(profile.key_label(11), Some("QQQQ"));
    assert!(observer.calls.is_empty());
}

#[test]
fn malformed_label_report_leaves_profile_unchanged() {
    let mut profile = Profile::new();
    let mut observer = CountingObserver::default();
    let before = profile.clone();

    on_report_received(4, &[4; 50], &mut profile, &mut observer, Instant::from_millis(0));

    assert_eq!(profile, before);
}

#[test]
fn unknown_report_is_ignored() {
    let mut profile = Profile::new();
    let mut observer = CountingObserver::default();
    let before = profile.clone();

    on_report_received(9, &name_report(b"ABCDEFGH"), &mut profile, &mut observer, Instant::from_millis(0));

    assert_eq!(profile, before);
    assert!(observer.calls.is_empty());
}
