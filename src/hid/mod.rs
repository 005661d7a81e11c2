//! HID protocol layer: periodic outbound reports and inbound profile
//! configuration.
//!
//! Outbound reports are rebuilt from the [`InputSnapshot`] at 100 Hz and
//! only when their dirty flag is set. Sending can be switched off from the
//! USB config screen; while off, dirty flags are still consumed so that
//! re-enabling does not flush a backlog of stale states.
//!
//! A refused send is logged and dropped. The flag has already been
//! cleared, so the state is only sent again after the next real change.

pub mod config_report;
pub mod descriptor;
pub mod keypad;

#[cfg(test)]
mod tests;

use embassy_time::Instant;

use crate::config::{HID_SEND_INTERVAL, REPORT_ID_ENCODER, REPORT_ID_KEYPAD};
use crate::error::Error;
use crate::input::InputSnapshot;
use crate::profile::Profile;
use crate::throttle::Throttle;
use config_report::ConfigReport;
use keypad::{EncoderReport, KeypadReport};

/// Largest outbound report payload (report id excluded).
pub const MAX_REPORT_SIZE: usize = 8;

/// Downstream USB transport for input reports.
pub trait ReportSink {
    /// Whether the host side can take a report right now.
    fn is_ready(&self) -> bool;

    /// Queue one report. `report` excludes the report id byte.
    fn send(&mut self, report_id: u8, report: &[u8]) -> Result<(), Error>;
}

/// Receives the "new profile selected" notification.
pub trait ProfileObserver {
    fn on_profile_changed(&mut self, now: Instant);
}

/// Outbound session state.
pub struct HidLayer {
    event_sending_enabled: bool,
    throttle: Throttle,
}

impl HidLayer {
    /// Event sending starts disabled.
    pub const fn new() -> Self {
        Self {
            event_sending_enabled: false,
            throttle: Throttle::new(HID_SEND_INTERVAL),
        }
    }

    pub fn is_event_sending_enabled(&self) -> bool {
        self.event_sending_enabled
    }

    pub fn set_event_sending_enabled(&mut self, enabled: bool) {
        if self.event_sending_enabled != enabled {
            info!("HID: event sending enabled={}", enabled);
        }
        self.event_sending_enabled = enabled;
    }

    /// One pass of the 100 Hz send loop. Returns immediately if not due.
    pub fn tick<S: ReportSink>(&mut self, now: Instant, inputs: &InputSnapshot, sink: &mut S) {
        if !self.throttle.is_due(now) {
            return;
        }
        // Flags stay set until the transport can take a report.
        if !sink.is_ready() {
            return;
        }

        self.send_keypad_report(inputs, sink);
        self.send_encoder_report(inputs, sink);
    }

    fn send_keypad_report<S: ReportSink>(&self, inputs: &InputSnapshot, sink: &mut S) {
        if !inputs.take_keypad_dirty() {
            return;
        }

        let report = KeypadReport::new(inputs.load().key_matrix);
        debug!("HID: keys 0x{:03x}", report.keys);

        if !self.event_sending_enabled {
            return;
        }
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let n = report.serialize(&mut buf);
        if let Err(e) = sink.send(REPORT_ID_KEYPAD, &buf[..n]) {
            warn!("HID: keypad report dropped: {}", e);
        }
    }

    fn send_encoder_report<S: ReportSink>(&self, inputs: &InputSnapshot, sink: &mut S) {
        if !inputs.take_encoder_dirty() {
            return;
        }

        let state = inputs.load();
        let report = EncoderReport {
            rotation: state.encoder_1,
            button: state.encoder_1_button,
        };
        debug!(
            "HID: encoder 0x{:02x}, button {}",
            report.rotation, report.button
        );

        if !self.event_sending_enabled {
            return;
        }
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let n = report.serialize(&mut buf);
        if let Err(e) = sink.send(REPORT_ID_ENCODER, &buf[..n]) {
            warn!("HID: encoder report dropped: {}", e);
        }
    }
}

impl Default for HidLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle a SET_REPORT from the host.
///
/// Valid reports overwrite the matching profile field; a profile name
/// also notifies `observer`. Anything malformed or unknown is logged and
/// dropped without touching the profile. The host gets no negative
/// acknowledgement either way.
pub fn on_report_received<O: ProfileObserver>(
    report_id: u8,
    payload: &[u8],
    profile: &mut Profile,
    observer: &mut O,
    now: Instant,
) {
    debug!(
        "HID: set_report id {} len {}: {=[u8]:02x}",
        report_id,
        payload.len(),
        payload
    );

    match ConfigReport::parse(report_id, payload) {
        Ok(ConfigReport::ProfileName(name)) => {
            profile.set_name(&name);
            info!("Profile: name set to '{}'", profile.name());
            observer.on_profile_changed(now);
        }
        Ok(ConfigReport::KeyLabels(labels)) => {
            profile.set_key_labels(&labels);
            info!("Profile: key labels updated");
        }
        Err(Error::UnknownReport(id)) => {
            warn!("HID: ignoring report id {}", id);
        }
        Err(e) => {
            warn!("HID: discarding config report: {}", e);
        }
    }
}
