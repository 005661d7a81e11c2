//! Inbound profile configuration reports (host → device).
//!
//! Both arrive as HID SET_REPORT (feature) requests. The first byte of
//! the payload is the report id slot and is ignored:
//! ```text
//! Report 3 ( 9 bytes): [reserved][8 bytes profile name]
//! Report 4 (49 bytes): [reserved][12 × 4-byte key labels, no separators]
//! ```

use crate::config::{
    KEY_LABELS_LEN, KEY_LABELS_REPORT_LEN, PROFILE_NAME_REPORT_BYTES, PROFILE_NAME_REPORT_LEN,
    REPORT_ID_KEY_LABELS, REPORT_ID_PROFILE_NAME,
};
use crate::error::Error;

/// A validated configuration report.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigReport {
    ProfileName([u8; PROFILE_NAME_REPORT_BYTES]),
    KeyLabels([u8; KEY_LABELS_LEN]),
}

impl ConfigReport {
    /// Validate the length for `report_id` and copy out the body.
    pub fn parse(report_id: u8, payload: &[u8]) -> Result<Self, Error> {
        match report_id {
            REPORT_ID_PROFILE_NAME => {
                let body = body(report_id, payload, PROFILE_NAME_REPORT_LEN)?;
                let mut name = [0u8; PROFILE_NAME_REPORT_BYTES];
                name.copy_from_slice(body);
                Ok(ConfigReport::ProfileName(name))
            }
            REPORT_ID_KEY_LABELS => {
                let body = body(report_id, payload, KEY_LABELS_REPORT_LEN)?;
                let mut labels = [0u8; KEY_LABELS_LEN];
                labels.copy_from_slice(body);
                Ok(ConfigReport::KeyLabels(labels))
            }
            other => Err(Error::UnknownReport(other)),
        }
    }
}

fn body(report_id: u8, payload: &[u8], expected_len: usize) -> Result<&[u8], Error> {
    if payload.len() != expected_len {
        return Err(Error::MalformedReport {
            report_id,
            len: payload.len(),
        });
    }
    Ok(&payload[1..])
}
