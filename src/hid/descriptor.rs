//! HID report descriptor and a minimal descriptor walker.
//!
//! The macropad exposes a single HID interface with four report ids:
//!
//! | Id | Kind    | Payload                                  |
//! |----|---------|------------------------------------------|
//! | 1  | Input   | 12 key bits (F13..F24) + 4 bits padding  |
//! | 2  | Input   | 8-bit dial counter + 8-bit button        |
//! | 3  | Feature | 8 bytes profile name (vendor page)       |
//! | 4  | Feature | 48 bytes key labels (vendor page)        |
//!
//! ## Walker limitations
//!
//! [`ReportLayout::parse`] only sums report bits per id. It handles the
//! items this descriptor uses:
//! - Push/Pop state is not supported
//! - Collections are flattened
//! - Output items are ignored

use heapless::Vec;

/// USB HID Report Descriptor for the macropad interface.
pub const MACROPAD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x07, // Usage (Keypad)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Report 1: key bits -
    0x85, 0x01, //   Report ID (1)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x68, //   Usage Minimum (F13)
    0x29, 0x73, //   Usage Maximum (F24)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x0C, //   Report Count (12)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - Report 2: encoder -
    0x85, 0x02, //   Report ID (2)
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x37, //   Usage (Dial)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x05, 0x09, //   Usage Page (Button)
    0x09, 0x01, //   Usage (Button 1)
    0x25, 0x01, //   Logical Maximum (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Report 3: profile name -
    0x85, 0x03, //   Report ID (3)
    0x06, 0x00, 0xFF, // Usage Page (Vendor 0xFF00)
    0x09, 0x01, //   Usage (0x01)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x08, //   Report Count (8)
    0xB1, 0x02, //   Feature (Data, Variable, Absolute)
    //
    //   - Report 4: key labels -
    0x85, 0x04, //   Report ID (4)
    0x09, 0x02, //   Usage (0x02)
    0x95, 0x30, //   Report Count (48)
    0xB1, 0x02, //   Feature (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Maximum distinct report ids tracked by the walker.
const MAX_REPORTS: usize = 8;

/// Bit totals for one report id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportBits {
    pub report_id: u8,
    pub input_bits: u16,
    pub feature_bits: u16,
}

/// Per-report-id sizes derived from a report descriptor.
#[derive(Clone, Debug, Default)]
pub struct ReportLayout {
    reports: Vec<ReportBits, MAX_REPORTS>,
}

impl ReportLayout {
    /// Walk a HID Report Descriptor.
    ///
    /// Returns `None` if the descriptor is truncated or declares more
    /// report ids than we track.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut layout = ReportLayout::default();

        // Global state.
        let mut report_id: u8 = 0;
        let mut report_size: u16 = 0;
        let mut report_count: u16 = 0;

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];
            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            if i + 1 + size > data.len() {
                return None;
            }

            let value: u32 = match size {
                0 => 0,
                1 => data[i + 1] as u32,
                2 => u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32,
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };

            match (item_type, tag) {
                // Main: Input
                (0, 0x08) => layout.entry(report_id)?.input_bits += report_size * report_count,
                // Main: Feature
                (0, 0x0B) => layout.entry(report_id)?.feature_bits += report_size * report_count,
                // Global: Report Size / Report ID / Report Count
                (1, 0x07) => report_size = value as u16,
                (1, 0x08) => report_id = value as u8,
                (1, 0x09) => report_count = value as u16,
                _ => {}
            }

            i += 1 + size;
        }

        Some(layout)
    }

    fn entry(&mut self, report_id: u8) -> Option<&mut ReportBits> {
        let pos = match self.reports.iter().position(|r| r.report_id == report_id) {
            Some(pos) => pos,
            None => {
                self.reports
                    .push(ReportBits {
                        report_id,
                        ..Default::default()
                    })
                    .ok()?;
                self.reports.len() - 1
            }
        };
        self.reports.get_mut(pos)
    }

    /// Bit totals for `report_id`, if the descriptor declares it.
    pub fn report(&self, report_id: u8) -> Option<&ReportBits> {
        self.reports.iter().find(|r| r.report_id == report_id)
    }

    /// Input report payload length in bytes (report id excluded).
    pub fn input_len(&self, report_id: u8) -> Option<usize> {
        self.report(report_id)
            .filter(|r| r.input_bits > 0)
            .map(|r| (r.input_bits as usize).div_ceil(8))
    }

    /// Feature report payload length in bytes (report id excluded).
    pub fn feature_len(&self, report_id: u8) -> Option<usize> {
        self.report(report_id)
            .filter(|r| r.feature_bits > 0)
            .map(|r| (r.feature_bits as usize).div_ceil(8))
    }
}
