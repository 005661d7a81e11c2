//! The active profile: display name and per-key labels.
//!
//! Profiles live only in RAM and are pushed by the host after every
//! connect. Each setter replaces its whole field.

use crate::config::{KEY_COUNT, KEY_LABELS_LEN, KEY_LABEL_LEN, PROFILE_NAME_LEN};

/// Name and key labels of the profile currently selected on the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    /// Zero-filled after the last name byte.
    name: [u8; PROFILE_NAME_LEN],
    /// 12 labels of 4 bytes each, printable ASCII only.
    key_labels: [u8; KEY_LABELS_LEN],
}

impl Profile {
    /// Empty name and all-blank labels.
    pub const fn new() -> Self {
        Self {
            name: [0; PROFILE_NAME_LEN],
            key_labels: [b' '; KEY_LABELS_LEN],
        }
    }

    /// Replace the name.
    ///
    /// Copies up to the first NUL or [`PROFILE_NAME_LEN`] bytes, whichever
    /// comes first, and zero-fills the rest of the slot.
    pub fn set_name(&mut self, name: &[u8]) {
        self.name = [0; PROFILE_NAME_LEN];
        let len = name
            .iter()
            .take(PROFILE_NAME_LEN)
            .position(|&b| b == 0)
            .unwrap_or(name.len().min(PROFILE_NAME_LEN));
        self.name[..len].copy_from_slice(&name[..len]);
    }

    /// Replace all key labels.
    ///
    /// Bytes outside printable ASCII (32..=126) become spaces, since the
    /// labels are drawn as-is.
    pub fn set_key_labels(&mut self, labels: &[u8; KEY_LABELS_LEN]) {
        self.key_labels = *labels;
        for b in self.key_labels.iter_mut() {
            if !(32..=126).contains(b) {
                *b = b' ';
            }
        }
    }

    /// The name up to its zero padding.
    ///
    /// Host-supplied bytes that are not valid UTF-8 end the name early.
    pub fn name(&self) -> &str {
        let bytes = self.name_bytes();
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// Raw name bytes without the zero padding.
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PROFILE_NAME_LEN);
        &self.name[..len]
    }

    /// The whole 48-byte label block.
    pub fn key_labels(&self) -> &[u8; KEY_LABELS_LEN] {
        &self.key_labels
    }

    /// Label of key slot `index` (row-major), or `None` past the last key.
    pub fn key_label(&self, index: usize) -> Option<&str> {
        if index >= KEY_COUNT {
            return None;
        }
        let start = index * KEY_LABEL_LEN;
        // Sanitised to printable ASCII, always valid UTF-8.
        core::str::from_utf8(&self.key_labels[start..start + KEY_LABEL_LEN]).ok()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
