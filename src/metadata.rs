//! Device capability snapshot.
//!
//! [`DeviceInfo`] is captured once after the controller is opened and never
//! changes afterwards. Backends fill in what the driver reports; any field whose
//! query fails keeps the placeholder from [`DeviceInfo::default`]:
//!
//! | field     | placeholder  |
//! |-----------|--------------|
//! | `name`    | `"Unknown"`  |
//! | `version` | `0x000800`   |
//! | `axes`    | `2`          |
//! | `buttons` | `2`          |
//! | maps      | empty        |
//!
//! # Name length
//! Driver names are read into a fixed buffer of [`NAME_LEN`] bytes. Longer names
//! are cut at the last character boundary that fits; that is not an error.

use serde::{Deserialize, Serialize};

/// Size of the name buffer handed to the driver.
pub const NAME_LEN: usize = 255;

/// Protocol version assumed when the driver does not report one.
pub const DEFAULT_VERSION: u32 = 0x000800;

/// Static description of the opened controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Driver-reported product name (at most [`NAME_LEN`] bytes).
    pub name: String,

    /// Joystick API version as a packed integer (`0x020100` = 2.1.0).
    pub version: u32,

    /// Number of axes the device declares.
    pub axes: u8,

    /// Number of buttons the device declares.
    pub buttons: u8,

    /// Axis index → ABS code.
    pub axis_map: Vec<u8>,

    /// Button index → KEY/BTN code.
    pub button_map: Vec<u16>,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            version: DEFAULT_VERSION,
            axes: 2,
            buttons: 2,
            axis_map: Vec::new(),
            button_map: Vec::new(),
        }
    }
}

impl DeviceInfo {
    /// Replace the name, truncating it to [`NAME_LEN`] bytes.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = truncate_name(name, NAME_LEN).to_string();
        self
    }

    pub fn with_counts(mut self, axes: u8, buttons: u8) -> Self {
        self.axes = axes;
        self.buttons = buttons;
        self
    }
}

/// Longest prefix of `name` that fits in `max` bytes without splitting a char.
pub fn truncate_name(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
