//! Device metadata carried on attach.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of the device behind a
//! session. It only feeds logs and diagnostics; decoding never looks at it.
//! Event sources populate what they know; unknown fields remain `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of metadata describing a single device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Short source hint like `"usb"`, `"rawinput"` or `"scripted"`.
    pub bus: Option<String>,

    /// USB Vendor ID (VID), if known.
    pub vid: Option<u16>,

    /// USB Product ID (PID), if known.
    pub pid: Option<u16>,

    /// Human-readable product name from the driver/firmware.
    pub product_string: Option<String>,

    /// Top-level collection usage page (e.g. `0x01` Generic Desktop).
    pub usage_page: Option<u16>,

    /// Top-level collection usage (e.g. `0x04` Joystick, `0x05` Gamepad).
    pub usage: Option<u16>,

    /// OS path to the device. Opaque and platform-specific.
    pub path: Option<String>,
}

impl DeviceMeta {
    /// Metadata for an in-process source with only a name.
    pub fn named(bus: &str, product: &str) -> Self {
        Self {
            bus: Some(bus.to_string()),
            product_string: Some(product.to_string()),
            ..Self::default()
        }
    }
}

impl fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.product_string.as_deref().unwrap_or("Unknown");
        match (self.vid, self.pid) {
            (Some(vid), Some(pid)) => write!(f, "{name} [{vid:04x}:{pid:04x}]"),
            _ => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_ids_when_known() {
        let meta = DeviceMeta {
            vid: Some(0x045e),
            pid: Some(0x02ff),
            product_string: Some("Controller".into()),
            ..DeviceMeta::default()
        };
        assert_eq!(meta.to_string(), "Controller [045e:02ff]");
        assert_eq!(DeviceMeta::named("scripted", "Pad").to_string(), "Pad");
    }
}
