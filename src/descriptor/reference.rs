//! Built-in reference gamepad.
//!
//! A plain 16-button gamepad with two sticks, a combined trigger axis and a hat, used by
//! the replay demo and the tests. Its 13-byte input report has no report ID:
//!
//! | bytes  | content                                   |
//! |--------|-------------------------------------------|
//! | 0..2   | buttons 1..=16, one bit each              |
//! | 2..12  | X, Y, Rx, Ry, Z as little-endian u16      |
//! | 12     | hat (low nibble, 1..=8, 0 = centered)     |

/// Report descriptor of the reference gamepad.
pub const REFERENCE_GAMEPAD: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Game Pad)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (1)
    0x29, 0x10, //   Usage Maximum (16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x81, 0x02, //   Input (Data,Var,Abs)
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x09, 0x32, //   Usage (Z)
    0x15, 0x00, //   Logical Minimum (0)
    0x27, 0xFF, 0xFF, 0x00, 0x00, // Logical Maximum (65535)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x05, //   Report Count (5)
    0x81, 0x02, //   Input (Data,Var,Abs)
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x01, //   Logical Minimum (1)
    0x25, 0x08, //   Logical Maximum (8)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data,Var,Abs,Null)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x03, //   Input (Const,Var,Abs)
    0xC0, // End Collection
];

/// Input report of the reference gamepad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferenceReport {
    /// Bit `n` is button `n + 1`.
    pub buttons: u16,
    pub left_x: u16,
    pub left_y: u16,
    pub right_x: u16,
    pub right_y: u16,
    pub trigger: u16,
    pub hat: u8,
}

impl ReferenceReport {
    pub const LEN: usize = 13;

    /// Report with every stick centered.
    pub fn centered() -> Self {
        Self {
            left_x: 0x8000,
            left_y: 0x8000,
            right_x: 0x8000,
            right_y: 0x8000,
            trigger: 0x8000,
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        for word in [
            self.buttons,
            self.left_x,
            self.left_y,
            self.right_x,
            self.right_y,
            self.trigger,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.push(self.hat & 0x0F);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let bytes = ReferenceReport::centered().with_buttons(0x0201).to_bytes();
        assert_eq!(bytes.len(), ReferenceReport::LEN);
        assert_eq!(&bytes[..4], &[0x01, 0x02, 0x00, 0x80]);
        assert_eq!(bytes[12], 0);
    }
}
