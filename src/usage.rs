//! Usage resolution.
//!
//! Maps raw HID usages to the names the rest of the crate (and its consumers) work with.
//! The decoder never calls into this module; it returns raw usages and raw values, and
//! labeling happens afterwards.
//!
//! ## Buttons
//! Button labels are a data table indexed by logical button index
//! (`index = usage - usage_min` of the primary button range). Indices past the end of the
//! table are valid slots with no label.
//!
//! ## Axes
//! Axis kinds are keyed on the Generic Desktop usage id only:
//!
//! | usage  | kind              |
//! |--------|-------------------|
//! | `0x30` | `LeftStickX`      |
//! | `0x31` | `LeftStickY`      |
//! | `0x32` | `CombinedTrigger` |
//! | `0x33` | `RightStickX`     |
//! | `0x34` | `RightStickY`     |
//! | `0x39` | `HatSwitch`       |
//!
//! Anything else is [`AxisKind::Unknown`] and is still surfaced with its raw value.
//!
//! ### Combined trigger
//! Controllers on this interface report both analog triggers on one `Z` axis: it rests
//! near the middle of its range and moves toward one extreme for the left trigger and
//! the other extreme for the right. Pulling both cancels out. That is a property of the
//! protocol; the resolver reports the single axis as-is and never guesses which trigger
//! moved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed controller button count for the reference layout.
pub const STANDARD_BUTTON_COUNT: usize = 16;

/// Labels for the reference layout, indexed by logical button index.
pub const STANDARD_BUTTON_LABELS: [&str; 11] = [
    "A",
    "B",
    "X",
    "Y",
    "LeftBumper",
    "RightBumper",
    "Start",
    "Select",
    "LeftStick",
    "RightStick",
    "Home",
];

/// Generic Desktop usage page.
pub const USAGE_PAGE_GENERIC_DESKTOP: u16 = 0x01;
/// Button usage page.
pub const USAGE_PAGE_BUTTON: u16 = 0x09;

/// Label of a logical button index in the reference layout.
///
/// `None` for unlabeled slots (11..16) and for indices outside the layout.
#[inline]
pub fn label_for_button_index(index: usize) -> Option<&'static str> {
    STANDARD_BUTTON_LABELS.get(index).copied()
}

/// Semantic kind of a value usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    /// Both triggers on one axis; see module docs.
    CombinedTrigger,
    HatSwitch,
    Unknown(u16),
}

impl AxisKind {
    /// Stable name, e.g. `"LeftStickX"`. `None` for [`AxisKind::Unknown`].
    pub fn name(&self) -> Option<&'static str> {
        Some(match self {
            AxisKind::LeftStickX => "LeftStickX",
            AxisKind::LeftStickY => "LeftStickY",
            AxisKind::RightStickX => "RightStickX",
            AxisKind::RightStickY => "RightStickY",
            AxisKind::CombinedTrigger => "CombinedTrigger",
            AxisKind::HatSwitch => "HatSwitch",
            AxisKind::Unknown(_) => return None,
        })
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, AxisKind::Unknown(_))
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisKind::Unknown(u) => write!(f, "Unknown(0x{u:X})"),
            known => f.write_str(known.name().unwrap_or_default()),
        }
    }
}

/// Resolve a value usage to its [`AxisKind`].
///
/// The usage page is accepted for symmetry with the descriptor data but the table is
/// keyed on the usage id alone, matching how the reference controller declares its axes.
pub fn axis_kind_for_usage(_usage_page: u16, usage: u16) -> AxisKind {
    match usage {
        0x30 => AxisKind::LeftStickX,
        0x31 => AxisKind::LeftStickY,
        0x32 => AxisKind::CombinedTrigger,
        0x33 => AxisKind::RightStickX,
        0x34 => AxisKind::RightStickY,
        0x39 => AxisKind::HatSwitch,
        other => AxisKind::Unknown(other),
    }
}

/// Button label table for one session.
///
/// Defaults to [`STANDARD_BUTTON_LABELS`]; a config may supply its own table. Empty
/// entries are treated as unlabeled slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonLabels {
    labels: Vec<String>,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self::new(STANDARD_BUTTON_LABELS.iter().map(|s| s.to_string()))
    }
}

impl ButtonLabels {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    pub fn label_for_button_index(&self, index: usize) -> Option<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_layout_labels() {
        let expected = [
            "A",
            "B",
            "X",
            "Y",
            "LeftBumper",
            "RightBumper",
            "Start",
            "Select",
            "LeftStick",
            "RightStick",
            "Home",
        ];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(label_for_button_index(i), Some(*want), "index {i}");
        }
        for i in 11..STANDARD_BUTTON_COUNT {
            assert_eq!(label_for_button_index(i), None, "index {i}");
        }
    }

    #[test]
    fn axis_table() {
        assert_eq!(axis_kind_for_usage(0x01, 0x30), AxisKind::LeftStickX);
        assert_eq!(axis_kind_for_usage(0x01, 0x31), AxisKind::LeftStickY);
        assert_eq!(axis_kind_for_usage(0x01, 0x32), AxisKind::CombinedTrigger);
        assert_eq!(axis_kind_for_usage(0x01, 0x33), AxisKind::RightStickX);
        assert_eq!(axis_kind_for_usage(0x01, 0x34), AxisKind::RightStickY);
        assert_eq!(axis_kind_for_usage(0x01, 0x39), AxisKind::HatSwitch);
        assert_eq!(axis_kind_for_usage(0x01, 0x35), AxisKind::Unknown(0x35));
    }

    #[test]
    fn axis_names() {
        assert_eq!(AxisKind::LeftStickX.name(), Some("LeftStickX"));
        assert_eq!(AxisKind::Unknown(0x40).name(), None);
        assert_eq!(AxisKind::Unknown(0x40).to_string(), "Unknown(0x40)");
        assert!(!AxisKind::Unknown(0x40).is_known());
    }

    #[test]
    fn custom_labels_skip_empty_entries() {
        let labels = ButtonLabels::new(vec!["Cross".into(), String::new(), "Square".into()]);
        assert_eq!(labels.label_for_button_index(0), Some("Cross"));
        assert_eq!(labels.label_for_button_index(1), None);
        assert_eq!(labels.label_for_button_index(2), Some("Square"));
        assert_eq!(labels.label_for_button_index(3), None);
        assert_eq!(ButtonLabels::default().len(), 11);
    }
}
