//! Per-session input state.
//!
//! [`InputSnapshot`] is the **owned** state of one device session: the current button
//! vector, the previous cycle's button vector, and the raw axis map. It is created once
//! per session and advanced once per decoded report.
//!
//! # Semantics
//! - `buttons` and `previous_buttons` always have the session's fixed button count.
//! - On [`InputSnapshot::advance`], the current vector becomes the previous one, the
//!   current vector is rebuilt from the active usages, and `axes` is replaced.
//! - Axes are not edge-tracked. An axis missing from a report has no entry that cycle.
//! - Edge queries ([`pressed_this_cycle`](InputSnapshot::pressed_this_cycle),
//!   [`released_this_cycle`](InputSnapshot::released_this_cycle)) are pure functions of
//!   the two vectors.
//!
//! # Examples
//! ```
//! use rawpad::decoder::DecodedReport;
//! use rawpad::snapshot::InputSnapshot;
//!
//! let mut snap = InputSnapshot::new(16);
//! let mut decoded = DecodedReport::default();
//! decoded.active_buttons.insert(0);
//! snap.advance(0, &decoded).unwrap();
//! assert!(snap.pressed_this_cycle(0));
//!
//! decoded.active_buttons.clear();
//! snap.advance(0, &decoded).unwrap();
//! assert!(snap.released_this_cycle(0));
//! ```

use crate::decoder::DecodedReport;
use crate::error::DecodeError;
use crate::event::InputKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

/// Fixed-length boolean vector indexed by logical button index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStateVector(Vec<bool>);

impl ButtonStateVector {
    pub fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// State of `index`; `false` outside the vector.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Indices that are down.
    pub fn pressed(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &down)| down.then_some(i))
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl Index<usize> for ButtonStateVector {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.0[index]
    }
}

/// Raw value of one value usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisValue {
    pub usage: u16,
    pub raw: u32,
}

/// State of one device session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    buttons: ButtonStateVector,
    previous_buttons: ButtonStateVector,
    axes: BTreeMap<u16, AxisValue>,
}

impl InputSnapshot {
    /// All-released snapshot with `button_count` slots and no axes.
    pub fn new(button_count: usize) -> Self {
        Self {
            buttons: ButtonStateVector::new(button_count),
            previous_buttons: ButtonStateVector::new(button_count),
            axes: BTreeMap::new(),
        }
    }

    /// Apply one decoded report.
    ///
    /// `usage_min` is the primary button range's origin. Every active usage maps to
    /// `usage - usage_min`; a usage below the origin or an index past the vector is a
    /// [`DecodeError::BoundsViolation`], and in that case the snapshot is left exactly as
    /// it was.
    pub fn advance(&mut self, usage_min: u16, decoded: &DecodedReport) -> Result<(), DecodeError> {
        let capacity = self.buttons.len();
        let mut next = ButtonStateVector::new(capacity);

        for &usage in &decoded.active_buttons {
            let index = i64::from(usage) - i64::from(usage_min);
            if index < 0 || index >= capacity as i64 {
                return Err(DecodeError::BoundsViolation {
                    usage,
                    index,
                    capacity,
                });
            }
            next.0[index as usize] = true;
        }

        self.previous_buttons = std::mem::replace(&mut self.buttons, next);
        self.axes = decoded
            .axes
            .iter()
            .map(|(&usage, &raw)| (usage, AxisValue { usage, raw }))
            .collect();
        Ok(())
    }

    #[inline]
    pub fn buttons(&self) -> &ButtonStateVector {
        &self.buttons
    }

    #[inline]
    pub fn previous_buttons(&self) -> &ButtonStateVector {
        &self.previous_buttons
    }

    #[inline]
    pub fn axes(&self) -> &BTreeMap<u16, AxisValue> {
        &self.axes
    }

    /// Raw value of `usage` this cycle, if the last report carried it.
    #[inline]
    pub fn axis(&self, usage: u16) -> Option<u32> {
        self.axes.get(&usage).map(|a| a.raw)
    }

    #[inline]
    pub fn is_down(&self, index: usize) -> bool {
        self.buttons.get(index)
    }

    #[inline]
    pub fn pressed_this_cycle(&self, index: usize) -> bool {
        self.buttons.get(index) && !self.previous_buttons.get(index)
    }

    #[inline]
    pub fn released_this_cycle(&self, index: usize) -> bool {
        !self.buttons.get(index) && self.previous_buttons.get(index)
    }

    /// Press/release edges of the last cycle, in index order.
    pub fn edges(&self) -> Vec<InputKind> {
        (0..self.buttons.len())
            .filter_map(|i| {
                let button = u16::try_from(i).ok()?;
                if self.pressed_this_cycle(i) {
                    Some(InputKind::ButtonPressed { button })
                } else if self.released_this_cycle(i) {
                    Some(InputKind::ButtonReleased { button })
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn report(active: &[u16]) -> DecodedReport {
        DecodedReport {
            active_buttons: active.iter().copied().collect::<BTreeSet<_>>(),
            axes: BTreeMap::new(),
        }
    }

    #[test]
    fn vectors_keep_fixed_length() {
        let mut snap = InputSnapshot::new(16);
        snap.advance(0, &report(&[0, 15])).unwrap();
        snap.advance(0, &report(&[])).unwrap();
        assert_eq!(snap.buttons().len(), 16);
        assert_eq!(snap.previous_buttons().len(), 16);
    }

    #[test]
    fn press_then_partial_release() {
        let mut snap = InputSnapshot::new(16);
        snap.advance(0, &report(&[0, 3])).unwrap();

        let mut expected = [false; 16];
        expected[0] = true;
        expected[3] = true;
        assert_eq!(snap.buttons().as_slice(), &expected);
        assert!(snap.pressed_this_cycle(0));
        assert!(snap.pressed_this_cycle(3));

        snap.advance(0, &report(&[3])).unwrap();
        assert!(!snap.pressed_this_cycle(0));
        assert!(snap.released_this_cycle(0));
        assert!(!snap.pressed_this_cycle(3));
        assert!(!snap.released_this_cycle(3));
        assert!(snap.is_down(3));
    }

    #[test]
    fn same_report_twice_has_no_new_presses() {
        let mut snap = InputSnapshot::new(16);
        let r = report(&[1, 2, 9]);
        snap.advance(0, &r).unwrap();
        snap.advance(0, &r).unwrap();
        assert!((0..16).all(|i| !snap.pressed_this_cycle(i)));
        assert!(snap.edges().is_empty());
    }

    #[test]
    fn release_is_reported_for_exactly_the_missing_usage() {
        let mut snap = InputSnapshot::new(16);
        snap.advance(1, &report(&[1, 5, 7])).unwrap();
        snap.advance(1, &report(&[1, 7])).unwrap();

        let released: Vec<usize> = (0..16).filter(|&i| snap.released_this_cycle(i)).collect();
        assert_eq!(released, vec![4]);
        assert_eq!(snap.edges(), vec![InputKind::ButtonReleased { button: 4 }]);
    }

    #[test]
    fn index_origin_is_usage_min() {
        let mut snap = InputSnapshot::new(16);
        snap.advance(1, &report(&[1, 16])).unwrap();
        assert!(snap.is_down(0));
        assert!(snap.is_down(15));
    }

    #[test]
    fn out_of_bounds_index_leaves_snapshot_untouched() {
        let mut snap = InputSnapshot::new(16);
        let mut first = report(&[2]);
        first.axes.insert(0x30, 500);
        snap.advance(0, &first).unwrap();
        let before = snap.clone();

        let err = snap.advance(0, &report(&[3, 16])).unwrap_err();
        assert!(err.is_bounds_violation());
        assert_eq!(snap, before);
    }

    #[test]
    fn usage_below_origin_is_a_bounds_violation() {
        let mut snap = InputSnapshot::new(16);
        let err = snap.advance(5, &report(&[4])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BoundsViolation { index: -1, .. }
        ));
    }

    #[test]
    fn axes_are_replaced_each_cycle() {
        let mut snap = InputSnapshot::new(16);
        let mut first = report(&[]);
        first.axes.insert(0x30, 32768);
        first.axes.insert(0x31, 10);
        snap.advance(0, &first).unwrap();
        assert_eq!(snap.axis(0x30), Some(32768));

        let mut second = report(&[]);
        second.axes.insert(0x31, 20);
        snap.advance(0, &second).unwrap();
        assert_eq!(snap.axis(0x30), None);
        assert_eq!(snap.axis(0x31), Some(20));
        assert_eq!(
            snap.axes().get(&0x31),
            Some(&AxisValue {
                usage: 0x31,
                raw: 20
            })
        );
    }

    #[test]
    fn edges_stop_at_the_last_u16_index() {
        let len = usize::from(u16::MAX) + 2;
        let mut snap = InputSnapshot::new(len);
        snap.buttons.0[len - 1] = true;
        snap.buttons.0[usize::from(u16::MAX)] = true;
        assert_eq!(
            snap.edges(),
            vec![InputKind::ButtonPressed { button: u16::MAX }]
        );
    }

    #[test]
    fn edge_queries_outside_vector_are_false() {
        let snap = InputSnapshot::new(4);
        assert!(!snap.pressed_this_cycle(99));
        assert!(!snap.released_this_cycle(99));
    }
}
