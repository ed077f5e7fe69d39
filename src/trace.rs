//! Human-readable trace of decoded cycles.
//!
//! A diagnostic side channel, separate from the state contract. Output goes through
//! `tracing` on the `rawpad::trace` target at `INFO`, so a subscriber decides where
//! (and whether) it shows up.
//!
//! Text lines:
//! - `Button: A` for a labeled active button, `Button Index: 12` otherwise
//! - `LeftStickX: 32768` for a known axis
//! - `Unknown Usage 0x40 => 7` for any other value usage

use crate::config::TraceMode;
use crate::snapshot::InputSnapshot;
use crate::usage::{axis_kind_for_usage, ButtonLabels, USAGE_PAGE_GENERIC_DESKTOP};
use serde::Serialize;
use tracing::{info, warn};

pub const TRACE_TARGET: &str = "rawpad::trace";

pub fn button_line(index: usize, labels: &ButtonLabels) -> String {
    match labels.label_for_button_index(index) {
        Some(label) => format!("Button: {label}"),
        None => format!("Button Index: {index}"),
    }
}

pub fn axis_line(usage_page: u16, usage: u16, raw: u32) -> String {
    match axis_kind_for_usage(usage_page, usage).name() {
        Some(name) => format!("{name}: {raw}"),
        None => format!("Unknown Usage 0x{usage:X} => {raw}"),
    }
}

/// Text lines for the current state of `snapshot`: active buttons, then axes.
pub fn lines(snapshot: &InputSnapshot, labels: &ButtonLabels) -> Vec<String> {
    let mut out: Vec<String> = snapshot
        .buttons()
        .pressed()
        .map(|i| button_line(i, labels))
        .collect();
    out.extend(
        snapshot
            .axes()
            .values()
            .map(|a| axis_line(USAGE_PAGE_GENERIC_DESKTOP, a.usage, a.raw)),
    );
    out
}

#[derive(Debug, Serialize)]
struct TracedButton<'a> {
    index: usize,
    label: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TracedAxis {
    usage: u16,
    kind: Option<&'static str>,
    raw: u32,
}

/// JSON form of one cycle.
#[derive(Debug, Serialize)]
struct CycleTrace<'a> {
    cycle: u64,
    buttons: Vec<TracedButton<'a>>,
    axes: Vec<TracedAxis>,
}

/// Serialize the current state of `snapshot` as one JSON object.
pub fn json_line(
    cycle: u64,
    snapshot: &InputSnapshot,
    labels: &ButtonLabels,
) -> serde_json::Result<String> {
    let trace = CycleTrace {
        cycle,
        buttons: snapshot
            .buttons()
            .pressed()
            .map(|index| TracedButton {
                index,
                label: labels.label_for_button_index(index),
            })
            .collect(),
        axes: snapshot
            .axes()
            .values()
            .map(|a| TracedAxis {
                usage: a.usage,
                kind: axis_kind_for_usage(USAGE_PAGE_GENERIC_DESKTOP, a.usage).name(),
                raw: a.raw,
            })
            .collect(),
    };
    serde_json::to_string(&trace)
}

/// Emits the trace for each cycle according to a [`TraceMode`].
#[derive(Clone, Debug)]
pub struct Tracer {
    mode: TraceMode,
    labels: ButtonLabels,
}

impl Tracer {
    pub fn new(mode: TraceMode, labels: ButtonLabels) -> Self {
        Self { mode, labels }
    }

    pub fn mode(&self) -> TraceMode {
        self.mode
    }

    pub fn emit(&self, cycle: u64, snapshot: &InputSnapshot) {
        match self.mode {
            TraceMode::Off => {}
            TraceMode::Text => {
                for line in lines(snapshot, &self.labels) {
                    info!(target: TRACE_TARGET, cycle, "{line}");
                }
            }
            TraceMode::Json => match json_line(cycle, snapshot, &self.labels) {
                Ok(line) => info!(target: TRACE_TARGET, "{line}"),
                Err(e) => warn!(cycle, error = %e, "failed to serialize cycle trace"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedReport;

    fn snapshot(active: &[u16], axes: &[(u16, u32)]) -> InputSnapshot {
        let mut snap = InputSnapshot::new(16);
        let decoded = DecodedReport {
            active_buttons: active.iter().copied().collect(),
            axes: axes.iter().copied().collect(),
        };
        snap.advance(0, &decoded).unwrap();
        snap
    }

    #[test]
    fn button_lines() {
        let labels = ButtonLabels::default();
        assert_eq!(button_line(0, &labels), "Button: A");
        assert_eq!(button_line(4, &labels), "Button: LeftBumper");
        assert_eq!(button_line(12, &labels), "Button Index: 12");
    }

    #[test]
    fn axis_lines() {
        assert_eq!(axis_line(0x01, 0x30, 32768), "LeftStickX: 32768");
        assert_eq!(axis_line(0x01, 0x32, 128), "CombinedTrigger: 128");
        assert_eq!(axis_line(0x01, 0x39, 0), "HatSwitch: 0");
        assert_eq!(axis_line(0x01, 0x40, 7), "Unknown Usage 0x40 => 7");
    }

    #[test]
    fn cycle_lines_list_buttons_then_axes() {
        let snap = snapshot(&[0, 11], &[(0x30, 1), (0x36, 2)]);
        assert_eq!(
            lines(&snap, &ButtonLabels::default()),
            vec![
                "Button: A".to_string(),
                "Button Index: 11".to_string(),
                "LeftStickX: 1".to_string(),
                "Unknown Usage 0x36 => 2".to_string(),
            ]
        );
    }

    #[test]
    fn json_line_shape() {
        let snap = snapshot(&[1], &[(0x31, 9)]);
        let line = json_line(3, &snap, &ButtonLabels::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["cycle"], 3);
        assert_eq!(value["buttons"][0]["index"], 1);
        assert_eq!(value["buttons"][0]["label"], "B");
        assert_eq!(value["axes"][0]["kind"], "LeftStickY");
        assert_eq!(value["axes"][0]["raw"], 9);
    }
}
