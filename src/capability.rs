//! Capability catalog.
//!
//! A [`CapabilityCatalog`] is built once per device attach from whatever the platform
//! offers as a capability descriptor (Windows preparsed data, a raw USB report
//! descriptor, a test fixture, ...). It records:
//! - the input **button ranges** the device declares, and
//! - the input **value capabilities** (axes, triggers, hats).
//!
//! The catalog is immutable for the rest of the session.
//!
//! ## Primary button range
//! The first declared button range is the *primary* range. Its `usage_min` is the index
//! origin (`index = usage - usage_min`) and it is the only range the decoder reads.
//! Devices that split their buttons over several ranges keep the extra ranges in the
//! catalog (see [`CapabilityCatalog::secondary_button_ranges`]) but those buttons are not
//! decoded.
//!
//! ## Range value capabilities
//! A value capability declared as a usage *range* has no per-usage semantics we can
//! resolve. It is kept and flagged [`ValueSupport::PassThroughOnly`] so diagnostics can
//! show it, and the decoder skips it.

use crate::error::CatalogError;
use crate::event::{ChannelDesc, ChannelKind};
use crate::usage::{axis_kind_for_usage, ButtonLabels};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Platform-side capability queries.
///
/// Implementations only report what the descriptor declares; validation is the
/// catalog's job.
pub trait CapabilityDescriptor {
    /// Input button capabilities, in declaration order.
    fn button_caps(&self) -> Result<Vec<ButtonRange>, CatalogError>;

    /// Input value capabilities, in declaration order.
    fn value_caps(&self) -> Result<Vec<ValueCapability>, CatalogError>;

    /// Longest input report in bytes (including a report ID byte), if known.
    fn input_report_len(&self) -> Option<usize> {
        None
    }
}

/// Contiguous block of button usages on one usage page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonRange {
    pub usage_page: u16,
    pub usage_min: u16,
    pub usage_max: u16,
}

impl ButtonRange {
    pub fn new(usage_page: u16, usage_min: u16, usage_max: u16) -> Self {
        Self {
            usage_page,
            usage_min,
            usage_max,
        }
    }

    /// A single-usage button capability.
    pub fn single(usage_page: u16, usage: u16) -> Self {
        Self::new(usage_page, usage, usage)
    }

    /// Number of boolean slots this range covers. Zero for a malformed range.
    #[inline]
    pub fn count(&self) -> usize {
        if self.usage_max < self.usage_min {
            0
        } else {
            (self.usage_max - self.usage_min) as usize + 1
        }
    }

    #[inline]
    pub fn contains(&self, usage: u16) -> bool {
        (self.usage_min..=self.usage_max).contains(&usage)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.usage_max < self.usage_min {
            return Err(CatalogError::MalformedRange {
                usage_page: self.usage_page,
                usage_min: self.usage_min,
                usage_max: self.usage_max,
            });
        }
        Ok(())
    }
}

/// Usage(s) a value capability covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueUsage {
    Single(u16),
    Range { usage_min: u16, usage_max: u16 },
}

/// One continuous input channel (axis, trigger, hat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueCapability {
    pub usage_page: u16,
    pub usage: ValueUsage,
}

impl ValueCapability {
    pub fn single(usage_page: u16, usage: u16) -> Self {
        Self {
            usage_page,
            usage: ValueUsage::Single(usage),
        }
    }

    pub fn range(usage_page: u16, usage_min: u16, usage_max: u16) -> Self {
        Self {
            usage_page,
            usage: ValueUsage::Range {
                usage_min,
                usage_max,
            },
        }
    }

    #[inline]
    pub fn is_range(&self) -> bool {
        matches!(self.usage, ValueUsage::Range { .. })
    }

    /// The single usage, or `usage_min` for a range.
    #[inline]
    pub fn first_usage(&self) -> u16 {
        match self.usage {
            ValueUsage::Single(u) => u,
            ValueUsage::Range { usage_min, .. } => usage_min,
        }
    }

    #[inline]
    pub fn support(&self) -> ValueSupport {
        if self.is_range() {
            ValueSupport::PassThroughOnly
        } else {
            ValueSupport::Decoded
        }
    }
}

/// Whether the decoder reads a value capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSupport {
    Decoded,
    /// Unsupported: listed for diagnostics, never decoded.
    PassThroughOnly,
}

/// Parsed, immutable description of one device's input report.
///
/// Deserializing runs the same checks as [`CapabilityCatalog::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct CapabilityCatalog {
    button_ranges: Vec<ButtonRange>,
    values: Vec<ValueCapability>,
    input_report_len: Option<usize>,
}

#[derive(Deserialize)]
struct RawCatalog {
    button_ranges: Vec<ButtonRange>,
    values: Vec<ValueCapability>,
    input_report_len: Option<usize>,
}

impl TryFrom<RawCatalog> for CapabilityCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, CatalogError> {
        Self::from_parts(raw.button_ranges, raw.values, raw.input_report_len)
    }
}

impl CapabilityCatalog {
    /// Query `descriptor` and validate what it declares.
    ///
    /// ### Errors
    /// - [`CatalogError::CapabilityQueryFailed`] if the platform queries fail.
    /// - [`CatalogError::NoButtonCapabilities`] if no button range is declared.
    /// - [`CatalogError::MalformedRange`] if any button or value range is inverted.
    pub fn parse<D>(descriptor: &D) -> Result<Self, CatalogError>
    where
        D: CapabilityDescriptor + ?Sized,
    {
        let button_ranges = descriptor.button_caps()?;
        let values = descriptor.value_caps()?;
        let catalog = Self::from_parts(button_ranges, values, descriptor.input_report_len())?;

        debug!(
            primary = ?catalog.primary_button_range(),
            secondary_ranges = catalog.secondary_button_ranges().len(),
            values = catalog.values.len(),
            pass_through = catalog.pass_through_values().count(),
            report_len = ?catalog.input_report_len,
            "capability catalog parsed"
        );

        Ok(catalog)
    }

    fn from_parts(
        button_ranges: Vec<ButtonRange>,
        values: Vec<ValueCapability>,
        input_report_len: Option<usize>,
    ) -> Result<Self, CatalogError> {
        if button_ranges.is_empty() {
            return Err(CatalogError::NoButtonCapabilities);
        }
        for range in &button_ranges {
            range.validate()?;
        }
        for value in &values {
            if let ValueUsage::Range {
                usage_min,
                usage_max,
            } = value.usage
            {
                ButtonRange::new(value.usage_page, usage_min, usage_max).validate()?;
            }
        }

        Ok(Self {
            button_ranges,
            values,
            input_report_len,
        })
    }

    /// The authoritative button range.
    #[inline]
    pub fn primary_button_range(&self) -> &ButtonRange {
        // `from_parts` rejects catalogs without button ranges.
        &self.button_ranges[0]
    }

    /// Button ranges after the primary one. Kept but not decoded.
    pub fn secondary_button_ranges(&self) -> &[ButtonRange] {
        &self.button_ranges[1..]
    }

    pub fn button_ranges(&self) -> &[ButtonRange] {
        &self.button_ranges
    }

    /// Slots covered by the primary range.
    #[inline]
    pub fn button_count(&self) -> usize {
        self.primary_button_range().count()
    }

    pub fn values(&self) -> &[ValueCapability] {
        &self.values
    }

    /// Value capabilities the decoder reads, in declaration order.
    pub fn decoded_values(&self) -> impl Iterator<Item = &ValueCapability> {
        self.values
            .iter()
            .filter(|v| v.support() == ValueSupport::Decoded)
    }

    /// Range value capabilities that are listed but never decoded.
    pub fn pass_through_values(&self) -> impl Iterator<Item = &ValueCapability> {
        self.values
            .iter()
            .filter(|v| v.support() == ValueSupport::PassThroughOnly)
    }

    pub fn input_report_len(&self) -> Option<usize> {
        self.input_report_len
    }

    /// Channel list for diagnostics: primary buttons first, then values.
    pub fn describe(&self, labels: &ButtonLabels) -> Vec<ChannelDesc> {
        let primary = self.primary_button_range();
        let mut out = Vec::with_capacity(primary.count() + self.values.len());

        for (index, usage) in (primary.usage_min..=primary.usage_max).enumerate() {
            let Ok(idx) = u16::try_from(index) else { break };
            out.push(ChannelDesc {
                kind: ChannelKind::Button,
                idx,
                name: labels.label_for_button_index(index).map(str::to_string),
                usage_page: primary.usage_page,
                usage,
            });
        }

        for (index, value) in self.values.iter().enumerate() {
            let Ok(idx) = u16::try_from(index) else { break };
            let usage = value.first_usage();
            let (kind, name) = match value.support() {
                ValueSupport::Decoded => (
                    ChannelKind::Axis,
                    axis_kind_for_usage(value.usage_page, usage)
                        .name()
                        .map(str::to_string),
                ),
                ValueSupport::PassThroughOnly => (ChannelKind::PassThrough, None),
            };
            out.push(ChannelDesc {
                kind,
                idx,
                name,
                usage_page: value.usage_page,
                usage,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticCaps {
        buttons: Result<Vec<ButtonRange>, String>,
        values: Vec<ValueCapability>,
    }

    impl CapabilityDescriptor for StaticCaps {
        fn button_caps(&self) -> Result<Vec<ButtonRange>, CatalogError> {
            self.buttons
                .clone()
                .map_err(CatalogError::CapabilityQueryFailed)
        }

        fn value_caps(&self) -> Result<Vec<ValueCapability>, CatalogError> {
            Ok(self.values.clone())
        }
    }

    fn gamepad_caps() -> StaticCaps {
        StaticCaps {
            buttons: Ok(vec![ButtonRange::new(0x09, 1, 16)]),
            values: vec![
                ValueCapability::single(0x01, 0x30),
                ValueCapability::single(0x01, 0x31),
                ValueCapability::single(0x01, 0x32),
                ValueCapability::single(0x01, 0x39),
            ],
        }
    }

    #[test]
    fn parses_primary_range_and_values() {
        let catalog = CapabilityCatalog::parse(&gamepad_caps()).unwrap();
        assert_eq!(catalog.button_count(), 16);
        assert_eq!(catalog.primary_button_range().usage_min, 1);
        assert!(catalog.secondary_button_ranges().is_empty());
        assert_eq!(catalog.decoded_values().count(), 4);
        assert_eq!(catalog.pass_through_values().count(), 0);
    }

    #[test]
    fn only_first_range_is_primary() {
        let caps = StaticCaps {
            buttons: Ok(vec![
                ButtonRange::new(0x09, 1, 10),
                ButtonRange::new(0x09, 11, 14),
            ]),
            values: Vec::new(),
        };
        let catalog = CapabilityCatalog::parse(&caps).unwrap();
        assert_eq!(catalog.button_count(), 10);
        assert_eq!(
            catalog.secondary_button_ranges(),
            &[ButtonRange::new(0x09, 11, 14)]
        );
    }

    #[test]
    fn range_values_are_flagged_pass_through() {
        let mut caps = gamepad_caps();
        caps.values.push(ValueCapability::range(0x01, 0x40, 0x42));
        let catalog = CapabilityCatalog::parse(&caps).unwrap();

        let pass: Vec<_> = catalog.pass_through_values().collect();
        assert_eq!(pass.len(), 1);
        assert_eq!(pass[0].support(), ValueSupport::PassThroughOnly);
        assert_eq!(catalog.decoded_values().count(), 4);
        assert_eq!(catalog.values().len(), 5);
    }

    #[test]
    fn rejects_missing_buttons() {
        let caps = StaticCaps {
            buttons: Ok(Vec::new()),
            values: vec![ValueCapability::single(0x01, 0x30)],
        };
        assert!(matches!(
            CapabilityCatalog::parse(&caps),
            Err(CatalogError::NoButtonCapabilities)
        ));
    }

    #[test]
    fn rejects_inverted_button_range() {
        let caps = StaticCaps {
            buttons: Ok(vec![ButtonRange::new(0x09, 8, 1)]),
            values: Vec::new(),
        };
        assert!(matches!(
            CapabilityCatalog::parse(&caps),
            Err(CatalogError::MalformedRange {
                usage_min: 8,
                usage_max: 1,
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_value_range() {
        let mut caps = gamepad_caps();
        caps.values.push(ValueCapability::range(0x01, 0x42, 0x40));
        assert!(matches!(
            CapabilityCatalog::parse(&caps),
            Err(CatalogError::MalformedRange { .. })
        ));
    }

    #[test]
    fn query_failure_is_surfaced() {
        let caps = StaticCaps {
            buttons: Err("preparsed data unavailable".into()),
            values: Vec::new(),
        };
        assert!(matches!(
            CapabilityCatalog::parse(&caps),
            Err(CatalogError::CapabilityQueryFailed(_))
        ));
    }

    #[test]
    fn deserialized_catalog_is_validated() {
        let err = serde_json::from_str::<CapabilityCatalog>(
            r#"{"button_ranges":[],"values":[],"input_report_len":null}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no input button capabilities"));

        let inverted = r#"{
            "button_ranges":[{"usage_page":9,"usage_min":8,"usage_max":1}],
            "values":[],
            "input_report_len":null
        }"#;
        assert!(serde_json::from_str::<CapabilityCatalog>(inverted).is_err());
    }

    #[test]
    fn catalog_survives_a_json_round_trip() {
        let catalog = CapabilityCatalog::parse(&gamepad_caps()).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: CapabilityCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
        assert_eq!(back.button_count(), 16);
    }

    #[test]
    fn describe_lists_buttons_then_values() {
        let mut caps = gamepad_caps();
        caps.values.push(ValueCapability::single(0x01, 0x36));
        caps.values.push(ValueCapability::range(0x01, 0x40, 0x41));
        let catalog = CapabilityCatalog::parse(&caps).unwrap();
        let channels = catalog.describe(&ButtonLabels::default());

        assert_eq!(channels.len(), 16 + 6);
        assert_eq!(channels[0].name.as_deref(), Some("A"));
        assert_eq!(channels[0].usage, 1);
        assert_eq!(channels[11].name, None);
        assert_eq!(channels[16].name.as_deref(), Some("LeftStickX"));
        assert_eq!(channels[18].name.as_deref(), Some("CombinedTrigger"));
        assert_eq!(channels[20].kind, ChannelKind::Axis);
        assert_eq!(channels[20].name, None);
        assert_eq!(channels[21].kind, ChannelKind::PassThrough);
    }
}
