//! Report decoder.
//!
//! Turns one raw report into raw usages and raw values using a
//! [`CapabilityCatalog`] and the platform's [`ReportReader`]:
//! 1. the active usages of the primary button range, and
//! 2. the value of every decoded value capability.
//!
//! The protocol only reports which buttons are *down*. A usage missing from the active
//! set is how a release shows up; there is no explicit release message.
//!
//! Nothing here knows what a usage means. Labels and axis kinds come from
//! [`usage`](crate::usage) afterwards.
//!
//! Any reader failure fails the whole report. Callers get either a complete
//! [`DecodedReport`] or an error, never a partial one.

use crate::capability::{ButtonRange, CapabilityCatalog};
use crate::error::DecodeError;
use crate::event::RawReport;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Platform-side per-report queries.
#[cfg_attr(test, mockall::automock)]
pub trait ReportReader {
    /// Append the usages of `range` that are active in `report` to `out`.
    ///
    /// Only usages inside `range` are reported.
    fn active_usages(
        &self,
        range: &ButtonRange,
        report: &[u8],
        out: &mut Vec<u16>,
    ) -> Result<(), DecodeError>;

    /// Raw value of one value usage in `report`.
    ///
    /// `Ok(None)` means this report does not carry the usage (e.g. a different report ID).
    fn usage_value(
        &self,
        usage_page: u16,
        usage: u16,
        report: &[u8],
    ) -> Result<Option<u32>, DecodeError>;
}

/// Uninterpreted result of one decode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReport {
    /// Usages of the primary button range that are currently down.
    pub active_buttons: BTreeSet<u16>,
    /// Raw value per value usage carried by this report.
    pub axes: BTreeMap<u16, u32>,
}

/// Decoder with a reusable usage buffer.
///
/// The buffer is scratch space for one cycle: it is cleared before every decode and
/// nothing read from it outlives the call.
#[derive(Debug, Default)]
pub struct ReportDecoder {
    usages: Vec<u16>,
}

impl ReportDecoder {
    /// Decoder sized for `catalog`'s primary range.
    pub fn for_catalog(catalog: &CapabilityCatalog) -> Self {
        Self {
            usages: Vec::with_capacity(catalog.button_count()),
        }
    }

    /// Decode one report.
    ///
    /// ### Errors
    /// [`DecodeError::DecodeFailed`] if the report's declared size is unusable or any
    /// reader query fails.
    pub fn decode<R>(
        &mut self,
        catalog: &CapabilityCatalog,
        reader: &R,
        report: RawReport<'_>,
    ) -> Result<DecodedReport, DecodeError>
    where
        R: ReportReader + ?Sized,
    {
        let payload = report.payload()?;

        self.usages.clear();
        reader.active_usages(catalog.primary_button_range(), payload, &mut self.usages)?;
        let active_buttons: BTreeSet<u16> = self.usages.drain(..).collect();

        let mut axes = BTreeMap::new();
        for value in catalog.decoded_values() {
            let usage = value.first_usage();
            match reader.usage_value(value.usage_page, usage, payload)? {
                Some(raw) => {
                    axes.insert(usage, raw);
                }
                None => trace!(
                    usage_page = value.usage_page,
                    usage,
                    "value usage not carried by this report"
                ),
            }
        }

        Ok(DecodedReport {
            active_buttons,
            axes,
        })
    }
}

/// One-shot decode without a reusable buffer.
pub fn decode<R>(
    catalog: &CapabilityCatalog,
    reader: &R,
    report: RawReport<'_>,
) -> Result<DecodedReport, DecodeError>
where
    R: ReportReader + ?Sized,
{
    ReportDecoder::for_catalog(catalog).decode(catalog, reader, report)
}
