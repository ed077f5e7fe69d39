//! Portable capability descriptor built from a raw HID report descriptor.
//!
//! Platforms that hand out the USB report descriptor bytes (hidapi, hidraw, USB stacks)
//! do not come with a HID parser. [`ReportDescriptor`] is that parser: it walks the
//! descriptor once, lays out every **Input** field with its bit offset, and then serves
//! both sides of the core:
//! - [`CapabilityDescriptor`]: button ranges and value capabilities for the catalog;
//! - [`ReportReader`]: active usages and raw values pulled out of a report.
//!
//! ## Classification
//! - Array fields, fields on the Button page (`0x09`) and 1-bit variable fields are
//!   buttons.
//! - Every other non-constant variable field is a value. A value field declared with
//!   Usage Minimum/Maximum and more than one element is a *range* value capability.
//! - Constant fields are padding: they advance the bit offset and nothing else.
//!
//! ## Report IDs
//! If the descriptor declares any Report ID, every report starts with its ID byte and
//! bit offsets restart at zero per ID. Otherwise reports carry no ID byte.
//!
//! Values are returned as the raw unsigned bits of the field, the same as a platform
//! HID parser would hand back; no sign extension or scaling.

mod items;
mod reference;

pub use reference::{ReferenceReport, REFERENCE_GAMEPAD};

use crate::capability::{ButtonRange, CapabilityDescriptor, ValueCapability};
use crate::decoder::ReportReader;
use crate::error::{CatalogError, DecodeError};
use crate::usage::USAGE_PAGE_BUTTON;
use items::{Item, ItemType, Items};
use std::collections::BTreeMap;
use tracing::trace;

const MAIN_INPUT: u8 = 0x8;
const MAIN_OUTPUT: u8 = 0x9;
const MAIN_COLLECTION: u8 = 0xA;
const MAIN_FEATURE: u8 = 0xB;
const MAIN_END_COLLECTION: u8 = 0xC;

const GLOBAL_USAGE_PAGE: u8 = 0x0;
const GLOBAL_LOGICAL_MIN: u8 = 0x1;
const GLOBAL_LOGICAL_MAX: u8 = 0x2;
const GLOBAL_REPORT_SIZE: u8 = 0x7;
const GLOBAL_REPORT_ID: u8 = 0x8;
const GLOBAL_REPORT_COUNT: u8 = 0x9;
const GLOBAL_PUSH: u8 = 0xA;
const GLOBAL_POP: u8 = 0xB;

const LOCAL_USAGE: u8 = 0x0;
const LOCAL_USAGE_MIN: u8 = 0x1;
const LOCAL_USAGE_MAX: u8 = 0x2;

const INPUT_CONSTANT: u32 = 0x01;
const INPUT_VARIABLE: u32 = 0x02;

/// Usages a field covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUsages {
    /// Explicit Usage items, in order.
    List(Vec<u16>),
    /// Usage Minimum / Usage Maximum.
    Range { usage_min: u16, usage_max: u16 },
}

/// One non-constant Input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportField {
    pub report_id: u8,
    pub usage_page: u16,
    pub usages: FieldUsages,
    /// Offset of the first element, in bits, from the start of the report body.
    pub bit_offset: usize,
    pub bit_size: u8,
    pub count: u16,
    pub logical_min: i32,
    pub logical_max: i32,
    pub is_array: bool,
}

impl ReportField {
    pub fn is_button(&self) -> bool {
        self.is_array || self.usage_page == USAGE_PAGE_BUTTON || self.bit_size == 1
    }

    #[inline]
    fn element_offset(&self, element: usize) -> usize {
        self.bit_offset + element * self.bit_size as usize
    }

    /// Usage of a variable field's `element`. A short usage list repeats its last entry.
    fn usage_at(&self, element: usize) -> Option<u16> {
        match &self.usages {
            FieldUsages::List(list) => list.get(element).or_else(|| list.last()).copied(),
            FieldUsages::Range {
                usage_min,
                usage_max,
            } => {
                let usage = u32::from(*usage_min) + element as u32;
                (usage <= u32::from(*usage_max)).then_some(usage as u16)
            }
        }
    }

    /// Element of a variable field that carries `usage`.
    fn element_for_usage(&self, usage: u16) -> Option<usize> {
        let element = match &self.usages {
            FieldUsages::List(list) => list.iter().position(|&u| u == usage)?,
            FieldUsages::Range {
                usage_min,
                usage_max,
            } => {
                if usage < *usage_min || usage > *usage_max {
                    return None;
                }
                (usage - usage_min) as usize
            }
        };
        (element < self.count as usize).then_some(element)
    }

    /// Usage selected by an array element holding `raw`. `None` for the null state.
    fn array_usage(&self, raw: u32) -> Option<u16> {
        let value = if self.logical_min < 0 {
            sign_extend(raw, self.bit_size)
        } else {
            i64::from(raw)
        };
        if value < i64::from(self.logical_min) || value > i64::from(self.logical_max) {
            return None;
        }
        let index = (value - i64::from(self.logical_min)) as usize;
        match &self.usages {
            FieldUsages::List(list) => list.get(index).copied(),
            FieldUsages::Range {
                usage_min,
                usage_max,
            } => {
                let usage = u32::from(*usage_min) + index as u32;
                (usage <= u32::from(*usage_max)).then_some(usage as u16)
            }
        }
    }
}

/// Parsed report descriptor: the Input fields and their layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDescriptor {
    fields: Vec<ReportField>,
    uses_report_ids: bool,
    /// Body length in bits per report ID.
    report_bits: BTreeMap<u8, usize>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: u16,
    logical_min: i32,
    logical_max: i32,
    report_size: u32,
    report_count: u32,
    report_id: u8,
}

/// A local usage; 4-byte usages carry their own page in the high word.
type LocalUsage = (Option<u16>, u16);

#[derive(Debug, Default)]
struct Locals {
    usages: Vec<LocalUsage>,
    usage_min: Option<LocalUsage>,
    usage_max: Option<LocalUsage>,
}

fn local_usage(item: &Item) -> LocalUsage {
    if item.size == 4 {
        (Some((item.data >> 16) as u16), item.data as u16)
    } else {
        (None, item.data as u16)
    }
}

fn query_failed(reason: impl Into<String>) -> CatalogError {
    CatalogError::CapabilityQueryFailed(reason.into())
}

impl ReportDescriptor {
    /// Parse raw descriptor bytes.
    ///
    /// ### Errors
    /// [`CatalogError::CapabilityQueryFailed`] for truncated items, a Pop without Push,
    /// an unbalanced End Collection, or a Report Size above 32 bits.
    pub fn parse(bytes: &[u8]) -> Result<Self, CatalogError> {
        let mut globals = Globals::default();
        let mut stack: Vec<Globals> = Vec::new();
        let mut locals = Locals::default();
        let mut depth = 0usize;
        let mut uses_report_ids = false;
        let mut report_bits: BTreeMap<u8, usize> = BTreeMap::new();
        let mut fields = Vec::new();

        for item in Items::new(bytes) {
            let item = item?;
            match item.kind {
                ItemType::Main => {
                    match item.tag {
                        MAIN_INPUT => {
                            if let Some(field) =
                                input_field(&item, &globals, &locals, &mut report_bits)?
                            {
                                trace!(?field, "input field");
                                fields.push(field);
                            }
                        }
                        MAIN_OUTPUT | MAIN_FEATURE => {}
                        MAIN_COLLECTION => depth += 1,
                        MAIN_END_COLLECTION => {
                            depth = depth
                                .checked_sub(1)
                                .ok_or_else(|| query_failed("End Collection without Collection"))?;
                        }
                        other => trace!(tag = other, "unknown main item"),
                    }
                    locals = Locals::default();
                }
                ItemType::Global => match item.tag {
                    GLOBAL_USAGE_PAGE => globals.usage_page = item.data as u16,
                    GLOBAL_LOGICAL_MIN => globals.logical_min = item.signed(),
                    GLOBAL_LOGICAL_MAX => {
                        let signed = item.signed();
                        // Descriptors often encode an unsigned max in a width where it
                        // reads negative (e.g. `0x25 0xFF` for 255).
                        globals.logical_max = if signed < globals.logical_min {
                            item.data as i32
                        } else {
                            signed
                        };
                    }
                    GLOBAL_REPORT_SIZE => globals.report_size = item.data,
                    GLOBAL_REPORT_ID => {
                        globals.report_id = item.data as u8;
                        uses_report_ids = true;
                    }
                    GLOBAL_REPORT_COUNT => globals.report_count = item.data,
                    GLOBAL_PUSH => stack.push(globals),
                    GLOBAL_POP => {
                        globals = stack
                            .pop()
                            .ok_or_else(|| query_failed("Pop without Push"))?;
                    }
                    _ => {}
                },
                ItemType::Local => match item.tag {
                    LOCAL_USAGE => locals.usages.push(local_usage(&item)),
                    LOCAL_USAGE_MIN => locals.usage_min = Some(local_usage(&item)),
                    LOCAL_USAGE_MAX => locals.usage_max = Some(local_usage(&item)),
                    _ => {}
                },
                ItemType::Reserved => {}
            }
        }

        if depth != 0 {
            return Err(query_failed(format!("{depth} collection(s) left open")));
        }

        Ok(Self {
            fields,
            uses_report_ids,
            report_bits,
        })
    }

    pub fn fields(&self) -> &[ReportField] {
        &self.fields
    }

    pub fn uses_report_ids(&self) -> bool {
        self.uses_report_ids
    }

    /// Split a report into its ID and body.
    fn split<'r>(&self, report: &'r [u8]) -> Result<(u8, &'r [u8]), DecodeError> {
        if !self.uses_report_ids {
            return Ok((0, report));
        }
        report
            .split_first()
            .map(|(&id, body)| (id, body))
            .ok_or_else(|| DecodeError::failed("report has no report ID byte"))
    }
}

fn input_field(
    item: &Item,
    globals: &Globals,
    locals: &Locals,
    report_bits: &mut BTreeMap<u8, usize>,
) -> Result<Option<ReportField>, CatalogError> {
    if globals.report_size > 32 {
        return Err(query_failed(format!(
            "report size {} exceeds 32 bits",
            globals.report_size
        )));
    }
    if globals.report_count > u32::from(u16::MAX) {
        return Err(query_failed(format!(
            "report count {} too large",
            globals.report_count
        )));
    }

    let bits = (globals.report_size * globals.report_count) as usize;
    let offset = report_bits.entry(globals.report_id).or_insert(0);
    let bit_offset = *offset;
    *offset += bits;

    if item.data & INPUT_CONSTANT != 0 || bits == 0 {
        return Ok(None);
    }

    let explicit_page = locals
        .usages
        .iter()
        .chain(locals.usage_min.iter())
        .find_map(|(page, _)| *page);
    let usage_page = explicit_page.unwrap_or(globals.usage_page);

    let usages = if !locals.usages.is_empty() {
        FieldUsages::List(locals.usages.iter().map(|&(_, u)| u).collect())
    } else if let (Some((_, usage_min)), Some((_, usage_max))) = (locals.usage_min, locals.usage_max)
    {
        FieldUsages::Range {
            usage_min,
            usage_max,
        }
    } else {
        trace!(bit_offset, bits, "input field without usages skipped");
        return Ok(None);
    };

    Ok(Some(ReportField {
        report_id: globals.report_id,
        usage_page,
        usages,
        bit_offset,
        bit_size: globals.report_size as u8,
        count: globals.report_count as u16,
        logical_min: globals.logical_min,
        logical_max: globals.logical_max,
        is_array: item.data & INPUT_VARIABLE == 0,
    }))
}

/// Little-endian bit extraction.
fn read_bits(body: &[u8], bit_offset: usize, bit_size: u8) -> Result<u32, DecodeError> {
    let end = bit_offset + bit_size as usize;
    if end > body.len() * 8 {
        return Err(DecodeError::failed(format!(
            "report body of {} bytes too short for bits {bit_offset}..{end}",
            body.len()
        )));
    }
    let mut value = 0u32;
    for i in 0..bit_size as usize {
        let bit = bit_offset + i;
        if body[bit / 8] & (1 << (bit % 8)) != 0 {
            value |= 1 << i;
        }
    }
    Ok(value)
}

fn sign_extend(raw: u32, bits: u8) -> i64 {
    if bits == 0 || bits >= 32 {
        return i64::from(raw as i32);
    }
    let shift = 32 - u32::from(bits);
    i64::from(((raw << shift) as i32) >> shift)
}

impl CapabilityDescriptor for ReportDescriptor {
    fn button_caps(&self) -> Result<Vec<ButtonRange>, CatalogError> {
        let mut out = Vec::new();
        for field in self.fields.iter().filter(|f| f.is_button()) {
            match &field.usages {
                FieldUsages::Range {
                    usage_min,
                    usage_max,
                } => out.push(ButtonRange::new(field.usage_page, *usage_min, *usage_max)),
                FieldUsages::List(list) => out.extend(
                    list.iter()
                        .map(|&usage| ButtonRange::single(field.usage_page, usage)),
                ),
            }
        }
        Ok(out)
    }

    fn value_caps(&self) -> Result<Vec<ValueCapability>, CatalogError> {
        let mut out: Vec<ValueCapability> = Vec::new();
        for field in self.fields.iter().filter(|f| !f.is_button()) {
            match &field.usages {
                FieldUsages::Range {
                    usage_min,
                    usage_max,
                } if field.count > 1 => {
                    out.push(ValueCapability::range(field.usage_page, *usage_min, *usage_max));
                }
                FieldUsages::Range { usage_min, .. } => {
                    out.push(ValueCapability::single(field.usage_page, *usage_min));
                }
                FieldUsages::List(list) => {
                    for &usage in list.iter().take(field.count as usize) {
                        let cap = ValueCapability::single(field.usage_page, usage);
                        if !out.contains(&cap) {
                            out.push(cap);
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    fn input_report_len(&self) -> Option<usize> {
        let id_byte = usize::from(self.uses_report_ids);
        self.report_bits
            .values()
            .map(|bits| bits.div_ceil(8) + id_byte)
            .max()
    }
}

impl ReportReader for ReportDescriptor {
    fn active_usages(
        &self,
        range: &ButtonRange,
        report: &[u8],
        out: &mut Vec<u16>,
    ) -> Result<(), DecodeError> {
        let (id, body) = self.split(report)?;
        let mut carried = false;

        for field in self
            .fields
            .iter()
            .filter(|f| f.is_button() && f.usage_page == range.usage_page && f.report_id == id)
        {
            carried = true;
            for element in 0..field.count as usize {
                let raw = read_bits(body, field.element_offset(element), field.bit_size)?;
                let usage = if field.is_array {
                    field.array_usage(raw)
                } else if raw != 0 {
                    field.usage_at(element)
                } else {
                    None
                };
                if let Some(usage) = usage {
                    if range.contains(usage) && !out.contains(&usage) {
                        out.push(usage);
                    }
                }
            }
        }

        if !carried {
            return Err(DecodeError::failed(format!(
                "report ID {id} carries no buttons on page 0x{:04x}",
                range.usage_page
            )));
        }
        Ok(())
    }

    fn usage_value(
        &self,
        usage_page: u16,
        usage: u16,
        report: &[u8],
    ) -> Result<Option<u32>, DecodeError> {
        let (id, body) = self.split(report)?;
        let mut declared = false;

        for field in self
            .fields
            .iter()
            .filter(|f| !f.is_button() && !f.is_array && f.usage_page == usage_page)
        {
            let Some(element) = field.element_for_usage(usage) else {
                continue;
            };
            declared = true;
            if field.report_id == id {
                return read_bits(body, field.element_offset(element), field.bit_size).map(Some);
            }
        }

        if declared {
            Ok(None)
        } else {
            Err(DecodeError::failed(format!(
                "usage 0x{usage:04x} on page 0x{usage_page:04x} not declared"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityCatalog, ValueSupport};

    fn descriptor(bytes: &[u8]) -> ReportDescriptor {
        ReportDescriptor::parse(bytes).unwrap()
    }

    #[test]
    fn reference_gamepad_layout() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        assert!(!desc.uses_report_ids());
        assert_eq!(desc.input_report_len(), Some(13));

        let buttons = desc.button_caps().unwrap();
        assert_eq!(buttons, vec![ButtonRange::new(0x09, 1, 16)]);

        let values = desc.value_caps().unwrap();
        let usages: Vec<u16> = values.iter().map(|v| v.first_usage()).collect();
        assert_eq!(usages, vec![0x30, 0x31, 0x33, 0x34, 0x32, 0x39]);
        assert!(values.iter().all(|v| !v.is_range()));
    }

    #[test]
    fn reads_reference_report() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        let report = ReferenceReport {
            buttons: 0b1000_0000_0000_1001,
            left_x: 32768,
            left_y: 1,
            right_x: 0xFFFF,
            right_y: 0x1234,
            trigger: 128,
            hat: 3,
        }
        .to_bytes();

        let mut active = Vec::new();
        desc.active_usages(&ButtonRange::new(0x09, 1, 16), &report, &mut active)
            .unwrap();
        assert_eq!(active, vec![1, 4, 16]);

        let value = |usage| desc.usage_value(0x01, usage, &report).unwrap();
        assert_eq!(value(0x30), Some(32768));
        assert_eq!(value(0x31), Some(1));
        assert_eq!(value(0x33), Some(0xFFFF));
        assert_eq!(value(0x34), Some(0x1234));
        assert_eq!(value(0x32), Some(128));
        assert_eq!(value(0x39), Some(3));
    }

    #[test]
    fn active_usages_respect_range() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        let report = ReferenceReport {
            buttons: 0xFFFF,
            ..ReferenceReport::default()
        }
        .to_bytes();
        let mut active = Vec::new();
        desc.active_usages(&ButtonRange::new(0x09, 3, 5), &report, &mut active)
            .unwrap();
        assert_eq!(active, vec![3, 4, 5]);
    }

    #[test]
    fn short_report_is_decode_failure() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        let mut active = Vec::new();
        assert!(desc.usage_value(0x01, 0x39, &[0u8; 6]).is_err());
        assert!(desc
            .active_usages(&ButtonRange::new(0x09, 1, 16), &[0u8; 1], &mut active)
            .is_err());
    }

    #[test]
    fn undeclared_usage_is_decode_failure() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        assert!(desc.usage_value(0x01, 0x36, &[0u8; 13]).is_err());
    }

    // Buttons in report 1, sticks in report 2.
    const SPLIT_REPORTS: &[u8] = &[
        0x05, 0x01, 0x09, 0x05, 0xA1, 0x01, //
        0x85, 0x01, //   Report ID (1)
        0x05, 0x09, 0x19, 0x01, 0x29, 0x08, 0x15, 0x00, 0x25, 0x01, //
        0x75, 0x01, 0x95, 0x08, 0x81, 0x02, //
        0x85, 0x02, //   Report ID (2)
        0x05, 0x01, 0x09, 0x30, 0x09, 0x31, 0x15, 0x00, 0x26, 0xFF, 0x00, //
        0x75, 0x08, 0x95, 0x02, 0x81, 0x02, //
        0xC0,
    ];

    #[test]
    fn report_ids_select_fields() {
        let desc = descriptor(SPLIT_REPORTS);
        assert!(desc.uses_report_ids());
        assert_eq!(desc.input_report_len(), Some(3));

        // both fields start at bit 0 of their own report body
        assert!(desc.fields().iter().all(|f| f.bit_offset == 0));
        assert_eq!(desc.fields()[1].logical_max, 255);

        let range = ButtonRange::new(0x09, 1, 8);
        let mut active = Vec::new();
        desc.active_usages(&range, &[0x01, 0b0000_0110], &mut active)
            .unwrap();
        assert_eq!(active, vec![2, 3]);

        assert_eq!(desc.usage_value(0x01, 0x30, &[0x01, 0xFF]).unwrap(), None);
        assert_eq!(
            desc.usage_value(0x01, 0x31, &[0x02, 0x10, 0x20]).unwrap(),
            Some(0x20)
        );

        active.clear();
        assert!(desc.active_usages(&range, &[0x02, 0x10, 0x20], &mut active).is_err());
    }

    // 4 array slots selecting buttons 1..=12, 0 = none.
    const ARRAY_BUTTONS: &[u8] = &[
        0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, //
        0x05, 0x09, 0x19, 0x01, 0x29, 0x0C, 0x15, 0x01, 0x25, 0x0C, //
        0x75, 0x08, 0x95, 0x04, 0x81, 0x00, //
        0xC0,
    ];

    #[test]
    fn array_buttons_map_through_logical_range() {
        let desc = descriptor(ARRAY_BUTTONS);
        assert_eq!(
            desc.button_caps().unwrap(),
            vec![ButtonRange::new(0x09, 1, 12)]
        );
        let mut active = Vec::new();
        desc.active_usages(&ButtonRange::new(0x09, 1, 12), &[5, 0, 12, 5], &mut active)
            .unwrap();
        assert_eq!(active, vec![5, 12]);
    }

    // Six axes declared as one usage range.
    const RANGED_AXES: &[u8] = &[
        0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, //
        0x05, 0x09, 0x19, 0x01, 0x29, 0x08, 0x15, 0x00, 0x25, 0x01, //
        0x75, 0x01, 0x95, 0x08, 0x81, 0x02, //
        0x05, 0x01, 0x19, 0x30, 0x29, 0x35, 0x15, 0x00, 0x26, 0xFF, 0x00, //
        0x75, 0x08, 0x95, 0x06, 0x81, 0x02, //
        0xC0,
    ];

    #[test]
    fn ranged_value_fields_are_pass_through() {
        let desc = descriptor(RANGED_AXES);
        let catalog = CapabilityCatalog::parse(&desc).unwrap();
        assert_eq!(catalog.values().len(), 1);
        assert_eq!(catalog.values()[0].support(), ValueSupport::PassThroughOnly);
        assert_eq!(catalog.decoded_values().count(), 0);
    }

    #[test]
    fn padding_advances_offsets() {
        let desc = descriptor(REFERENCE_GAMEPAD);
        let hat = desc
            .fields()
            .iter()
            .find(|f| f.usages == FieldUsages::List(vec![0x39]))
            .unwrap();
        assert_eq!(hat.bit_offset, 16 + 5 * 16);
        assert_eq!(hat.bit_size, 4);
    }

    #[test]
    fn extended_usage_carries_its_page() {
        // Usage (Button 1) as a 4-byte extended usage under a Generic Desktop page
        let bytes = [
            0x05, 0x01, 0x0B, 0x01, 0x00, 0x09, 0x00, 0x15, 0x00, 0x25, 0x01, //
            0x75, 0x01, 0x95, 0x01, 0x81, 0x02, //
            0x75, 0x07, 0x95, 0x01, 0x81, 0x03,
        ];
        let desc = descriptor(&bytes);
        assert_eq!(
            desc.button_caps().unwrap(),
            vec![ButtonRange::single(0x09, 1)]
        );
    }

    #[test]
    fn structural_errors() {
        assert!(ReportDescriptor::parse(&[0xC0]).is_err());
        assert!(ReportDescriptor::parse(&[0xB4]).is_err());
        assert!(ReportDescriptor::parse(&[0xA1, 0x01]).is_err());
        let oversized = [0x75, 0x40, 0x95, 0x01, 0x09, 0x30, 0x81, 0x02];
        assert!(ReportDescriptor::parse(&oversized).is_err());
    }

    #[test]
    fn push_pop_restores_globals() {
        let bytes = [
            0x05, 0x09, 0xA4, // Usage Page (Button), Push
            0x05, 0x01, 0xB4, // Usage Page (Generic Desktop), Pop
            0x19, 0x01, 0x29, 0x02, 0x15, 0x00, 0x25, 0x01, //
            0x75, 0x01, 0x95, 0x02, 0x81, 0x02,
        ];
        let desc = descriptor(&bytes);
        assert_eq!(desc.fields()[0].usage_page, 0x09);
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend(0xF, 4), -1);
        assert_eq!(sign_extend(0x7, 4), 7);
        assert_eq!(sign_extend(0xFFFF_FFFF, 32), -1);
    }
}
