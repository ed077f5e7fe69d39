//! Capability descriptor backed by Windows HIDP preparsed data.
//!
//! [`PreparsedData`] owns a copy of the opaque preparsed-data blob Windows returns for a
//! HID device (`RIDI_PREPARSEDDATA`) and answers both sides of the core through the
//! `HidP_*` parser:
//! - `HidP_GetButtonCaps` / `HidP_GetValueCaps` for the catalog;
//! - `HidP_GetUsages` / `HidP_GetUsageValue` per report.
//!
//! Reports handed to it are Windows-style: the first byte is always the report ID (zero
//! for devices without numbered reports), and the length is `InputReportByteLength`.

use core::mem::MaybeUninit;

use crate::capability::{ButtonRange, CapabilityDescriptor, ValueCapability};
use crate::decoder::ReportReader;
use crate::error::{CatalogError, DecodeError};
use tracing::debug;
use windows_sys::Win32::Devices::HumanInterfaceDevice::*;
use windows_sys::Win32::Foundation::NTSTATUS;

const INITIAL_CAPS: u16 = 64;

/// Owned preparsed data for one HID top-level collection.
pub struct PreparsedData {
    // u64 storage keeps the blob 8-byte aligned for the HIDP routines.
    blob: Vec<u64>,
    input_report_len: usize,
}

impl PreparsedData {
    /// Copy a preparsed-data blob and validate it with `HidP_GetCaps`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        if bytes.is_empty() {
            return Err(CatalogError::CapabilityQueryFailed(
                "empty preparsed data".into(),
            ));
        }
        let mut blob = vec![0u64; bytes.len().div_ceil(8)];
        // SAFETY: `blob` spans at least `bytes.len()` bytes.
        unsafe {
            core::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                blob.as_mut_ptr().cast::<u8>(),
                bytes.len(),
            );
        }

        let mut data = Self {
            blob,
            input_report_len: 0,
        };

        let mut caps = MaybeUninit::<HIDP_CAPS>::uninit();
        let status = unsafe { HidP_GetCaps(data.handle(), caps.as_mut_ptr()) };
        check(status, "HidP_GetCaps").map_err(CatalogError::CapabilityQueryFailed)?;
        let caps = unsafe { caps.assume_init() };

        data.input_report_len = caps.InputReportByteLength as usize;
        debug!(
            usage_page = caps.UsagePage,
            usage = caps.Usage,
            input_report_len = data.input_report_len,
            button_caps = caps.NumberInputButtonCaps,
            value_caps = caps.NumberInputValueCaps,
            "preparsed data loaded"
        );
        Ok(data)
    }

    #[inline]
    fn handle(&self) -> PHIDP_PREPARSED_DATA {
        self.blob.as_ptr() as PHIDP_PREPARSED_DATA
    }

    /// Report copied into a buffer of exactly `InputReportByteLength` bytes.
    fn report_buffer(&self, report: &[u8]) -> Result<Vec<u8>, DecodeError> {
        if report.len() > self.input_report_len {
            return Err(DecodeError::failed(format!(
                "report of {} bytes exceeds input report length {}",
                report.len(),
                self.input_report_len
            )));
        }
        let mut buf = vec![0u8; self.input_report_len];
        buf[..report.len()].copy_from_slice(report);
        Ok(buf)
    }
}

fn check(status: NTSTATUS, call: &str) -> Result<(), String> {
    if status == HIDP_STATUS_SUCCESS {
        Ok(())
    } else {
        Err(format!("{call} failed with status 0x{:08x}", status as u32))
    }
}

/// Run a `HidP_Get*Caps` query, retrying once with the size HIDP asks for.
fn enumerate_caps<T>(
    call: &str,
    query: impl Fn(*mut T, *mut u16) -> NTSTATUS,
) -> Result<Vec<T>, CatalogError> {
    let mut len = INITIAL_CAPS;
    for _ in 0..2 {
        // SAFETY: HIDP caps structs are plain data; all-zero is a valid value.
        let mut caps: Vec<T> = (0..len).map(|_| unsafe { core::mem::zeroed() }).collect();
        let mut needed = len;
        let status = query(caps.as_mut_ptr(), &mut needed);
        if status == HIDP_STATUS_SUCCESS {
            caps.truncate(needed as usize);
            return Ok(caps);
        }
        if status != HIDP_STATUS_BUFFER_TOO_SMALL || needed <= len {
            return Err(CatalogError::CapabilityQueryFailed(format!(
                "{call} failed with status 0x{:08x}",
                status as u32
            )));
        }
        len = needed;
    }
    Err(CatalogError::CapabilityQueryFailed(format!(
        "{call} kept reporting a short buffer"
    )))
}

impl CapabilityDescriptor for PreparsedData {
    fn button_caps(&self) -> Result<Vec<ButtonRange>, CatalogError> {
        let ppd = self.handle();
        let caps = enumerate_caps("HidP_GetButtonCaps", |buf, len| unsafe {
            HidP_GetButtonCaps(HidP_Input, buf, len, ppd)
        })?;

        Ok(caps
            .iter()
            .map(|c| unsafe {
                if c.IsRange != 0 {
                    let r = c.Anonymous.Range;
                    ButtonRange::new(c.UsagePage, r.UsageMin, r.UsageMax)
                } else {
                    ButtonRange::single(c.UsagePage, c.Anonymous.NotRange.Usage)
                }
            })
            .collect())
    }

    fn value_caps(&self) -> Result<Vec<ValueCapability>, CatalogError> {
        let ppd = self.handle();
        let caps = enumerate_caps("HidP_GetValueCaps", |buf, len| unsafe {
            HidP_GetValueCaps(HidP_Input, buf, len, ppd)
        })?;

        Ok(caps
            .iter()
            .map(|c| unsafe {
                if c.IsRange != 0 {
                    let r = c.Anonymous.Range;
                    ValueCapability::range(c.UsagePage, r.UsageMin, r.UsageMax)
                } else {
                    ValueCapability::single(c.UsagePage, c.Anonymous.NotRange.Usage)
                }
            })
            .collect())
    }

    fn input_report_len(&self) -> Option<usize> {
        Some(self.input_report_len)
    }
}

impl ReportReader for PreparsedData {
    fn active_usages(
        &self,
        range: &ButtonRange,
        report: &[u8],
        out: &mut Vec<u16>,
    ) -> Result<(), DecodeError> {
        let ppd = self.handle();
        let mut buf = self.report_buffer(report)?;

        let max = unsafe { HidP_MaxUsageListLength(HidP_Input, range.usage_page, ppd) };
        let mut usages = vec![0u16; max.max(1) as usize];
        let mut len = usages.len() as u32;

        let status = unsafe {
            HidP_GetUsages(
                HidP_Input,
                range.usage_page,
                0,
                usages.as_mut_ptr(),
                &mut len,
                ppd,
                buf.as_mut_ptr(),
                buf.len() as u32,
            )
        };
        check(status, "HidP_GetUsages").map_err(DecodeError::DecodeFailed)?;

        out.extend(
            usages[..len as usize]
                .iter()
                .copied()
                .filter(|&u| range.contains(u)),
        );
        Ok(())
    }

    fn usage_value(
        &self,
        usage_page: u16,
        usage: u16,
        report: &[u8],
    ) -> Result<Option<u32>, DecodeError> {
        let ppd = self.handle();
        let mut buf = self.report_buffer(report)?;
        let mut value = 0u32;

        let status = unsafe {
            HidP_GetUsageValue(
                HidP_Input,
                usage_page,
                0,
                usage,
                &mut value,
                ppd,
                buf.as_mut_ptr(),
                buf.len() as u32,
            )
        };
        if status == HIDP_STATUS_INCOMPATIBLE_REPORT_ID {
            return Ok(None);
        }
        check(status, "HidP_GetUsageValue").map_err(DecodeError::DecodeFailed)?;
        Ok(Some(value))
    }
}
