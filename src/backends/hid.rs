//! hidapi event source.
//!
//! [`HidSource`] opens one gamepad through `hidapi`, reads its USB report descriptor,
//! and hands the core a [`ReportDescriptor`] on attach. After that every read yields one
//! report.
//!
//! Discovery keeps Generic Desktop joystick, gamepad and multi-axis collections and drops
//! everything else (mice, keyboards, vendor pages).

use crate::capability::CapabilityDescriptor;
use crate::descriptor::ReportDescriptor;
use crate::error::{CatalogError, Error, Result};
use crate::event::{AttachEvent, ReportEvent};
use crate::metadata::DeviceMeta;
use crate::source::{EventSource, SourceEvent};
use crate::usage::USAGE_PAGE_GENERIC_DESKTOP;
use hidapi::{DeviceInfo, HidApi, HidDevice};
use tracing::{debug, info};

/// Largest report descriptor a HID device may declare.
const MAX_DESCRIPTOR_LEN: usize = 4096;
/// Read buffer when the descriptor does not pin the report length.
const FALLBACK_REPORT_LEN: usize = 64;

/// Whether a top-level collection looks like a game controller.
pub fn accept_device(usage_page: u16, usage: u16) -> bool {
    usage_page == USAGE_PAGE_GENERIC_DESKTOP && matches!(usage, 0x04 | 0x05 | 0x08)
}

/// Game controllers currently visible to `api`.
pub fn gamepads(api: &HidApi) -> impl Iterator<Item = &DeviceInfo> {
    api.device_list()
        .filter(|info| accept_device(info.usage_page(), info.usage()))
}

/// Metadata for a `hidapi` device entry.
pub fn device_meta(info: &DeviceInfo) -> DeviceMeta {
    DeviceMeta {
        bus: Some("usb".into()),
        vid: Some(info.vendor_id()),
        pid: Some(info.product_id()),
        product_string: info.product_string().map(str::to_string),
        usage_page: Some(info.usage_page()),
        usage: Some(info.usage()),
        path: Some(info.path().to_string_lossy().into_owned()),
    }
}

fn source_error(context: &str, e: hidapi::HidError) -> Error {
    Error::Source(format!("{context}: {e}"))
}

pub struct HidSource {
    name: String,
    device: HidDevice,
    attach: Option<AttachEvent>,
    buf: Vec<u8>,
    timeout_ms: i32,
    idle_limit: Option<u32>,
}

impl HidSource {
    /// Open the first game controller `api` lists.
    pub fn open_first(api: &HidApi) -> Result<Self> {
        let info = gamepads(api)
            .next()
            .ok_or_else(|| Error::Source("no HID game controller found".into()))?;
        Self::open(api, info)
    }

    /// Open `info` and parse its report descriptor.
    ///
    /// ### Errors
    /// [`Error::Source`] if the device cannot be opened, [`Error::Catalog`] if its
    /// report descriptor cannot be read or parsed.
    pub fn open(api: &HidApi, info: &DeviceInfo) -> Result<Self> {
        let meta = device_meta(info);
        let device = info
            .open_device(api)
            .map_err(|e| source_error("open failed", e))?;

        let mut raw = vec![0u8; MAX_DESCRIPTOR_LEN];
        let len = device.get_report_descriptor(&mut raw).map_err(|e| {
            CatalogError::CapabilityQueryFailed(format!("report descriptor unavailable: {e}"))
        })?;
        let descriptor = ReportDescriptor::parse(&raw[..len])?;
        debug!(
            device = %meta,
            descriptor_len = len,
            fields = descriptor.fields().len(),
            "report descriptor parsed"
        );

        let buf_len = descriptor
            .input_report_len()
            .unwrap_or(FALLBACK_REPORT_LEN)
            .max(1);

        info!(device = %meta, "HID device opened");
        Ok(Self {
            name: meta.to_string(),
            device,
            attach: Some(AttachEvent::new(descriptor, meta)),
            buf: vec![0u8; buf_len],
            timeout_ms: 100,
            idle_limit: None,
        })
    }

    /// Per-read timeout. Default 100 ms.
    pub fn with_timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// End the source after `reads` consecutive timed-out reads. Unlimited by default.
    pub fn with_idle_limit(mut self, reads: u32) -> Self {
        self.idle_limit = Some(reads);
        self
    }
}

impl EventSource for HidSource {
    fn next_event(&mut self) -> Result<Option<SourceEvent>> {
        if let Some(attach) = self.attach.take() {
            return Ok(Some(SourceEvent::Attach(attach)));
        }

        let mut idle = 0u32;
        loop {
            let n = self
                .device
                .read_timeout(&mut self.buf, self.timeout_ms)
                .map_err(|e| source_error("read failed", e))?;
            if n > 0 {
                let report = ReportEvent::new(self.buf[..n].to_vec());
                return Ok(Some(SourceEvent::Report(report)));
            }
            idle += 1;
            if self.idle_limit.is_some_and(|limit| idle >= limit) {
                debug!(source = %self.name, idle, "idle limit reached");
                return Ok(None);
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_game_controllers_only() {
        assert!(accept_device(0x01, 0x05));
        assert!(accept_device(0x01, 0x04));
        assert!(accept_device(0x01, 0x08));
        assert!(!accept_device(0x01, 0x02));
        assert!(!accept_device(0x01, 0x06));
        assert!(!accept_device(0xFF00, 0x05));
    }
}
