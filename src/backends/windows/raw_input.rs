//! Windows Raw Input source for HID gamepads.
//!
//! The host application owns the Win32 message loop. It registers for gamepad input with
//! [`register_gamepads`], and forwards every `WM_INPUT` lparam to
//! [`RawInputSource::handle_wm_input`]. The source turns those into [`SourceEvent`]s:
//! - the first packet from a device handle queues an attach carrying that device's
//!   [`PreparsedData`];
//! - every packet queues one report per HID report it contains (`dwCount`).
//!
//! A packet from a different device handle queues a new attach, which replaces the
//! session downstream.

use core::ffi::c_void;
use std::collections::VecDeque;

use super::hidp::PreparsedData;
use crate::error::{CatalogError, Error, Result};
use crate::event::{AttachEvent, ReportEvent};
use crate::metadata::DeviceMeta;
use crate::source::{EventSource, SourceEvent};
use crate::usage::USAGE_PAGE_GENERIC_DESKTOP;
use tracing::{debug, warn};
use windows_sys::Win32::Foundation::{HANDLE, HWND};
use windows_sys::Win32::UI::Input::*;

const USAGE_JOYSTICK: u16 = 0x04;
const USAGE_GAMEPAD: u16 = 0x05;

/// HID reports carried by one `WM_INPUT` packet.
#[derive(Debug)]
pub struct RawHidPacket {
    pub hdevice: HANDLE,
    pub reports: Vec<ReportEvent>,
}

/// Register `hwnd` for joystick and gamepad Raw Input, including while in the background.
pub fn register_gamepads(hwnd: HWND) -> Result<()> {
    let devices = [USAGE_JOYSTICK, USAGE_GAMEPAD].map(|usage| RAWINPUTDEVICE {
        usUsagePage: USAGE_PAGE_GENERIC_DESKTOP,
        usUsage: usage,
        dwFlags: RIDEV_INPUTSINK,
        hwndTarget: hwnd,
    });
    let ok = unsafe {
        RegisterRawInputDevices(
            devices.as_ptr(),
            devices.len() as u32,
            core::mem::size_of::<RAWINPUTDEVICE>() as u32,
        )
    };
    if ok == 0 {
        return Err(Error::Source("RegisterRawInputDevices failed".into()));
    }
    Ok(())
}

/// Read a `WM_INPUT` lparam. `None` for non-HID packets or failed reads.
pub fn read_wm_input_hid(lparam: isize) -> Option<RawHidPacket> {
    let header_size = core::mem::size_of::<RAWINPUTHEADER>() as u32;
    unsafe {
        let mut size: u32 = 0;
        let r0 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            core::ptr::null_mut(),
            &mut size,
            header_size,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            header_size,
        );
        if r1 == u32::MAX {
            return None;
        }
        parse_raw_hid(&buf)
    }
}

/// Split a copied `RAWINPUT` buffer into its HID reports.
pub fn parse_raw_hid(buf: &[u8]) -> Option<RawHidPacket> {
    let header_size = core::mem::size_of::<RAWINPUTHEADER>();
    // RAWHID: dwSizeHid, dwCount, then dwSizeHid * dwCount bytes.
    let body_start = header_size + 8;
    if buf.len() < body_start {
        return None;
    }

    let header: RAWINPUTHEADER =
        unsafe { core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER) };
    if header.dwType != RIM_TYPEHID {
        return None;
    }

    let word = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
    let size_hid = word(header_size) as usize;
    let count = word(header_size + 4) as usize;

    let body = &buf[body_start..];
    if size_hid == 0 || size_hid.checked_mul(count)? > body.len() {
        warn!(size_hid, count, available = body.len(), "truncated RAWHID packet");
        return None;
    }

    let reports = body
        .chunks_exact(size_hid)
        .take(count)
        .map(|chunk| ReportEvent::new(chunk.to_vec()))
        .collect();

    Some(RawHidPacket {
        hdevice: header.hDevice,
        reports,
    })
}

/// Preparsed data of a Raw Input device (`RIDI_PREPARSEDDATA`).
pub fn preparsed_data(hdevice: HANDLE) -> std::result::Result<PreparsedData, CatalogError> {
    let failed = |what: &str| CatalogError::CapabilityQueryFailed(what.to_string());
    unsafe {
        let mut size: u32 = 0;
        let r0 = GetRawInputDeviceInfoW(
            hdevice,
            RIDI_PREPARSEDDATA,
            core::ptr::null_mut(),
            &mut size,
        );
        if r0 == u32::MAX || size == 0 {
            return Err(failed("RIDI_PREPARSEDDATA size query failed"));
        }

        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputDeviceInfoW(
            hdevice,
            RIDI_PREPARSEDDATA,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
        );
        if r1 == u32::MAX {
            return Err(failed("RIDI_PREPARSEDDATA read failed"));
        }
        buf.truncate(size as usize);
        PreparsedData::from_bytes(&buf)
    }
}

/// Raw Input device interface path (`RIDI_DEVICENAME`).
pub fn device_name(hdevice: HANDLE) -> Option<String> {
    unsafe {
        let mut size: u32 = 0;
        let r0 = GetRawInputDeviceInfoW(hdevice, RIDI_DEVICENAME, core::ptr::null_mut(), &mut size);
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut wide: Vec<u16> = vec![0u16; size as usize];
        let r1 = GetRawInputDeviceInfoW(
            hdevice,
            RIDI_DEVICENAME,
            wide.as_mut_ptr() as *mut c_void,
            &mut size,
        );
        if r1 == u32::MAX {
            return None;
        }

        while wide.last() == Some(&0) {
            wide.pop();
        }
        Some(String::from_utf16_lossy(&wide))
    }
}

/// Event queue fed from the host's window procedure.
///
/// [`EventSource::next_event`] returns `Ok(None)` when the queue is empty; pump messages
/// and call it again.
#[derive(Debug, Default)]
pub struct RawInputSource {
    name: String,
    current: Option<isize>,
    events: VecDeque<SourceEvent>,
}

impl RawInputSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Queue the events carried by one `WM_INPUT` message. Returns the number of reports.
    ///
    /// ### Errors
    /// [`Error::Catalog`] if a new device's preparsed data cannot be read.
    pub fn handle_wm_input(&mut self, lparam: isize) -> Result<usize> {
        let Some(packet) = read_wm_input_hid(lparam) else {
            return Ok(0);
        };
        self.push_packet(packet)
    }

    fn push_packet(&mut self, packet: RawHidPacket) -> Result<usize> {
        let key = packet.hdevice as isize;
        if self.current != Some(key) {
            let data = preparsed_data(packet.hdevice)?;
            let meta = DeviceMeta {
                bus: Some("rawinput".into()),
                path: device_name(packet.hdevice),
                ..DeviceMeta::default()
            };
            debug!(device = %meta, "raw input device seen");
            self.events
                .push_back(SourceEvent::Attach(AttachEvent::new(data, meta)));
            self.current = Some(key);
        }

        let count = packet.reports.len();
        self.events
            .extend(packet.reports.into_iter().map(SourceEvent::Report));
        Ok(count)
    }
}

impl EventSource for RawInputSource {
    fn next_event(&mut self) -> Result<Option<SourceEvent>> {
        Ok(self.events.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    const DEVICE: usize = 0x1234;

    fn packet(dw_type: u32, size_hid: u32, count: u32, body: &[u8]) -> Vec<u8> {
        let header = RAWINPUTHEADER {
            dwType: dw_type,
            dwSize: 0,
            hDevice: DEVICE as HANDLE,
            wParam: 0,
        };
        // SAFETY: RAWINPUTHEADER is plain data with no padding.
        let mut buf = unsafe {
            core::slice::from_raw_parts(
                (&header as *const RAWINPUTHEADER).cast::<u8>(),
                core::mem::size_of::<RAWINPUTHEADER>(),
            )
        }
        .to_vec();
        buf.extend_from_slice(&size_hid.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(body);
        buf
    }

    #[test]
    fn splits_every_report_in_the_packet() {
        let buf = packet(RIM_TYPEHID, 3, 2, &[1, 2, 3, 4, 5, 6]);
        let parsed = parse_raw_hid(&buf).unwrap();
        assert_eq!(parsed.hdevice as usize, DEVICE);
        let reports: Vec<&[u8]> = parsed.reports.iter().map(|r| r.bytes.as_slice()).collect();
        assert_eq!(reports, vec![&[1u8, 2, 3][..], &[4, 5, 6][..]]);
    }

    #[test]
    fn trailing_bytes_past_count_are_ignored() {
        let buf = packet(RIM_TYPEHID, 2, 1, &[7, 8, 9, 10]);
        let parsed = parse_raw_hid(&buf).unwrap();
        assert_eq!(parsed.reports.len(), 1);
        assert_eq!(parsed.reports[0].bytes, vec![7, 8]);
    }

    #[test]
    fn truncated_body_is_dropped() {
        let buf = packet(RIM_TYPEHID, 4, 2, &[0; 7]);
        assert!(parse_raw_hid(&buf).is_none());
    }

    #[test]
    fn zero_report_size_is_dropped() {
        let buf = packet(RIM_TYPEHID, 0, 3, &[0; 4]);
        assert!(parse_raw_hid(&buf).is_none());
    }

    #[test]
    fn non_hid_and_short_buffers_are_dropped() {
        assert!(parse_raw_hid(&packet(RIM_TYPEMOUSE, 1, 1, &[0])).is_none());

        let header_only = packet(RIM_TYPEHID, 1, 1, &[0]);
        let short = &header_only[..core::mem::size_of::<RAWINPUTHEADER>() + 4];
        assert!(parse_raw_hid(short).is_none());
    }
}
