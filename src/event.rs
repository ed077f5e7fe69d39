//! Events and channel descriptions.
//!
//! The event source hands the core two kinds of events:
//! - [`AttachEvent`]: a device appeared; carries its capability descriptor.
//! - [`ReportEvent`]: one raw input report from that device.
//!
//! Going the other way, [`InputKind`] is the edge-event vocabulary a
//! [`InputSnapshot`](crate::snapshot::InputSnapshot) exposes after each cycle, and
//! [`ChannelDesc`] describes the channels a catalog declares.
//!
//! ## Value conventions
//! - **Buttons:** logical index `usage - usage_min` of the primary button range.
//! - **Axes:** raw, unnormalized values exactly as the device reports them. Consumers
//!   decide whether an axis is centered (sticks) or rests at one end.

use crate::capability::CapabilityDescriptor;
use crate::decoder::ReportReader;
use crate::error::DecodeError;
use crate::metadata::DeviceMeta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything the core needs from a platform descriptor: the catalog queries plus the
/// per-report queries. Implemented automatically for any type providing both.
pub trait DeviceDescriptor: CapabilityDescriptor + ReportReader + Send {}

impl<T: CapabilityDescriptor + ReportReader + Send> DeviceDescriptor for T {}

/// A device became available.
pub struct AttachEvent {
    /// Platform capability descriptor. Owned by the event; parsed once at attach.
    pub descriptor: Box<dyn DeviceDescriptor>,
    /// Best-effort identity for logs.
    pub meta: DeviceMeta,
}

impl AttachEvent {
    pub fn new(descriptor: impl DeviceDescriptor + 'static, meta: DeviceMeta) -> Self {
        Self {
            descriptor: Box::new(descriptor),
            meta,
        }
    }
}

impl fmt::Debug for AttachEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachEvent")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// One input report as delivered by the platform.
///
/// `bytes` may be larger than the report (platforms often hand out fixed-size buffers);
/// only the first `declared_size` bytes are the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEvent {
    pub bytes: Vec<u8>,
    pub declared_size: usize,
}

impl ReportEvent {
    /// Report whose declared size is the whole buffer.
    pub fn new(bytes: Vec<u8>) -> Self {
        let declared_size = bytes.len();
        Self {
            bytes,
            declared_size,
        }
    }

    pub fn with_declared_size(bytes: Vec<u8>, declared_size: usize) -> Self {
        Self {
            bytes,
            declared_size,
        }
    }

    #[inline]
    pub fn report(&self) -> RawReport<'_> {
        RawReport {
            bytes: &self.bytes,
            declared_size: self.declared_size,
        }
    }
}

/// Borrowed view of one report for the duration of a decode cycle.
#[derive(Clone, Copy, Debug)]
pub struct RawReport<'a> {
    pub bytes: &'a [u8],
    pub declared_size: usize,
}

impl<'a> RawReport<'a> {
    /// The declared prefix of the buffer.
    ///
    /// Fails when the declared size is zero or larger than the buffer.
    pub fn payload(&self) -> Result<&'a [u8], DecodeError> {
        if self.declared_size == 0 {
            return Err(DecodeError::failed("empty report"));
        }
        self.bytes.get(..self.declared_size).ok_or_else(|| {
            DecodeError::failed(format!(
                "declared size {} exceeds buffer of {} bytes",
                self.declared_size,
                self.bytes.len()
            ))
        })
    }
}

/// Button edge derived from two consecutive snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// The button is down this cycle and was up the previous one.
    ButtonPressed { button: u16 },

    /// The button is up this cycle and was down the previous one.
    ButtonReleased { button: u16 },
}

/// Category of an input channel on a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Axis,
    Button,
    /// A range value capability the decoder does not read.
    PassThrough,
}

/// Describes a channel declared by a device's catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDesc {
    pub kind: ChannelKind,
    /// Logical button index for buttons; position in the value list otherwise.
    pub idx: u16,
    /// Resolved name (`"A"`, `"LeftStickX"`, ...), when one exists.
    pub name: Option<String>,
    pub usage_page: u16,
    pub usage: u16,
}
