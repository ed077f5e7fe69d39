//! rawpad: HID gamepad report decoding.
//!
//! The pipeline per attached device:
//! 1. an [`EventSource`] delivers an [`AttachEvent`] carrying the device's capability
//!    descriptor, and the [`CapabilityCatalog`] is parsed from it once;
//! 2. every [`ReportEvent`] is decoded into raw usages and values
//!    ([`ReportDecoder`]), then folded into the [`InputSnapshot`];
//! 3. consumers read the snapshot (current and previous button vectors, raw axes) and
//!    resolve names through [`usage`].
//!
//! Buttons are reported only while held; a release is the absence of a usage in the
//! next report. A report that fails to decode leaves the snapshot untouched.
//!
//! [`InputManager`] ties it together on the caller's thread.

pub mod backends;
pub mod capability;
pub mod config;
pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod manager;
pub mod metadata;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod trace;
pub mod usage;

pub use backends::ScriptedSource;
pub use capability::{ButtonRange, CapabilityCatalog, CapabilityDescriptor, ValueCapability};
pub use config::{SessionConfig, TraceMode};
pub use decoder::{DecodedReport, ReportDecoder, ReportReader};
pub use descriptor::{ReferenceReport, ReportDescriptor, REFERENCE_GAMEPAD};
pub use error::{CatalogError, ConfigError, DecodeError, Error, Result};
pub use event::{AttachEvent, ChannelDesc, ChannelKind, DeviceDescriptor, InputKind, ReportEvent};
pub use manager::{Dispatch, InputManager, RunStats};
pub use metadata::DeviceMeta;
pub use session::DeviceSession;
pub use snapshot::{AxisValue, ButtonStateVector, InputSnapshot};
pub use source::{EventSource, SourceEvent};
pub use usage::{axis_kind_for_usage, label_for_button_index, AxisKind, ButtonLabels};
