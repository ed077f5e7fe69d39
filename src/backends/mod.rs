//! Event sources.
//!
//! - [`virtual_input`]: scripted, in-process source (always available).
//! - [`hid`]: `hidapi` source with the portable report-descriptor parser (feature `hid`).
//! - [`windows`]: Raw Input source with HIDP preparsed data (Windows only).

pub mod virtual_input;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

#[cfg(windows)]
#[cfg_attr(docsrs, doc(cfg(windows)))]
pub mod windows;

pub use virtual_input::ScriptedSource;
