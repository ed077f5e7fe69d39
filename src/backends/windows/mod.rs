//! Windows backend.
//!
//! - [`hidp`]: [`PreparsedData`], a capability descriptor answered by the HIDP parser.
//! - [`raw_input`]: [`RawInputSource`], fed from the host's `WM_INPUT` handler.

pub mod hidp;
pub mod raw_input;

pub use hidp::PreparsedData;
pub use raw_input::{register_gamepads, RawInputSource};
