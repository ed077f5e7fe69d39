//! Error types.
//!
//! Errors are split by how they propagate:
//! - [`CatalogError`] happens at attach time and is fatal to that device's session.
//! - [`DecodeError`] happens per report; the cycle is discarded and the session continues.
//! - [`ConfigError`] happens while loading a [`SessionConfig`](crate::config::SessionConfig).

use thiserror::Error;

/// Failure while building a [`CapabilityCatalog`](crate::capability::CapabilityCatalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The platform could not produce the descriptor, its sizes, or its capability buffers.
    #[error("capability query failed: {0}")]
    CapabilityQueryFailed(String),

    /// The descriptor declares no input button capabilities at all.
    #[error("descriptor declares no input button capabilities")]
    NoButtonCapabilities,

    /// A declared usage range has `usage_max < usage_min`.
    #[error(
        "malformed usage range on page 0x{usage_page:04x}: max 0x{usage_max:04x} < min 0x{usage_min:04x}"
    )]
    MalformedRange {
        usage_page: u16,
        usage_min: u16,
        usage_max: u16,
    },
}

/// Failure while decoding one report. Every variant belongs to the "decode failed" class.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The report could not be interpreted (platform query failure, bad size, ...).
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// An active usage resolved to a button index outside the fixed vector.
    #[error("button usage 0x{usage:04x} maps to index {index}, capacity is {capacity}")]
    BoundsViolation {
        usage: u16,
        index: i64,
        capacity: usize,
    },
}

impl DecodeError {
    #[inline]
    pub fn failed(reason: impl Into<String>) -> Self {
        DecodeError::DecodeFailed(reason.into())
    }

    #[inline]
    pub fn is_bounds_violation(&self) -> bool {
        matches!(self, DecodeError::BoundsViolation { .. })
    }
}

/// Failure while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The event source itself failed (device read error, closed handle, ...).
    #[error("event source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
