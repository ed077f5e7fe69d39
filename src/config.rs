//! Session configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid config
//! describing the reference 16-button layout with tracing off.
//!
//! ```toml
//! button_count = 16
//! button_labels = ["A", "B", "X", "Y", "LeftBumper", "RightBumper",
//!                  "Start", "Select", "LeftStick", "RightStick", "Home"]
//! trace = "text"   # "off" | "text" | "json"
//! ```

use crate::error::ConfigError;
use crate::usage::{ButtonLabels, STANDARD_BUTTON_COUNT, STANDARD_BUTTON_LABELS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound on the fixed button vector.
pub const MAX_BUTTON_COUNT: usize = 128;

/// Diagnostic trace output per decoded cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    #[default]
    Off,
    /// One line per active button and per axis.
    Text,
    /// One JSON object per cycle.
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Length of the button state vectors.
    pub button_count: usize,
    /// Label per logical button index. Empty strings mark unlabeled slots.
    pub button_labels: Vec<String>,
    pub trace: TraceMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            button_count: STANDARD_BUTTON_COUNT,
            button_labels: STANDARD_BUTTON_LABELS.iter().map(|s| s.to_string()).collect(),
            trace: TraceMode::Off,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.button_count == 0 || self.button_count > MAX_BUTTON_COUNT {
            return Err(ConfigError::Invalid(format!(
                "button_count must be in 1..={MAX_BUTTON_COUNT}, got {}",
                self.button_count
            )));
        }
        if self.button_labels.len() > self.button_count {
            return Err(ConfigError::Invalid(format!(
                "{} button labels for {} buttons",
                self.button_labels.len(),
                self.button_count
            )));
        }
        Ok(())
    }

    pub fn labels(&self) -> ButtonLabels {
        ButtonLabels::new(self.button_labels.iter().cloned())
    }

    pub fn with_trace(mut self, trace: TraceMode) -> Self {
        self.trace = trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_reference_layout() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.button_count, 16);
        assert_eq!(config.labels().label_for_button_index(10), Some("Home"));
        assert_eq!(config.trace, TraceMode::Off);
    }

    #[test]
    fn overrides_are_applied() {
        let config = SessionConfig::from_toml_str(
            r#"
            button_count = 12
            button_labels = ["Cross", "Circle", "", "Triangle"]
            trace = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.button_count, 12);
        assert_eq!(config.trace, TraceMode::Json);
        let labels = config.labels();
        assert_eq!(labels.label_for_button_index(1), Some("Circle"));
        assert_eq!(labels.label_for_button_index(2), None);
    }

    #[test]
    fn rejects_zero_buttons() {
        let err = SessionConfig::from_toml_str("button_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_more_labels_than_buttons() {
        let err = SessionConfig::from_toml_str(
            r#"
            button_count = 2
            button_labels = ["A", "B", "X"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys_and_bad_trace_mode() {
        assert!(matches!(
            SessionConfig::from_toml_str("buttons = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("trace = \"loud\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "button_count = 20\ntrace = \"text\"").unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.button_count, 20);
        assert_eq!(config.trace, TraceMode::Text);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
