//! Inspector configuration.
//!
//! Controls how strictly header fields are checked and whether count
//! anomalies are listed in the report. Loadable from a JSON file; every
//! field has a default so partial files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::data_input::TextDecoding;
use crate::error::{Result, ShardError};

/// How header fields that identify a file are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderValidation {
    /// Read identifying fields and discard them.
    #[default]
    Lenient,
    /// Require labels, codec names, ids and suffixes to match, the `.si`
    /// magic to be present, and every string to be valid UTF-8.
    Strict,
}

/// Configuration for building a shard report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Header validation level.
    pub header_validation: HeaderValidation,

    /// Whether count-invariant violations are listed in the report.
    pub report_anomalies: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        InspectorConfig {
            header_validation: HeaderValidation::Lenient,
            report_anomalies: true,
        }
    }
}

impl InspectorConfig {
    /// Configuration with strict header validation.
    pub fn strict() -> Self {
        InspectorConfig {
            header_validation: HeaderValidation::Strict,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShardError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ShardError::config(format!("Invalid configuration: {e}")))
    }

    /// Check if strict header validation is enabled.
    pub fn is_strict(&self) -> bool {
        self.header_validation == HeaderValidation::Strict
    }

    /// Text decoding mode matching the validation level.
    pub fn text_decoding(&self) -> TextDecoding {
        match self.header_validation {
            HeaderValidation::Lenient => TextDecoding::Lossy,
            HeaderValidation::Strict => TextDecoding::Strict,
        }
    }
}
