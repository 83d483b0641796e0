//! Ingestion configuration
//!
//! Every knob has a default that suits the supported vendors; callers
//! usually only touch `lenient` or `default_source_system`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IngestError;
use crate::format::SniffOptions;
use crate::types::Vendor;

/// Timestamp patterns tried in order; date-only patterns resolve to midnight
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Succeed when at least one row is valid, even if others were rejected
    pub lenient: bool,

    /// Skip vendor detection and use this mapper
    pub vendor_override: Option<Vendor>,

    /// `source_system` for generic and custom files that carry none
    pub default_source_system: Option<String>,

    /// Accepted timestamp patterns (chrono syntax), tried in order
    pub timestamp_formats: Vec<String>,

    /// Bytes of decoded text sampled by the delimiter sniff
    pub sniff_sample_bytes: usize,

    /// Lines sampled by the delimiter sniff
    pub sniff_sample_lines: usize,

    /// Signature tokens a vendor must match before header scoring can pick it
    pub min_signature_matches: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let sniff = SniffOptions::default();
        Self {
            lenient: false,
            vendor_override: None,
            default_source_system: None,
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            sniff_sample_bytes: sniff.sample_bytes,
            sniff_sample_lines: sniff.sample_lines,
            min_signature_matches: 2,
        }
    }
}

impl IngestConfig {
    /// Load from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let config: IngestConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Loaded ingest configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.timestamp_formats.is_empty() {
            return Err(IngestError::Configuration(
                "at least one timestamp format is required".to_string(),
            ));
        }
        if self.sniff_sample_lines == 0 || self.sniff_sample_bytes == 0 {
            return Err(IngestError::Configuration(
                "delimiter sniff sample must not be empty".to_string(),
            ));
        }
        if self.min_signature_matches == 0 {
            return Err(IngestError::Configuration(
                "min_signature_matches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sniff_options(&self) -> SniffOptions {
        SniffOptions {
            sample_bytes: self.sniff_sample_bytes,
            sample_lines: self.sniff_sample_lines,
        }
    }
}
