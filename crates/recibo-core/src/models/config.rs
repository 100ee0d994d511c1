//! Configuration structures for receipt mapping.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ReciboError, Result};
use crate::ticket::rules::dates::DEFAULT_CENTURY_BASE;
use crate::ticket::rules::identifiers::{DEFAULT_REGISTER_ID_WIDTH, MAX_REGISTER_ID_WIDTH};
use crate::ticket::rules::store::{DEFAULT_STORE_NAME_MAX_LEN, DEFAULT_STORE_SCAN_LINES};

/// Main configuration for recibo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// Free-text extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Free-text extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines scanned from the top of the receipt for the store header.
    pub store_scan_lines: usize,

    /// Maximum store name length, in characters.
    pub store_name_max_len: usize,

    /// Width register ids are zero-padded to.
    pub register_id_width: usize,

    /// Century added to two-digit years.
    pub century_base: i32,

    /// Turn literal `\n` sequences into line breaks before extraction.
    pub unescape_newlines: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            store_scan_lines: DEFAULT_STORE_SCAN_LINES,
            store_name_max_len: DEFAULT_STORE_NAME_MAX_LEN,
            register_id_width: DEFAULT_REGISTER_ID_WIDTH,
            century_base: DEFAULT_CENTURY_BASE,
            unescape_newlines: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Include the text the record was mapped from.
    pub include_raw_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            include_raw_text: true,
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values extraction cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.extraction.store_scan_lines == 0 {
            return Err(ReciboError::Config(
                "extraction.store_scan_lines must be at least 1".to_string(),
            ));
        }
        if self.extraction.store_name_max_len == 0 {
            return Err(ReciboError::Config(
                "extraction.store_name_max_len must be at least 1".to_string(),
            ));
        }
        if self.extraction.register_id_width > MAX_REGISTER_ID_WIDTH {
            return Err(ReciboError::Config(format!(
                "extraction.register_id_width must be at most {}",
                MAX_REGISTER_ID_WIDTH
            )));
        }
        Ok(())
    }
}
