//! Configuration types for the format parsers.
//!
//! Each format has its own configuration struct:
//!
//! - [`CompactConfig`] — Compact Log settings
//! - [`AdvisoryConfig`] — Advisory Block settings
//!
//! # Example
//!
//! ```rust
//! use flowpack::config::CompactConfig;
//! use flowpack::parsers::CompactLogParser;
//!
//! let config = CompactConfig::new().with_rollover_tolerance_days(3);
//! let parser = CompactLogParser::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

use crate::dates::ROLLOVER_TOLERANCE_DAYS;

/// Configuration for Compact Log parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactConfig {
    /// Days an entry day may lag the header day before month rollover is
    /// assumed (default: 5).
    pub rollover_tolerance_days: u32,

    /// Strip trailing relay-bot confirmation codes (`$ 05B01A`) before field
    /// extraction (default: true).
    pub strip_bot_codes: bool,

    /// Lines shorter than this are treated as noise (default: 4).
    pub min_line_len: usize,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            rollover_tolerance_days: ROLLOVER_TOLERANCE_DAYS,
            strip_bot_codes: true,
            min_line_len: 4,
        }
    }
}

impl CompactConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the month-rollover tolerance.
    #[must_use]
    pub fn with_rollover_tolerance_days(mut self, days: u32) -> Self {
        self.rollover_tolerance_days = days;
        self
    }

    /// Enables or disables bot-code stripping.
    #[must_use]
    pub fn with_strip_bot_codes(mut self, strip: bool) -> Self {
        self.strip_bot_codes = strip;
        self
    }

    /// Sets the minimum line length below which lines count as noise.
    #[must_use]
    pub fn with_min_line_len(mut self, len: usize) -> Self {
        self.min_line_len = len;
        self
    }
}

/// Configuration for Advisory Block parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Days a footer day may lag the header day before month rollover is
    /// assumed (default: 5).
    pub rollover_tolerance_days: u32,

    /// Organization token that opens an advisory header
    /// (default: `"vATCSCC"`). Matched case-insensitively.
    pub organization: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            rollover_tolerance_days: ROLLOVER_TOLERANCE_DAYS,
            organization: "vATCSCC".to_string(),
        }
    }
}

impl AdvisoryConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the month-rollover tolerance.
    #[must_use]
    pub fn with_rollover_tolerance_days(mut self, days: u32) -> Self {
        self.rollover_tolerance_days = days;
        self
    }

    /// Sets the advisory-header organization token.
    #[must_use]
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = org.into();
        self
    }
}
