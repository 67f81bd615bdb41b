//! Output format types for the flowpack library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> flowpack::Result<()> {
//! use flowpack::format::{OutputFormat, write_to_format};
//! use flowpack::core::models::OutputConfig;
//!
//! let entries = vec![];
//! write_to_format(&entries, "output.jsonl", OutputFormat::Jsonl, &OutputConfig::new())?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("output.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::ParsedEntry;
use crate::core::models::OutputConfig;
use crate::error::FlowpackError;

/// Output format for parsed entries.
///
/// - [`Jsonl`](OutputFormat::Jsonl) - one entry per line, the import
///   pipeline's interchange format (default)
/// - [`Json`](OutputFormat::Json) - structured array, good for APIs
/// - [`Csv`](OutputFormat::Csv) - flattened common fields, for spreadsheets
///
/// # Example
///
/// ```rust
/// use flowpack::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// JSON Lines - one JSON object per line (default). Also known as NDJSON.
    #[default]
    Jsonl,

    /// JSON array of entries
    Json,

    /// CSV with semicolon delimiter, common fields only
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["jsonl", "ndjson", "json", "csv"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Jsonl, OutputFormat::Json, OutputFormat::Csv]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jsonl => "application/x-ndjson",
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowpack::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("output.jsonl").unwrap();
    /// assert_eq!(format, OutputFormat::Jsonl);
    /// ```
    pub fn from_path(path: &str) -> Result<Self, FlowpackError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        ext.parse().map_err(|_| {
            FlowpackError::invalid_format(
                "output",
                format!(
                    "Cannot detect format from path '{}'. Expected extension: {}",
                    path,
                    Self::all_names().join(", ")
                ),
            )
        })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes entries to a file in the given format.
///
/// # Errors
///
/// Returns an error if the file cannot be written or the format's feature
/// is not enabled at compile time.
#[allow(unused_variables)]
pub fn write_to_format(
    entries: &[ParsedEntry],
    output_path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), FlowpackError> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(entries, output_path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(entries, output_path, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(entries, output_path, config),
        #[allow(unreachable_patterns)]
        _ => Err(FlowpackError::invalid_format(
            "output",
            format!("Support for {format} is not compiled in"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_extension() {
        assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(OutputFormat::from_str("jsonl").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            OutputFormat::from_path("out.jsonl").unwrap(),
            OutputFormat::Jsonl
        );
        assert_eq!(OutputFormat::from_path("out.csv").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_path("out.xml").is_err());
    }

    #[test]
    fn test_default_is_jsonl() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jsonl);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::Json.mime_type(), "application/json");
        assert_eq!(OutputFormat::Jsonl.mime_type(), "application/x-ndjson");
    }
}
