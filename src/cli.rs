//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Source`] - Supported log formats
//! - [`OutputFormat`] - Output format options
//!
//! # Using Source and OutputFormat in Libraries
//!
//! These types are designed to be usable outside of CLI context:
//!
//! ```rust
//! use flowpack::cli::{Source, OutputFormat};
//! use flowpack::parser::{Format, create_parser};
//!
//! let parser = create_parser(Format::from(Source::Compact));
//! let format = OutputFormat::Jsonl;
//! println!("Format: {}", format); // "JSONL"
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Convert coordination-log exports (compact NTML entries, advisory
/// bulletins) into structured records for import and analysis.
#[derive(Parser, Debug, Clone)]
#[command(name = "flowpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    flowpack compact ntml_export.txt
    flowpack ntml log.txt -o entries.jsonl
    flowpack advisory advisories.txt --format json
    flowpack advzy advisories.txt --after 2020-04-01
    flowpack compact log.txt --type MIT --element BOS --raw")]
pub struct Args {
    /// Log format of the input file
    #[arg(value_enum)]
    pub source: Source,

    /// Path to input file
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = "parsed_entries.jsonl")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Keep only entries logged after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep only entries logged before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep only entries of this message type (e.g. MIT, STOP, REROUTE)
    #[arg(long = "type", value_name = "TYPE")]
    pub message_type: Option<String>,

    /// Keep only entries for this controlled element
    #[arg(long, value_name = "ELEMENT")]
    pub element: Option<String>,

    /// Keep only entries involving this facility
    #[arg(long, value_name = "FACILITY")]
    pub facility: Option<String>,

    /// Include the original raw text of each entry in the output
    #[arg(short = 'r', long)]
    pub raw: bool,

    /// Include the captured header context in the output
    #[arg(short = 'c', long)]
    pub context: bool,

    /// Include source line numbers in the output
    #[arg(long)]
    pub lines: bool,
}

/// Supported log formats.
///
/// # Example
///
/// ```rust
/// use flowpack::cli::Source;
/// use flowpack::parser::{Format, create_parser};
///
/// let parser = create_parser(Format::from(Source::Advisory));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Compact single-line coordination log (NTML style)
    #[value(alias = "ntml")]
    #[serde(alias = "ntml")]
    Compact,

    /// Multi-line advisory bulletins (ADVZY style)
    #[value(alias = "advzy")]
    #[serde(alias = "advzy")]
    Advisory,
}

impl Source {
    /// Returns all supported source names (including aliases).
    pub fn all_names() -> &'static [&'static str] {
        &["compact", "ntml", "advisory", "advzy"]
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Compact => write!(f, "Compact Log"),
            Source::Advisory => write!(f, "Advisory Block"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "ntml" => Ok(Source::Compact),
            "advisory" | "advzy" => Ok(Source::Advisory),
            _ => Err(format!(
                "Unknown source: '{}'. Expected one of: {}",
                s,
                Source::all_names().join(", ")
            )),
        }
    }
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use flowpack::cli::OutputFormat;
///
/// let format = OutputFormat::Jsonl;
/// println!("Extension: {}", format.extension()); // "jsonl"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON Lines - one JSON object per entry (default)
    #[default]
    Jsonl,

    /// JSON array of entries
    Json,

    /// CSV of the flattened common fields
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
        &["jsonl", "json", "csv"]
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

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Compact.to_string(), "Compact Log");
        assert_eq!(Source::Advisory.to_string(), "Advisory Block");
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!("compact".parse::<Source>().unwrap(), Source::Compact);
        assert_eq!("ntml".parse::<Source>().unwrap(), Source::Compact);
        assert_eq!("advisory".parse::<Source>().unwrap(), Source::Advisory);
        assert_eq!("advzy".parse::<Source>().unwrap(), Source::Advisory);
        assert!("unknown".parse::<Source>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("ndjson".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn test_source_serde() {
        let source = Source::Compact;
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, "\"compact\"");

        let parsed: Source = serde_json::from_str("\"advzy\"").unwrap();
        assert_eq!(parsed, Source::Advisory);
    }

    #[test]
    fn test_format_serde() {
        let format = OutputFormat::Jsonl;
        let json = serde_json::to_string(&format).unwrap();
        assert_eq!(json, "\"jsonl\"");
    }
}
