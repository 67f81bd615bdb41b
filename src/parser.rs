//! Unified parser trait for coordination-log formats.
//!
//! This module provides a single entry point for parsing log documents.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "compact")]
//! # fn main() -> flowpack::Result<()> {
//! use flowpack::parser::{Parser, Format};
//! use flowpack::parsers::CompactLogParser;
//! use std::path::Path;
//!
//! let parser = CompactLogParser::new();
//! let entries = parser.parse(Path::new("ntml_export.txt"))?;
//! for entry in &entries {
//!     println!("{}: {:?}", entry.message_type, entry.controlled_element);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "compact"))]
//! # fn main() {}
//! ```
//!
//! # Format Selection
//!
//! Use the [`Format`] enum to dynamically select parsers:
//!
//! ```rust
//! # #[cfg(feature = "compact")]
//! # fn main() {
//! use flowpack::parser::{Format, create_parser};
//!
//! let parser = create_parser(Format::Compact);
//! // parser.parse_str(document)?;
//! # }
//! # #[cfg(not(feature = "compact"))]
//! # fn main() {}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ParsedEntry;
use crate::error::FlowpackError;

/// Supported coordination-log formats.
///
/// # Example
///
/// ```rust
/// use flowpack::parser::Format;
/// use std::str::FromStr;
///
/// let format = Format::from_str("compact").unwrap();
/// assert_eq!(format, Format::Compact);
///
/// // Historical aliases are supported
/// let format = Format::from_str("ntml").unwrap();
/// assert_eq!(format, Format::Compact);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Format {
    /// Single-line-per-event coordination log (NTML style)
    #[serde(alias = "ntml")]
    Compact,

    /// Multi-line header-delimited advisory bulletins (ADVZY style)
    #[serde(alias = "advzy")]
    Advisory,
}

impl Format {
    /// Returns all format names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["compact", "ntml", "advisory", "advzy"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [Format] {
        &[Format::Compact, Format::Advisory]
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Compact => write!(f, "Compact Log"),
            Format::Advisory => write!(f, "Advisory Block"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "ntml" => Ok(Format::Compact),
            "advisory" | "advzy" => Ok(Format::Advisory),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                Format::all_names().join(", ")
            )),
        }
    }
}

// Conversion from CLI Source to Format (only with cli feature)
#[cfg(feature = "cli")]
impl From<crate::cli::Source> for Format {
    fn from(source: crate::cli::Source) -> Self {
        match source {
            crate::cli::Source::Compact => Format::Compact,
            crate::cli::Source::Advisory => Format::Advisory,
        }
    }
}

/// Unified trait for parsing coordination-log documents.
///
/// # Implementation Notes
///
/// Parsing is a pure transformation: a document in, an ordered entry
/// sequence out. Unclassifiable lines/blocks are dropped, never errors —
/// the `Result` covers I/O and document-level problems only.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the format this parser handles.
    fn format(&self) -> Format;

    /// Parses a log file and returns all entries.
    ///
    /// # Errors
    ///
    /// Returns [`FlowpackError::Io`] if the file cannot be read.
    fn parse(&self, path: &Path) -> Result<Vec<ParsedEntry>, FlowpackError>;

    /// Parses log content from a string.
    ///
    /// This is useful for content already in memory (HTTP bodies, queue
    /// payloads) and for testing with inline data. CRLF line endings are
    /// normalized to LF before processing.
    fn parse_str(&self, content: &str) -> Result<Vec<ParsedEntry>, FlowpackError>;

    /// Parses a log file (convenience method accepting a `&str` path).
    fn parse_file(&self, path: &str) -> Result<Vec<ParsedEntry>, FlowpackError> {
        self.parse(Path::new(path))
    }
}

/// Creates a parser for the specified format.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "advisory")]
/// # fn main() {
/// use flowpack::parser::{Format, create_parser};
///
/// let parser = create_parser(Format::Advisory);
/// assert_eq!(parser.name(), "Advisory Block");
/// # }
/// # #[cfg(not(feature = "advisory"))]
/// # fn main() {}
/// ```
///
/// # Panics
///
/// Panics if the corresponding parser feature is not enabled.
pub fn create_parser(format: Format) -> Box<dyn Parser> {
    match format {
        #[cfg(feature = "compact")]
        Format::Compact => Box::new(crate::parsers::CompactLogParser::new()),
        #[cfg(feature = "advisory")]
        Format::Advisory => Box::new(crate::parsers::AdvisoryParser::new()),
        // Fallback for when features are disabled
        #[allow(unreachable_patterns)]
        _ => panic!(
            "Parser for {:?} is not enabled. Enable the corresponding feature.",
            format
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("compact").unwrap(), Format::Compact);
        assert_eq!(Format::from_str("ntml").unwrap(), Format::Compact);
        assert_eq!(Format::from_str("NTML").unwrap(), Format::Compact);
        assert_eq!(Format::from_str("advisory").unwrap(), Format::Advisory);
        assert_eq!(Format::from_str("advzy").unwrap(), Format::Advisory);
    }

    #[test]
    fn test_format_from_str_error() {
        assert!(Format::from_str("unknown").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Compact.to_string(), "Compact Log");
        assert_eq!(Format::Advisory.to_string(), "Advisory Block");
    }

    #[test]
    fn test_format_all() {
        let all = Format::all();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&Format::Compact));
        assert!(all.contains(&Format::Advisory));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn test_create_parser() {
        let parser = create_parser(Format::Compact);
        assert_eq!(parser.name(), "Compact Log");
        assert_eq!(parser.format(), Format::Compact);
    }
}
