//! Unified error types for flowpack.
//!
//! This module provides a single [`FlowpackError`] enum covering all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! Parsing itself has exactly one failure mode for malformed *entries*:
//! silent omission — a line or block that cannot be classified is dropped,
//! never raised as an error. The variants here cover everything around the
//! parse: I/O, output serialization, and caller misuse (bad filter dates).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for flowpack operations.
///
/// # Example
///
/// ```rust
/// use flowpack::error::Result;
/// use flowpack::ParsedEntry;
///
/// fn my_function() -> Result<Vec<ParsedEntry>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, FlowpackError>;

/// The error type for all flowpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowpackError {
    /// An I/O error occurred reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to process an input document.
    ///
    /// Note this is never raised for individually malformed entries (those
    /// are silently dropped); it covers document-level problems.
    #[error("Failed to parse {format} log{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "Compact Log", "Advisory Block")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't match the expected document structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date in a filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Regex/pattern matching error
    #[error("{0}")]
    Pattern(String),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl FlowpackError {
    /// Creates a parse error for the Compact Log format.
    #[cfg(feature = "compact")]
    pub fn compact_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        FlowpackError::Parse {
            format: "Compact Log",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a parse error for the Advisory Block format.
    #[cfg(feature = "advisory")]
    pub fn advisory_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        FlowpackError::Parse {
            format: "Advisory Block",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        FlowpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        FlowpackError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, FlowpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, FlowpackError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, FlowpackError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, FlowpackError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
