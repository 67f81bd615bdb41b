//! Format parsers for coordination logs.
//!
//! This module provides one parser per supported log format. Each parser
//! implements the [`Parser`](crate::parser::Parser) trait.
//!
//! # Available Parsers
//!
//! - [`CompactLogParser`] — single-line-per-event coordination entries
//!   (restrictions, delays, configurations, cancellations)
//! - [`AdvisoryParser`] — multi-line advisory bulletins (ground stops,
//!   ground delay programs, reroutes, general messages)
//!
//! # Example
//!
//! ```rust
//! use flowpack::parser::{Format, create_parser};
//!
//! let parser = create_parser(Format::Compact);
//! // let entries = parser.parse_str(document)?;
//! ```

#[cfg(feature = "advisory")]
mod advisory;
#[cfg(feature = "compact")]
mod compact;

#[cfg(feature = "advisory")]
pub use advisory::AdvisoryParser;
#[cfg(feature = "compact")]
pub use compact::CompactLogParser;
