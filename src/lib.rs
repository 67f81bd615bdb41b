//! # Flowpack
//!
//! A Rust library for parsing historical air-traffic-flow-management
//! coordination logs into typed, structured records.
//!
//! ## Overview
//!
//! Flowpack understands two related free-text formats found in chat-exported
//! coordination logs:
//!
//! - **Compact Log** — one line per event: spacing restrictions (MIT/MINIT),
//!   stops, departure-release restrictions (APREQ/CFR), metering, runway
//!   configurations, delay reports, and cancellations.
//! - **Advisory Block** — multi-line bulletins for ground stops, ground
//!   delay programs, reroutes, and general messages.
//!
//! Both parsers track the evolving author/facility/date context across the
//! document, resolve partial dates (day-of-month only) into full timestamps,
//! and emit a uniform [`ParsedEntry`] record that always retains the
//! original raw text.
//!
//! Parsing never fails on malformed entries: a line or block that cannot be
//! classified is silently dropped, and missing fields stay `None`. The
//! import pipeline downstream is responsible for semantic validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowpack::parser::{Parser, Format, create_parser};
//! use flowpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let parser = create_parser(Format::Compact);
//!     let entries = parser.parse_str(
//!         "Jeremy P | ZNY C1 — 04/17/2020 19:45\n\
//!          17/2344    BOS via MERIT 15MIT VOLUME:VOLUME 2345-0000 ZBW:ZNY\n",
//!     )?;
//!
//!     assert_eq!(entries[0].message_type, MessageType::Mit);
//!     assert_eq!(entries[0].controlled_element.as_deref(), Some("BOS"));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — unified parser API
//!   - [`Parser`](parser::Parser) — parser trait
//!   - [`Format`](parser::Format) — supported formats enum
//!   - [`create_parser`](parser::create_parser)
//! - [`parsers`] — the format parsers
//!   - [`CompactLogParser`](parsers::CompactLogParser), [`AdvisoryParser`](parsers::AdvisoryParser)
//! - [`entry`] — [`ParsedEntry`] and its component types
//! - [`context`] — header context tracking
//! - [`dates`] — partial-date resolution
//! - [`config`] — parser configuration types
//! - [`core`] — post-parse utilities
//!   - [`core::filter`] — [`FilterConfig`](core::FilterConfig), [`apply_filters`](core::apply_filters)
//!   - [`core::output`] — JSON / JSONL / CSV writers
//! - [`cli`] — CLI types (feature-gated)
//! - [`error`] — unified error types ([`FlowpackError`], [`Result`])
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
#[cfg(any(feature = "compact", feature = "advisory"))]
pub mod context;
pub mod core;
pub mod dates;
pub mod entry;
pub mod error;
pub mod format;
pub mod parser;
#[cfg(any(feature = "compact", feature = "advisory"))]
pub mod parsers;

// Re-export the main types at the crate root for convenience
pub use entry::ParsedEntry;
pub use error::{FlowpackError, Result};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use flowpack::prelude::*;
/// ```
pub mod prelude {
    // Core entry types
    pub use crate::ParsedEntry;
    pub use crate::entry::{
        ElementKind, EntryContext, MessageType, ReasonCategory, Restriction, RestrictionUnit,
        TypePayload,
    };

    // Error types
    pub use crate::error::{FlowpackError, Result};

    // Unified parser API
    pub use crate::parser::{Format, Parser, create_parser};

    // Format configs
    pub use crate::config::{AdvisoryConfig, CompactConfig};

    // Filtering
    pub use crate::core::filter::{FilterConfig, apply_filters};

    // Output (file writers and string converters)
    pub use crate::core::models::OutputConfig;
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    // Parsers
    #[cfg(feature = "advisory")]
    pub use crate::parsers::AdvisoryParser;
    #[cfg(feature = "compact")]
    pub use crate::parsers::CompactLogParser;
}
