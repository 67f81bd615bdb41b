//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_json`] / [`to_json`] - JSON array of entries - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines (one entry per line, best for import pipelines) - requires `json-output` feature
//! - [`write_csv`] / [`to_csv`] - flattened CSV with semicolon delimiter - requires `csv-output` feature
//!
//! JSON and JSONL carry the full structured record including the typed
//! payload; CSV flattens the common fields only and is meant for quick
//! inspection in spreadsheets.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> flowpack::Result<()> {
//! use flowpack::core::output::{write_csv, write_json, write_jsonl, to_jsonl};
//! use flowpack::core::models::OutputConfig;
//!
//! let entries = vec![];
//! let config = OutputConfig::new().with_raw_text();
//!
//! // Write to files
//! write_json(&entries, "output.json", &config)?;
//! write_jsonl(&entries, "output.jsonl", &config)?;
//! write_csv(&entries, "output.csv", &config)?;
//!
//! // Or get as strings
//! let jsonl = to_jsonl(&entries, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

#[cfg(feature = "json-output")]
pub(crate) fn entry_to_value(
    entry: &crate::ParsedEntry,
    config: &crate::core::models::OutputConfig,
) -> Result<serde_json::Value, crate::error::FlowpackError> {
    let mut value = serde_json::to_value(entry)?;
    if let Some(map) = value.as_object_mut() {
        if !config.include_raw_text {
            map.remove("raw_text");
        }
        if !config.include_context {
            map.remove("context");
        }
        if !config.include_source_lines {
            map.remove("source_line");
        }
    }
    Ok(value)
}
