//! JSON Lines (JSONL) output writer.
//!
//! JSONL is the natural interchange format for the import pipeline: one
//! entry per line, streamable, append-friendly.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::ParsedEntry;
use crate::core::models::OutputConfig;
use crate::core::output::entry_to_value;
use crate::error::FlowpackError;

/// Converts entries to a JSONL string.
pub fn to_jsonl(entries: &[ParsedEntry], config: &OutputConfig) -> Result<String, FlowpackError> {
    let mut out = String::new();
    for entry in entries {
        let value = entry_to_value(entry, config)?;
        out.push_str(&serde_json::to_string(&value)?);
        out.push('\n');
    }
    Ok(out)
}

/// Writes entries to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"message_type":"MIT","controlled_element":"BOS"}
/// {"message_type":"STOP","controlled_element":"MIA"}
/// ```
pub fn write_jsonl(
    entries: &[ParsedEntry],
    output_path: &str,
    config: &OutputConfig,
) -> Result<(), FlowpackError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for entry in entries {
        let value = entry_to_value(entry, config)?;
        let line = serde_json::to_string(&value)?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}
