//! CSV output writer.
//!
//! CSV flattens the common fields only; the typed payload does not fit a
//! row shape and stays in the JSON formats.

use std::fs::File;

use crate::ParsedEntry;
use crate::core::models::OutputConfig;
use crate::error::FlowpackError;

/// Writes entries to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Type`, `Element`, `Restriction`, `Fix`, `ValidFrom`,
///   `ValidUntil`, `Requesting`, `Providing`, `Reason` — plus `SourceLine`,
///   `Author`/`Facility`, and `RawText` when enabled in the config
/// - Encoding: UTF-8
pub fn write_csv(
    entries: &[ParsedEntry],
    output_path: &str,
    config: &OutputConfig,
) -> Result<(), FlowpackError> {
    let file = File::create(output_path)?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);
    write_records(&mut writer, entries, config)?;
    Ok(())
}

/// Converts entries to a CSV string.
pub fn to_csv(entries: &[ParsedEntry], config: &OutputConfig) -> Result<String, FlowpackError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    write_records(&mut writer, entries, config)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| FlowpackError::invalid_format("CSV", e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| FlowpackError::invalid_format("CSV", e.to_string()))
}

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    entries: &[ParsedEntry],
    config: &OutputConfig,
) -> Result<(), FlowpackError> {
    writer.write_record(build_header(config))?;
    for entry in entries {
        writer.write_record(build_record(entry, config))?;
    }
    writer.flush()?;
    Ok(())
}

/// Build CSV header based on output configuration.
fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = Vec::new();

    if config.include_source_lines {
        header.push("SourceLine");
    }

    header.extend([
        "Type",
        "Element",
        "Restriction",
        "Fix",
        "ValidFrom",
        "ValidUntil",
        "Requesting",
        "Providing",
        "Reason",
    ]);

    if config.include_context {
        header.push("Author");
        header.push("Facility");
    }
    if config.include_raw_text {
        header.push("RawText");
    }

    header
}

/// Build CSV record for a single entry.
fn build_record(entry: &ParsedEntry, config: &OutputConfig) -> Vec<String> {
    let mut record = Vec::new();

    if config.include_source_lines {
        record.push(entry.source_line.to_string());
    }

    record.push(entry.message_type.to_string());
    record.push(entry.controlled_element.clone().unwrap_or_default());
    record.push(
        entry
            .restriction
            .map(|r| format!("{}{:?}", r.value, r.unit).to_uppercase())
            .unwrap_or_default(),
    );
    record.push(entry.reference_fix.clone().unwrap_or_default());
    record.push(
        entry
            .valid_from
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
    );
    record.push(
        entry
            .valid_until
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
    );
    record.push(entry.requesting_facility.clone().unwrap_or_default());
    record.push(entry.providing_facility.clone().unwrap_or_default());
    record.push(
        entry
            .reason_detail
            .clone()
            .or_else(|| entry.reason_category.map(|c| format!("{c:?}").to_uppercase()))
            .unwrap_or_default(),
    );

    if config.include_context {
        record.push(entry.context.author.clone().unwrap_or_default());
        record.push(entry.context.facility.clone().unwrap_or_default());
    }
    if config.include_raw_text {
        record.push(entry.raw_text.clone());
    }

    record
}
