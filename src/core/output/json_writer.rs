//! JSON output writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::ParsedEntry;
use crate::core::models::OutputConfig;
use crate::core::output::entry_to_value;
use crate::error::FlowpackError;

/// Converts entries to a pretty-printed JSON array string.
pub fn to_json(entries: &[ParsedEntry], config: &OutputConfig) -> Result<String, FlowpackError> {
    let values = entries
        .iter()
        .map(|entry| entry_to_value(entry, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

/// Writes entries as a JSON array.
pub fn write_json(
    entries: &[ParsedEntry],
    output_path: &str,
    config: &OutputConfig,
) -> Result<(), FlowpackError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    let json = to_json(entries, config)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryContext, MessageType, Restriction, RestrictionUnit};
    use tempfile::NamedTempFile;

    fn sample() -> Vec<ParsedEntry> {
        let mut e = ParsedEntry::new(
            MessageType::Mit,
            "17/2344 BOS 15MIT",
            1,
            EntryContext::default(),
        );
        e.controlled_element = Some("BOS".to_string());
        e.restriction = Some(Restriction {
            value: 15,
            unit: RestrictionUnit::Mit,
        });
        vec![e]
    }

    #[test]
    fn test_to_json_is_an_array() {
        let json = to_json(&sample(), &OutputConfig::new()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed[0]["message_type"], "MIT");
        assert_eq!(parsed[0]["restriction"]["value"], 15);
        assert_eq!(parsed[0]["restriction"]["unit"], "MIT");
    }

    #[test]
    fn test_write_json_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        write_json(&sample(), path, &OutputConfig::new().with_raw_text()).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["raw_text"], "17/2344 BOS 15MIT");
    }

    #[test]
    fn test_empty_entries() {
        let json = to_json(&[], &OutputConfig::new()).unwrap();
        assert_eq!(json.trim(), "[]");
    }
}
