//! Library usage example: parse both formats, filter, and serialize.
//!
//! Run with: `cargo run --example library_usage`

use flowpack::core::models::OutputConfig;
use flowpack::core::output::to_jsonl;
use flowpack::parser::{Format, create_parser};
use flowpack::prelude::*;

fn main() -> Result<()> {
    // A small compact log, as pasted from a chat export.
    let compact_log = "\
Jeremy P | ZNY C1 — 04/17/2020 19:45
17/2344    BOS via MERIT 15MIT VOLUME:VOLUME EXCL:NONE 2345-0000 ZBW:ZNY
17/2349    BOS STOP VOLUME:VOLUME EXCL:NONE 2345-0015 ZNY:PHL
18/0010     D/D from JFK, +45/0010 VOLUME:VOLUME
";

    let parser = create_parser(Format::Compact);
    let entries = parser.parse_str(compact_log)?;

    println!("Parsed {} entries:", entries.len());
    for entry in &entries {
        println!(
            "  {} {} ({})",
            entry.message_type,
            entry.controlled_element.as_deref().unwrap_or("-"),
            entry
                .entry_timestamp
                .map_or_else(|| "no timestamp".to_string(), |ts| ts.to_string()),
        );
    }

    // Keep only the spacing restrictions.
    let restrictions = apply_filters(
        entries,
        &FilterConfig::new().with_message_type(MessageType::Mit),
    );
    println!("\n{} MIT restrictions", restrictions.len());

    // Serialize for the import pipeline.
    let jsonl = to_jsonl(&restrictions, &OutputConfig::new().with_raw_text())?;
    println!("\nJSONL output:\n{jsonl}");

    // Advisory blocks work the same way.
    let advisory_log = "\
vATCSCC ADVZY 001 ZDC 03/29/2020 CDM GROUND STOP
CTL ELEMENT: DCA
IMPACTING CONDITION: VOLUME / VOLUME
290030-290115
20/03/29 00:31
";
    let advisories = create_parser(Format::Advisory).parse_str(advisory_log)?;
    println!(
        "Advisory: {} for {}",
        advisories[0].message_type,
        advisories[0].controlled_element.as_deref().unwrap_or("-")
    );

    Ok(())
}
