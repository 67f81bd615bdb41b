//! # flowpack CLI
//!
//! Command-line interface for the flowpack library.

use std::path::Path;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser as ClapParser;

use flowpack::cli::Args;
use flowpack::core::{FilterConfig, OutputConfig, apply_filters};
use flowpack::entry::MessageType;
use flowpack::format::{OutputFormat, write_to_format};
use flowpack::parser::{Format, Parser, create_parser};
use flowpack::{FlowpackError, ParsedEntry};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), FlowpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = adjust_output_extension(&args.output, args.format);

    println!("📦 flowpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Source:  {}", args.source);
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", args.format);

    // Build filter configuration
    let mut filter_config = FilterConfig::new();

    if let Some(ref after) = args.after {
        filter_config = filter_config.with_date_from(after)?;
        println!("📅 After:   {}", after);
    }
    if let Some(ref before) = args.before {
        filter_config = filter_config.with_date_to(before)?;
        println!("📅 Before:  {}", before);
    }
    if let Some(ref type_str) = args.message_type {
        let message_type = MessageType::from_str(type_str)
            .map_err(|e| FlowpackError::invalid_format("filter", e))?;
        filter_config = filter_config.with_message_type(message_type);
        println!("🏷️  Type:    {}", message_type);
    }
    if let Some(ref element) = args.element {
        filter_config = filter_config.with_element(element.clone());
        println!("🛫 Element: {}", element);
    }
    if let Some(ref facility) = args.facility {
        filter_config = filter_config.with_facility(facility.clone());
        println!("🗼 Facility: {}", facility);
    }

    println!();

    // Step 1: Parse
    let (entries, parse_time) = parse_input(&args)?;
    let original_count = entries.len();
    println!(
        "   Found {} entries ({:.2}s)",
        original_count,
        parse_time.as_secs_f64()
    );

    // Step 2: Filter
    let final_entries = if filter_config.is_active() {
        println!("🔍 Filtering entries...");
        let filter_start = Instant::now();
        let filtered = apply_filters(entries, &filter_config);
        println!(
            "   {} entries after filtering ({:.2}s)",
            filtered.len(),
            filter_start.elapsed().as_secs_f64()
        );
        filtered
    } else {
        entries
    };

    // Step 3: Build output configuration
    let mut output_config = OutputConfig::new();
    if args.raw {
        output_config = output_config.with_raw_text();
    }
    if args.context {
        output_config = output_config.with_context();
    }
    if args.lines {
        output_config = output_config.with_source_lines();
    }

    // Step 4: Write output in selected format
    let lib_format: OutputFormat = args.format.into();
    println!("💾 Writing {}...", lib_format);
    let write_start = Instant::now();
    write_to_format(&final_entries, &output_path, lib_format, &output_config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Parsed:    {} entries", original_count);
    if filter_config.is_active() {
        println!("   Kept:      {} entries", final_entries.len());
    }
    println!("   Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn parse_input(args: &Args) -> Result<(Vec<ParsedEntry>, std::time::Duration), FlowpackError> {
    let format: Format = args.source.into();
    let parser = create_parser(format);
    println!("⏳ Parsing {}...", parser.name());
    let parse_start = Instant::now();
    let entries = parser.parse(Path::new(&args.input))?;
    Ok((entries, parse_start.elapsed()))
}

/// Adjusts output file extension based on format if using the default
/// output path.
fn adjust_output_extension(output: &str, format: flowpack::cli::OutputFormat) -> String {
    if output != "parsed_entries.jsonl" {
        return output.to_string();
    }

    let lib_format: OutputFormat = format.into();
    format!("parsed_entries.{}", lib_format.extension())
}
