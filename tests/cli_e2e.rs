//! End-to-end CLI tests for flowpack.
//!
//! These tests verify the complete CLI workflow by running the actual binary
//! with various arguments and checking the output.
//!
//! # Test Categories
//!
//! - **Basic functionality**: Both parsers work via CLI
//! - **Output formats**: JSONL, JSON, CSV generation
//! - **Filters**: Date, type, element, facility filtering
//! - **Flags**: Audit-field flags work correctly
//! - **Error handling**: Proper error messages for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary directory with test fixtures for both formats.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let compact = "\
Jeremy P | ZNY C1 — 04/17/2020 19:45
17/2344    BOS via MERIT 15MIT VOLUME:VOLUME EXCL:NONE 2345-0000 ZBW:ZNY
17/2349    BOS STOP VOLUME:VOLUME EXCL:NONE 2345-0015 ZNY:PHL
Joshua D | ZLA C1 — 02/10/2024 22:35
11/0330  LAS CANCEL ALL MIT ZLA:ZOA
";
    fs::write(dir.path().join("compact.txt"), compact).unwrap();

    let advisory = "\
Jeremy P | ZNY C1 — 03/28/2020 20:31
vATCSCC ADVZY 001 ZDC 03/29/2020 CDM GROUND STOP
CTL ELEMENT: DCA
ELEMENT TYPE: APT
IMPACTING CONDITION: VOLUME / VOLUME
290030-290115
20/03/29 00:31
";
    fs::write(dir.path().join("advisory.txt"), advisory).unwrap();

    // Empty file (no parseable entries)
    fs::write(dir.path().join("empty.txt"), "just chatter\n").unwrap();

    dir
}

fn flowpack_cmd() -> Command {
    Command::cargo_bin("flowpack").expect("binary exists")
}

// ============================================================================
// Basic functionality
// ============================================================================

#[test]
fn test_compact_to_jsonl() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 entries"));

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("\"message_type\":\"MIT\""));
    assert!(content.contains("\"message_type\":\"CANCEL\""));
}

#[test]
fn test_advisory_to_jsonl() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("advisory")
        .arg(dir.path().join("advisory.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 entries"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"message_type\":\"GROUND_STOP\""));
    assert!(content.contains("\"controlled_element\":\"DCA\""));
}

#[test]
fn test_source_aliases() {
    let dir = setup_fixtures();

    flowpack_cmd()
        .arg("ntml")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(dir.path().join("a.jsonl"))
        .assert()
        .success();

    flowpack_cmd()
        .arg("advzy")
        .arg(dir.path().join("advisory.txt"))
        .arg("-o")
        .arg(dir.path().join("b.jsonl"))
        .assert()
        .success();
}

// ============================================================================
// Output formats
// ============================================================================

#[test]
fn test_json_format() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}

#[test]
fn test_csv_format() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.csv");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--format")
        .arg("csv")
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("Type;Element"));
    assert!(content.contains("MIT;BOS;15MIT;MERIT"));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_type_filter() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--type")
        .arg("STOP")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries after filtering"));

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("STOP"));
}

#[test]
fn test_date_filter() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    // Only the 2024 CANCEL entry survives.
    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--after")
        .arg("2024-01-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries after filtering"));
}

#[test]
fn test_element_filter() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--element")
        .arg("BOS")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries after filtering"));
}

#[test]
fn test_invalid_date_filter_fails() {
    let dir = setup_fixtures();

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("--after")
        .arg("04/17/2020")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_invalid_type_filter_fails() {
    let dir = setup_fixtures();

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("--type")
        .arg("NOT_A_TYPE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown message type"));
}

// ============================================================================
// Audit flags
// ============================================================================

#[test]
fn test_raw_flag_includes_raw_text() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .arg("--raw")
        .arg("--context")
        .arg("--lines")
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("raw_text"));
    assert!(content.contains("Jeremy P"));
    assert!(content.contains("source_line"));
}

#[test]
fn test_audit_fields_absent_by_default() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("compact.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains("raw_text"));
    assert!(!content.contains("source_line"));
}

// ============================================================================
// Error handling and edge cases
// ============================================================================

#[test]
fn test_missing_input_file() {
    flowpack_cmd()
        .arg("compact")
        .arg("/no/such/file.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_unknown_source_rejected() {
    flowpack_cmd()
        .arg("telegram")
        .arg("whatever.txt")
        .assert()
        .failure();
}

#[test]
fn test_empty_input_produces_empty_output() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.jsonl");

    flowpack_cmd()
        .arg("compact")
        .arg(dir.path().join("empty.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 entries"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.is_empty());
}

#[test]
fn test_help_mentions_formats() {
    flowpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compact"))
        .stdout(predicate::str::contains("advisory"));
}

#[test]
fn test_version_flag() {
    flowpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flowpack"));
}
