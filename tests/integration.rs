//! Integration tests for the format parsers with fixture files.

use std::fs;
use std::path::Path;
use std::sync::Once;

use flowpack::parser::{Format, create_parser};
use flowpack::prelude::*;

static INIT: Once = Once::new();

fn fixtures_dir() -> &'static str {
    "tests/fixtures"
}

fn ensure_fixtures() {
    INIT.call_once(|| {
        let dir = fixtures_dir();
        if !Path::new(dir).exists() {
            fs::create_dir_all(dir).unwrap();
        }

        // Compact log spanning several sessions, with a split header, a
        // comma continuation, and a relay-bot code.
        let compact = "\
Jeremy P | ZNY C1 — 04/17/2020 19:45
17/2344    BOS via MERIT 15MIT VOLUME:VOLUME EXCL:NONE 2345-0000 ZBW:ZNY
17/2349    BOS STOP VOLUME:VOLUME EXCL:NONE 2345-0015 ZNY:PHL
17/2350    BOS 8MINIT VOLUME:VOLUME EXCL:NONE 2330-0300 ZBW:CZY
Jeremy P | ZNY C1 — 04/17/2020 20:11
18/0010     D/D from JFK, +45/0010 VOLUME:VOLUME
18/0019    ZDC E/D for BOS, +30/0019/13 ACFT VOLUME:VOLUME
Jeremy P | ZNY C1 — 04/18/2020 18:21
18/2221    ATL    VMC    ARR:26R/27L/28 DEP:26L/27R    AAR(Strat):132    ADR:70
MIT / MINIT
APP
Joshua D | ZLA C1

 — 02/10/2024 16:08
10/2108    LAS via TYEGR 35MIT NO STACKS,
SINGLE STREAM EXCL:NONE VOLUME:SUPER BOWL 2359-0400 ZLA:ZDV $ 05B01A
disregard bot^
Joshua D | ZLA C1 — 02/10/2024 22:35
11/0330  LAS CANCEL ALL MIT ZLA:ZOA
";
        fs::write(format!("{dir}/compact.txt"), compact).unwrap();

        // Advisory log with one block of each type.
        let advisory = "\
Jeremy P | ZNY C1 — 03/28/2020 20:31
vATCSCC ADVZY 001 ZDC 03/29/2020 CDM GROUND STOP
CTL ELEMENT: DCA
ELEMENT TYPE: APT
GROUND STOP PERIOD: 29/0030Z - 29/0115Z
FLT INCL: ZNY DEPARTURES TO DCA
CURRENT TOTAL, MAXIMUM, AVERAGE DELAYS: 90/45/15
PROBABILITY OF EXTENSION: MEDIUM
IMPACTING CONDITION: VOLUME / VOLUME
COMMENTS:

290030-290115
20/03/29 00:31

Jeremy P | ZNY C1 — 03/28/2020 21:01
vATCSCC ADVZY 003 DCA 03/29/2020 CDM GS CNX
CTL ELEMENT: DCA
ELEMENT TYPE: APT
GS CNX PERIOD: 29/0026Z - 29/0100Z
COMMENTS: STOP WAVEY UNTIL 0145Z
290026-290100
20/03/29 01:00
Jeremy P | ZNY C1 — 04/17/2020 19:10
vATCSCC ADVZY 002 BOS/ZBW 04/17/2020 CDM GROUND DELAY PROGRAM
CTL ELEMENT: BOS
ELEMENT TYPE: APT
PROGRAM RATE: 28
FLT INCL: 1stTier+Canada
DELAY ASSIGNMENT TABLE APPLIES TO: ZNY/ZOB/ZDC/CZY
DELAY LIMIT: 600
AVERAGE DELAY: 75
IMPACTING CONDITION: VOLUME / VOLUME
172306-180300
20/04/17 23:06

Jeremy P | ZNY C1 — 02/28/2020 17:07
vATCSCC ADVZY 001 DCC 02/28/2020 ROUTE RQD
NAME: C90_TO_MSP
IMPACTED AREA: ZAU
REASON: OTHER
INCLUDE TRAFFIC: KORD/KMDW DEPARTURES TO KMSP
VALID: ETD 290030 TO 290500
FACILITIES INCLUDED: ZAU/ZMP
ROUTE:
ORIG    DEST    ROUTE
----    ----    -----
ORD     MSP     >PMPKN NEATO DLLAN RONIC KAMMA< KKILR3
MDW     MSP     >PEKUE OBENE MONNY MNOSO< BLUEM3

TMI ID: RRDCC001
290030-290500
20/02/28 22:06

Jeremy P | ZNY C1 — 04/02/2020 18:18
vATCSCC ADVZY 001 DCC 04/02/2020 OPERATIONS PLAN
EVENT TIME: 021500 - AND LATER
_________________________________________________________________________
THESE ARE THE TRAFFIC MANAGEMENT INITIATIVES
DISCUSSED ALREADY.
_________________________________________________________________________

TERMINAL ACTIVE:
NONE

021500-AND LATER
20/04/02 22:17
";
        fs::write(format!("{dir}/advisory.txt"), advisory).unwrap();
    });
}

fn parse_fixture(format: Format, name: &str) -> Vec<ParsedEntry> {
    ensure_fixtures();
    let parser = create_parser(format);
    parser
        .parse(Path::new(&format!("{}/{}", fixtures_dir(), name)))
        .unwrap()
}

// ============================================================================
// Compact Log
// ============================================================================

#[test]
fn test_compact_fixture_entry_sequence() {
    let entries = parse_fixture(Format::Compact, "compact.txt");
    let types: Vec<MessageType> = entries.iter().map(|e| e.message_type).collect();
    assert_eq!(
        types,
        vec![
            MessageType::Mit,
            MessageType::Stop,
            MessageType::Minit,
            MessageType::DelayOut,
            MessageType::DelayInEnter,
            MessageType::Config,
            MessageType::Mit,
            MessageType::Cancel,
        ]
    );
}

#[test]
fn test_compact_worked_example() {
    // The canonical MIT entry, end to end.
    let entries = parse_fixture(Format::Compact, "compact.txt");
    let e = &entries[0];
    assert_eq!(e.message_type, MessageType::Mit);
    assert_eq!(e.controlled_element.as_deref(), Some("BOS"));
    assert_eq!(e.element_kind, Some(ElementKind::Airport));
    assert_eq!(
        e.restriction,
        Some(Restriction {
            value: 15,
            unit: RestrictionUnit::Mit
        })
    );
    assert_eq!(e.reference_fix.as_deref(), Some("MERIT"));
    assert_eq!(e.reason_category, Some(ReasonCategory::Volume));
    assert_eq!(e.exclusions.as_deref(), Some("NONE"));
    assert_eq!(e.requesting_facility.as_deref(), Some("ZBW"));
    assert_eq!(e.providing_facility.as_deref(), Some("ZNY"));
    assert_eq!(e.valid_from.unwrap().to_string(), "2020-04-17 23:45:00");
    assert_eq!(e.valid_until.unwrap().to_string(), "2020-04-18 00:00:00");
}

#[test]
fn test_compact_context_snapshots_are_independent() {
    let entries = parse_fixture(Format::Compact, "compact.txt");
    // First session entries carry the ZNY header...
    assert_eq!(entries[0].context.facility.as_deref(), Some("ZNY C1"));
    // ...and later entries carry the ZLA header without disturbing earlier
    // snapshots.
    let cancel = entries.last().unwrap();
    assert_eq!(cancel.message_type, MessageType::Cancel);
    assert_eq!(cancel.context.author.as_deref(), Some("Joshua D"));
    assert_eq!(entries[0].context.author.as_deref(), Some("Jeremy P"));
}

#[test]
fn test_compact_split_header_and_continuation() {
    let entries = parse_fixture(Format::Compact, "compact.txt");
    let las = entries
        .iter()
        .find(|e| e.controlled_element.as_deref() == Some("LAS"))
        .unwrap();
    assert_eq!(las.message_type, MessageType::Mit);
    // Date came from the date-only continuation header line.
    assert_eq!(
        las.entry_timestamp.unwrap().to_string(),
        "2024-02-10 21:08:00"
    );
    // Qualifiers from both physical lines of the wrapped entry.
    assert!(las.qualifiers.contains(&"NO STACKS".to_string()));
    assert!(las.qualifiers.contains(&"SINGLE STREAM".to_string()));
    assert_eq!(las.reason_detail.as_deref(), Some("SUPER BOWL"));
}

#[test]
fn test_compact_raw_text_is_substring_of_input() {
    ensure_fixtures();
    let content = fs::read_to_string(format!("{}/compact.txt", fixtures_dir())).unwrap();
    let entries = parse_fixture(Format::Compact, "compact.txt");
    for entry in &entries {
        // Continuation-joined units are checked against their first line.
        let first_line = entry.raw_text.split(' ').next().unwrap();
        assert!(
            content.contains(first_line),
            "raw_text start {first_line:?} not found in input"
        );
    }
    // Single-line units must appear verbatim.
    assert!(content.contains(&entries[0].raw_text));
}

// ============================================================================
// Advisory Block
// ============================================================================

#[test]
fn test_advisory_fixture_entry_sequence() {
    let entries = parse_fixture(Format::Advisory, "advisory.txt");
    let types: Vec<MessageType> = entries.iter().map(|e| e.message_type).collect();
    assert_eq!(
        types,
        vec![
            MessageType::GroundStop,
            MessageType::Cancellation,
            MessageType::GroundDelayProgram,
            MessageType::Reroute,
            MessageType::General,
        ]
    );
}

#[test]
fn test_advisory_ground_stop_fields() {
    let entries = parse_fixture(Format::Advisory, "advisory.txt");
    let gs = &entries[0];
    assert_eq!(gs.controlled_element.as_deref(), Some("DCA"));
    assert_eq!(gs.element_kind, Some(ElementKind::Airport));
    assert_eq!(gs.valid_from.unwrap().to_string(), "2020-03-29 00:30:00");
    assert_eq!(gs.valid_until.unwrap().to_string(), "2020-03-29 01:15:00");
    assert_eq!(gs.entry_timestamp.unwrap().to_string(), "2020-03-29 00:31:00");

    let Some(TypePayload::Program(detail)) = &gs.type_payload else {
        panic!("expected program payload");
    };
    assert_eq!(detail.advisory_number.as_deref(), Some("001"));
    assert_eq!(detail.probability_of_extension.as_deref(), Some("MEDIUM"));
}

#[test]
fn test_advisory_gdp_fields() {
    let entries = parse_fixture(Format::Advisory, "advisory.txt");
    let gdp = &entries[2];
    let Some(TypePayload::Program(detail)) = &gdp.type_payload else {
        panic!("expected program payload");
    };
    assert_eq!(detail.program_rate, Some(28));
    assert_eq!(detail.delay_cap_minutes, Some(600));
    assert_eq!(detail.average_delay_minutes, Some(75));
    assert_eq!(detail.scope_centers, vec!["ZNY", "ZOB", "ZDC", "CZY"]);
    assert_eq!(detail.flights_included.as_deref(), Some("1stTier+Canada"));
}

#[test]
fn test_advisory_reroute_routes() {
    let entries = parse_fixture(Format::Advisory, "advisory.txt");
    let reroute = &entries[3];
    let Some(TypePayload::Reroute(detail)) = &reroute.type_payload else {
        panic!("expected reroute payload");
    };
    assert_eq!(detail.route_name.as_deref(), Some("C90_TO_MSP"));
    assert_eq!(detail.routes.len(), 2);
    assert_eq!(detail.routes[1].origins, "MDW");
    assert_eq!(detail.tmi_id.as_deref(), Some("RRDCC001"));
    // Element falls back to the traffic destination.
    assert_eq!(reroute.controlled_element.as_deref(), Some("MSP"));
    // Leap-day resolution from the 02/28 header.
    assert_eq!(
        reroute.valid_from.unwrap().to_string(),
        "2020-02-29 00:30:00"
    );
}

#[test]
fn test_advisory_general_body() {
    let entries = parse_fixture(Format::Advisory, "advisory.txt");
    let general = entries.last().unwrap();
    let Some(TypePayload::General(detail)) = &general.type_payload else {
        panic!("expected general payload");
    };
    assert_eq!(detail.subject.as_deref(), Some("OPERATIONS PLAN"));
    assert!(detail.body.contains("TERMINAL ACTIVE"));
}

// ============================================================================
// Cross-cutting properties
// ============================================================================

#[test]
fn test_parse_str_equals_parse_file() {
    ensure_fixtures();
    let content = fs::read_to_string(format!("{}/compact.txt", fixtures_dir())).unwrap();
    let parser = create_parser(Format::Compact);
    let from_str = parser.parse_str(&content).unwrap();
    let from_file = parse_fixture(Format::Compact, "compact.txt");
    assert_eq!(from_str, from_file);
}

#[test]
fn test_source_lines_are_increasing() {
    for format in [Format::Compact, Format::Advisory] {
        let name = match format {
            Format::Compact => "compact.txt",
            _ => "advisory.txt",
        };
        let entries = parse_fixture(format, name);
        let lines: Vec<usize> = entries.iter().map(|e| e.source_line).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted, "{format} output must be index-stable");
    }
}

#[test]
fn test_filters_compose_with_parsing() {
    let entries = parse_fixture(Format::Compact, "compact.txt");
    let config = FilterConfig::new()
        .with_message_type(MessageType::Mit)
        .with_element("BOS");
    let filtered = apply_filters(entries, &config);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].restriction.unwrap().value, 15);
}

#[test]
fn test_missing_file_is_io_error() {
    let parser = create_parser(Format::Compact);
    let err = parser.parse(Path::new("tests/fixtures/no_such_file.txt"));
    assert!(err.is_err());
    assert!(err.unwrap_err().is_io());
}
