//! Normalized record type for all coordination-log formats.
//!
//! This module provides [`ParsedEntry`], the structured representation of one
//! logical unit from a coordination log. Both format parsers convert their
//! native shapes into this structure, enabling uniform storage and querying.
//!
//! # Overview
//!
//! An entry consists of:
//! - **Required**: `message_type`, `raw_text`, `source_line`, `context`
//! - **Optional**: everything else — any field the source text did not carry
//!   is `None`, never an empty placeholder
//!
//! # Examples
//!
//! ```
//! use flowpack::entry::{EntryContext, MessageType, ParsedEntry};
//!
//! let entry = ParsedEntry::new(
//!     MessageType::Mit,
//!     "17/2344    BOS via MERIT 15MIT",
//!     2,
//!     EntryContext::default(),
//! );
//! assert_eq!(entry.message_type, MessageType::Mit);
//! assert!(entry.restriction.is_none());
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The closed set of message types an entry can classify as.
///
/// The first twelve variants belong to the Compact Log format, the last five
/// to the Advisory Block format. Classification is total: a unit that matches
/// none of the classifier rules produces no entry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// Miles-in-trail spacing restriction.
    Mit,
    /// Minutes-in-trail spacing restriction.
    Minit,
    /// Full stop of a flow (arrivals or departures).
    Stop,
    /// Approval-request departure release restriction.
    Apreq,
    /// Call-for-release departure restriction.
    Cfr,
    /// Time-based metering program.
    Tbm,
    /// Airport runway configuration report.
    Config,
    /// Departure delay report (`D/D`).
    DelayOut,
    /// Entering-holding delay report (`E/D`).
    DelayInEnter,
    /// Arrival holding delay report (`A/D`).
    DelayInExit,
    /// Cancellation of an earlier restriction.
    Cancel,
    /// Planning-section note.
    PlanningNote,
    /// Advisory: ground stop.
    GroundStop,
    /// Advisory: ground delay program (or airspace flow program).
    GroundDelayProgram,
    /// Advisory: cancellation of a ground stop / GDP.
    Cancellation,
    /// Advisory: required or recommended reroute.
    Reroute,
    /// Advisory: general message (operations plan, hotline, informational).
    General,
}

impl MessageType {
    /// Returns `true` for the Advisory Block family of types.
    pub fn is_advisory(self) -> bool {
        matches!(
            self,
            MessageType::GroundStop
                | MessageType::GroundDelayProgram
                | MessageType::Cancellation
                | MessageType::Reroute
                | MessageType::General
        )
    }

    /// Returns `true` for the three delay-report types.
    pub fn is_delay(self) -> bool {
        matches!(
            self,
            MessageType::DelayOut | MessageType::DelayInEnter | MessageType::DelayInExit
        )
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MessageType::Mit => "MIT",
            MessageType::Minit => "MINIT",
            MessageType::Stop => "STOP",
            MessageType::Apreq => "APREQ",
            MessageType::Cfr => "CFR",
            MessageType::Tbm => "TBM",
            MessageType::Config => "CONFIG",
            MessageType::DelayOut => "DELAY_OUT",
            MessageType::DelayInEnter => "DELAY_IN_ENTER",
            MessageType::DelayInExit => "DELAY_IN_EXIT",
            MessageType::Cancel => "CANCEL",
            MessageType::PlanningNote => "PLANNING_NOTE",
            MessageType::GroundStop => "GROUND_STOP",
            MessageType::GroundDelayProgram => "GROUND_DELAY_PROGRAM",
            MessageType::Cancellation => "CANCELLATION",
            MessageType::Reroute => "REROUTE",
            MessageType::General => "GENERAL",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MIT" => Ok(MessageType::Mit),
            "MINIT" => Ok(MessageType::Minit),
            "STOP" => Ok(MessageType::Stop),
            "APREQ" => Ok(MessageType::Apreq),
            "CFR" => Ok(MessageType::Cfr),
            "TBM" => Ok(MessageType::Tbm),
            "CONFIG" => Ok(MessageType::Config),
            "DELAY_OUT" => Ok(MessageType::DelayOut),
            "DELAY_IN_ENTER" => Ok(MessageType::DelayInEnter),
            "DELAY_IN_EXIT" => Ok(MessageType::DelayInExit),
            "CANCEL" => Ok(MessageType::Cancel),
            "PLANNING_NOTE" => Ok(MessageType::PlanningNote),
            "GROUND_STOP" => Ok(MessageType::GroundStop),
            "GROUND_DELAY_PROGRAM" => Ok(MessageType::GroundDelayProgram),
            "CANCELLATION" => Ok(MessageType::Cancellation),
            "REROUTE" => Ok(MessageType::Reroute),
            "GENERAL" => Ok(MessageType::General),
            _ => Err(format!("Unknown message type: '{s}'")),
        }
    }
}

/// Header context captured at parse time.
///
/// A value snapshot, not a live reference: later header lines in the document
/// never retroactively change entries already emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContext {
    /// Author of the surrounding chat-export header, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub author: Option<String>,

    /// Facility/position string from the header, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub facility: Option<String>,

    /// Date of the most recent header line, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub header_date: Option<NaiveDate>,
}

/// Inferred category of a controlled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    /// An airport (3-letter code or 4-letter ICAO).
    Airport,
    /// An en-route center (ARTCC), `Z` + two letters.
    Center,
    /// A terminal approach facility, letter + two digits (N90, A80).
    Tracon,
    /// A flow-constrained/evaluation area (`FCA`/`FEA` prefix).
    Fca,
    /// An airway (`J`/`V`/`Q`/`T` + digits).
    Airway,
    /// A 5-letter named fix.
    Fix,
    /// A comma-separated list of elements.
    Multi,
    /// Anything unrecognized.
    Other,
}

impl ElementKind {
    /// Infers the kind of an element identifier.
    ///
    /// Heuristic only — the parser does not validate that a code is real.
    pub fn detect(element: &str) -> Option<ElementKind> {
        let e = element.trim().to_uppercase();
        if e.is_empty() {
            return None;
        }
        if e.contains(',') {
            return Some(ElementKind::Multi);
        }
        let bytes = e.as_bytes();
        let all_alpha = bytes.iter().all(u8::is_ascii_uppercase);
        if e.len() == 3 && all_alpha && bytes[0] == b'Z' {
            return Some(ElementKind::Center);
        }
        if e.starts_with("FCA") || e.starts_with("FEA") {
            return Some(ElementKind::Fca);
        }
        if matches!(bytes[0], b'J' | b'V' | b'Q' | b'T')
            && e.len() > 1
            && bytes[1..].iter().all(u8::is_ascii_digit)
        {
            return Some(ElementKind::Airway);
        }
        if e.len() == 5 && all_alpha {
            return Some(ElementKind::Fix);
        }
        if e.len() == 3 && bytes[0].is_ascii_uppercase() && bytes[1..].iter().all(u8::is_ascii_digit)
        {
            return Some(ElementKind::Tracon);
        }
        if e.len() == 3 && all_alpha && e != "ALL" {
            return Some(ElementKind::Airport);
        }
        if e.len() == 4 && all_alpha && matches!(bytes[0], b'K' | b'P' | b'C' | b'T' | b'Y') {
            return Some(ElementKind::Airport);
        }
        Some(ElementKind::Other)
    }
}

/// Unit of a spacing restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionUnit {
    /// Miles in trail.
    Mit,
    /// Minutes in trail.
    Minit,
}

/// A spacing restriction value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub value: u32,
    pub unit: RestrictionUnit,
}

/// Classified cause of a restriction or program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCategory {
    Volume,
    Weather,
    Runway,
    Equipment,
    Navaid,
    Event,
    Other,
}

impl ReasonCategory {
    /// Maps a reason keyword from the log text to its category.
    ///
    /// `VOL` is an observed shorthand for `VOLUME`. Unknown keywords map to
    /// `None` (the caller keeps them as free text).
    pub fn from_keyword(word: &str) -> Option<ReasonCategory> {
        match word.to_uppercase().as_str() {
            "VOLUME" | "VOL" => Some(ReasonCategory::Volume),
            "WEATHER" | "WX" => Some(ReasonCategory::Weather),
            "RUNWAY" | "RWY" => Some(ReasonCategory::Runway),
            "EQUIPMENT" => Some(ReasonCategory::Equipment),
            "NAVAID" => Some(ReasonCategory::Navaid),
            "EVENT" => Some(ReasonCategory::Event),
            "OTHER" => Some(ReasonCategory::Other),
            _ => None,
        }
    }
}

/// Direction of a delay trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayDirection {
    /// `+` — delay increasing / being initiated.
    Increasing,
    /// `-` — delay decreasing / being terminated.
    Decreasing,
    /// No sign — steady state report.
    Steady,
}

/// Magnitude of a reported delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayMagnitude {
    /// Delay in minutes.
    Minutes(u32),
    /// Aircraft are holding; no minute figure applies.
    Holding,
}

/// Arrival/departure flow marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    Arrivals,
    Departures,
}

/// Details of a delay report (`D/D`, `E/D`, `A/D`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub direction: Option<DelayDirection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub magnitude: Option<DelayMagnitude>,

    /// Clock time the delay was measured at (`+45/0010` → 00:10).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub measured_at: Option<NaiveTime>,

    /// Number of aircraft affected, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub aircraft_count: Option<u32>,

    /// Navaid/stream annotation (`NAVAID:OMN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub navaid: Option<String>,
}

/// Details of an airport configuration report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayConfigDetail {
    /// Weather category token (VMC, IMC, LVMC, LIMC).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub weather: Option<String>,

    /// Arrival runway string as logged (`26R/27L/28`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub arrival_runways: Option<String>,

    /// Departure runway string as logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub departure_runways: Option<String>,

    /// Airport arrival rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub arrival_rate: Option<u32>,

    /// Basis annotation of the arrival rate (`AAR(Strat):132` → `Strat`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub arrival_rate_basis: Option<String>,

    /// Airport departure rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub departure_rate: Option<u32>,

    /// Free-text rate adjustment annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub rate_adjustment: Option<String>,
}

/// Details of a STOP / APREQ / CFR flow-control entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowControlDetail {
    /// All element codes named by the entry (first one is `controlled_element`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub airports: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub flow: Option<FlowDirection>,

    /// Destination list of a `to ...` clause.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub destinations: Vec<String>,
}

/// Details of a time-based metering entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringDetail {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub airports: Vec<String>,

    /// Metering program name (`3_WEST`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub program_name: Option<String>,
}

/// Details of a compact-log cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelDetail {
    /// What is being rescinded (MIT, TMI, CFR, TBM, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<String>,

    /// `true` for the `CANCEL ALL ...` form.
    #[serde(default)]
    pub all: bool,
}

/// Cumulative delay statistics reported by a ground-stop advisory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayStats {
    pub total: u32,
    pub maximum: u32,
    pub average: u32,
}

/// Details of a ground-stop or ground-delay-program advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub advisory_number: Option<String>,

    /// Facility the advisory was issued for (header field, not the author).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub issuing_facility: Option<String>,

    /// Program rate (first value of a multi-hour table).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub program_rate: Option<u32>,

    /// Full hourly rate table, when given as `42 / 42 / 48 / ...`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub hourly_rates: Vec<u32>,

    /// Maximum delay any flight may be assigned, in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub delay_cap_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub average_delay_minutes: Option<u32>,

    /// Centers the delay assignment table applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub scope_centers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub departure_scope: Option<String>,

    /// `FLT INCL` / flight-status scope text (`1stTier+Canada`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub flights_included: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub probability_of_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comments: Option<String>,

    /// Current total/maximum/average delays, for ground stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub delays: Option<DelayStats>,
}

/// One row of a reroute advisory's route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRow {
    /// Origin airport(s), space-separated as logged.
    pub origins: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub destinations: Option<String>,

    /// Route string with continuation lines rejoined.
    pub route: String,
}

/// Details of a reroute advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerouteDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub advisory_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub issuing_facility: Option<String>,

    /// Route playbook name (`C90_TO_MSP`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub route_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub impacted_area: Option<String>,

    /// Origin side of `INCLUDE TRAFFIC` (`KORD/KMDW` or `ALL`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub traffic_from: Option<String>,

    /// Destination side of `INCLUDE TRAFFIC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub traffic_to: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub facilities: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub routes: Vec<RouteRow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub tmi_id: Option<String>,

    /// FCA identifier when the advisory targets a flow-constrained area.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub fca_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub probability_of_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub remarks: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comments: Option<String>,
}

/// Details of an advisory cancelling an earlier program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub advisory_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub issuing_facility: Option<String>,

    /// Kind of program being cancelled (GS, GDP), from the header phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reference_kind: Option<String>,

    /// Cancelled period as logged (`29/0026Z - 29/0100Z`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cancelled_period: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comments: Option<String>,
}

/// Details of a general advisory (operations plan, hotline, informational).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub advisory_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub issuing_facility: Option<String>,

    /// Subject, taken from the header type phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub subject: Option<String>,

    /// Body text with structural fields removed.
    pub body: String,
}

/// Type-specific payload of an entry.
///
/// Which variant appears is a function of `message_type`; the closed shapes
/// here replace the original system's ad hoc optional-key maps, making the
/// field set per type a compile-time fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypePayload {
    Delay(DelayDetail),
    RunwayConfig(RunwayConfigDetail),
    FlowControl(FlowControlDetail),
    Metering(MeteringDetail),
    Cancel(CancelDetail),
    Planning { note: String },
    Program(ProgramDetail),
    Reroute(RerouteDetail),
    Cancellation(CancellationDetail),
    General(GeneralDetail),
}

/// A normalized coordination-log entry from any supported format.
///
/// This struct is the core data type in flowpack. Both format parsers convert
/// their native message shapes into this universal representation.
///
/// # Invariants
///
/// - `raw_text` is the original unit text, losslessly reproducible from the
///   source document (after continuation joining).
/// - Every entry has exactly one `message_type`.
/// - `context` is a snapshot: it reflects the headers seen *before* the unit,
///   and never changes after the entry is built.
/// - Optional fields are `None` when absent, never empty strings.
///
/// # Serialization
///
/// Implements `Serialize`/`Deserialize`; optional fields are omitted from
/// JSON when `None`, and empty token sets are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// Classified type of the entry.
    pub message_type: MessageType,

    /// Original unmodified unit text (audit trail).
    pub raw_text: String,

    /// 1-based line number where the unit starts in the input.
    pub source_line: usize,

    /// Header context in effect when the unit was parsed.
    pub context: EntryContext,

    /// Airport or airspace element the entry concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub controlled_element: Option<String>,

    /// Inferred category of `controlled_element`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub element_kind: Option<ElementKind>,

    /// Start of the validity window, when a time range was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub valid_from: Option<NaiveDateTime>,

    /// End of the validity window.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub valid_until: Option<NaiveDateTime>,

    /// Resolved timestamp of the log line itself.
    ///
    /// Only present when a header date was available to resolve the unit's
    /// own day-of-month against.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub entry_timestamp: Option<NaiveDateTime>,

    /// Clock time of the unit's own prefix, kept even when no header date
    /// has been seen and `entry_timestamp` cannot be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub entry_time: Option<NaiveTime>,

    /// Spacing restriction value and unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub restriction: Option<Restriction>,

    /// Fix(es)/airway the restriction applies via, as logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reference_fix: Option<String>,

    /// Facility that requested the restriction.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub requesting_facility: Option<String>,

    /// Facility (or facility list) providing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub providing_facility: Option<String>,

    /// Classified cause category.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reason_category: Option<ReasonCategory>,

    /// Free-text cause elaboration (`VOLUME:SUPER BOWL` → `SUPER BOWL`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reason_detail: Option<String>,

    /// `EXCL:` token, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub exclusions: Option<String>,

    /// Normalized applicability qualifiers (`NO STACKS`, `PER STREAM`, ...).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub qualifiers: Vec<String>,

    /// Type-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub type_payload: Option<TypePayload>,
}

impl ParsedEntry {
    /// Creates an entry with only the required fields; everything else `None`.
    pub fn new(
        message_type: MessageType,
        raw_text: impl Into<String>,
        source_line: usize,
        context: EntryContext,
    ) -> Self {
        Self {
            message_type,
            raw_text: raw_text.into(),
            source_line,
            context,
            controlled_element: None,
            element_kind: None,
            valid_from: None,
            valid_until: None,
            entry_timestamp: None,
            entry_time: None,
            restriction: None,
            reference_fix: None,
            requesting_facility: None,
            providing_facility: None,
            reason_category: None,
            reason_detail: None,
            exclusions: None,
            qualifiers: Vec::new(),
            type_payload: None,
        }
    }

    /// Returns `true` if the entry carries a resolved validity window.
    pub fn has_time_window(&self) -> bool {
        self.valid_from.is_some() && self.valid_until.is_some()
    }

    /// Fills `element_kind` from `controlled_element` if not already set.
    pub(crate) fn detect_element_kind(&mut self) {
        if self.element_kind.is_none() {
            if let Some(ref element) = self.controlled_element {
                self.element_kind = ElementKind::detect(element);
            }
        }
    }
}
