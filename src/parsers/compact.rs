//! Compact Log parser.
//!
//! One physical line is one event: `DD/HHMM <body>`, where the body carries
//! the restriction itself plus a tail of machine-appendable fields (reason,
//! exclusions, validity range, requesting:providing facility pair). Client
//! software wraps long entries across lines with a trailing comma; the
//! segmenter rejoins them before parsing.
//!
//! Classification is an ordered first-match-wins rule list. The order is a
//! contract: more specific patterns (configuration reports, delay markers)
//! precede more general ones (the bare MIT fallback), and it is pinned by a
//! priority regression test.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::config::CompactConfig;
use crate::context::HeaderContext;
use crate::dates::{parse_hhmm, resolve_entry_date, resolve_time_range};
use crate::entry::{
    CancelDetail, DelayDetail, DelayDirection, DelayMagnitude, FlowControlDetail, FlowDirection,
    MessageType, MeteringDetail, ParsedEntry, ReasonCategory, Restriction, RestrictionUnit,
    RunwayConfigDetail, TypePayload,
};
use crate::error::FlowpackError;
use crate::parser::{Format, Parser};

/// Parser for the Compact Log format.
///
/// # Example
///
/// ```rust
/// use flowpack::parsers::CompactLogParser;
/// use flowpack::parser::Parser;
///
/// let parser = CompactLogParser::new();
/// let entries = parser.parse_str(
///     "Jeremy P | ZNY C1 — 04/17/2020 19:45\n\
///      17/2344    BOS via MERIT 15MIT VOLUME:VOLUME 2345-0000 ZBW:ZNY\n",
/// )?;
/// assert_eq!(entries.len(), 1);
/// # Ok::<(), flowpack::FlowpackError>(())
/// ```
pub struct CompactLogParser {
    config: CompactConfig,
}

impl CompactLogParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: CompactConfig::default(),
        }
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: CompactConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &CompactConfig {
        &self.config
    }
}

impl Default for CompactLogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-standing category labels that appear between entry groups.
const SECTION_LABELS: &[&str] = &[
    "MIT / MINIT",
    "MIT/MINIT",
    "Airport Configuration",
    "APP",
    "Delay",
];

/// Qualifier vocabulary, longest tokens first so that a longer match
/// shadows the token it contains (`EACH FIX` vs `EACH`).
const QUALIFIER_TOKENS: &[&str] = &[
    "PER AIRPORT",
    "PER STREAM",
    "PER ROUTE",
    "PER RTE",
    "SINGLE STREAM",
    "NO STACKS",
    "NO COMP",
    "EACH FIX",
    "AS ONE",
    "EACH",
    "RALT",
    "TUCK",
];

/// Compound tokens containing `STOP` that must not classify as a stop.
///
/// Only tokens actually observed in logs belong here; a new compound should
/// be added explicitly rather than widened into a pattern.
const STOP_COMPOUNDS: &[&str] = &["THUNDERSTOP"];

/// Keywords that can never be a requesting facility, so a trailing
/// `WORD:value` with one of these on the left is a field, not a pair.
const NOT_A_FACILITY: &[&str] = &[
    "VOLUME",
    "WEATHER",
    "RUNWAY",
    "OTHER",
    "NAVAID",
    "VOL",
    "EQUIPMENT",
    "TYPE",
    "SPD",
    "ALT",
    "EXCL",
    "AAR",
    "ADR",
];

/// All compiled patterns, built once.
struct Patterns {
    entry_start: Regex,
    entry_prefix: Regex,
    trailing_comma: Regex,
    noise_prefix: Regex,
    noise_prose: Regex,
    bot_code: Regex,
    facility_pair: Regex,
    time_range: Regex,
    exclusion: Regex,
    reason: Regex,
    reason_fallback: Regex,
    // classifier
    config_weather: Regex,
    delay_out: Regex,
    delay_in_enter: Regex,
    delay_in_exit: Regex,
    cfr_word: Regex,
    apreq_word: Regex,
    tbm_word: Regex,
    cancel_word: Regex,
    stop_word: Regex,
    minit_value: Regex,
    mit_value: Regex,
    mit_fallback: Regex,
    // sub-parsers
    mit_before_value: Regex,
    mit_after_value: Regex,
    via_split: Regex,
    type_qualifier: Regex,
    jets_word: Regex,
    spd_qualifier: Regex,
    alt_qualifier: Regex,
    strip_mit_tokens: Regex,
    strip_flow_words: Regex,
    flow_departures: Regex,
    flow_arrivals: Regex,
    stop_before: Regex,
    stop_reversed: Regex,
    stop_reversed_via: Regex,
    cfr_after: Regex,
    cfr_list_before: Regex,
    cfr_via: Regex,
    cfr_single: Regex,
    cfr_to: Regex,
    apreq_via: Regex,
    apreq_to: Regex,
    apreq_list: Regex,
    column_split: Regex,
    config_arr: Regex,
    config_dep: Regex,
    config_aar: Regex,
    config_adr: Regex,
    config_aar_adj: Regex,
    delay_facility: Regex,
    delay_lead_out: Regex,
    delay_lead_enter: Regex,
    delay_lead_exit: Regex,
    delay_report: Regex,
    delay_navaid: Regex,
    delay_fix: Regex,
    dd_for: Regex,
    dd_after: Regex,
    dd_before: Regex,
    ad_for: Regex,
    ed_to: Regex,
    tbm_lead: Regex,
    tbm_not_a_name: Regex,
    cancel_via_list: Regex,
    cancel_lead: Regex,
    cancel_target: Regex,
    any_via: Regex,
}

impl Patterns {
    fn get() -> &'static Patterns {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(Patterns::build)
    }

    fn build() -> Patterns {
        Patterns {
            entry_start: Regex::new(r"^\d{2}/\d{4}\s").unwrap(),
            entry_prefix: Regex::new(r"^(\d{2})/(\d{2})(\d{2})\s+(.+)$").unwrap(),
            trailing_comma: Regex::new(r",\s*$").unwrap(),
            noise_prefix: Regex::new(r"(?i)^(disregard|please stop|ATL no more|MIT over)").unwrap(),
            noise_prose: Regex::new(r"(?i)^Departure delay").unwrap(),
            bot_code: Regex::new(r"\s*\$\s*[A-Z0-9]+\s*$").unwrap(),
            facility_pair: Regex::new(
                r"\s+([A-Z][A-Z0-9]{0,4}):([A-Z][A-Z0-9]{0,5}(?:[,/]\s*[A-Z][A-Z0-9]{0,5})*)\s*$",
            )
            .unwrap(),
            time_range: Regex::new(r"\s+(\d{4})-(\d{4})\b").unwrap(),
            exclusion: Regex::new(r"\bEXCL:(\S+)").unwrap(),
            reason: Regex::new(
                r"(?i)\b(VOLUME|WEATHER|RUNWAY|OTHER|NAVAID|VOL|EQUIPMENT|EVENT):([A-Z][A-Z0-9_ ]*?)(?:(\s+EXCL:|\s+\d{4}-|\s+[A-Z]{2,5}:[A-Z])|\s*$)",
            )
            .unwrap(),
            reason_fallback: Regex::new(r"(?i)\b(VOLUME|WEATHER|RUNWAY|OTHER|NAVAID):(\S+)")
                .unwrap(),
            config_weather: Regex::new(r"\b(VMC|IMC|LVMC|LIMC)\b").unwrap(),
            delay_out: Regex::new(r"\bD/D\b").unwrap(),
            delay_in_enter: Regex::new(r"\bE/D\b").unwrap(),
            delay_in_exit: Regex::new(r"\bA/D\b").unwrap(),
            cfr_word: Regex::new(r"\bCFR\b").unwrap(),
            apreq_word: Regex::new(r"\bAPREQ\b").unwrap(),
            tbm_word: Regex::new(r"\bTBM\b").unwrap(),
            cancel_word: Regex::new(r"\bCANCELL?\b").unwrap(),
            stop_word: Regex::new(r"\bSTOP\b").unwrap(),
            minit_value: Regex::new(r"(\d+)\s*MINIT\b").unwrap(),
            mit_value: Regex::new(r"(\d+)\s*MIT\b").unwrap(),
            mit_fallback: Regex::new(r"\b(AOB|SPD:|ALT:)").unwrap(),
            mit_before_value: Regex::new(r"(?i)^(.*?)\d+\s*(MINIT|MIT)").unwrap(),
            mit_after_value: Regex::new(r"(?i)^.*?\d+\s*(?:MINIT|MIT)\b\s*(.*)$").unwrap(),
            via_split: Regex::new(r"(?i)^(.+?)\s+via\s+(.+)$").unwrap(),
            type_qualifier: Regex::new(r"(?i)\bTYPE:(JETS?|ALL|PROPS?)\b").unwrap(),
            jets_word: Regex::new(r"(?i)\bJETS\b").unwrap(),
            spd_qualifier: Regex::new(r"(?i)\bSPD:(=?\d+(?:KT)?)\b").unwrap(),
            alt_qualifier: Regex::new(r"(?i)(?:ALT:)?(AOB\s*(?:FL)?\d+)").unwrap(),
            strip_mit_tokens: Regex::new(
                r"(?i)\b(TYPE:\S+|JETS|PROPS?|SPD:\S+|ALT:\S+|AOB\s*(?:FL)?\d+)\b",
            )
            .unwrap(),
            strip_flow_words: Regex::new(r"(?i)\s*(arrivals?|departures?)\b").unwrap(),
            flow_departures: Regex::new(r"(?i)\bdepartures?\b").unwrap(),
            flow_arrivals: Regex::new(r"(?i)\barrivals?\b").unwrap(),
            stop_before: Regex::new(r"(?i)^(.+?)\s+STOP\b").unwrap(),
            stop_reversed: Regex::new(r"(?i)\bSTOP\s+([A-Z]{2,4})").unwrap(),
            stop_reversed_via: Regex::new(r"(?i)STOP\s+\w+\s+via\s+(\S+)").unwrap(),
            cfr_after: Regex::new(r"(?i)\bCFR\s+([A-Z]{2,4}(?:\s*,\s*[A-Z]{2,4})*)").unwrap(),
            cfr_list_before: Regex::new(
                r"(?i)^(?:All\s+)?([A-Z]{2,4}(?:[,\s]+[A-Z]{2,4})*)\s+(?:LTFC\s+)?CFR",
            )
            .unwrap(),
            cfr_via: Regex::new(
                r"(?i)^([A-Z]{2,4}(?:[,/]\s*[A-Z]{2,4})*)\s+(?:departures?\s+)?via\s+(\S+?)(?:\s+(?:STAR|departures?))?\s+(?:CANCEL\s+)?CFR",
            )
            .unwrap(),
            cfr_single: Regex::new(
                r"(?i)^([A-Z]{2,4})\s+(?:departures?\s+)?(?:via\s+\S+\s+)?(?:CANCEL\s+)?CFR",
            )
            .unwrap(),
            cfr_to: Regex::new(r"(?i)\bCFR\s+\w+\s+to\s+(.+)").unwrap(),
            apreq_via: Regex::new(r"(?i)\bAPREQ\s+(.+?)\s+(?:departures?\s+)?via\s+(\S+)")
                .unwrap(),
            apreq_to: Regex::new(r"(?i)\bAPREQ\s+(\S+)\s+to\s+(.+)").unwrap(),
            apreq_list: Regex::new(r"(?i)\bAPREQ\s+([A-Z]{2,4}(?:,[A-Z]{2,4})*)\b").unwrap(),
            column_split: Regex::new(r"\s{2,}").unwrap(),
            config_arr: Regex::new(r"(?i)ARR:(\S+(?:\s*[,/]\S+)*)").unwrap(),
            config_dep: Regex::new(r"(?i)DEP:(\S+(?:\s*[,/]\S+)*)").unwrap(),
            config_aar: Regex::new(r"(?i)AAR\((\w+)\):(\d+)").unwrap(),
            config_adr: Regex::new(r"(?i)\bADR:(\d+)").unwrap(),
            config_aar_adj: Regex::new(r"(?i)AAR Adjustment:([A-Z_ ]+)").unwrap(),
            delay_facility: Regex::new(r"(?i)^(\S+)\s+[EA]/D").unwrap(),
            delay_lead_out: Regex::new(r"(?i)D/D\s+from\s+(\w+)").unwrap(),
            delay_lead_enter: Regex::new(r"(?i)E/D\s+for\s+(\w+)").unwrap(),
            delay_lead_exit: Regex::new(r"(?i)A/D\s+to\s+(\w+)").unwrap(),
            delay_report: Regex::new(r"(?i)([+-]?)(Holding|\d+)/(\d{4})(?:/(\d+)\s*ACFT)?")
                .unwrap(),
            delay_navaid: Regex::new(r"(?i)NAVAID:(\S+)").unwrap(),
            delay_fix: Regex::new(r"(?i)FIX:(\S+)").unwrap(),
            dd_for: Regex::new(r"(?i)D/D\s+FOR\s+([A-Z]{2,4})\b").unwrap(),
            dd_after: Regex::new(r"(?i)D/D\s+([A-Z]{2,4})\b").unwrap(),
            dd_before: Regex::new(r"(?i)^([A-Z]{2,4})\s+D/D").unwrap(),
            ad_for: Regex::new(r"(?i)A/D\s+for\s+(\w+)").unwrap(),
            ed_to: Regex::new(r"(?i)E/D\s+to\s+([A-Z]{2,4})\b").unwrap(),
            tbm_lead: Regex::new(
                r"(?i)^([A-Z]{2,4}(?:[,\s]+[A-Z]{2,4})*)\s+(?:(?:departures?|CANCEL)\s+(?:to\s+\S+\s+)?)?TBM\s*(.*)",
            )
            .unwrap(),
            tbm_not_a_name: Regex::new(r"(?i)^(VOLUME|WEATHER|OTHER)").unwrap(),
            cancel_via_list: Regex::new(r"(?i)^([A-Z]{2,4}(?:[,+\s]+[A-Z]{2,4})*)\s+via\b")
                .unwrap(),
            cancel_lead: Regex::new(r"(?i)^([A-Z]{2,4})\s+CANCEL").unwrap(),
            cancel_target: Regex::new(
                r"(?i)CANCELL?\s+(ALL\s+)?(MIT|TMI|TMIS?|RESTR|RESTRICTIONS?|CFR|TBM|TBFM)",
            )
            .unwrap(),
            any_via: Regex::new(r"(?i)via\s+(\S+)").unwrap(),
        }
    }
}

/// Extracts the leading element code from a list like `MIA,FLL,RSW` or
/// `EWR+SATS`.
fn first_element(s: &str) -> Option<String> {
    let s = s.trim().to_uppercase();
    let s = s.split(['+', ',']).next().unwrap_or("");
    let s = s.split_whitespace().next().unwrap_or("");
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Returns `true` for a 2–4 letter element code with an optional digit tail
/// (`BOS`, `KJFK`, `ZJX3`).
fn is_element_code(token: &str) -> bool {
    let b = token.as_bytes();
    let alpha = match b.split_last() {
        Some((last, head)) if last.is_ascii_digit() => head,
        _ => b,
    };
    (2..=4).contains(&alpha.len()) && alpha.iter().all(u8::is_ascii_uppercase)
}

/// Parses an element list. `ALL ...` collapses to `["ALL"]`.
fn element_list(s: &str) -> Vec<String> {
    let s = s.trim().to_uppercase();
    if s == "ALL" || s.starts_with("ALL ") || s.starts_with("ALL,") {
        return vec!["ALL".to_string()];
    }
    s.split(|c: char| c == ',' || c == '+' || c.is_whitespace())
        .filter(|token| is_element_code(token))
        .map(str::to_string)
        .collect()
}

impl CompactLogParser {
    fn parse_content(&self, content: &str) -> Result<Vec<ParsedEntry>, FlowpackError> {
        let normalized = content.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        let p = Patterns::get();

        let mut entries = Vec::new();
        let mut context = HeaderContext::new();

        let mut i = 0;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            if trimmed.is_empty() || trimmed == "\u{a0}" {
                i += 1;
                continue;
            }
            if context.observe(trimmed) {
                i += 1;
                continue;
            }
            if self.is_noise(trimmed) {
                i += 1;
                continue;
            }

            if p.entry_start.is_match(trimmed) {
                let start_line = i + 1;
                let mut full_line = trimmed.to_string();
                // Rejoin comma-wrapped continuations.
                while p.trailing_comma.is_match(&full_line) && i + 1 < lines.len() {
                    i += 1;
                    let next = lines[i].trim();
                    if next.is_empty() {
                        break;
                    }
                    full_line.push(' ');
                    full_line.push_str(next);
                }
                if let Some(entry) = self.parse_entry_line(&full_line, start_line, &context) {
                    entries.push(entry);
                }
            }
            i += 1;
        }

        Ok(entries)
    }

    /// Detects non-entry lines: labels, interjections, bot echoes.
    ///
    /// Deliberately permissive — dropping an occasional malformed real entry
    /// is cheaper than emitting garbage structured output.
    fn is_noise(&self, line: &str) -> bool {
        if SECTION_LABELS.contains(&line) {
            return true;
        }
        if line.len() < self.config.min_line_len {
            return true;
        }
        let p = Patterns::get();
        if p.noise_prefix.is_match(line) || p.noise_prose.is_match(line) {
            return true;
        }
        if line.contains("(Notification:") {
            return true;
        }
        false
    }

    /// Evaluates the ordered classifier rules against an uppercased body.
    ///
    /// The order is a hard contract — do not reorder without updating the
    /// priority regression tests.
    fn classify(upper: &str) -> Option<MessageType> {
        let p = Patterns::get();
        let rules = [
            (
                p.config_weather.is_match(upper) && upper.contains("ARR:"),
                MessageType::Config,
            ),
            (p.delay_out.is_match(upper), MessageType::DelayOut),
            (p.delay_in_enter.is_match(upper), MessageType::DelayInEnter),
            (p.delay_in_exit.is_match(upper), MessageType::DelayInExit),
            (p.cfr_word.is_match(upper), MessageType::Cfr),
            (p.apreq_word.is_match(upper), MessageType::Apreq),
            (p.tbm_word.is_match(upper), MessageType::Tbm),
            (p.cancel_word.is_match(upper), MessageType::Cancel),
            (
                upper.contains("TYPE:PLANNING"),
                MessageType::PlanningNote,
            ),
            (
                p.stop_word.is_match(upper)
                    && !STOP_COMPOUNDS.iter().any(|c| upper.contains(c)),
                MessageType::Stop,
            ),
            (p.minit_value.is_match(upper), MessageType::Minit),
            (p.mit_value.is_match(upper), MessageType::Mit),
            (p.mit_fallback.is_match(upper), MessageType::Mit),
        ];
        rules.into_iter().find(|(hit, _)| *hit).map(|(_, ty)| ty)
    }

    fn parse_entry_line(
        &self,
        line: &str,
        source_line: usize,
        context: &HeaderContext,
    ) -> Option<ParsedEntry> {
        let p = Patterns::get();
        let caps = p.entry_prefix.captures(line)?;

        let entry_day: u32 = caps[1].parse().ok()?;
        let hh: u32 = caps[2].parse().ok()?;
        let mm: u32 = caps[3].parse().ok()?;
        let body = caps[4].trim().to_string();

        let base_date = context
            .date
            .and_then(|d| resolve_entry_date(d, entry_day, self.config.rollover_tolerance_days));
        let entry_time = NaiveTime::from_hms_opt(hh, mm, 0);

        let message_type = Self::classify(&body.to_uppercase())?;

        let mut entry = ParsedEntry::new(message_type, line, source_line, context.snapshot());
        entry.entry_time = entry_time;
        entry.entry_timestamp = match (base_date, entry_time) {
            (Some(d), Some(t)) => Some(d.and_time(t)),
            _ => None,
        };

        let leftover = self.extract_common_fields(&body, base_date, &mut entry);

        match message_type {
            MessageType::Mit | MessageType::Minit => {
                Self::parse_restriction(&leftover, &mut entry, message_type);
            }
            MessageType::Stop => Self::parse_stop(&leftover, &mut entry),
            MessageType::Apreq => Self::parse_apreq(&leftover, &mut entry),
            MessageType::Cfr => Self::parse_cfr(&leftover, &mut entry),
            MessageType::Tbm => Self::parse_metering(&leftover, &mut entry),
            MessageType::Config => Self::parse_runway_config(&leftover, &mut entry),
            MessageType::DelayOut | MessageType::DelayInEnter | MessageType::DelayInExit => {
                Self::parse_delay(&leftover, &mut entry, message_type);
            }
            MessageType::Cancel => Self::parse_cancel(&leftover, &mut entry),
            MessageType::PlanningNote => {
                entry.type_payload = Some(TypePayload::Planning {
                    note: leftover.clone(),
                });
            }
            _ => {}
        }

        entry.detect_element_kind();
        Some(entry)
    }

    /// Cursor-style extraction of the common tail fields.
    ///
    /// Operates on an owned working copy; `raw_text` is never touched. Each
    /// recognized fragment is captured and then removed from the copy, so
    /// later patterns cannot re-match it. The facility pair goes first — it
    /// is anchored to the end of the line and an earlier greedy pattern
    /// could otherwise split it.
    fn extract_common_fields(
        &self,
        body: &str,
        base_date: Option<NaiveDate>,
        entry: &mut ParsedEntry,
    ) -> String {
        let p = Patterns::get();
        let mut work = body.to_string();

        if self.config.strip_bot_codes {
            if let Some(found) = p.bot_code.find(&work).map(|m| m.start()) {
                work.truncate(found);
            }
        }

        let pair = p.facility_pair.captures(&work).and_then(|caps| {
            let requesting = caps[1].to_string();
            if NOT_A_FACILITY.contains(&requesting.as_str()) {
                return None;
            }
            let providing: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
            Some((requesting, providing, caps.get(0).unwrap().start()))
        });
        if let Some((requesting, providing, start)) = pair {
            entry.requesting_facility = Some(requesting);
            entry.providing_facility = Some(providing);
            work.truncate(start);
        }

        let range = p.time_range.captures(&work).map(|caps| {
            (
                caps[1].to_string(),
                caps[2].to_string(),
                caps.get(0).unwrap().range(),
            )
        });
        if let Some((start_hhmm, end_hhmm, span)) = range {
            if let Some(base) = base_date {
                if let Some((from, until)) = resolve_time_range(base, &start_hhmm, &end_hhmm) {
                    entry.valid_from = Some(from);
                    entry.valid_until = Some(until);
                }
            }
            work.replace_range(span, "");
        }

        let exclusion = p
            .exclusion
            .captures(&work)
            .map(|caps| (caps[1].to_string(), caps.get(0).unwrap().range()));
        if let Some((token, span)) = exclusion {
            entry.exclusions = Some(token);
            work.replace_range(span, "");
        }

        let reason = p.reason.captures(&work).map(|caps| {
            // Remove only the reason fragment, not the boundary that
            // terminated the lazy detail match.
            let end = caps.get(3).map_or(caps.get(0).unwrap().end(), |b| b.start());
            (
                caps[1].to_string(),
                caps[2].trim().to_string(),
                caps.get(0).unwrap().start()..end,
            )
        });
        if let Some((keyword, detail, span)) = reason {
            entry.reason_category =
                ReasonCategory::from_keyword(&keyword).or(Some(ReasonCategory::Other));
            if !detail.is_empty() {
                entry.reason_detail = Some(detail);
            }
            work.replace_range(span, "");
        } else {
            let fallback = p.reason_fallback.captures(&work).map(|caps| {
                (
                    caps[1].to_string(),
                    caps[2].trim().to_string(),
                    caps.get(0).unwrap().range(),
                )
            });
            if let Some((keyword, detail, span)) = fallback {
                entry.reason_category =
                    ReasonCategory::from_keyword(&keyword).or(Some(ReasonCategory::Other));
                entry.reason_detail = Some(detail);
                work.replace_range(span, "");
            }
        }

        work.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    // =========================================================================
    // Type-specific sub-parsers
    // =========================================================================

    fn parse_restriction(body: &str, entry: &mut ParsedEntry, message_type: MessageType) {
        let p = Patterns::get();
        let upper = body.to_uppercase();

        let (value_re, unit) = if message_type == MessageType::Minit {
            (&p.minit_value, RestrictionUnit::Minit)
        } else {
            (&p.mit_value, RestrictionUnit::Mit)
        };
        if let Some(caps) = value_re.captures(&upper) {
            if let Ok(value) = caps[1].parse() {
                entry.restriction = Some(Restriction { value, unit });
            }
        }

        let mut qualifiers: Vec<String> = Vec::new();
        for token in QUALIFIER_TOKENS {
            if upper.contains(token) && !qualifiers.iter().any(|q| q.contains(token)) {
                qualifiers.push((*token).to_string());
            }
        }
        if let Some(caps) = p.type_qualifier.captures(body) {
            qualifiers.push(format!("TYPE:{}", caps[1].to_uppercase()));
        } else if p.jets_word.is_match(body) {
            qualifiers.push("TYPE:JETS".to_string());
        }
        if let Some(caps) = p.spd_qualifier.captures(body) {
            qualifiers.push(format!("SPD:{}", caps[1].to_uppercase()));
        }
        if let Some(caps) = p.alt_qualifier.captures(body) {
            let alt: String = caps[1].to_uppercase().split_whitespace().collect();
            qualifiers.push(format!("ALT:{alt}"));
        }
        entry.qualifiers = qualifiers;

        // The element list usually precedes the restriction value; in the
        // value-first form ("15MIT EWR,LGA,JFK via BIGGY") it follows it.
        let clean = |text: &str| {
            let text = p.strip_mit_tokens.replace_all(text, "");
            let text = p.strip_flow_words.replace_all(&text, "");
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        let before = clean(
            p.mit_before_value
                .captures(body)
                .map_or(body, |caps| caps.get(1).unwrap().as_str()),
        );
        let source = if before.is_empty() {
            p.mit_after_value
                .captures(body)
                .map_or_else(String::new, |caps| clean(caps.get(1).unwrap().as_str()))
        } else {
            before
        };

        if let Some(caps) = p.via_split.captures(&source) {
            entry.controlled_element = first_element(&caps[1]);
            entry.reference_fix = Some(caps[2].trim().to_uppercase());
        } else {
            entry.controlled_element = first_element(&source);
        }
    }

    fn parse_stop(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();
        let mut detail = FlowControlDetail {
            flow: Self::flow_direction(body),
            ..FlowControlDetail::default()
        };

        if let Some(caps) = p.stop_before.captures(body) {
            let before = p.strip_flow_words.replace_all(&caps[1], "");
            let before = before.trim();
            if let Some(via) = p.via_split.captures(before) {
                entry.controlled_element = first_element(&via[1]);
                detail.airports = element_list(&via[1]);
                entry.reference_fix = Some(via[2].trim().to_uppercase());
            } else {
                entry.controlled_element = first_element(before);
                detail.airports = element_list(before);
            }
        }
        // Reversed form: "STOP BOS via MERIT"
        if entry.controlled_element.is_none() {
            if let Some(caps) = p.stop_reversed.captures(body) {
                entry.controlled_element = Some(caps[1].to_uppercase());
                if let Some(via) = p.stop_reversed_via.captures(body) {
                    entry.reference_fix = Some(via[1].to_uppercase());
                }
            }
        }

        entry.type_payload = Some(TypePayload::FlowControl(detail));
    }

    fn parse_cfr(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();
        let mut detail = FlowControlDetail {
            flow: Self::flow_direction(body),
            ..FlowControlDetail::default()
        };

        if let Some(caps) = p.cfr_after.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            detail.airports = element_list(&caps[1]);
        } else if let Some(caps) = p.cfr_list_before.captures(body) {
            let list = element_list(&caps[1]);
            entry.controlled_element = list.last().cloned().or_else(|| first_element(&caps[1]));
            detail.airports = list;
        } else if let Some(caps) = p.cfr_via.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            detail.airports = element_list(&caps[1]);
            entry.reference_fix = Some(caps[2].to_uppercase());
        } else if let Some(caps) = p.cfr_single.captures(body) {
            entry.controlled_element = Some(caps[1].to_uppercase());
        }

        if let Some(caps) = p.cfr_to.captures(body) {
            detail.destinations = caps[1]
                .to_uppercase()
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }

        entry.type_payload = Some(TypePayload::FlowControl(detail));
    }

    fn parse_apreq(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();
        let mut detail = FlowControlDetail {
            flow: Self::flow_direction(body),
            ..FlowControlDetail::default()
        };

        if let Some(caps) = p.apreq_via.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            detail.airports = element_list(&caps[1]);
            entry.reference_fix = Some(caps[2].trim().to_uppercase());
        } else if let Some(caps) = p.apreq_to.captures(body) {
            entry.controlled_element = Some(caps[1].trim().to_uppercase());
            detail.destinations = caps[2]
                .to_uppercase()
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        } else if let Some(caps) = p.apreq_list.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            detail.airports = element_list(&caps[1]);
        }

        entry.type_payload = Some(TypePayload::FlowControl(detail));
    }

    fn parse_metering(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();
        let mut detail = MeteringDetail::default();

        if let Some(caps) = p.tbm_lead.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            detail.airports = element_list(&caps[1]);
            let name = caps[2].trim();
            if !name.is_empty() && !p.tbm_not_a_name.is_match(name) {
                detail.program_name = Some(name.to_string());
            }
        }

        entry.type_payload = Some(TypePayload::Metering(detail));
    }

    fn parse_runway_config(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();

        // Columns are separated by runs of spaces (tab-like alignment);
        // fall back to plain whitespace when the alignment was lost.
        let mut parts: Vec<&str> = p.column_split.split(body).collect();
        if parts.len() < 3 {
            parts = body.splitn(5, char::is_whitespace).collect();
        }
        entry.controlled_element = parts.first().map(|s| s.trim().to_uppercase());

        let full = parts.join(" ");
        let mut detail = RunwayConfigDetail::default();

        if let Some(caps) = p.config_weather.captures(&full.to_uppercase()) {
            detail.weather = Some(caps[1].to_string());
        }
        if let Some(caps) = p.config_arr.captures(&full) {
            detail.arrival_runways = Some(caps[1].to_string());
        }
        if let Some(caps) = p.config_dep.captures(&full) {
            detail.departure_runways = Some(caps[1].to_string());
        }
        if let Some(caps) = p.config_aar.captures(&full) {
            detail.arrival_rate_basis = Some(caps[1].to_string());
            detail.arrival_rate = caps[2].parse().ok();
        }
        if let Some(caps) = p.config_adr.captures(&full) {
            detail.departure_rate = caps[1].parse().ok();
        }
        if let Some(caps) = p.config_aar_adj.captures(&full) {
            detail.rate_adjustment = Some(caps[1].trim().to_string());
        }

        entry.type_payload = Some(TypePayload::RunwayConfig(detail));
    }

    fn parse_delay(body: &str, entry: &mut ParsedEntry, message_type: MessageType) {
        let p = Patterns::get();

        // The report marker maps to a facility-relative preposition:
        // departures delay *from*, entering-holding *for*, arrivals *to*.
        let lead = match message_type {
            MessageType::DelayOut => &p.delay_lead_out,
            MessageType::DelayInEnter => &p.delay_lead_enter,
            _ => &p.delay_lead_exit,
        };

        if message_type != MessageType::DelayOut && entry.requesting_facility.is_none() {
            if let Some(caps) = p.delay_facility.captures(body) {
                entry.requesting_facility = Some(caps[1].to_uppercase());
            }
        }

        if let Some(caps) = lead.captures(body) {
            entry.controlled_element = Some(caps[1].to_uppercase());
        }

        if entry.controlled_element.is_none() {
            match message_type {
                MessageType::DelayOut => {
                    if let Some(caps) = p.dd_for.captures(body) {
                        entry.controlled_element = Some(caps[1].to_uppercase());
                    } else if let Some(caps) = p.dd_after.captures(body) {
                        entry.controlled_element = Some(caps[1].to_uppercase());
                    } else if let Some(caps) = p.dd_before.captures(body) {
                        entry.controlled_element = Some(caps[1].to_uppercase());
                    }
                }
                MessageType::DelayInExit => {
                    if let Some(caps) = p.ad_for.captures(body) {
                        entry.controlled_element = Some(caps[1].to_uppercase());
                    }
                }
                _ => {
                    if let Some(caps) = p.ed_to.captures(body) {
                        entry.controlled_element = Some(caps[1].to_uppercase());
                    }
                }
            }
        }

        if entry.controlled_element.is_none() {
            if let Some(caps) = p.delay_fix.captures(body) {
                entry.reference_fix = Some(caps[1].to_uppercase());
            }
        }

        let mut detail = DelayDetail::default();
        if let Some(caps) = p.delay_report.captures(body) {
            detail.direction = Some(match &caps[1] {
                "+" => DelayDirection::Increasing,
                "-" => DelayDirection::Decreasing,
                _ => DelayDirection::Steady,
            });
            detail.magnitude = if caps[2].eq_ignore_ascii_case("Holding") {
                Some(DelayMagnitude::Holding)
            } else {
                caps[2].parse().ok().map(DelayMagnitude::Minutes)
            };
            detail.measured_at = parse_hhmm(&caps[3]);
            detail.aircraft_count = caps.get(4).and_then(|c| c.as_str().parse().ok());
        }
        if let Some(caps) = p.delay_navaid.captures(body) {
            detail.navaid = Some(caps[1].to_uppercase());
        }

        entry.type_payload = Some(TypePayload::Delay(detail));
    }

    fn parse_cancel(body: &str, entry: &mut ParsedEntry) {
        let p = Patterns::get();

        if let Some(caps) = p.cancel_via_list.captures(body) {
            entry.controlled_element = first_element(&caps[1]);
            if let Some(via) = p.any_via.captures(body) {
                entry.reference_fix = Some(via[1].to_uppercase());
            }
        } else if let Some(caps) = p.cancel_lead.captures(body) {
            entry.controlled_element = Some(caps[1].to_uppercase());
        }

        let mut detail = CancelDetail::default();
        if let Some(caps) = p.cancel_target.captures(body) {
            detail.all = caps.get(1).is_some();
            detail.target = Some(caps[2].to_uppercase());
        }

        entry.type_payload = Some(TypePayload::Cancel(detail));
    }

    fn flow_direction(body: &str) -> Option<FlowDirection> {
        let p = Patterns::get();
        if p.flow_departures.is_match(body) {
            Some(FlowDirection::Departures)
        } else if p.flow_arrivals.is_match(body) {
            Some(FlowDirection::Arrivals)
        } else {
            None
        }
    }
}

impl Parser for CompactLogParser {
    fn name(&self) -> &'static str {
        "Compact Log"
    }

    fn format(&self) -> Format {
        Format::Compact
    }

    fn parse(&self, path: &Path) -> Result<Vec<ParsedEntry>, FlowpackError> {
        let content = fs::read_to_string(path)?;
        self.parse_content(&content)
    }

    fn parse_str(&self, content: &str) -> Result<Vec<ParsedEntry>, FlowpackError> {
        self.parse_content(content)
    }
}
