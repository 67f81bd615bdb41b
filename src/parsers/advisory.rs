//! Advisory Block parser.
//!
//! Advisories are multi-line bulletins. A block opens with a header of the
//! form `<org> ADVZY <nnn> <facility> [MM/DD/YYYY] <type phrase>` and runs
//! until the next such header or end of input. The body is mostly `KEY:
//! VALUE` lines (indented lines continue the previous value), optionally an
//! embedded fixed-column route table, then a `DDHHMM-DDHHMM` validity footer
//! and a `YY/MM/DD HH:MM` signature line.
//!
//! Blank lines inside a block are body content — advisory bodies use them as
//! section separators — and are preserved. Surrounding chat-export headers
//! are consumed by the context tracker and never enter a block.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::config::AdvisoryConfig;
use crate::context::HeaderContext;
use crate::dates::{parse_header_date, resolve_day_time};
use crate::entry::{
    CancellationDetail, DelayStats, ElementKind, GeneralDetail, MessageType, ParsedEntry,
    ProgramDetail, ReasonCategory, RerouteDetail, RouteRow, TypePayload,
};
use crate::error::FlowpackError;
use crate::parser::{Format, Parser};

/// Parser for the Advisory Block format.
///
/// # Example
///
/// ```rust
/// use flowpack::parsers::AdvisoryParser;
/// use flowpack::parser::Parser;
///
/// let parser = AdvisoryParser::new();
/// let entries = parser.parse_str(
///     "vATCSCC ADVZY 001 ZDC 03/29/2020 CDM GROUND STOP\n\
///      CTL ELEMENT: DCA\n\
///      290030-290115\n",
/// )?;
/// assert_eq!(entries.len(), 1);
/// # Ok::<(), flowpack::FlowpackError>(())
/// ```
pub struct AdvisoryParser {
    config: AdvisoryConfig,
    header_start: Regex,
    header_full: Regex,
}

impl AdvisoryParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(AdvisoryConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: AdvisoryConfig) -> Self {
        let org = regex::escape(&config.organization);
        let header_start = Regex::new(&format!(r"(?i)^{org}\s+ADVZY\s+")).unwrap();
        let header_full = Regex::new(&format!(
            r"(?i)^{org}\s+ADVZY\s+(\d{{3}})\s+(\S+)\s+(?:(\d{{2}}/\d{{2}}/\d{{4}})\s+)?(.+)$"
        ))
        .unwrap();
        Self {
            config,
            header_start,
            header_full,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &AdvisoryConfig {
        &self.config
    }
}

impl Default for AdvisoryParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsed advisory header line.
struct AdvisoryHeader {
    number: String,
    facility: String,
    date: Option<NaiveDate>,
    message_type: MessageType,
    /// The raw type phrase, e.g. `CDM GROUND STOP`, `ROUTE RQD`.
    subtype: String,
}

/// Ordered key/value pairs of an advisory body.
struct KvPairs(Vec<(String, String)>);

impl KvPairs {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    fn find_containing(&self, fragment: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.contains(fragment))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    fn find_containing_all(&self, fragments: &[&str]) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| fragments.iter().all(|f| k.contains(f)))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

struct Patterns {
    kv_line: Regex,
    kv_separator: Regex,
    kv_continuation: Regex,
    traffic_to: Regex,
    traffic_all: Regex,
    valid_range: Regex,
    valid_for: Regex,
    delay_triplet: Regex,
    first_number: Regex,
    table_header: Regex,
    table_separator: Regex,
    table_exclusion: Regex,
    table_row3: Regex,
    table_row2: Regex,
    table_end_tmi: Regex,
    footer_range: Regex,
    footer_and_later: Regex,
    footer_effective: Regex,
    footer_effective_long: Regex,
    signature: Regex,
    tmi_id: Regex,
}

impl Patterns {
    fn get() -> &'static Patterns {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(Patterns::build)
    }

    fn build() -> Patterns {
        Patterns {
            kv_line: Regex::new(r"(?i)^([A-Z][A-Z\s\-/,()]+?)[\s.]*:\s*(.*)$").unwrap(),
            kv_separator: Regex::new(r"^[-_=]{3,}").unwrap(),
            kv_continuation: Regex::new(r"^\s{2,}(\S.*)$").unwrap(),
            traffic_to: Regex::new(r"(?i)^(.+?)\s+DEPARTURES?\s+TO\s+(.+)$").unwrap(),
            traffic_all: Regex::new(r"(?i)^ALL\s+DEPARTURES?\s+(?:THROUGH|TO|VIA)\s+(.+)$")
                .unwrap(),
            valid_range: Regex::new(r"(?i)(?:ETD\s+)?(\d{6})\s*TO\s*(\d{6})").unwrap(),
            valid_for: Regex::new(r"(?i)VALID\s+FOR\s+(\d{6})\s+THROUGH\s+(\d{6})").unwrap(),
            delay_triplet: Regex::new(r"(\d+)\s*[/,]\s*(\d+)\s*[/,]\s*(\d+)").unwrap(),
            first_number: Regex::new(r"(\d+)").unwrap(),
            table_header: Regex::new(r"(?i)^ORIG\s+DEST\s+ROUTE").unwrap(),
            table_separator: Regex::new(r"^-{4}\s+-{4}\s+-{4,}").unwrap(),
            table_exclusion: Regex::new(r"^-[A-Z]{2,4}\s").unwrap(),
            table_row3: Regex::new(
                r"^([A-Z][A-Z0-9]{1,3}(?:\s+[A-Z][A-Z0-9]{1,3})*)\s{2,}([A-Z][A-Z0-9]{1,3}(?:\s*[/,]\s*[A-Z]{2,4})*)\s{2,}(.+)$",
            )
            .unwrap(),
            table_row2: Regex::new(r"^([A-Z][A-Z0-9]{1,3}(?:\s+[A-Z][A-Z0-9]{1,3})*)\s{2,}(.+)$")
                .unwrap(),
            table_end_tmi: Regex::new(r"(?i)^TMI ID:").unwrap(),
            footer_range: Regex::new(r"^(\d{6})\s*-\s*(\d{6})").unwrap(),
            footer_and_later: Regex::new(r"(?i)^(\d{6})\s*[-\s]+AND\s+LATER").unwrap(),
            footer_effective: Regex::new(r"(?i)EFFECTIVE TIME:\s*(\d{6})\s*-\s*(\d{6})").unwrap(),
            footer_effective_long: Regex::new(
                r"(?i)EFFECTIVE TIME:\s*(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2})",
            )
            .unwrap(),
            signature: Regex::new(r"^(\d{2})/(\d{2})/(\d{2})\s+(\d{2}):(\d{2})").unwrap(),
            tmi_id: Regex::new(r"(?i)TMI ID:\s*(\S+)").unwrap(),
        }
    }
}

/// Maps the header type phrase to a message type.
///
/// Ordered first-match-wins over phrase fragments: cancellation phrases must
/// precede the generic ground-stop and ground-delay phrases they contain.
fn classify_type_phrase(phrase: &str) -> MessageType {
    const CANCELLATION: &[&str] = &[
        "CANCEL GROUND STOP",
        "CDM GS CNX",
        "CDM GROUND DELAY PROGRAM CNX",
    ];
    const GROUND_STOP: &[&str] = &["CDM GROUND STOP", "GROUND STOP"];
    const GROUND_DELAY: &[&str] = &[
        "CDM GROUND DELAY",
        "CDM PROPOSED GROUND DELAY",
        "GDP",
        "CDM AIRSPACE FLOW",
        "AFP",
    ];
    const REROUTE: &[&str] = &["ROUTE", "FCA"];

    let tables = [
        (CANCELLATION, MessageType::Cancellation),
        (GROUND_STOP, MessageType::GroundStop),
        (GROUND_DELAY, MessageType::GroundDelayProgram),
        (REROUTE, MessageType::Reroute),
    ];
    for (phrases, message_type) in tables {
        if phrases.iter().any(|p| phrase.contains(p)) {
            return message_type;
        }
    }
    MessageType::General
}

fn element_kind_from_label(label: &str) -> Option<ElementKind> {
    match label.to_uppercase().as_str() {
        "APT" | "ARPT" | "AIRPORT" => Some(ElementKind::Airport),
        "ARTCC" | "CENTER" | "CTR" => Some(ElementKind::Center),
        "TRACON" => Some(ElementKind::Tracon),
        "FCA" | "FEA" => Some(ElementKind::Fca),
        "AIRWAY" | "AWY" => Some(ElementKind::Airway),
        "FIX" => Some(ElementKind::Fix),
        "" => None,
        _ => Some(ElementKind::Other),
    }
}

/// Splits an `IMPACTING CONDITION: VOLUME / VOLUME` value into category and
/// detail.
fn split_reason(value: &str) -> (Option<ReasonCategory>, Option<String>) {
    let mut parts = value.splitn(2, '/');
    let head = parts.next().unwrap_or("").trim();
    let tail = parts.next().map(str::trim).filter(|t| !t.is_empty());
    match ReasonCategory::from_keyword(head) {
        Some(category) => (
            Some(category),
            tail.map(str::to_string)
                .or_else(|| Some(head.to_string())),
        ),
        None => (Some(ReasonCategory::Other), Some(value.trim().to_string())),
    }
}

impl AdvisoryParser {
    fn parse_content(&self, content: &str) -> Result<Vec<ParsedEntry>, FlowpackError> {
        let normalized = content.replace("\r\n", "\n");
        let mut entries = Vec::new();
        let mut context = HeaderContext::new();

        let mut block: Vec<String> = Vec::new();
        let mut block_start = 0usize;
        let mut block_context = HeaderContext::new();

        for (idx, raw_line) in normalized.split('\n').enumerate() {
            let raw = raw_line.trim_end();
            let trimmed = raw.trim();

            // Transport artifacts, not content.
            if trimmed == "?" || trimmed == "\u{a0}" {
                continue;
            }
            if trimmed.is_empty() {
                // Blank lines are body content inside a block, noise outside.
                if !block.is_empty() {
                    block.push(String::new());
                }
                continue;
            }
            if context.observe(trimmed) {
                continue;
            }

            if self.header_start.is_match(trimmed) {
                if !block.is_empty() {
                    if let Some(entry) = self.parse_block(&block, block_start, &block_context) {
                        entries.push(entry);
                    }
                }
                block = vec![trimmed.to_string()];
                block_start = idx + 1;
                block_context = context.clone();
                continue;
            }

            if !block.is_empty() {
                block.push(raw.to_string());
            }
        }

        if !block.is_empty() {
            if let Some(entry) = self.parse_block(&block, block_start, &block_context) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    fn parse_advisory_header(&self, line: &str) -> Option<AdvisoryHeader> {
        let caps = self.header_full.captures(line)?;
        let subtype = caps[4].trim().to_uppercase();
        Some(AdvisoryHeader {
            number: caps[1].to_string(),
            facility: caps[2].to_string(),
            date: caps.get(3).and_then(|m| parse_header_date(m.as_str())),
            message_type: classify_type_phrase(&subtype),
            subtype,
        })
    }

    fn parse_block(
        &self,
        lines: &[String],
        block_start: usize,
        context: &HeaderContext,
    ) -> Option<ParsedEntry> {
        let header = self.parse_advisory_header(&lines[0])?;
        let raw_text = lines.join("\n");
        let header_date = header.date.or(context.date);

        let mut entry = ParsedEntry::new(
            header.message_type,
            raw_text,
            block_start,
            context.snapshot(),
        );

        let body = &lines[1..];
        let kv = Self::parse_kv(body);

        Self::apply_common_kv(&mut entry, &kv);

        let payload = match header.message_type {
            MessageType::GroundStop | MessageType::GroundDelayProgram => {
                TypePayload::Program(Self::build_program(&kv, &header))
            }
            MessageType::Cancellation => {
                TypePayload::Cancellation(Self::build_cancellation(&kv, &header))
            }
            MessageType::Reroute => {
                let detail = self.build_reroute(&kv, body, &header, header_date, &mut entry);
                TypePayload::Reroute(detail)
            }
            _ => {
                let detail = self.build_general(body, &header, header_date, &mut entry);
                TypePayload::General(detail)
            }
        };
        entry.type_payload = Some(payload);

        self.parse_footer(body, header_date, &mut entry);
        entry.detect_element_kind();
        Some(entry)
    }

    /// Parses `KEY: VALUE` body lines. Indented lines continue the previous
    /// value; a non-KV line ends the run (it may be table or prose content).
    fn parse_kv(lines: &[String]) -> KvPairs {
        let p = Patterns::get();
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut last_key: Option<usize> = None;

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || p.kv_separator.is_match(trimmed) {
                continue;
            }

            if let Some(caps) = p.kv_line.captures(line) {
                let key = caps[1].trim().to_uppercase();
                let value = caps[2].trim().to_string();
                if let Some(existing) = pairs.iter().position(|(k, _)| *k == key) {
                    pairs[existing].1 = value;
                    last_key = Some(existing);
                } else {
                    pairs.push((key, value));
                    last_key = Some(pairs.len() - 1);
                }
                continue;
            }

            if let Some(idx) = last_key {
                if let Some(caps) = p.kv_continuation.captures(line) {
                    let continuation = caps[1].trim();
                    let value = &mut pairs[idx].1;
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(continuation);
                    continue;
                }
            }

            last_key = None;
        }

        KvPairs(pairs)
    }

    fn apply_common_kv(entry: &mut ParsedEntry, kv: &KvPairs) {
        if let Some(element) = kv.get("CTL ELEMENT") {
            entry.controlled_element = Some(element.to_uppercase());
        }
        if let Some(label) = kv.get("ELEMENT TYPE") {
            entry.element_kind = element_kind_from_label(label);
        }
        if let Some(condition) = kv.find_containing("IMPACTING CONDITION") {
            let (category, detail) = split_reason(condition);
            entry.reason_category = category;
            entry.reason_detail = detail;
        }
        if entry.reason_category.is_none() {
            if let Some(reason) = kv.get("REASON") {
                let (category, detail) = split_reason(reason);
                entry.reason_category = category;
                entry.reason_detail = detail;
            }
        }
    }

    fn build_program(kv: &KvPairs, header: &AdvisoryHeader) -> ProgramDetail {
        let p = Patterns::get();
        let mut detail = ProgramDetail {
            advisory_number: Some(header.number.clone()),
            issuing_facility: Some(header.facility.clone()),
            ..ProgramDetail::default()
        };

        if let Some(rate) = kv
            .get("PROGRAM RATE")
            .or_else(|| kv.get("ANTICIPATED PROGRAM RATE"))
        {
            detail.program_rate = p
                .first_number
                .captures(rate)
                .and_then(|caps| caps[1].parse().ok());
            if rate.contains('/') {
                detail.hourly_rates = rate
                    .split('/')
                    .filter_map(|r| r.trim().parse().ok())
                    .collect();
            }
        }

        if let Some(limit) = kv
            .find_containing("DELAY LIMIT")
            .or_else(|| kv.find_containing("MAXIMUM DELAY"))
        {
            let digits: String = limit.chars().filter(char::is_ascii_digit).collect();
            detail.delay_cap_minutes = digits.parse().ok().filter(|v| *v > 0);
        }

        if let Some(avg) = kv.get("AVERAGE DELAY") {
            let digits: String = avg.chars().filter(char::is_ascii_digit).collect();
            detail.average_delay_minutes = digits.parse().ok().filter(|v| *v > 0);
        }

        if let Some(scope) = kv.find_containing("DELAY ASSIGNMENT TABLE") {
            detail.scope_centers = scope
                .to_uppercase()
                .split(|c: char| c == '/' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(scope) = kv
            .find_containing("DEP FACILITIES")
            .or_else(|| kv.find_containing("DEPARTURE SCOPE"))
        {
            detail.departure_scope = Some(scope.to_string());
        }

        if let Some(included) = kv.get("FLT INCL").or_else(|| kv.get("FLIGHT STATUS")) {
            detail.flights_included = Some(included.to_string());
        }

        if let Some(probability) = kv.find_containing("PROBABILITY") {
            detail.probability_of_extension = Some(probability.to_uppercase());
        }

        if let Some(comments) = kv.get("COMMENTS") {
            detail.comments = Some(comments.to_string());
        }

        if let Some(delays) = kv.find_containing_all(&["DELAYS", "CURRENT"]) {
            if let Some(caps) = p.delay_triplet.captures(delays) {
                detail.delays = Some(DelayStats {
                    total: caps[1].parse().unwrap_or(0),
                    maximum: caps[2].parse().unwrap_or(0),
                    average: caps[3].parse().unwrap_or(0),
                });
            }
        }

        detail
    }

    fn build_cancellation(kv: &KvPairs, header: &AdvisoryHeader) -> CancellationDetail {
        let reference_kind = if header.subtype.contains("GDP")
            || header.subtype.contains("GROUND DELAY")
        {
            Some("GDP".to_string())
        } else if header.subtype.contains("GS") || header.subtype.contains("GROUND STOP") {
            Some("GS".to_string())
        } else {
            None
        };

        CancellationDetail {
            advisory_number: Some(header.number.clone()),
            issuing_facility: Some(header.facility.clone()),
            reference_kind,
            cancelled_period: kv.find_containing("CNX PERIOD").map(str::to_string),
            comments: kv.get("COMMENTS").map(str::to_string),
        }
    }

    fn build_reroute(
        &self,
        kv: &KvPairs,
        body: &[String],
        header: &AdvisoryHeader,
        header_date: Option<NaiveDate>,
        entry: &mut ParsedEntry,
    ) -> RerouteDetail {
        let p = Patterns::get();
        let mut detail = RerouteDetail {
            advisory_number: Some(header.number.clone()),
            issuing_facility: Some(header.facility.clone()),
            route_name: kv.get("NAME").map(str::to_string),
            impacted_area: kv
                .find_containing("IMPACTED AREA")
                .or_else(|| kv.find_containing("CONSTRAINED AREA"))
                .map(|v| v.to_uppercase()),
            probability_of_extension: kv
                .find_containing("PROBABILITY")
                .map(|v| v.to_uppercase()),
            remarks: kv.get("REMARKS").map(str::to_string),
            comments: kv.get("COMMENTS").map(str::to_string),
            ..RerouteDetail::default()
        };

        if let Some(traffic) = kv.get("INCLUDE TRAFFIC") {
            let value = traffic.to_uppercase();
            if let Some(caps) = p.traffic_all.captures(&value) {
                detail.traffic_from = Some("ALL".to_string());
                detail.traffic_to = Some(caps[1].trim().to_string());
            } else if let Some(caps) = p.traffic_to.captures(&value) {
                detail.traffic_from = Some(caps[1].trim().to_string());
                detail.traffic_to = Some(caps[2].trim().to_string());
            } else {
                detail.traffic_from = Some(value);
            }
        }

        if let Some(valid) = kv.get("VALID") {
            if let (Some(caps), Some(base)) = (p.valid_range.captures(valid), header_date) {
                entry.valid_from =
                    resolve_day_time(base, &caps[1], self.config.rollover_tolerance_days);
                entry.valid_until =
                    resolve_day_time(base, &caps[2], self.config.rollover_tolerance_days);
            }
        }

        if let Some(facilities) = kv.find_containing("FACILITIES INCLUDED") {
            detail.facilities = facilities
                .to_uppercase()
                .split('/')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect();
        }

        detail.routes = Self::parse_route_table(body);

        if header.subtype.contains("FCA") {
            detail.fca_id = detail.route_name.clone();
        }

        for line in body {
            if let Some(caps) = p.tmi_id.captures(line) {
                detail.tmi_id = Some(caps[1].to_string());
                break;
            }
        }

        // The controlled element defaults to the traffic destination with
        // any ICAO prefix letter dropped.
        if entry.controlled_element.is_none() {
            if let Some(to) = &detail.traffic_to {
                let dest = to.strip_prefix('K').unwrap_or(to);
                if !dest.is_empty() {
                    entry.controlled_element = Some(dest.to_string());
                }
            }
        }

        detail
    }

    /// Parses the `ORIG DEST ROUTE` fixed-column table. Route strings may
    /// continue onto indented lines; `-XXX` exclusion rows attach to the
    /// current route.
    fn parse_route_table(body: &[String]) -> Vec<RouteRow> {
        fn flush(current: &mut Option<RouteRow>, routes: &mut Vec<RouteRow>) {
            if let Some(mut row) = current.take() {
                row.route = row.route.trim().to_string();
                if !row.route.is_empty() {
                    routes.push(row);
                }
            }
        }

        let p = Patterns::get();
        let mut routes = Vec::new();
        let mut in_table = false;
        let mut current: Option<RouteRow> = None;
        let mut last_destinations: Option<String> = None;

        for line in body {
            let trimmed = line.trim();

            if p.table_header.is_match(trimmed) || p.table_separator.is_match(trimmed) {
                in_table = true;
                continue;
            }
            if !in_table {
                continue;
            }

            if trimmed.is_empty() {
                // Blank line separates route groups.
                flush(&mut current, &mut routes);
                continue;
            }

            if p.table_end_tmi.is_match(trimmed)
                || p.footer_range.is_match(trimmed)
                || p.signature.is_match(trimmed)
            {
                flush(&mut current, &mut routes);
                break;
            }

            if p.table_exclusion.is_match(trimmed) {
                if let Some(row) = current.as_mut() {
                    row.route.push(' ');
                    row.route.push_str(trimmed);
                }
                continue;
            }

            if let Some(caps) = p.table_row3.captures(trimmed) {
                flush(&mut current, &mut routes);
                last_destinations = Some(caps[2].trim().to_string());
                current = Some(RouteRow {
                    origins: caps[1].trim().to_string(),
                    destinations: last_destinations.clone(),
                    route: caps[3].trim().to_string(),
                });
            } else if let Some(caps) = p.table_row2.captures(trimmed) {
                // Two-column row: a shared destination carries over from the
                // previous full row.
                flush(&mut current, &mut routes);
                current = Some(RouteRow {
                    origins: caps[1].trim().to_string(),
                    destinations: last_destinations.clone(),
                    route: caps[2].trim().to_string(),
                });
            } else if let Some(row) = current.as_mut() {
                row.route.push(' ');
                row.route.push_str(trimmed);
            }
        }

        flush(&mut current, &mut routes);
        routes
    }

    fn build_general(
        &self,
        body: &[String],
        header: &AdvisoryHeader,
        header_date: Option<NaiveDate>,
        entry: &mut ParsedEntry,
    ) -> GeneralDetail {
        let p = Patterns::get();

        // `VALID FOR ddhhmm THROUGH ddhhmm` inside the prose carries the
        // validity window for informational advisories.
        for line in body {
            if let Some(caps) = p.valid_for.captures(line) {
                if let Some(base) = header_date {
                    entry.valid_from =
                        resolve_day_time(base, &caps[1], self.config.rollover_tolerance_days);
                    entry.valid_until =
                        resolve_day_time(base, &caps[2], self.config.rollover_tolerance_days);
                }
                break;
            }
        }

        // Body text proper starts after the first blank line; footer and
        // signature lines are structural, not content.
        let mut started = false;
        let mut parts: Vec<&str> = Vec::new();
        for line in body {
            let trimmed = line.trim();
            if !started {
                if trimmed.is_empty() {
                    started = true;
                }
                continue;
            }
            if trimmed.is_empty()
                || p.footer_range.is_match(trimmed)
                || p.footer_and_later.is_match(trimmed)
                || p.signature.is_match(trimmed)
            {
                continue;
            }
            parts.push(trimmed);
        }
        let text = if parts.is_empty() {
            body.iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            parts.join("\n")
        };

        GeneralDetail {
            advisory_number: Some(header.number.clone()),
            issuing_facility: Some(header.facility.clone()),
            subject: Some(header.subtype.clone()),
            body: text,
        }
    }

    /// Resolves the validity footer and the signature timestamp.
    ///
    /// Fields already filled (e.g. from a `VALID` key) are never overwritten.
    fn parse_footer(
        &self,
        body: &[String],
        header_date: Option<NaiveDate>,
        entry: &mut ParsedEntry,
    ) {
        let p = Patterns::get();
        let tolerance = self.config.rollover_tolerance_days;

        if entry.valid_from.is_none() || entry.valid_until.is_none() {
            let tail_start = body.len().saturating_sub(10);
            for line in &body[tail_start..] {
                let trimmed = line.trim();
                let clean: String = trimmed
                    .chars()
                    .filter(|c| *c != '{' && *c != '}')
                    .collect();

                if let Some(caps) = p.footer_range.captures(&clean) {
                    if let Some(base) = header_date {
                        if entry.valid_from.is_none() {
                            entry.valid_from = resolve_day_time(base, &caps[1], tolerance);
                        }
                        if entry.valid_until.is_none() {
                            entry.valid_until = resolve_day_time(base, &caps[2], tolerance);
                        }
                    }
                    break;
                }
                if let Some(caps) = p.footer_and_later.captures(trimmed) {
                    if let (Some(base), None) = (header_date, entry.valid_from) {
                        entry.valid_from = resolve_day_time(base, &caps[1], tolerance);
                    }
                    break;
                }
                if let Some(caps) = p.footer_effective.captures(trimmed) {
                    if let Some(base) = header_date {
                        if entry.valid_from.is_none() {
                            entry.valid_from = resolve_day_time(base, &caps[1], tolerance);
                        }
                        if entry.valid_until.is_none() {
                            entry.valid_until = resolve_day_time(base, &caps[2], tolerance);
                        }
                    }
                    break;
                }
                if let Some(caps) = p.footer_effective_long.captures(trimmed) {
                    let (month, day, year) = (
                        caps[1].parse().unwrap_or(0),
                        caps[2].parse().unwrap_or(0),
                        caps[3].parse().unwrap_or(0),
                    );
                    let (hh, mm) = (caps[4].parse().unwrap_or(0), caps[5].parse().unwrap_or(0));
                    entry.valid_from = NaiveDate::from_ymd_opt(year, month, day)
                        .and_then(|d| d.and_hms_opt(hh, mm, 0));
                    break;
                }
            }
        }

        // Signature line: the advisory's own issue timestamp.
        let tail_start = body.len().saturating_sub(5);
        for line in &body[tail_start..] {
            if let Some(caps) = p.signature.captures(line.trim()) {
                let year = 2000 + caps[1].parse::<i32>().unwrap_or(0);
                let timestamp: Option<NaiveDateTime> =
                    NaiveDate::from_ymd_opt(year, caps[2].parse().unwrap_or(0), caps[3].parse().unwrap_or(0))
                        .and_then(|d| {
                            d.and_hms_opt(caps[4].parse().unwrap_or(0), caps[5].parse().unwrap_or(0), 0)
                        });
                if let Some(ts) = timestamp {
                    entry.entry_timestamp = Some(ts);
                    entry.entry_time = Some(ts.time());
                }
                break;
            }
        }
    }
}

impl Parser for AdvisoryParser {
    fn name(&self) -> &'static str {
        "Advisory Block"
    }

    fn format(&self) -> Format {
        Format::Advisory
    }

    fn parse(&self, path: &Path) -> Result<Vec<ParsedEntry>, FlowpackError> {
        let content = fs::read_to_string(path)?;
        self.parse_content(&content)
    }

    fn parse_str(&self, content: &str) -> Result<Vec<ParsedEntry>, FlowpackError> {
        self.parse_content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<ParsedEntry> {
        AdvisoryParser::new().parse_str(content).unwrap()
    }

    const GROUND_STOP: &str = "\
Jeremy P | ZNY C1 — 03/28/2020 20:31
vATCSCC ADVZY 001 ZDC 03/29/2020 CDM GROUND STOP
CTL ELEMENT: DCA
ELEMENT TYPE: APT
ADL TIME: 0031Z
GROUND STOP PERIOD: 29/0030Z - 29/0115Z
FLT INCL: ZNY DEPARTURES TO DCA
CURRENT TOTAL, MAXIMUM, AVERAGE DELAYS: 90/45/15
PROBABILITY OF EXTENSION: MEDIUM
IMPACTING CONDITION: VOLUME / VOLUME
COMMENTS:

290030-290115
20/03/29 00:31
";

    #[test]
    fn test_parser_name() {
        let parser = AdvisoryParser::new();
        assert_eq!(parser.name(), "Advisory Block");
        assert_eq!(parser.format(), Format::Advisory);
    }

    #[test]
    fn test_ground_stop_block() {
        let entries = parse(GROUND_STOP);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.message_type, MessageType::GroundStop);
        assert_eq!(e.controlled_element.as_deref(), Some("DCA"));
        assert_eq!(e.element_kind, Some(ElementKind::Airport));
        assert_eq!(e.reason_category, Some(ReasonCategory::Volume));
        assert_eq!(e.context.author.as_deref(), Some("Jeremy P"));
        assert_eq!(e.source_line, 2);

        let Some(TypePayload::Program(detail)) = &e.type_payload else {
            panic!("expected program payload");
        };
        assert_eq!(detail.advisory_number.as_deref(), Some("001"));
        assert_eq!(detail.issuing_facility.as_deref(), Some("ZDC"));
        assert_eq!(detail.probability_of_extension.as_deref(), Some("MEDIUM"));
        assert_eq!(detail.flights_included.as_deref(), Some("ZNY DEPARTURES TO DCA"));
        assert_eq!(
            detail.delays,
            Some(DelayStats {
                total: 90,
                maximum: 45,
                average: 15
            })
        );

        // Footer resolves against the advisory header date.
        assert_eq!(e.valid_from.unwrap().to_string(), "2020-03-29 00:30:00");
        assert_eq!(e.valid_until.unwrap().to_string(), "2020-03-29 01:15:00");
        // Signature line.
        assert_eq!(
            e.entry_timestamp.unwrap().to_string(),
            "2020-03-29 00:31:00"
        );
    }

    #[test]
    fn test_gdp_block() {
        let doc = "\
vATCSCC ADVZY 002 BOS/ZBW 04/17/2020 CDM GROUND DELAY PROGRAM
CTL ELEMENT: BOS
ELEMENT TYPE: APT
DELAY ASSIGNMENT MODE: DAS
PROGRAM RATE: 28
POP-UP FACTOR: HIGH
FLT INCL: 1stTier+Canada
DEPARTURE SCOPE: (1stTier)
DELAY ASSIGNMENT TABLE APPLIES TO: ZNY/ZOB/ZDC/CZY
DELAY LIMIT: 600
MAXIMUM DELAY: 600
AVERAGE DELAY: 75
IMPACTING CONDITION: VOLUME / VOLUME
COMMENTS: THE GDP ENCOMPASSES THE PRECOORDINATED RELEASES PER HOUR REQUESTED
          BY ZBW. THIS ADVZY IS FOR RECORD-KEEPING PURPOSES ONLY.
172306-180300
20/04/17 23:06
";
        let e = &parse(doc)[0];
        assert_eq!(e.message_type, MessageType::GroundDelayProgram);
        assert_eq!(e.controlled_element.as_deref(), Some("BOS"));

        let Some(TypePayload::Program(detail)) = &e.type_payload else {
            panic!("expected program payload");
        };
        assert_eq!(detail.program_rate, Some(28));
        assert!(detail.hourly_rates.is_empty());
        assert_eq!(detail.delay_cap_minutes, Some(600));
        assert_eq!(detail.average_delay_minutes, Some(75));
        assert_eq!(detail.scope_centers, vec!["ZNY", "ZOB", "ZDC", "CZY"]);
        assert_eq!(detail.departure_scope.as_deref(), Some("(1stTier)"));
        // Continuation line folded into the comments value.
        assert!(detail.comments.as_deref().unwrap().contains("RECORD-KEEPING"));

        assert_eq!(e.valid_from.unwrap().to_string(), "2020-04-17 23:06:00");
        assert_eq!(e.valid_until.unwrap().to_string(), "2020-04-18 03:00:00");
    }

    #[test]
    fn test_hourly_program_rate() {
        let doc = "\
vATCSCC ADVZY 010 EWR 04/17/2020 CDM GROUND DELAY PROGRAM
CTL ELEMENT: EWR
PROGRAM RATE: 42 / 42 / 48 / 48 / 55
172000-180200
";
        let e = &parse(doc)[0];
        let Some(TypePayload::Program(detail)) = &e.type_payload else {
            panic!("expected program payload");
        };
        assert_eq!(detail.program_rate, Some(42));
        assert_eq!(detail.hourly_rates, vec![42, 42, 48, 48, 55]);
    }

    #[test]
    fn test_cancellation_block() {
        let doc = "\
vATCSCC ADVZY 003 DCA 03/29/2020 CDM GS CNX
CTL ELEMENT: DCA
ELEMENT TYPE: APT
GS CNX PERIOD: 29/0026Z - 29/0100Z
COMMENTS: STOP WAVEY UNTIL 0145Z
290026-290100
20/03/29 01:00
";
        let e = &parse(doc)[0];
        assert_eq!(e.message_type, MessageType::Cancellation);
        assert_eq!(e.controlled_element.as_deref(), Some("DCA"));
        let Some(TypePayload::Cancellation(detail)) = &e.type_payload else {
            panic!("expected cancellation payload");
        };
        assert_eq!(detail.reference_kind.as_deref(), Some("GS"));
        assert_eq!(
            detail.cancelled_period.as_deref(),
            Some("29/0026Z - 29/0100Z")
        );
        assert_eq!(detail.comments.as_deref(), Some("STOP WAVEY UNTIL 0145Z"));
    }

    #[test]
    fn test_cancellation_precedes_ground_stop_phrase() {
        // "CANCEL GROUND STOP" contains "GROUND STOP"; the cancellation
        // phrases must win.
        assert_eq!(
            classify_type_phrase("CANCEL GROUND STOP"),
            MessageType::Cancellation
        );
        assert_eq!(
            classify_type_phrase("CDM GROUND DELAY PROGRAM CNX"),
            MessageType::Cancellation
        );
        assert_eq!(classify_type_phrase("CDM GROUND STOP"), MessageType::GroundStop);
        assert_eq!(
            classify_type_phrase("CDM GROUND DELAY PROGRAM"),
            MessageType::GroundDelayProgram
        );
        assert_eq!(classify_type_phrase("ROUTE RQD"), MessageType::Reroute);
        assert_eq!(
            classify_type_phrase("OPERATIONS PLAN"),
            MessageType::General
        );
        assert_eq!(classify_type_phrase("HOTLINE UPDATE"), MessageType::General);
    }

    #[test]
    fn test_reroute_block_with_table() {
        let doc = "\
Jeremy P | ZNY C1 — 02/28/2020 17:07
vATCSCC ADVZY 001 DCC 02/28/2020 ROUTE RQD
NAME: C90_TO_MSP
IMPACTED AREA: ZAU
REASON: OTHER
INCLUDE TRAFFIC: KORD/KMDW DEPARTURES TO KMSP
VALID: ETD 290030 TO 290500
FACILITIES INCLUDED: ZAU/ZMP
PROBABILITY OF EXTENSION: LOW
REMARKS:
ROUTE:
ORIG    DEST    ROUTE
----    ----    -----
ORD     MSP     >PMPKN NEATO DLLAN RONIC KAMMA< KKILR3
MDW     MSP     >PEKUE OBENE MONNY MNOSO< BLUEM3

TMI ID: RRDCC001
290030-290500
20/02/28 22:06
";
        let e = &parse(doc)[0];
        assert_eq!(e.message_type, MessageType::Reroute);

        let Some(TypePayload::Reroute(detail)) = &e.type_payload else {
            panic!("expected reroute payload");
        };
        assert_eq!(detail.route_name.as_deref(), Some("C90_TO_MSP"));
        assert_eq!(detail.impacted_area.as_deref(), Some("ZAU"));
        assert_eq!(detail.traffic_from.as_deref(), Some("KORD/KMDW"));
        assert_eq!(detail.traffic_to.as_deref(), Some("KMSP"));
        assert_eq!(detail.facilities, vec!["ZAU", "ZMP"]);
        assert_eq!(detail.tmi_id.as_deref(), Some("RRDCC001"));
        assert_eq!(detail.routes.len(), 2);
        assert_eq!(detail.routes[0].origins, "ORD");
        assert_eq!(detail.routes[0].destinations.as_deref(), Some("MSP"));
        assert!(detail.routes[0].route.contains("PMPKN"));

        // No CTL ELEMENT key: the element falls back to the traffic
        // destination, ICAO prefix dropped.
        assert_eq!(e.controlled_element.as_deref(), Some("MSP"));
        assert_eq!(e.reason_category, Some(ReasonCategory::Other));

        // VALID beats the footer.
        assert_eq!(e.valid_from.unwrap().to_string(), "2020-02-29 00:30:00");
        assert_eq!(e.valid_until.unwrap().to_string(), "2020-02-29 05:00:00");
    }

    #[test]
    fn test_route_continuation_lines_rejoined() {
        let doc = "\
vATCSCC ADVZY 004 DCC 04/18/2020 ROUTE FYI
NAME: NE_TO_ATL_PARTIAL
INCLUDE TRAFFIC: KJFK/KEWR/KLGA DEPARTURES TO KATL
ROUTE:
ORIG    DEST    ROUTE
----    ----    -----
JFK     ATL     WAVEY EMJAY J174 ORF J121 BARTL KAATT
                Q172 YUTEE SKWKR JJEDI2
EWR LGA ATL     WHITE J209 SBY J79 KATZN J193 WEAVR

182300-190300
20/04/18 19:26
";
        let e = &parse(doc)[0];
        let Some(TypePayload::Reroute(detail)) = &e.type_payload else {
            panic!("expected reroute payload");
        };
        assert_eq!(detail.routes.len(), 2);
        assert!(detail.routes[0].route.ends_with("JJEDI2"));
        assert!(detail.routes[0].route.contains("WAVEY"));
        // Single spaces keep the origin list in one column; the destination
        // carries over from the previous full row.
        assert_eq!(detail.routes[1].origins, "EWR LGA ATL");
        assert_eq!(detail.routes[1].destinations.as_deref(), Some("ATL"));
    }

    #[test]
    fn test_fca_advisory_gets_fca_id() {
        let doc = "\
vATCSCC ADVZY 007 DCC 04/18/2020 FCA ROUTE RQD
NAME: FCAA05
INCLUDE TRAFFIC: ALL DEPARTURES THROUGH FCAA05
182300-190300
";
        let e = &parse(doc)[0];
        let Some(TypePayload::Reroute(detail)) = &e.type_payload else {
            panic!("expected reroute payload");
        };
        assert_eq!(detail.fca_id.as_deref(), Some("FCAA05"));
        assert_eq!(detail.traffic_from.as_deref(), Some("ALL"));
        assert_eq!(detail.traffic_to.as_deref(), Some("FCAA05"));
    }

    #[test]
    fn test_general_block_body() {
        let doc = "\
vATCSCC ADVZY 001 DCC 04/02/2020 OPERATIONS PLAN
EVENT TIME: 021500 - AND LATER
_________________________________________________________________________
THESE ARE THE TRAFFIC MANAGEMENT INITIATIVES
DISCUSSED ALREADY IN ORDER TO MANAGE CTP AND
NON-CTP TRAFFIC.
_________________________________________________________________________

TERMINAL ACTIVE:
NONE

021500-AND LATER
20/04/02 22:17
";
        let e = &parse(doc)[0];
        assert_eq!(e.message_type, MessageType::General);
        let Some(TypePayload::General(detail)) = &e.type_payload else {
            panic!("expected general payload");
        };
        assert_eq!(detail.subject.as_deref(), Some("OPERATIONS PLAN"));
        assert!(detail.body.contains("TERMINAL ACTIVE"));
        // Footer "AND LATER" form fills only the start.
        assert_eq!(e.valid_from.unwrap().to_string(), "2020-04-02 15:00:00");
        assert!(e.valid_until.is_none());
        assert_eq!(
            e.entry_timestamp.unwrap().to_string(),
            "2020-04-02 22:17:00"
        );
    }

    #[test]
    fn test_multiple_blocks_and_context() {
        let doc = format!(
            "{GROUND_STOP}\nJeremy P | ZNY C1 — 03/28/2020 21:01\nvATCSCC ADVZY 003 DCA 03/29/2020 CDM GS CNX\nCTL ELEMENT: DCA\n290026-290100\n20/03/29 01:00\n"
        );
        let entries = parse(&doc);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message_type, MessageType::GroundStop);
        assert_eq!(entries[1].message_type, MessageType::Cancellation);
        // Each block captured its own context snapshot.
        assert!(entries[1].raw_text.starts_with("vATCSCC ADVZY 003"));
    }

    #[test]
    fn test_blank_lines_preserved_in_raw_text() {
        let entries = parse(GROUND_STOP);
        assert!(entries[0].raw_text.contains("COMMENTS:\n\n290030-290115"));
    }

    #[test]
    fn test_no_header_date_degrades_to_null_times() {
        let doc = "\
vATCSCC ADVZY 001 ZDC CDM GROUND STOP
CTL ELEMENT: DCA
290030-290115
";
        let e = &parse(doc)[0];
        assert_eq!(e.message_type, MessageType::GroundStop);
        assert!(e.valid_from.is_none());
        assert!(e.valid_until.is_none());
        assert!(e.entry_timestamp.is_none());
    }

    #[test]
    fn test_text_without_advisory_header_yields_nothing() {
        let doc = "just some chat noise\nand another line\n";
        assert!(parse(doc).is_empty());
    }

    #[test]
    fn test_custom_organization_token() {
        let parser =
            AdvisoryParser::with_config(AdvisoryConfig::new().with_organization("ATCSCC"));
        let doc = "ATCSCC ADVZY 042 DCC 04/02/2020 OPERATIONS PLAN\nEVENT TIME: 021500\n";
        let entries = parser.parse_str(doc).unwrap();
        assert_eq!(entries.len(), 1);
        let Some(TypePayload::General(detail)) = &entries[0].type_payload else {
            panic!("expected general payload");
        };
        assert_eq!(detail.advisory_number.as_deref(), Some("042"));
    }

    #[test]
    fn test_split_reason_forms() {
        assert_eq!(
            split_reason("VOLUME / VOLUME"),
            (Some(ReasonCategory::Volume), Some("VOLUME".to_string()))
        );
        assert_eq!(
            split_reason("WEATHER / THUNDERSTORMS"),
            (
                Some(ReasonCategory::Weather),
                Some("THUNDERSTORMS".to_string())
            )
        );
        assert_eq!(
            split_reason("RUNWAY CONSTRUCTION"),
            (
                Some(ReasonCategory::Other),
                Some("RUNWAY CONSTRUCTION".to_string())
            )
        );
    }

    #[test]
    fn test_determinism() {
        assert_eq!(parse(GROUND_STOP), parse(GROUND_STOP));
    }
}
