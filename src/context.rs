//! Header context tracking.
//!
//! Both log formats ride inside chat exports whose header lines carry the
//! author, facility and date that entries below them inherit. Export clients
//! have wrapped these headers differently over the years, so three shapes are
//! recognized:
//!
//! - Full: `Jeremy P | ZNY C1 — 04/17/2020 19:45`
//! - Date-only continuation: ` — 02/10/2024 16:08` (header wrapped onto two
//!   lines; only the date arrives here)
//! - Author-only continuation: `Joshua D | ZLA C1` (no date on the line)
//!
//! The em dash frequently arrives double-encoded (`â€”`, stray `Â`, U+FFFD
//! replacement characters); all observed garblings are tolerated.
//!
//! A partial header never discards what is already known: a date-only line
//! updates only the date, an author-only line only author/facility.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::dates::parse_header_date;
use crate::entry::EntryContext;

// Em/en dash plus every observed mojibake of the em dash.
const DASH_CLASS: &str = "[\u{2014}\u{2013}\u{00E2}\u{20AC}\u{201D}\u{00C2}\u{FFFD}]";

fn full_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?)\s*\|\s*(.+?)\s+(\d{2}/\d{2}/\d{4})\s+\d{2}:\d{2}").unwrap()
    })
}

fn date_only_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*{DASH_CLASS}+\s*(\d{{2}}/\d{{2}}/\d{{4}})\s+\d{{2}}:\d{{2}}"
        ))
        .unwrap()
    })
}

fn author_only_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z][\w ]+?)\s*\|\s*([A-Z].*)$").unwrap())
}

fn any_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2}/\d{4}").unwrap())
}

fn trailing_dash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\s*{DASH_CLASS}+\s*$")).unwrap())
}

/// The evolving author/facility/date context of a document scan.
///
/// Local to one parse invocation; never shared across documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderContext {
    pub author: Option<String>,
    pub facility: Option<String>,
    pub date: Option<NaiveDate>,
}

impl HeaderContext {
    /// Creates an empty context (no header seen yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspects a line and absorbs it if it is one of the header shapes.
    ///
    /// Returns `true` when the line was a header line (and must not be fed
    /// to entry segmentation).
    pub fn observe(&mut self, line: &str) -> bool {
        if let Some(caps) = full_header_re().captures(line) {
            let facility_raw = caps.get(2).map_or("", |m| m.as_str()).trim();
            let facility = trailing_dash_re().replace(facility_raw, "").into_owned();
            self.author = Some(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
            self.facility = Some(facility.trim().to_string());
            self.date = caps.get(3).and_then(|m| parse_header_date(m.as_str()));
            return true;
        }

        if let Some(caps) = date_only_re().captures(line) {
            // Only the date arrives; author/facility from an earlier line
            // (if any) stay valid.
            self.date = caps.get(1).and_then(|m| parse_header_date(m.as_str()));
            return true;
        }

        if !any_date_re().is_match(line) {
            if let Some(caps) = author_only_re().captures(line) {
                self.author = Some(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
                self.facility = Some(caps.get(2).map_or("", |m| m.as_str()).trim().to_string());
                return true;
            }
        }

        false
    }

    /// Captures the current context as an immutable entry snapshot.
    pub fn snapshot(&self) -> EntryContext {
        EntryContext {
            author: self.author.clone(),
            facility: self.facility.clone(),
            header_date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_full_header() {
        let mut ctx = HeaderContext::new();
        assert!(ctx.observe("Jeremy P | ZNY C1 — 04/17/2020 19:45"));
        assert_eq!(ctx.author.as_deref(), Some("Jeremy P"));
        assert_eq!(ctx.facility.as_deref(), Some("ZNY C1"));
        assert_eq!(ctx.date, Some(d(2020, 4, 17)));
    }

    #[test]
    fn test_full_header_mojibake_dash() {
        let mut ctx = HeaderContext::new();
        assert!(ctx.observe("Dean V | ZHU EC â€” 02/16/2024 18:12"));
        assert_eq!(ctx.author.as_deref(), Some("Dean V"));
        assert_eq!(ctx.facility.as_deref(), Some("ZHU EC"));
        assert_eq!(ctx.date, Some(d(2024, 2, 16)));
    }

    #[test]
    fn test_date_only_updates_date_only() {
        let mut ctx = HeaderContext::new();
        ctx.observe("Joshua D | ZLA C1");
        assert!(ctx.observe(" — 02/10/2024 16:08"));
        assert_eq!(ctx.author.as_deref(), Some("Joshua D"));
        assert_eq!(ctx.facility.as_deref(), Some("ZLA C1"));
        assert_eq!(ctx.date, Some(d(2024, 2, 10)));
    }

    #[test]
    fn test_date_only_seeds_empty_context() {
        let mut ctx = HeaderContext::new();
        assert!(ctx.observe("— 02/16/2024 17:14"));
        assert!(ctx.author.is_none());
        assert!(ctx.facility.is_none());
        assert_eq!(ctx.date, Some(d(2024, 2, 16)));
    }

    #[test]
    fn test_author_only_preserves_date() {
        let mut ctx = HeaderContext::new();
        ctx.observe("Jeremy P | ZNY C1 — 04/17/2020 19:45");
        assert!(ctx.observe("Joshua D | ZLA C1"));
        assert_eq!(ctx.author.as_deref(), Some("Joshua D"));
        assert_eq!(ctx.facility.as_deref(), Some("ZLA C1"));
        // Date survives until a newer one arrives.
        assert_eq!(ctx.date, Some(d(2020, 4, 17)));
    }

    #[test]
    fn test_entry_line_is_not_a_header() {
        let mut ctx = HeaderContext::new();
        assert!(!ctx.observe("17/2344    BOS via MERIT 15MIT"));
        assert!(!ctx.observe("MIT / MINIT"));
        assert!(!ctx.observe(""));
    }

    #[test]
    fn test_header_update_replaces_context() {
        let mut ctx = HeaderContext::new();
        ctx.observe("Jeremy P | ZNY C1 — 04/17/2020 19:45");
        ctx.observe("Matt B | ZJX C3 — 02/09/2024 18:29");
        assert_eq!(ctx.author.as_deref(), Some("Matt B"));
        assert_eq!(ctx.date, Some(d(2024, 2, 9)));
    }

    #[test]
    fn test_snapshot_is_a_value() {
        let mut ctx = HeaderContext::new();
        ctx.observe("Jeremy P | ZNY C1 — 04/17/2020 19:45");
        let snap = ctx.snapshot();
        ctx.observe("Matt B | ZJX C3 — 02/09/2024 18:29");
        // The snapshot must not follow later context changes.
        assert_eq!(snap.author.as_deref(), Some("Jeremy P"));
        assert_eq!(snap.header_date, Some(d(2020, 4, 17)));
    }
}
