//! Partial-date resolution.
//!
//! Log entries carry only a day-of-month (and a clock time); the month and
//! year come from the surrounding header context. When a log session crosses
//! a month boundary the entry day wraps back to 1 while the header still says
//! the old month, so resolution applies a rollover rule: an entry day far
//! *below* the header day is assumed to belong to the next month.
//!
//! All functions here degrade to `None` instead of guessing — a missing
//! header date or an impossible calendar date yields no date at all.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// How many days an entry day may lag the header day before it is taken to
/// mean "next month". Sessions in practice span a few days at most.
pub const ROLLOVER_TOLERANCE_DAYS: u32 = 5;

/// Resolves an entry's two-digit day against a header date.
///
/// If the entry day is more than `tolerance` days less than the header day,
/// the month (and if needed the year) is incremented. The resulting date is
/// checked against the real calendar; an impossible date yields `None`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use flowpack::dates::{resolve_entry_date, ROLLOVER_TOLERANCE_DAYS};
///
/// let header = NaiveDate::from_ymd_opt(2020, 4, 17).unwrap();
/// let resolved = resolve_entry_date(header, 18, ROLLOVER_TOLERANCE_DAYS);
/// assert_eq!(resolved, NaiveDate::from_ymd_opt(2020, 4, 18));
/// ```
pub fn resolve_entry_date(header: NaiveDate, entry_day: u32, tolerance: u32) -> Option<NaiveDate> {
    let mut year = header.year();
    let mut month = header.month();

    if i64::from(entry_day) < i64::from(header.day()) - i64::from(tolerance) {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    NaiveDate::from_ymd_opt(year, month, entry_day)
}

/// Parses a 4-digit `HHMM` clock time.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hh: u32 = s[..2].parse().ok()?;
    let mm: u32 = s[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hh, mm, 0)
}

/// Resolves a 6-digit `DDHHMM` day/time token against a header date.
///
/// Used by advisory footers and `VALID` fields. Applies the same month
/// rollover rule as [`resolve_entry_date`].
pub fn resolve_day_time(
    header: NaiveDate,
    ddhhmm: &str,
    tolerance: u32,
) -> Option<NaiveDateTime> {
    if ddhhmm.len() != 6 || !ddhhmm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let dd: u32 = ddhhmm[..2].parse().ok()?;
    let date = resolve_entry_date(header, dd, tolerance)?;
    let time = parse_hhmm(&ddhhmm[2..])?;
    Some(date.and_time(time))
}

/// Resolves an `HHMM-HHMM` validity range against a base date.
///
/// When the end time is earlier than the start time the range crosses
/// midnight, so the end date is advanced by one day.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use flowpack::dates::resolve_time_range;
///
/// let base = NaiveDate::from_ymd_opt(2020, 4, 17).unwrap();
/// let (from, until) = resolve_time_range(base, "2345", "0000").unwrap();
/// assert_eq!(from.to_string(), "2020-04-17 23:45:00");
/// assert_eq!(until.to_string(), "2020-04-18 00:00:00");
/// ```
pub fn resolve_time_range(
    base: NaiveDate,
    start_hhmm: &str,
    end_hhmm: &str,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_hhmm(start_hhmm)?;
    let end = parse_hhmm(end_hhmm)?;

    let start_dt = base.and_time(start);
    let end_date = if end < start {
        base.succ_opt()?
    } else {
        base
    };
    Some((start_dt, end_date.and_time(end)))
}

/// Parses a header-style `MM/DD/YYYY` date.
pub fn parse_header_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}
