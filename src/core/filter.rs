//! Filter entries by date range, type, element, and facility.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering entry collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Entries logged on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Entries logged on or before date |
//! | Type | [`with_message_type`](FilterConfig::with_message_type) | Entries of one message type |
//! | Element | [`with_element`](FilterConfig::with_element) | Entries for one controlled element |
//! | Facility | [`with_facility`](FilterConfig::with_facility) | Entries where either side of the facility pair matches |
//!
//! # Behavior Notes
//!
//! - Entries without a resolved `entry_timestamp` are **excluded** when date
//!   filters are active
//! - Element and facility matching is case-insensitive for ASCII
//! - Multiple filters are combined with AND logic

use chrono::{NaiveDate, NaiveDateTime};

use crate::ParsedEntry;
use crate::entry::MessageType;
use crate::error::FlowpackError;

/// Configuration for filtering parsed entries.
///
/// Filters are combined with AND logic: an entry must match all active
/// filters to be included in the result.
///
/// # Example
///
/// ```
/// use flowpack::core::filter::FilterConfig;
/// use flowpack::entry::MessageType;
///
/// # fn main() -> flowpack::Result<()> {
/// let config = FilterConfig::new()
///     .with_message_type(MessageType::Mit)
///     .with_date_from("2020-04-01")?
///     .with_element("BOS");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only entries logged on or after this timestamp.
    pub after: Option<NaiveDateTime>,

    /// Include only entries logged on or before this timestamp.
    pub before: Option<NaiveDateTime>,

    /// Include only entries of this message type.
    pub message_type: Option<MessageType>,

    /// Include only entries for this controlled element (case-insensitive).
    pub element: Option<String>,

    /// Include only entries where either facility of the pair matches
    /// (case-insensitive).
    pub facility: Option<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all entries pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, FlowpackError> {
        let naive = parse_date(date_str)?;
        self.after = naive.and_hms_opt(0, 0, 0);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, FlowpackError> {
        let naive = parse_date(date_str)?;
        // End of the day to include the full day
        self.before = naive.and_hms_opt(23, 59, 59);
        Ok(self)
    }

    /// Sets the message type filter.
    #[must_use]
    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    /// Sets the controlled element filter (case-insensitive).
    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Sets the facility filter. Matches either side of the pair.
    #[must_use]
    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Some(facility.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some()
            || self.before.is_some()
            || self.message_type.is_some()
            || self.element.is_some()
            || self.facility.is_some()
    }

    fn matches(&self, entry: &ParsedEntry) -> bool {
        if self.after.is_some() || self.before.is_some() {
            let Some(ts) = entry.entry_timestamp else {
                return false;
            };
            if self.after.is_some_and(|after| ts < after) {
                return false;
            }
            if self.before.is_some_and(|before| ts > before) {
                return false;
            }
        }

        if self
            .message_type
            .is_some_and(|message_type| entry.message_type != message_type)
        {
            return false;
        }

        if let Some(ref element) = self.element {
            let matches = entry
                .controlled_element
                .as_ref()
                .is_some_and(|e| e.eq_ignore_ascii_case(element));
            if !matches {
                return false;
            }
        }

        if let Some(ref facility) = self.facility {
            let requesting = entry
                .requesting_facility
                .as_ref()
                .is_some_and(|f| f.eq_ignore_ascii_case(facility));
            let providing = entry.providing_facility.as_ref().is_some_and(|f| {
                f.split(',').any(|part| part.eq_ignore_ascii_case(facility))
            });
            if !requesting && !providing {
                return false;
            }
        }

        true
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate, FlowpackError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| FlowpackError::invalid_date(date_str))
}

/// Filters entries according to the configuration.
///
/// # Example
///
/// ```
/// use flowpack::core::filter::{FilterConfig, apply_filters};
/// use flowpack::entry::{EntryContext, MessageType, ParsedEntry};
///
/// let entries = vec![
///     ParsedEntry::new(MessageType::Mit, "a", 1, EntryContext::default()),
///     ParsedEntry::new(MessageType::Stop, "b", 2, EntryContext::default()),
/// ];
///
/// let config = FilterConfig::new().with_message_type(MessageType::Stop);
/// let filtered = apply_filters(entries, &config);
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn apply_filters(entries: Vec<ParsedEntry>, config: &FilterConfig) -> Vec<ParsedEntry> {
    if !config.is_active() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| config.matches(entry))
        .collect()
}
