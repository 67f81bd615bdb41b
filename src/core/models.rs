//! Output configuration.

/// Controls which audit fields are included in the output.
///
/// The structured fields of an entry are always written; the audit trail
/// (raw text, header context, source line numbers) is opt-in since import
/// pipelines often store it separately.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Include the original raw text of each entry
    pub include_raw_text: bool,
    /// Include the captured header context (author, facility, date)
    pub include_context: bool,
    /// Include 1-based source line numbers
    pub include_source_lines: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_text(mut self) -> Self {
        self.include_raw_text = true;
        self
    }

    pub fn with_context(mut self) -> Self {
        self.include_context = true;
        self
    }

    pub fn with_source_lines(mut self) -> Self {
        self.include_source_lines = true;
        self
    }
}
