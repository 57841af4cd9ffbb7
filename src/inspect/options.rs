//! Inspection options and configuration.

use crate::parser::{ErrorMode, ParseOptions, TableDetectorConfig};
use crate::render::MarkdownTableOptions;

/// Options for page analysis and table extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectOptions {
    /// How the document is read
    pub parse: ParseOptions,

    /// Which candidate wins when a clip yields several tables
    pub table_selection: TableSelection,

    /// What happens to text that lies inside a detected table
    pub overlap_policy: OverlapPolicy,

    /// Markdown output settings
    pub markdown: MarkdownTableOptions,
}

impl InspectOptions {
    /// Create new inspect options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table selection policy.
    pub fn with_table_selection(mut self, selection: TableSelection) -> Self {
        self.table_selection = selection;
        self
    }

    /// Set the overlap policy.
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Escape `|` in markdown cells.
    pub fn with_escape_pipes(mut self, escape: bool) -> Self {
        self.markdown = self.markdown.with_escape_pipes(escape);
        self
    }

    /// Enable or disable NFC normalization of span text.
    pub fn with_text_normalization(mut self, normalize: bool) -> Self {
        self.parse = self.parse.with_text_normalization(normalize);
        self
    }

    /// Replace the table detector configuration.
    pub fn with_detector_config(mut self, config: TableDetectorConfig) -> Self {
        self.parse = self.parse.with_table_detector(config);
        self
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse = self.parse.with_error_mode(ErrorMode::Lenient);
        self
    }

    /// Replace the parse options wholesale.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

/// Which table candidate a clip extraction returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSelection {
    /// The first candidate in parser order
    #[default]
    First,
    /// The candidate with the largest area; ties go to the earliest
    Largest,
    /// Fail with [`Error::MultipleTables`](crate::Error::MultipleTables)
    /// unless exactly one candidate exists
    RequireSingle,
}

impl std::str::FromStr for TableSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(TableSelection::First),
            "largest" => Ok(TableSelection::Largest),
            "single" | "require-single" => Ok(TableSelection::RequireSingle),
            other => Err(format!(
                "unknown table selection '{}' (expected first, largest or single)",
                other
            )),
        }
    }
}

/// Treatment of text spans covered by a detected table during page analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Report every span, even those inside a table
    #[default]
    KeepAll,
    /// Drop spans whose center lies inside a table's bounding box
    ExcludeTableText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_options_builder() {
        let options = InspectOptions::new()
            .with_table_selection(TableSelection::Largest)
            .with_overlap_policy(OverlapPolicy::ExcludeTableText)
            .with_escape_pipes(true)
            .with_text_normalization(false)
            .lenient();

        assert_eq!(options.table_selection, TableSelection::Largest);
        assert_eq!(options.overlap_policy, OverlapPolicy::ExcludeTableText);
        assert!(options.markdown.escape_pipes);
        assert!(!options.parse.normalize_text);
        assert_eq!(options.parse.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_defaults() {
        let options = InspectOptions::default();
        assert_eq!(options.table_selection, TableSelection::First);
        assert_eq!(options.overlap_policy, OverlapPolicy::KeepAll);
        assert!(!options.markdown.escape_pipes);
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("first".parse(), Ok(TableSelection::First));
        assert_eq!("Largest".parse(), Ok(TableSelection::Largest));
        assert_eq!("single".parse(), Ok(TableSelection::RequireSingle));
        assert!("biggest".parse::<TableSelection>().is_err());
    }
}
