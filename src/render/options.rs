//! Rendering options.

/// Options for markdown table output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownTableOptions {
    /// Escape `|` inside cells as `\|`
    pub escape_pipes: bool,
}

impl MarkdownTableOptions {
    /// Create new options with defaults (pipes pass through).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pipe escaping.
    pub fn with_escape_pipes(mut self, escape: bool) -> Self {
        self.escape_pipes = escape;
        self
    }
}
