//! Parsing options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for reading pages out of a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Apply Unicode NFC normalization to decoded text
    pub normalize_text: bool,

    /// Tuning for the table detector
    pub table_detector: TableDetectorConfig,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages whose content cannot be decoded come back empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable NFC normalization of decoded text.
    pub fn with_text_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Replace the table detector configuration.
    pub fn with_table_detector(mut self, config: TableDetectorConfig) -> Self {
        self.table_detector = config;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            normalize_text: true,
            table_detector: TableDetectorConfig::default(),
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid content and continue
    Lenient,
}
