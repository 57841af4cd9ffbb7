//! # pdfscope
//!
//! Page-level PDF inspection for Rust.
//!
//! Given one page of a PDF, this library produces a typed inventory of what is
//! drawn on it (text runs, images, tables, each with a bounding box) and can
//! re-extract a caller-selected rectangle as a table rendered to Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfscope::{analyze_page, extract_table, BoundingBox};
//!
//! fn main() -> pdfscope::Result<()> {
//!     let data = std::fs::read("report.pdf")?;
//!
//!     // Whole-page scan
//!     let analysis = analyze_page(&data, 0)?;
//!     for element in &analysis.elements {
//!         println!("{:?}", element.bbox());
//!     }
//!
//!     // Refine one region into a table
//!     let table = extract_table(&data, 0, BoundingBox::new(50.0, 100.0, 560.0, 300.0))?;
//!     print!("{}", table.markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Coordinates
//!
//! Bounding boxes are in points with the origin at the top-left corner of the
//! page's visible box and y growing downward. Page indices are 0-based.
//!
//! ## Features
//!
//! - `async`: `*_async` variants that run on tokio's blocking pool

pub mod detect;
pub mod error;
pub mod inspect;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_header, is_pdf_bytes, PdfHeader};
pub use error::{Error, ErrorKind, Result};
pub use inspect::{InspectOptions, OverlapPolicy, TableSelection};
pub use model::{
    BoundingBox, DocumentInfo, PageAnalysisResult, PageElement, PageSize, TableExtractionResult,
    TableGrid,
};
pub use parser::{PageSource, ParseOptions, PdfDocument, TableDetectorConfig};
pub use render::{JsonFormat, MarkdownTableOptions};

use std::path::Path;

/// Build the element inventory of one page.
///
/// # Arguments
///
/// * `data` - PDF file content as bytes
/// * `page_index` - 0-based page index
///
/// # Errors
///
/// Parse errors if the bytes are not a readable PDF, and
/// [`Error::PageOutOfRange`] if the page does not exist.
///
/// # Example
///
/// ```no_run
/// use pdfscope::analyze_page;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = analyze_page(&data, 0).unwrap();
/// println!("{} x {}", result.page_width, result.page_height);
/// ```
pub fn analyze_page(data: &[u8], page_index: usize) -> Result<PageAnalysisResult> {
    analyze_page_with_options(data, page_index, &InspectOptions::default())
}

/// Build the element inventory of one page with custom options.
pub fn analyze_page_with_options(
    data: &[u8],
    page_index: usize,
    options: &InspectOptions,
) -> Result<PageAnalysisResult> {
    Inspector::with_options(options.clone())
        .open(data)?
        .analyze_page(page_index)
}

/// Extract the table inside `clip` and render it as Markdown.
///
/// # Errors
///
/// [`Error::NoTableFound`] when the region holds no table, plus the errors
/// of [`analyze_page`].
///
/// # Example
///
/// ```no_run
/// use pdfscope::{extract_table, BoundingBox};
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let clip: BoundingBox = "50,100,560,300".parse().unwrap();
/// let table = extract_table(&data, 0, clip).unwrap();
/// std::fs::write("table.md", table.markdown).unwrap();
/// ```
pub fn extract_table(
    data: &[u8],
    page_index: usize,
    clip: BoundingBox,
) -> Result<TableExtractionResult> {
    extract_table_with_options(data, page_index, clip, &InspectOptions::default())
}

/// Extract the table inside `clip` with custom options.
pub fn extract_table_with_options(
    data: &[u8],
    page_index: usize,
    clip: BoundingBox,
    options: &InspectOptions,
) -> Result<TableExtractionResult> {
    Inspector::with_options(options.clone())
        .open(data)?
        .extract_table(page_index, &clip)
}

/// Page count, version and page sizes of a document.
pub fn inspect_document(data: &[u8]) -> Result<DocumentInfo> {
    Inspector::new().open(data)?.info()
}

/// Build the element inventory of one page of a file.
pub fn analyze_page_file<P: AsRef<Path>>(path: P, page_index: usize) -> Result<PageAnalysisResult> {
    Inspector::new().open_file(path)?.analyze_page(page_index)
}

/// Extract the table inside `clip` from one page of a file.
pub fn extract_table_file<P: AsRef<Path>>(
    path: P,
    page_index: usize,
    clip: BoundingBox,
) -> Result<TableExtractionResult> {
    Inspector::new()
        .open_file(path)?
        .extract_table(page_index, &clip)
}

/// Page count, version and page sizes of a file.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    Inspector::new().open_file(path)?.info()
}

/// Builder for inspecting PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfscope::{BoundingBox, Inspector, TableSelection};
///
/// let data = std::fs::read("document.pdf")?;
/// let inspection = Inspector::new()
///     .with_table_selection(TableSelection::Largest)
///     .with_escape_pipes(true)
///     .open(&data)?;
///
/// let overview = inspection.analyze_page(0)?;
/// let table = inspection.extract_table(0, &BoundingBox::new(0.0, 0.0, 612.0, 400.0))?;
/// # Ok::<(), pdfscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    options: InspectOptions,
}

impl Inspector {
    /// Create a new Inspector with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Inspector from existing options.
    pub fn with_options(options: InspectOptions) -> Self {
        Self { options }
    }

    /// Set the table selection policy.
    pub fn with_table_selection(mut self, selection: TableSelection) -> Self {
        self.options = self.options.with_table_selection(selection);
        self
    }

    /// Set the overlap policy.
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.options = self.options.with_overlap_policy(policy);
        self
    }

    /// Escape `|` in markdown cells.
    pub fn with_escape_pipes(mut self, escape: bool) -> Self {
        self.options = self.options.with_escape_pipes(escape);
        self
    }

    /// Enable or disable NFC normalization of span text.
    pub fn with_text_normalization(mut self, normalize: bool) -> Self {
        self.options = self.options.with_text_normalization(normalize);
        self
    }

    /// Replace the table detector configuration.
    pub fn with_detector_config(mut self, config: TableDetectorConfig) -> Self {
        self.options = self.options.with_detector_config(config);
        self
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// The options this builder carries.
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Open a PDF from bytes.
    pub fn open(self, data: &[u8]) -> Result<Inspection> {
        let document = PdfDocument::open_with_options(data, self.options.parse.clone())?;
        Ok(Inspection {
            document,
            options: self.options,
        })
    }

    /// Open a PDF file.
    pub fn open_file<P: AsRef<Path>>(self, path: P) -> Result<Inspection> {
        let data = std::fs::read(path)?;
        self.open(&data)
    }
}

/// An opened document ready for page requests.
#[derive(Debug)]
pub struct Inspection {
    document: PdfDocument,
    options: InspectOptions,
}

impl Inspection {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    /// Page count, version and page sizes.
    pub fn info(&self) -> Result<DocumentInfo> {
        self.document.info()
    }

    /// Build the element inventory of one page.
    pub fn analyze_page(&self, page_index: usize) -> Result<PageAnalysisResult> {
        let page = self.document.page(page_index)?;
        inspect::normalize_page(&page, self.options.overlap_policy)
    }

    /// Extract the table inside `clip` and render it as Markdown.
    pub fn extract_table(
        &self,
        page_index: usize,
        clip: &BoundingBox,
    ) -> Result<TableExtractionResult> {
        let page = self.document.page(page_index)?;
        let selection = inspect::extract_grid(&page, clip, self.options.table_selection)?;
        let markdown =
            render::to_markdown_table(&selection.candidate.grid, &self.options.markdown)?;

        Ok(TableExtractionResult {
            grid: selection.candidate.grid,
            markdown,
            bbox: selection.candidate.bbox,
            candidate_count: selection.candidate_count,
        })
    }
}

/// Async variants of the page operations.
///
/// Each call owns its bytes and runs the synchronous pipeline on tokio's
/// blocking pool, so concurrent requests don't stall executor threads.
#[cfg(feature = "async")]
pub mod nonblocking {
    use std::path::Path;

    use crate::error::{Error, Result};
    use crate::model::{BoundingBox, PageAnalysisResult, TableExtractionResult};
    use crate::InspectOptions;

    async fn run_blocking<T, F>(f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| Error::Other(format!("inspection task failed: {}", e)))?
    }

    /// Async [`analyze_page_with_options`](crate::analyze_page_with_options).
    pub async fn analyze_page_async(
        data: Vec<u8>,
        page_index: usize,
        options: InspectOptions,
    ) -> Result<PageAnalysisResult> {
        run_blocking(move || crate::analyze_page_with_options(&data, page_index, &options)).await
    }

    /// Async [`extract_table_with_options`](crate::extract_table_with_options).
    pub async fn extract_table_async(
        data: Vec<u8>,
        page_index: usize,
        clip: BoundingBox,
        options: InspectOptions,
    ) -> Result<TableExtractionResult> {
        run_blocking(move || crate::extract_table_with_options(&data, page_index, clip, &options))
            .await
    }

    /// Read a file with tokio and analyze one page.
    pub async fn analyze_page_file_async<P: AsRef<Path>>(
        path: P,
        page_index: usize,
        options: InspectOptions,
    ) -> Result<PageAnalysisResult> {
        let data = tokio::fs::read(path).await?;
        analyze_page_async(data, page_index, options).await
    }
}

#[cfg(feature = "async")]
pub use nonblocking::{analyze_page_async, analyze_page_file_async, extract_table_async};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspector_builder() {
        let inspector = Inspector::new()
            .lenient()
            .with_table_selection(TableSelection::RequireSingle)
            .with_overlap_policy(OverlapPolicy::ExcludeTableText)
            .with_escape_pipes(true);

        let options = inspector.options();
        assert_eq!(options.parse.error_mode, parser::ErrorMode::Lenient);
        assert_eq!(options.table_selection, TableSelection::RequireSingle);
        assert_eq!(options.overlap_policy, OverlapPolicy::ExcludeTableText);
        assert!(options.markdown.escape_pipes);
    }

    #[test]
    fn test_inspector_default() {
        let inspector = Inspector::default();
        assert_eq!(inspector.options(), &InspectOptions::default());
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_analyze_empty_data() {
        let result = analyze_page(&[], 0);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_analyze_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let result = analyze_page(&data, 0);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_extract_truncated_pdf() {
        let result = extract_table(b"%PDF-1.7\n1 0 obj", 0, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_inspect_document_rejects_html() {
        assert!(inspect_document(b"<!DOCTYPE html><html></html>").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = analyze_page_file("/nonexistent/definitely/missing.pdf", 0);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
