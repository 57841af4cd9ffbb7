//! Request results returned to callers.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, PageElement, TableGrid};

/// Element inventory of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysisResult {
    /// 0-based index of the analyzed page
    pub page_index: usize,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Text spans, then images, then tables
    pub elements: Vec<PageElement>,
}

impl PageAnalysisResult {
    /// Iterate over the text span elements.
    pub fn text_spans(&self) -> impl Iterator<Item = &PageElement> {
        self.elements.iter().filter(|e| e.is_text())
    }

    /// Iterate over the image elements.
    pub fn images(&self) -> impl Iterator<Item = &PageElement> {
        self.elements.iter().filter(|e| e.is_image())
    }

    /// Iterate over the table elements.
    pub fn tables(&self) -> impl Iterator<Item = &PageElement> {
        self.elements.iter().filter(|e| e.is_table())
    }
}

/// A table re-extracted from a clip region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableExtractionResult {
    /// The selected grid, unchanged from the parser
    pub grid: TableGrid,
    /// Markdown rendering of `grid`
    pub markdown: String,
    /// Region of the selected table
    pub bbox: BoundingBox,
    /// How many candidates the clip produced before selection
    pub candidate_count: usize,
}

/// Size of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// 0-based page index
    pub index: usize,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

/// Document-level overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Number of pages
    pub page_count: usize,
    /// Per-page sizes, in page order
    pub pages: Vec<PageSize>,
}
