//! Normalized page elements.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, ImagePrimitive, TableCandidate, TextSpanPrimitive};

/// One typed item in a page's element inventory.
///
/// Serializes as an object tagged by `"type"` (`"text"`, `"image"` or
/// `"table"`) with camelCase fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PageElement {
    /// A run of text
    #[serde(rename = "text")]
    TextSpan {
        /// Text content
        text: String,
        /// Extent on the page
        bbox: BoundingBox,
        /// Base font name
        font_name: String,
        /// Font size in points
        font_size: f32,
    },

    /// An image placement
    Image {
        /// Extent on the page
        bbox: BoundingBox,
        /// Object number of the image resource
        reference_id: u32,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Color space name, if declared
        color_space: Option<String>,
    },

    /// A detected table, summarized
    Table {
        /// Extent on the page
        bbox: BoundingBox,
        /// Number of rows in the grid
        row_count: usize,
        /// Number of cells in the first row
        col_count: usize,
    },
}

impl PageElement {
    /// Bounding box of the element.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            PageElement::TextSpan { bbox, .. }
            | PageElement::Image { bbox, .. }
            | PageElement::Table { bbox, .. } => bbox,
        }
    }

    /// Check if this element is a text span.
    pub fn is_text(&self) -> bool {
        matches!(self, PageElement::TextSpan { .. })
    }

    /// Check if this element is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, PageElement::Image { .. })
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, PageElement::Table { .. })
    }
}

impl From<TextSpanPrimitive> for PageElement {
    fn from(span: TextSpanPrimitive) -> Self {
        PageElement::TextSpan {
            text: span.text,
            bbox: span.bbox,
            font_name: span.font_name,
            font_size: span.font_size,
        }
    }
}

impl From<ImagePrimitive> for PageElement {
    fn from(image: ImagePrimitive) -> Self {
        PageElement::Image {
            bbox: image.bbox,
            reference_id: image.reference_id,
            width: image.width,
            height: image.height,
            color_space: image.color_space,
        }
    }
}

impl From<&TableCandidate> for PageElement {
    fn from(candidate: &TableCandidate) -> Self {
        PageElement::Table {
            bbox: candidate.bbox,
            row_count: candidate.grid.row_count(),
            col_count: candidate.grid.column_count(),
        }
    }
}
