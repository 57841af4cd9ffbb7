//! Raw page primitives produced by the parser, before normalization.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A run of text drawn by one text-showing operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpanPrimitive {
    /// Decoded text
    pub text: String,
    /// Extent in page space (ascent to descent, origin to advance)
    pub bbox: BoundingBox,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpanPrimitive {
    /// Create a new text span primitive.
    pub fn new(
        text: impl Into<String>,
        bbox: BoundingBox,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
        }
    }
}

/// One placement of an image XObject on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrimitive {
    /// Where the image is painted, in page space
    pub bbox: BoundingBox,
    /// Object number of the image XObject
    pub reference_id: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color space name (e.g., "DeviceRGB", "ICCBased")
    pub color_space: Option<String>,
}
