//! In-memory backend for interpreter and adapter tests.

use std::collections::BTreeMap;

use super::backend::{
    convert_object, decode_text_simple, strip_inline_images, BackendFontInfo, BackendImageInfo,
    ContentOp, GlyphWidths, PageId, PdfBackend,
};
use crate::error::{Error, Result};

/// Every page shares the same content stream and resources.
pub(crate) struct MockBackend {
    content: Vec<u8>,
    page_box: Option<[f32; 4]>,
    page_count: u32,
    fonts: Vec<BackendFontInfo>,
    images: Vec<BackendImageInfo>,
    broken: bool,
}

impl MockBackend {
    /// One Letter page with `/F1` mapped to Helvetica (no width table).
    pub(crate) fn new(content: &str) -> Self {
        Self {
            content: content.as_bytes().to_vec(),
            page_box: Some([0.0, 0.0, 612.0, 792.0]),
            page_count: 1,
            fonts: vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "Helvetica".to_string(),
                widths: None,
            }],
            images: Vec::new(),
            broken: false,
        }
    }

    pub(crate) fn with_widths(mut self, font: &[u8], widths: GlyphWidths) -> Self {
        if let Some(info) = self.fonts.iter_mut().find(|f| f.name == font) {
            info.widths = Some(widths);
        }
        self
    }

    pub(crate) fn with_image(mut self, name: &[u8], object_number: u32) -> Self {
        self.images.push(BackendImageInfo {
            name: name.to_vec(),
            object_number,
            width: 64,
            height: 32,
            color_space: Some("DeviceRGB".to_string()),
        });
        self
    }

    pub(crate) fn with_page_box(mut self, page_box: Option<[f32; 4]>) -> Self {
        self.page_box = page_box;
        self
    }

    /// Make `page_content` fail as a corrupt stream would.
    pub(crate) fn with_broken_content(mut self) -> Self {
        self.broken = true;
        self
    }

    pub(crate) fn with_page_count(mut self, count: u32) -> Self {
        self.page_count = count;
        self
    }
}

impl PdfBackend for MockBackend {
    fn version(&self) -> String {
        "1.7".to_string()
    }

    fn pages(&self) -> BTreeMap<u32, PageId> {
        (1..=self.page_count).map(|n| (n, (n, 0))).collect()
    }

    fn page_box(&self, _page: PageId) -> Option<[f32; 4]> {
        self.page_box
    }

    fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
        Ok(self.fonts.clone())
    }

    fn page_images(&self, _page: PageId) -> Result<Vec<BackendImageInfo>> {
        Ok(self.images.clone())
    }

    fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
        if self.broken {
            return Err(Error::Parse("corrupt content stream".to_string()));
        }
        Ok(self.content.clone())
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(&strip_inline_images(data))
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(content
            .operations
            .iter()
            .map(|op| ContentOp {
                operator: op.operator.clone(),
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, _page: PageId, _font_name: &[u8], bytes: &[u8]) -> String {
        decode_text_simple(bytes)
    }
}
