//! Document and page handles over a [`PdfBackend`].

use std::cell::OnceCell;

use log::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::{ContentInterpreter, PageGeometry, PagePrimitives};
use super::options::{ErrorMode, ParseOptions};
use super::source::PageSource;
use super::table_detector::TableDetector;
use crate::detect::detect_header;
use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, DocumentInfo, ImagePrimitive, PageSize, TableCandidate, TextSpanPrimitive,
};

/// An opened PDF document.
///
/// Owns the backend; dropping the document releases everything it parsed.
pub struct PdfDocument {
    backend: Box<dyn PdfBackend>,
    pages: Vec<PageId>,
    version: String,
    options: ParseOptions,
}

impl PdfDocument {
    /// Open a document from bytes with default options.
    pub fn open(data: &[u8]) -> Result<Self> {
        Self::open_with_options(data, ParseOptions::default())
    }

    /// Open a document from bytes.
    ///
    /// The header is checked before the bytes reach the parser, so non-PDF
    /// input fails with [`Error::UnknownFormat`].
    pub fn open_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let header = detect_header(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        debug!("Opened {} ({} bytes)", header, data.len());
        Ok(Self::from_backend(Box::new(backend), options))
    }

    /// Wrap an already-loaded backend.
    pub fn from_backend(backend: Box<dyn PdfBackend>, options: ParseOptions) -> Self {
        let pages = backend.pages().into_values().collect();
        let version = backend.version();
        Self {
            backend,
            pages,
            version,
            options,
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// PDF version (e.g., "1.7").
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Options the document was opened with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Get a page by 0-based index.
    pub fn page(&self, index: usize) -> Result<PdfPage<'_>> {
        let id = *self.pages.get(index).ok_or(Error::PageOutOfRange {
            index,
            page_count: self.pages.len(),
        })?;

        let geometry = match self.backend.page_box(id) {
            Some(rect) => PageGeometry::from_rect(rect),
            None => {
                warn!("Page {} has no usable page box, assuming US Letter", index);
                PageGeometry::LETTER
            }
        };

        Ok(PdfPage {
            document: self,
            index,
            id,
            geometry,
            primitives: OnceCell::new(),
        })
    }

    /// Version, page count and page sizes.
    pub fn info(&self) -> Result<DocumentInfo> {
        let pages = (0..self.page_count())
            .map(|index| {
                let (width, height) = self.page(index)?.dimensions();
                Ok(PageSize {
                    index,
                    width,
                    height,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DocumentInfo {
            version: self.version.clone(),
            page_count: self.page_count(),
            pages,
        })
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.version)
            .field("page_count", &self.pages.len())
            .finish()
    }
}

/// One page of a [`PdfDocument`].
///
/// The content stream is interpreted on first use and cached for the life
/// of the handle.
pub struct PdfPage<'a> {
    document: &'a PdfDocument,
    index: usize,
    id: PageId,
    geometry: PageGeometry,
    primitives: OnceCell<PagePrimitives>,
}

impl PdfPage<'_> {
    /// Visible size and origin of this page.
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn primitives(&self) -> Result<&PagePrimitives> {
        if let Some(cached) = self.primitives.get() {
            return Ok(cached);
        }
        let loaded = self.load()?;
        Ok(self.primitives.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<PagePrimitives> {
        let options = &self.document.options;
        let interpreted =
            ContentInterpreter::new(self.document.backend.as_ref(), self.id, self.geometry)
                .and_then(|interpreter| interpreter.interpret_page());

        let mut primitives = match interpreted {
            Ok(primitives) => primitives,
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                warn!("Skipping content of page {}: {}", self.index, e);
                PagePrimitives::default()
            }
            Err(e) => return Err(e),
        };

        if options.normalize_text {
            for span in &mut primitives.spans {
                span.text = span.text.nfc().collect();
            }
        }

        debug!(
            "Page {}: {} text spans, {} images",
            self.index,
            primitives.spans.len(),
            primitives.images.len()
        );
        Ok(primitives)
    }
}

impl PageSource for PdfPage<'_> {
    fn index(&self) -> usize {
        self.index
    }

    fn dimensions(&self) -> (f32, f32) {
        (self.geometry.width(), self.geometry.height())
    }

    fn text_spans(&self) -> Result<&[TextSpanPrimitive]> {
        Ok(&self.primitives()?.spans)
    }

    fn images(&self) -> Result<&[ImagePrimitive]> {
        Ok(&self.primitives()?.images)
    }

    fn find_tables(&self, clip: Option<&BoundingBox>) -> Result<Vec<TableCandidate>> {
        let detector = TableDetector::with_config(self.document.options.table_detector.clone());
        let spans = self.text_spans()?;

        let candidates = match clip {
            None => detector.detect(spans),
            Some(clip) => {
                let inside: Vec<TextSpanPrimitive> = spans
                    .iter()
                    .filter(|s| {
                        let (x, y) = s.bbox.center();
                        clip.contains_point(x, y)
                    })
                    .cloned()
                    .collect();
                debug!(
                    "Clip {} keeps {} of {} spans on page {}",
                    clip,
                    inside.len(),
                    spans.len(),
                    self.index
                );
                detector.detect(&inside)
            }
        };

        Ok(candidates)
    }
}
