//! PDF parsing module.
//!
//! Everything that touches the PDF object model lives here; the rest of the
//! crate sees pages only through [`PageSource`].

mod backend;
mod content;
mod document;
#[cfg(test)]
mod mock;
mod options;
mod source;
mod table_detector;

pub use backend::{
    BackendFontInfo, BackendImageInfo, ContentOp, GlyphWidths, LopdfBackend, PageId, PdfBackend,
    PdfValue,
};
pub use content::{ContentInterpreter, PageGeometry, PagePrimitives};
pub use document::{PdfDocument, PdfPage};
pub use options::{ErrorMode, ParseOptions};
pub use source::PageSource;
pub use table_detector::{TableDetector, TableDetectorConfig};
