//! The narrow interface the inspectors consume.

use crate::error::Result;
use crate::model::{BoundingBox, ImagePrimitive, TableCandidate, TextSpanPrimitive};

/// One page of a parsed document.
///
/// Implemented by [`PdfPage`](super::PdfPage); tests substitute their own.
/// All collections come back in the parser's own order.
pub trait PageSource {
    /// 0-based index of this page in its document.
    fn index(&self) -> usize;

    /// Page `(width, height)` in points.
    fn dimensions(&self) -> (f32, f32);

    /// Text runs in content-stream order.
    fn text_spans(&self) -> Result<&[TextSpanPrimitive]>;

    /// Image placements in content-stream order.
    fn images(&self) -> Result<&[ImagePrimitive]>;

    /// Table candidates, top to bottom.
    ///
    /// With a clip, only content inside the region is considered.
    fn find_tables(&self, clip: Option<&BoundingBox>) -> Result<Vec<TableCandidate>>;
}
