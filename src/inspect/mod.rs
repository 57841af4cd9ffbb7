//! Page inspection: the element inventory and clip-based table extraction.
//!
//! Both stages read a page only through [`PageSource`](crate::parser::PageSource),
//! so they run unchanged against any parser that implements it.

mod extract;
mod normalize;
mod options;

pub use extract::{extract_grid, select_candidate, GridSelection};
pub use normalize::normalize_page;
pub use options::{InspectOptions, OverlapPolicy, TableSelection};

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use crate::error::Result;
    use crate::model::{BoundingBox, ImagePrimitive, TableCandidate, TextSpanPrimitive};
    use crate::parser::PageSource;

    /// A Letter page with canned primitives. `find_tables` ignores the clip
    /// but remembers it.
    #[derive(Default)]
    pub(crate) struct StubPage {
        spans: Vec<TextSpanPrimitive>,
        images: Vec<ImagePrimitive>,
        tables: Vec<TableCandidate>,
        last_clip: Cell<Option<BoundingBox>>,
    }

    impl StubPage {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_span(mut self, text: &str, bbox: BoundingBox) -> Self {
            self.spans
                .push(TextSpanPrimitive::new(text, bbox, "Helvetica", 12.0));
            self
        }

        pub(crate) fn with_image(mut self, reference_id: u32, bbox: BoundingBox) -> Self {
            self.images.push(ImagePrimitive {
                bbox,
                reference_id,
                width: 100,
                height: 50,
                color_space: None,
            });
            self
        }

        pub(crate) fn with_table(mut self, table: TableCandidate) -> Self {
            self.tables.push(table);
            self
        }

        pub(crate) fn last_clip(&self) -> Option<BoundingBox> {
            self.last_clip.get()
        }
    }

    impl PageSource for StubPage {
        fn index(&self) -> usize {
            0
        }

        fn dimensions(&self) -> (f32, f32) {
            (612.0, 792.0)
        }

        fn text_spans(&self) -> Result<&[TextSpanPrimitive]> {
            Ok(&self.spans)
        }

        fn images(&self) -> Result<&[ImagePrimitive]> {
            Ok(&self.images)
        }

        fn find_tables(&self, clip: Option<&BoundingBox>) -> Result<Vec<TableCandidate>> {
            self.last_clip.set(clip.copied());
            Ok(self.tables.clone())
        }
    }
}
