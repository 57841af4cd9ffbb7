//! Value types shared by the parser, the inspectors, and the renderers.
//!
//! Everything here is request-scoped: built fresh for one call and never
//! mutated once returned.

mod bbox;
mod element;
mod primitive;
mod result;
mod table;

pub use bbox::BoundingBox;
pub use element::PageElement;
pub use primitive::{ImagePrimitive, TextSpanPrimitive};
pub use result::{DocumentInfo, PageAnalysisResult, PageSize, TableExtractionResult};
pub use table::{TableCandidate, TableGrid};
