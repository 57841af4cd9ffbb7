//! Whole-page element inventory.

use crate::error::Result;
use crate::model::{PageAnalysisResult, PageElement};
use crate::parser::PageSource;

use super::OverlapPolicy;

/// Merge a page's text spans, images and tables into one element list.
///
/// Elements are grouped by category (text, then images, then tables), each
/// group in the parser's order. Under [`OverlapPolicy::ExcludeTableText`],
/// spans centered inside a table are left out.
pub fn normalize_page<P>(page: &P, policy: OverlapPolicy) -> Result<PageAnalysisResult>
where
    P: PageSource + ?Sized,
{
    let spans = page.text_spans()?;
    let images = page.images()?;
    let tables = page.find_tables(None)?;
    let (page_width, page_height) = page.dimensions();

    let mut elements = Vec::with_capacity(spans.len() + images.len() + tables.len());

    for span in spans {
        if policy == OverlapPolicy::ExcludeTableText {
            let (x, y) = span.bbox.center();
            if tables.iter().any(|t| t.bbox.contains_point(x, y)) {
                continue;
            }
        }
        elements.push(PageElement::from(span.clone()));
    }
    elements.extend(images.iter().cloned().map(PageElement::from));
    elements.extend(tables.iter().map(PageElement::from));

    log::debug!(
        "Page {}: {} elements ({} tables)",
        page.index(),
        elements.len(),
        tables.len()
    );

    Ok(PageAnalysisResult {
        page_index: page.index(),
        page_width,
        page_height,
        elements,
    })
}
