//! First-page predicates used as exit-code checks by build pipelines.

use crate::document::Document;

/// `true` if the first page has no TEXT blocks.
pub fn first_page_is_empty<D: Document>(doc: &D) -> Result<bool, D::Error> {
    let page = doc.page(0)?;
    let empty = page.text_blocks().next().is_none();
    Ok(empty)
}

/// `true` if `needle` occurs in the first page's plain text.
pub fn first_page_contains<D: Document>(doc: &D, needle: &str) -> Result<bool, D::Error> {
    let page = doc.page(0)?;
    Ok(page.text().contains(needle))
}
