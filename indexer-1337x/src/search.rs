use crate::mapper::{FieldMapper, ListingDraft};
use crate::row::Page;

/// Extracts every named listing of one results page, in row order.
pub(crate) fn parse(mapper: &FieldMapper, html: &str) -> Vec<ListingDraft> {
    let page = Page::parse(html);
    let mut rows = 0;
    let mut drafts = Vec::new();

    for row in page.rows() {
        rows += 1;
        match mapper.map(&row) {
            Some(found) => drafts.push(found),
            None => tracing::debug!("row {rows} has no listing anchor"),
        }
    }

    if rows == 0 {
        tracing::debug!("no table row found, falling back to raw markup scan");
        return crate::fallback::parse(mapper, html);
    }

    tracing::debug!("found {} listings in {rows} rows", drafts.len());
    drafts
}
