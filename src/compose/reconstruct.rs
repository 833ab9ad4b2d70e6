use crate::compose::assemble::{render_document, Body, DocumentParts};
use crate::compose::sections::{parse_stored_content, StoredContent};
use crate::compose::{AssembledDocument, EngineConfig, Warning};
use crate::models::page::Page;
use crate::models::related::RelatedLink;

/// Rebuild the served document for a stored page.
///
/// Pre-merge content is re-merged with the stored images and banners using the
/// authoring placement rules; merged content is inserted as stored. The page is
/// only read.
pub fn reconstruct_view_with_warnings(page: &Page, related: &[RelatedLink], config: &EngineConfig) -> AssembledDocument {
    let parts = DocumentParts::from_page(page, related);
    match parse_stored_content(&page.content) {
        StoredContent::Sections(sections) => render_document(&parts, Body::Sections(&sections), config),
        StoredContent::Merged(raw) => render_document(&parts, Body::Verbatim(raw), config),
        StoredContent::Malformed { raw, error } => {
            let mut doc = render_document(&parts, Body::Verbatim(raw), config);
            doc.warnings.insert(0, Warning::MalformedContent { error });
            doc
        }
    }
}

pub fn reconstruct_view(page: &Page, related: &[RelatedLink], config: &EngineConfig) -> String {
    reconstruct_view_with_warnings(page, related, config).html
}
