pub mod admin;
pub mod api;
pub mod public;

use log::debug;

use crate::compose::related::resolve_related;
use crate::compose::{reconstruct_view_with_warnings, AssembledDocument, EngineConfig};
use crate::models::page::Page;
use crate::store::Store;

/// Reconstruct a stored page with its related links and current settings.
pub(crate) fn render_stored(store: &dyn Store, page: &Page) -> AssembledDocument {
    let config = EngineConfig::from_store(store);
    let related = resolve_related(store, page.id, config.related_limit);
    let doc = reconstruct_view_with_warnings(page, &related, &config);
    if !doc.warnings.is_empty() {
        debug!("page {} rendered with {} warning(s)", page.handle, doc.warnings.len());
    }
    doc
}
