use rocket::response::content::{RawHtml, RawXml};
use rocket::State;

use std::sync::Arc;

use crate::models::page::PageStatus;
use crate::seo;
use crate::store::Store;

use super::render_stored;

// ── Landing page ───────────────────────────────────────

#[get("/<handle>", rank = 5)]
pub fn landing_page(store: &State<Arc<dyn Store>>, handle: &str) -> Option<RawHtml<String>> {
    let page = store.page_find_by_handle(handle)?;
    if page.status != PageStatus::Published {
        return None;
    }
    Some(RawHtml(render_stored(&**store.inner(), &page).html))
}

// ── Sitemap ────────────────────────────────────────────

#[get("/sitemap.xml")]
pub fn sitemap(store: &State<Arc<dyn Store>>) -> Option<RawXml<String>> {
    seo::generate_sitemap(&**store.inner()).map(RawXml)
}

// ── Robots.txt ─────────────────────────────────────────

#[get("/robots.txt")]
pub fn robots(store: &State<Arc<dyn Store>>) -> String {
    seo::generate_robots(&**store.inner())
}

pub fn routes() -> Vec<rocket::Route> {
    routes![landing_page, sitemap, robots]
}
