use rocket::response::content::RawHtml;
use rocket::State;

use std::sync::Arc;

use crate::store::Store;

use super::render_stored;

/// Any status renders here, so editors can check drafts and archived pages.
#[get("/pages/<id>/preview")]
pub fn preview(store: &State<Arc<dyn Store>>, id: i64) -> Option<RawHtml<String>> {
    let page = store.page_find_by_id(id)?;
    Some(RawHtml(render_stored(&**store.inner(), &page).html))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![preview]
}
