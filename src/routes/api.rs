use log::{info, warn};
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use std::sync::Arc;

use crate::ai::{self, ContentGenerator, ImageSearch};
use crate::compose::related::resolve_related;
use crate::compose::{assemble_document, EngineConfig, HeadingLevel, PageDraft, Warning};
use crate::models::page::{Page, PageStatus};
use crate::store::Store;

// ── Request / Response Types ──────────────────────────

#[derive(Debug, Deserialize)]
pub struct HeadingRequest {
    pub keyword: String,
    #[serde(default)]
    pub level: Option<HeadingLevel>,
}

/// A page draft plus authoring options. When `sections` is empty the
/// `headings` are run through the content generator; when `images` is empty
/// and `image_query` is set the image search fills the pool.
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    #[serde(flatten)]
    pub draft: PageDraft,
    #[serde(default)]
    pub headings: Vec<HeadingRequest>,
    #[serde(default)]
    pub image_query: Option<String>,
    #[serde(default)]
    pub image_limit: Option<usize>,
    /// Store the merged content region instead of raw sections.
    #[serde(default)]
    pub merged: bool,
    /// Replaces the page's related links when present.
    #[serde(default)]
    pub related_page_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub id: i64,
    pub handle: String,
    pub html: String,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: PageStatus,
}

#[derive(Debug, Deserialize)]
pub struct RelatedRequest {
    pub page_ids: Vec<i64>,
}

const DEFAULT_IMAGE_LIMIT: usize = 10;

// ── Authoring ─────────────────────────────────────────

fn fill_draft(req: &mut PageRequest, generator: &dyn ContentGenerator, search: &dyn ImageSearch) {
    if req.draft.sections.is_empty() && !req.headings.is_empty() {
        let headings: Vec<(String, HeadingLevel)> = req
            .headings
            .iter()
            .map(|h| (h.keyword.clone(), h.level.unwrap_or(HeadingLevel::H2)))
            .collect();
        req.draft.sections = ai::generate_sections(generator, &headings);
    }

    if req.draft.images.is_empty() {
        if let Some(query) = req.image_query.as_deref().filter(|q| !q.trim().is_empty()) {
            let limit = req.image_limit.unwrap_or(DEFAULT_IMAGE_LIMIT);
            req.draft.images = ai::collect_images(search, query, limit);
        }
    }
}

/// Persist the request as page `id` (or a new draft) and assemble it the way
/// it will be served.
fn save_page(
    store: &dyn Store,
    generator: &dyn ContentGenerator,
    search: &dyn ImageSearch,
    id: Option<i64>,
    mut req: PageRequest,
) -> Result<PageResponse, String> {
    let config = EngineConfig::from_store(store);
    fill_draft(&mut req, generator, search);

    let mut form = req.draft.to_form(req.merged, &config);
    form.normalize()?;

    let id = store.page_save(id, &form, req.related_page_ids.as_deref())?;

    let mut draft = req.draft;
    draft.handle = form.handle.clone();
    draft.related = resolve_related(store, id, config.related_limit);
    let doc = assemble_document(&draft, &config);

    Ok(PageResponse {
        id,
        handle: form.handle,
        html: doc.html,
        warnings: doc.warnings,
    })
}

pub fn create_page(
    store: &dyn Store,
    generator: &dyn ContentGenerator,
    search: &dyn ImageSearch,
    req: PageRequest,
) -> Result<PageResponse, String> {
    save_page(store, generator, search, None, req)
}

pub fn update_page(
    store: &dyn Store,
    generator: &dyn ContentGenerator,
    search: &dyn ImageSearch,
    id: i64,
    req: PageRequest,
) -> Result<PageResponse, String> {
    if store.page_find_by_id(id).is_none() {
        return Err(format!("page {} not found", id));
    }
    save_page(store, generator, search, Some(id), req)
}

fn page_json(resp: PageResponse) -> Json<Value> {
    Json(json!({
        "ok": true,
        "id": resp.id,
        "handle": resp.handle,
        "html": resp.html,
        "warnings": resp.warnings,
    }))
}

// ── Pages ─────────────────────────────────────────────

#[post("/pages", format = "json", data = "<body>")]
pub fn create(
    store: &State<Arc<dyn Store>>,
    generator: &State<Arc<dyn ContentGenerator>>,
    search: &State<Arc<dyn ImageSearch>>,
    body: Json<PageRequest>,
) -> Json<Value> {
    match create_page(&**store.inner(), &**generator.inner(), &**search.inner(), body.into_inner()) {
        Ok(resp) => {
            info!("created page {} ({}), {} warning(s)", resp.id, resp.handle, resp.warnings.len());
            page_json(resp)
        }
        Err(e) => {
            warn!("page create failed: {}", e);
            Json(json!({"ok": false, "error": e}))
        }
    }
}

#[put("/pages/<id>", format = "json", data = "<body>")]
pub fn update(
    store: &State<Arc<dyn Store>>,
    generator: &State<Arc<dyn ContentGenerator>>,
    search: &State<Arc<dyn ImageSearch>>,
    id: i64,
    body: Json<PageRequest>,
) -> Json<Value> {
    match update_page(&**store.inner(), &**generator.inner(), &**search.inner(), id, body.into_inner()) {
        Ok(resp) => {
            info!("updated page {} ({})", resp.id, resp.handle);
            page_json(resp)
        }
        Err(e) => {
            warn!("page {} update failed: {}", id, e);
            Json(json!({"ok": false, "error": e}))
        }
    }
}

#[post("/pages/<id>/status", format = "json", data = "<body>")]
pub fn set_status(store: &State<Arc<dyn Store>>, id: i64, body: Json<StatusRequest>) -> Json<Value> {
    match store.page_update_status(id, body.status) {
        Ok(()) => {
            info!("page {} is now {}", id, body.status.as_str());
            Json(json!({"ok": true, "status": body.status}))
        }
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}

#[put("/pages/<id>/related", format = "json", data = "<body>")]
pub fn set_related(store: &State<Arc<dyn Store>>, id: i64, body: Json<RelatedRequest>) -> Json<Value> {
    if store.page_find_by_id(id).is_none() {
        return Json(json!({"ok": false, "error": format!("page {} not found", id)}));
    }
    match store.related_set(id, &body.page_ids) {
        Ok(()) => Json(json!({"ok": true})),
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}

#[get("/pages/<id>")]
pub fn get_page(store: &State<Arc<dyn Store>>, id: i64) -> Option<Json<Page>> {
    store.page_find_by_id(id).map(Json)
}

#[delete("/pages/<id>")]
pub fn delete_page(store: &State<Arc<dyn Store>>, id: i64) -> Json<Value> {
    match store.page_delete(id) {
        Ok(()) => Json(json!({"ok": true})),
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create, update, set_status, set_related, get_page, delete_page]
}
