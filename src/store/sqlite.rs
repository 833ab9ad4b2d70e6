use std::collections::HashMap;

use crate::db::DbPool;
use crate::models::page::{Page, PageForm, PageStatus};
use crate::models::related::RelatedLink;
use crate::models::settings::Setting;

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    fn seed_defaults(&self) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool).map_err(|e| e.to_string())
    }

    // ── Settings ────────────────────────────────────────────────────

    fn setting_get(&self, key: &str) -> Option<String> {
        Setting::get(&self.pool, key)
    }

    fn setting_set(&self, key: &str, value: &str) -> Result<(), String> {
        Setting::set(&self.pool, key, value)
    }

    fn setting_set_many(&self, settings: &HashMap<String, String>) -> Result<(), String> {
        Setting::set_many(&self.pool, settings)
    }

    fn setting_all(&self) -> HashMap<String, String> {
        Setting::all(&self.pool)
    }

    // ── Pages ───────────────────────────────────────────────────────

    fn page_find_by_id(&self, id: i64) -> Option<Page> {
        Page::find_by_id(&self.pool, id)
    }

    fn page_find_by_handle(&self, handle: &str) -> Option<Page> {
        Page::find_by_handle(&self.pool, handle)
    }

    fn page_list(&self, status: Option<PageStatus>, limit: i64, offset: i64) -> Vec<Page> {
        Page::list(&self.pool, status, limit, offset)
    }

    fn page_count(&self, status: Option<PageStatus>) -> i64 {
        Page::count(&self.pool, status)
    }

    fn page_create(&self, form: &PageForm) -> Result<i64, String> {
        Page::create(&self.pool, form)
    }

    fn page_update(&self, id: i64, form: &PageForm) -> Result<(), String> {
        Page::update(&self.pool, id, form)
    }

    fn page_save(&self, id: Option<i64>, form: &PageForm, related: Option<&[i64]>) -> Result<i64, String> {
        Page::save(&self.pool, id, form, related)
    }

    fn page_update_status(&self, id: i64, status: PageStatus) -> Result<(), String> {
        Page::update_status(&self.pool, id, status)
    }

    fn page_delete(&self, id: i64) -> Result<(), String> {
        Page::delete(&self.pool, id)
    }

    // ── Related links ───────────────────────────────────────────────

    fn related_for_page(&self, page_id: i64) -> Result<Vec<RelatedLink>, String> {
        RelatedLink::for_page(&self.pool, page_id)
    }

    fn related_set(&self, page_id: i64, target_ids: &[i64]) -> Result<(), String> {
        RelatedLink::set_for_page(&self.pool, page_id, target_ids)
    }
}
