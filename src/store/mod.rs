use std::collections::HashMap;

use crate::models::page::{Page, PageForm, PageStatus};
use crate::models::related::RelatedLink;

pub mod sqlite;

/// Unified data-access trait. Every database operation goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;

    // ── Settings ────────────────────────────────────────────────────
    fn setting_get(&self, key: &str) -> Option<String>;
    fn setting_get_or(&self, key: &str, default: &str) -> String {
        self.setting_get(key).unwrap_or_else(|| default.to_string())
    }
    fn setting_get_bool(&self, key: &str) -> bool {
        self.setting_get(key)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
    }
    fn setting_get_i64(&self, key: &str) -> i64 {
        self.setting_get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
    fn setting_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn setting_set_many(&self, settings: &HashMap<String, String>) -> Result<(), String>;
    fn setting_all(&self) -> HashMap<String, String>;

    // ── Pages ───────────────────────────────────────────────────────
    fn page_find_by_id(&self, id: i64) -> Option<Page>;
    fn page_find_by_handle(&self, handle: &str) -> Option<Page>;
    fn page_list(&self, status: Option<PageStatus>, limit: i64, offset: i64) -> Vec<Page>;
    fn page_count(&self, status: Option<PageStatus>) -> i64;
    fn page_create(&self, form: &PageForm) -> Result<i64, String>;
    fn page_update(&self, id: i64, form: &PageForm) -> Result<(), String>;
    /// Create (`id` = None) or update a page together with its related set, atomically.
    fn page_save(&self, id: Option<i64>, form: &PageForm, related: Option<&[i64]>) -> Result<i64, String>;
    fn page_update_status(&self, id: i64, status: PageStatus) -> Result<(), String>;
    fn page_delete(&self, id: i64) -> Result<(), String>;

    // ── Related links ───────────────────────────────────────────────
    fn related_for_page(&self, page_id: i64) -> Result<Vec<RelatedLink>, String>;
    fn related_set(&self, page_id: i64, target_ids: &[i64]) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::{BannerAd, HeroSection, ImageAsset};
    use crate::store::sqlite::SqliteStore;

    /// Create a fresh in-memory SqliteStore with migrations + seed applied.
    fn test_store() -> SqliteStore {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory()
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys=ON;"));
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create in-memory pool");
        let store = SqliteStore::new(pool);
        store.run_migrations().expect("migrations failed");
        store.seed_defaults().expect("seed failed");
        store
    }

    fn form(handle: &str, keyword: &str) -> PageForm {
        PageForm {
            handle: handle.to_string(),
            main_keyword: keyword.to_string(),
            meta_description: format!("All about {}", keyword),
            ..Default::default()
        }
    }

    // ── Settings ────────────────────────────────────────────────────

    #[test]
    fn test_setting_get_set() {
        let s = test_store();
        assert!(s.setting_get("nonexistent_key_xyz").is_none());
        s.setting_set("test_key", "hello").unwrap();
        assert_eq!(s.setting_get("test_key"), Some("hello".to_string()));
    }

    #[test]
    fn test_setting_defaults_seeded() {
        let s = test_store();
        assert_eq!(s.setting_get_i64("landing_banner_interval"), 2);
        assert!(s.setting_get_bool("seo_open_graph"));
        assert_eq!(s.setting_get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_setting_set_many() {
        let s = test_store();
        let mut batch = HashMap::new();
        batch.insert("batch_a".to_string(), "1".to_string());
        batch.insert("batch_b".to_string(), "2".to_string());
        s.setting_set_many(&batch).unwrap();
        let all = s.setting_all();
        assert_eq!(all.get("batch_a").map(String::as_str), Some("1"));
        assert_eq!(all.get("batch_b").map(String::as_str), Some("2"));
    }

    // ── Pages ───────────────────────────────────────────────────────

    #[test]
    fn test_page_create_starts_as_draft() {
        let s = test_store();
        let id = s.page_create(&form("coffee-beans", "coffee beans")).unwrap();
        let page = s.page_find_by_id(id).unwrap();
        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(page.handle, "coffee-beans");
        assert_eq!(s.page_find_by_handle("coffee-beans").unwrap().id, id);
    }

    #[test]
    fn test_page_create_derives_handle_from_keyword() {
        let s = test_store();
        let id = s.page_create(&form("", "Best Espresso Machines")).unwrap();
        let page = s.page_find_by_id(id).unwrap();
        assert_eq!(page.handle, "best-espresso-machines");
    }

    #[test]
    fn test_page_create_rejects_bad_handle() {
        let s = test_store();
        assert!(s.page_create(&form("Bad Handle!", "x")).is_err());
        assert!(s.page_create(&form("ok", "  ")).is_err());
        assert_eq!(s.page_count(None), 0);
    }

    #[test]
    fn test_page_handle_unique() {
        let s = test_store();
        s.page_create(&form("dup", "one")).unwrap();
        assert!(s.page_create(&form("dup", "two")).is_err());
    }

    #[test]
    fn test_page_assets_roundtrip() {
        let s = test_store();
        let mut f = form("assets", "assets");
        f.hero_section = Some(HeroSection {
            enabled: true,
            h1: "Hello".to_string(),
            ..Default::default()
        });
        f.banner_ads = vec![BannerAd {
            title: "Sale".to_string(),
            description: "Half off".to_string(),
            cta: "Shop".to_string(),
            cta_url: None,
            image: None,
        }];
        f.images = vec![ImageAsset::content("/img/a.webp", 0)];
        f.faq_schema = Some("{\"@type\":\"FAQPage\"}".to_string());
        let id = s.page_create(&f).unwrap();
        let page = s.page_find_by_id(id).unwrap();
        assert_eq!(page.hero_section, f.hero_section);
        assert_eq!(page.banner_ads, f.banner_ads);
        assert_eq!(page.images, f.images);
        assert_eq!(page.faq_schema, f.faq_schema);
    }

    #[test]
    fn test_page_update() {
        let s = test_store();
        let id = s.page_create(&form("upd", "before")).unwrap();
        let mut f = form("upd", "after");
        f.content = "<p>new</p>".to_string();
        s.page_update(id, &f).unwrap();
        let page = s.page_find_by_id(id).unwrap();
        assert_eq!(page.main_keyword, "after");
        assert_eq!(page.content, "<p>new</p>");
        assert!(s.page_update(9999, &f).is_err());
    }

    #[test]
    fn test_page_status_transitions() {
        let s = test_store();
        let id = s.page_create(&form("flow", "flow")).unwrap();
        assert!(s.page_update_status(id, PageStatus::Archived).is_err());
        s.page_update_status(id, PageStatus::Published).unwrap();
        assert_eq!(s.page_count(Some(PageStatus::Published)), 1);
        s.page_update_status(id, PageStatus::Archived).unwrap();
        assert!(s.page_update_status(id, PageStatus::Published).is_err());
        s.page_update_status(id, PageStatus::Draft).unwrap();
        assert_eq!(s.page_find_by_id(id).unwrap().status, PageStatus::Draft);
    }

    #[test]
    fn test_page_list_and_delete() {
        let s = test_store();
        let a = s.page_create(&form("a", "a")).unwrap();
        let b = s.page_create(&form("b", "b")).unwrap();
        s.page_update_status(b, PageStatus::Published).unwrap();
        assert_eq!(s.page_list(None, 10, 0).len(), 2);
        assert_eq!(s.page_list(Some(PageStatus::Published), 10, 0)[0].id, b);
        s.page_delete(a).unwrap();
        assert!(s.page_find_by_id(a).is_none());
        assert_eq!(s.page_count(None), 1);
    }

    #[test]
    fn test_page_save_is_atomic() {
        let s = test_store();
        let t = s.page_create(&form("target", "target")).unwrap();
        assert!(s.page_save(None, &form("new", "new"), Some(&[t, 4242][..])).is_err());
        assert!(s.page_find_by_handle("new").is_none());

        let id = s.page_save(None, &form("new", "new"), Some(&[t][..])).unwrap();
        s.page_update_status(t, PageStatus::Published).unwrap();
        assert_eq!(s.related_for_page(id).unwrap().len(), 1);

        // a failed update keeps both the row and the old related set
        assert!(s.page_save(Some(id), &form("new", "renamed"), Some(&[4242][..])).is_err());
        assert_eq!(s.page_find_by_id(id).unwrap().main_keyword, "new");
        assert_eq!(s.related_for_page(id).unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let s = test_store();
        let conn = s.pool.get().unwrap();
        let on: i64 = conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0)).unwrap();
        assert_eq!(on, 1);
    }

    // ── Related links ───────────────────────────────────────────────

    #[test]
    fn test_related_order_and_visibility() {
        let s = test_store();
        let home = s.page_create(&form("home", "home")).unwrap();
        let x = s.page_create(&form("x", "x")).unwrap();
        let y = s.page_create(&form("y", "y")).unwrap();
        let z = s.page_create(&form("z", "z")).unwrap();
        for id in [x, y] {
            s.page_update_status(id, PageStatus::Published).unwrap();
        }
        s.related_set(home, &[y, home, z, x]).unwrap();
        let links = s.related_for_page(home).unwrap();
        let handles: Vec<&str> = links.iter().map(|l| l.handle.as_str()).collect();
        // z is a draft and home is a self-link
        assert_eq!(handles, vec!["y", "x"]);
        assert_eq!(links[0].excerpt, "All about y");
    }

    #[test]
    fn test_related_card_image_prefers_hero() {
        let s = test_store();
        let home = s.page_create(&form("home", "home")).unwrap();
        let mut f = form("target", "target");
        f.images = vec![ImageAsset::content("/img/content.webp", 0)];
        f.hero_section = Some(HeroSection {
            enabled: true,
            image1: Some("/img/hero.webp".to_string()),
            ..Default::default()
        });
        let t = s.page_create(&f).unwrap();
        s.page_update_status(t, PageStatus::Published).unwrap();
        s.related_set(home, &[t]).unwrap();
        let links = s.related_for_page(home).unwrap();
        assert_eq!(links[0].hero_image.as_deref(), Some("/img/hero.webp"));
    }
}
