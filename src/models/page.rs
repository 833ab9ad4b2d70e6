use chrono::NaiveDateTime;
use log::warn;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::models::asset::{BannerAd, HeroSection, ImageAsset};
use crate::models::related::RelatedLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "draft" => Some(PageStatus::Draft),
            "published" => Some(PageStatus::Published),
            "archived" => Some(PageStatus::Archived),
            _ => None,
        }
    }

    /// Forward path is draft -> published -> archived. Pages can also be sent
    /// back to draft from either later state.
    pub fn can_transition_to(&self, next: PageStatus) -> bool {
        use PageStatus::*;
        matches!(
            (self, next),
            (Draft, Draft)
                | (Published, Published)
                | (Archived, Archived)
                | (Draft, Published)
                | (Published, Archived)
                | (Published, Draft)
                | (Archived, Draft)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Page {
    pub id: i64,
    pub handle: String,
    pub main_keyword: String,
    pub content: String,
    pub faq_content: String,
    pub faq_schema: Option<String>,
    pub meta_title: String,
    pub meta_description: String,
    pub hero_section: Option<HeroSection>,
    pub banner_ads: Vec<BannerAd>,
    pub images: Vec<ImageAsset>,
    pub status: PageStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PageForm {
    #[serde(default)]
    pub handle: String,
    pub main_keyword: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub faq_content: String,
    #[serde(default)]
    pub faq_schema: Option<String>,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub hero_section: Option<HeroSection>,
    #[serde(default)]
    pub banner_ads: Vec<BannerAd>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
}

/// `[a-z0-9-]+`
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl PageForm {
    /// Fills a blank handle from the main keyword, then checks the invariants.
    pub fn normalize(&mut self) -> Result<(), String> {
        if self.main_keyword.trim().is_empty() {
            return Err("main keyword is required".to_string());
        }
        if self.handle.trim().is_empty() {
            self.handle = slug::slugify(&self.main_keyword);
        }
        if !is_valid_handle(&self.handle) {
            return Err(format!("invalid handle '{}': expected [a-z0-9-]+", self.handle));
        }
        Ok(())
    }
}

fn json_column<T: serde::de::DeserializeOwned + Default>(raw: Option<String>, column: &str, id: i64) -> T {
    match raw {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!("page {}: unreadable {} ({}), using empty value", id, column, e);
            T::default()
        }),
        _ => T::default(),
    }
}

impl Page {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get("id")?;
        let status: String = row.get("status")?;
        Ok(Page {
            id,
            handle: row.get("handle")?,
            main_keyword: row.get("main_keyword")?,
            content: row.get("content")?,
            faq_content: row.get("faq_content")?,
            faq_schema: row.get("faq_schema")?,
            meta_title: row.get("meta_title")?,
            meta_description: row.get("meta_description")?,
            hero_section: json_column(row.get("hero_json")?, "hero_json", id),
            banner_ads: json_column(row.get("banners_json")?, "banners_json", id),
            images: json_column(row.get("images_json")?, "images_json", id),
            status: PageStatus::parse(&status).unwrap_or(PageStatus::Draft),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM pages WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn find_by_handle(pool: &DbPool, handle: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM pages WHERE handle = ?1",
            params![handle],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, status: Option<PageStatus>, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let (sql, params_vec): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match status {
            Some(s) => (
                "SELECT * FROM pages WHERE status = ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3",
                vec![
                    Box::new(s.as_str().to_string()),
                    Box::new(limit),
                    Box::new(offset),
                ],
            ),
            None => (
                "SELECT * FROM pages ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                vec![Box::new(limit), Box::new(offset)],
            ),
        };

        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        stmt.query_map(params_refs.as_slice(), Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool, status: Option<PageStatus>) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };

        match status {
            Some(s) => conn
                .query_row(
                    "SELECT COUNT(*) FROM pages WHERE status = ?1",
                    params![s.as_str()],
                    |row| row.get(0),
                )
                .unwrap_or(0),
            None => conn
                .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
                .unwrap_or(0),
        }
    }

    /// New pages always start as drafts.
    pub fn create(pool: &DbPool, form: &PageForm) -> Result<i64, String> {
        Self::save(pool, None, form, None)
    }

    pub fn update(pool: &DbPool, id: i64, form: &PageForm) -> Result<(), String> {
        Self::save(pool, Some(id), form, None).map(|_| ())
    }

    /// Creates (`id` = None) or updates a page and, when `related` is given,
    /// replaces its related set. Either everything is written or nothing is.
    pub fn save(pool: &DbPool, id: Option<i64>, form: &PageForm, related: Option<&[i64]>) -> Result<i64, String> {
        let mut form = form.clone();
        form.normalize()?;

        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;
        let id = match id {
            Some(id) => {
                update_row(&tx, id, &form)?;
                id
            }
            None => insert_row(&tx, &form)?,
        };
        if let Some(targets) = related {
            RelatedLink::replace_for_page(&tx, id, targets)?;
        }
        tx.commit().map_err(|e| e.to_string())?;
        Ok(id)
    }

    pub fn update_status(pool: &DbPool, id: i64, status: PageStatus) -> Result<(), String> {
        let current = Self::find_by_id(pool, id).ok_or_else(|| format!("page {} not found", id))?;
        if !current.status.can_transition_to(status) {
            return Err(format!(
                "cannot move page from {} to {}",
                current.status.as_str(),
                status.as_str()
            ));
        }
        if current.status == status {
            return Ok(());
        }
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE pages SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            params![status.as_str(), id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "DELETE FROM related_links WHERE page_id = ?1 OR target_page_id = ?1",
            params![id],
        )
        .map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM pages WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

fn insert_row(conn: &Connection, form: &PageForm) -> Result<i64, String> {
    let (hero, banners, images) = encode_assets(form)?;
    conn.execute(
        "INSERT INTO pages (handle, main_keyword, content, faq_content, faq_schema,
         meta_title, meta_description, hero_json, banners_json, images_json, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            form.handle,
            form.main_keyword,
            form.content,
            form.faq_content,
            form.faq_schema,
            form.meta_title,
            form.meta_description,
            hero,
            banners,
            images,
            PageStatus::Draft.as_str(),
        ],
    )
    .map_err(|e| e.to_string())?;
    Ok(conn.last_insert_rowid())
}

fn update_row(conn: &Connection, id: i64, form: &PageForm) -> Result<(), String> {
    let (hero, banners, images) = encode_assets(form)?;
    let changed = conn
        .execute(
            "UPDATE pages SET handle = ?1, main_keyword = ?2, content = ?3, faq_content = ?4,
             faq_schema = ?5, meta_title = ?6, meta_description = ?7, hero_json = ?8,
             banners_json = ?9, images_json = ?10, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?11",
            params![
                form.handle,
                form.main_keyword,
                form.content,
                form.faq_content,
                form.faq_schema,
                form.meta_title,
                form.meta_description,
                hero,
                banners,
                images,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
    if changed == 0 {
        return Err(format!("page {} not found", id));
    }
    Ok(())
}

fn encode_assets(form: &PageForm) -> Result<(Option<String>, String, String), String> {
    let hero = match &form.hero_section {
        Some(h) => Some(serde_json::to_string(h).map_err(|e| e.to_string())?),
        None => None,
    };
    let banners = serde_json::to_string(&form.banner_ads).map_err(|e| e.to_string())?;
    let images = serde_json::to_string(&form.images).map_err(|e| e.to_string())?;
    Ok((hero, banners, images))
}
