use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::models::asset::{is_valid_image_url, non_blank, HeroSection, ImageAsset, ImageKind};

/// Summary of another page, shown as one card in the related carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub handle: String,
    pub main_keyword: String,
    pub excerpt: String,
    pub hero_image: Option<String>,
    pub sort_order: i64,
}

/// Picks the card image: enabled hero image1 first, else the first content image.
/// Unusable URLs are skipped in favour of the next candidate.
fn card_image(hero_json: Option<String>, images_json: &str) -> Option<String> {
    let hero: Option<HeroSection> = hero_json.and_then(|s| serde_json::from_str(&s).ok());
    if let Some(h) = hero.filter(|h| h.enabled) {
        if let Some(url) = non_blank(h.image1.as_deref()).filter(|u| is_valid_image_url(u)) {
            return Some(url.to_string());
        }
    }
    let mut images: Vec<ImageAsset> = serde_json::from_str(images_json).unwrap_or_default();
    images.sort_by_key(|i| i.sort_order);
    images
        .into_iter()
        .filter(|i| i.kind == ImageKind::Content)
        .find(|i| is_valid_image_url(&i.url))
        .map(|i| i.url)
}

impl RelatedLink {
    /// Published targets of `page_id`, ordered by their stored sort order.
    pub fn for_page(pool: &DbPool, page_id: i64) -> Result<Vec<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let mut stmt = conn
            .prepare(
                "SELECT p.handle, p.main_keyword, p.meta_description, p.hero_json, p.images_json,
                        rl.sort_order
                 FROM related_links rl
                 JOIN pages p ON p.id = rl.target_page_id
                 WHERE rl.page_id = ?1 AND p.status = 'published'
                 ORDER BY rl.sort_order ASC, rl.target_page_id ASC",
            )
            .map_err(|e| e.to_string())?;

        let rows = stmt
            .query_map(params![page_id], |row| {
                let hero_json: Option<String> = row.get(3)?;
                let images_json: String = row.get(4)?;
                Ok(RelatedLink {
                    handle: row.get(0)?,
                    main_keyword: row.get(1)?,
                    excerpt: row.get(2)?,
                    hero_image: card_image(hero_json, &images_json),
                    sort_order: row.get(5)?,
                })
            })
            .map_err(|e| e.to_string())?;

        rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
    }

    /// Replaces the related set; list position becomes the sort order. Self-links are dropped.
    pub fn set_for_page(pool: &DbPool, page_id: i64, target_ids: &[i64]) -> Result<(), String> {
        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;
        Self::replace_for_page(&tx, page_id, target_ids)?;
        tx.commit().map_err(|e| e.to_string())
    }

    /// `set_for_page` on a caller-owned connection or transaction. Every target
    /// must be an existing page.
    pub fn replace_for_page(conn: &Connection, page_id: i64, target_ids: &[i64]) -> Result<(), String> {
        conn.execute("DELETE FROM related_links WHERE page_id = ?1", params![page_id])
            .map_err(|e| e.to_string())?;
        for (pos, target) in target_ids.iter().filter(|t| **t != page_id).enumerate() {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM pages WHERE id = ?1)",
                    params![target],
                    |row| row.get(0),
                )
                .map_err(|e| e.to_string())?;
            if !exists {
                return Err(format!("related page {} not found", target));
            }
            conn.execute(
                "INSERT OR IGNORE INTO related_links (page_id, target_page_id, sort_order)
                 VALUES (?1, ?2, ?3)",
                params![page_id, target, pos as i64],
            )
            .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}
