use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Default on-disk location of the page database. Overridden by `SEOFORGE_DB`.
pub const DEFAULT_DB_PATH: &str = "website/db/seoforge.db";

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let path = std::env::var("SEOFORGE_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    init_pool_at(&path)
}

pub fn init_pool_at(path: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
    // foreign_keys is per connection, so every pooled connection sets it
    let manager = SqliteConnectionManager::file(path)
        .with_init(|c| c.execute_batch("PRAGMA foreign_keys=ON;"));
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Landing pages. Hero, banners and images are JSON documents owned by the row.
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY,
            handle TEXT UNIQUE NOT NULL,
            main_keyword TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            faq_content TEXT NOT NULL DEFAULT '',
            faq_schema TEXT,
            meta_title TEXT NOT NULL DEFAULT '',
            meta_description TEXT NOT NULL DEFAULT '',
            hero_json TEXT,
            banners_json TEXT NOT NULL DEFAULT '[]',
            images_json TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'draft',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Ordered page -> page links shown in the related carousel
        CREATE TABLE IF NOT EXISTS related_links (
            page_id INTEGER NOT NULL,
            target_page_id INTEGER NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            UNIQUE(page_id, target_page_id),
            FOREIGN KEY (page_id) REFERENCES pages(id) ON DELETE CASCADE,
            FOREIGN KEY (target_page_id) REFERENCES pages(id) ON DELETE CASCADE
        );

        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pages_status ON pages(status);
        CREATE INDEX IF NOT EXISTS idx_related_page ON related_links(page_id, sort_order);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        // General
        ("site_name", "SEOForge"),
        ("site_url", "http://localhost:8000"),
        // SEO
        ("seo_canonical_base", "http://localhost:8000"),
        ("seo_open_graph", "true"),
        ("seo_twitter_cards", "true"),
        ("seo_sitemap_enabled", "true"),
        ("seo_robots_txt", "User-agent: *\nAllow: /"),
        // Landing pages
        ("landing_banner_interval", "2"),
        ("landing_hero_default_image_1", "/static/img/hero-default-1.webp"),
        ("landing_hero_default_image_2", "/static/img/hero-default-2.webp"),
        ("landing_template", ""),
        ("landing_related_limit", "6"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
