use crate::models::page::PageStatus;
use crate::store::Store;

/// Generate sitemap.xml content listing every published landing page.
/// Returns None if seo_sitemap_enabled is false.
pub fn generate_sitemap(store: &dyn Store) -> Option<String> {
    if !store.setting_get_bool("seo_sitemap_enabled") {
        return None;
    }

    let site_url = store.setting_get_or("site_url", "http://localhost:8000");
    let site_url = site_url.trim_end_matches('/');

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );

    xml.push_str(&format!(
        "  <url><loc>{}/</loc><changefreq>daily</changefreq><priority>1.0</priority></url>\n",
        site_url
    ));

    let pages = store.page_list(Some(PageStatus::Published), 5000, 0);
    for page in &pages {
        let lastmod = page.updated_at.format("%Y-%m-%d").to_string();
        xml.push_str(&format!(
            "  <url><loc>{}/{}</loc><lastmod>{}</lastmod><priority>0.7</priority></url>\n",
            site_url, page.handle, lastmod
        ));
    }

    xml.push_str("</urlset>");
    Some(xml)
}

/// Generate robots.txt content with dynamic sitemap URL.
pub fn generate_robots(store: &dyn Store) -> String {
    let mut content = store.setting_get_or("seo_robots_txt", "User-agent: *\nAllow: /");
    let site_url = store.setting_get_or("site_url", "http://localhost:8000");
    if store.setting_get_bool("seo_sitemap_enabled") {
        content.push_str(&format!(
            "\nSitemap: {}/sitemap.xml",
            site_url.trim_end_matches('/')
        ));
    }
    content
}
