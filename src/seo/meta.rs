use crate::compose::EngineConfig;

use super::html_escape;

/// Per-page inputs to the head block.
pub struct HeadMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub handle: &'a str,
    pub image: Option<&'a str>,
}

/// Build the title, description, canonical and social meta tags for a landing page.
/// Canonical and og:url are omitted when no canonical base is configured.
pub fn build_head(config: &EngineConfig, page: &HeadMeta) -> String {
    let canonical = config
        .canonical_base
        .as_deref()
        .map(|base| format!("{}/{}", base.trim_end_matches('/'), page.handle));

    let mut meta = String::new();

    // Basic meta
    meta.push_str(&format!(
        r#"<title>{}</title>
<meta name="description" content="{}">"#,
        html_escape(page.title),
        html_escape(page.description),
    ));

    if let Some(ref url) = canonical {
        meta.push_str(&format!(
            "\n<link rel=\"canonical\" href=\"{}\">",
            html_escape(url)
        ));
    }

    // Open Graph
    if config.open_graph {
        meta.push_str(&format!(
            r#"
<meta property="og:title" content="{}">
<meta property="og:description" content="{}">
<meta property="og:site_name" content="{}">
<meta property="og:type" content="website">"#,
            html_escape(page.title),
            html_escape(page.description),
            html_escape(&config.site_name),
        ));
        if let Some(ref url) = canonical {
            meta.push_str(&format!(
                "\n<meta property=\"og:url\" content=\"{}\">",
                html_escape(url)
            ));
        }
        if let Some(img) = page.image {
            meta.push_str(&format!(
                "\n<meta property=\"og:image\" content=\"{}\">",
                html_escape(img)
            ));
        }
    }

    // Twitter Cards
    if config.twitter_cards {
        meta.push_str(&format!(
            r#"
<meta name="twitter:card" content="summary_large_image">
<meta name="twitter:title" content="{}">
<meta name="twitter:description" content="{}">"#,
            html_escape(page.title),
            html_escape(page.description),
        ));
        if let Some(img) = page.image {
            meta.push_str(&format!(
                "\n<meta name=\"twitter:image\" content=\"{}\">",
                html_escape(img)
            ));
        }
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(config: &EngineConfig) -> String {
        build_head(
            config,
            &HeadMeta {
                title: "Cold Brew \"Guide\"",
                description: "Everything <about> cold brew",
                handle: "cold-brew",
                image: Some("/img/cold.webp"),
            },
        )
    }

    #[test]
    fn head_basic_tags_escaped() {
        let out = head(&EngineConfig::default());
        assert!(out.contains("<title>Cold Brew &quot;Guide&quot;</title>"));
        assert!(out.contains("content=\"Everything &lt;about&gt; cold brew\""));
    }

    #[test]
    fn head_canonical_optional() {
        let mut config = EngineConfig::default();
        config.canonical_base = Some("https://example.com/".to_string());
        let out = head(&config);
        assert!(out.contains(r#"<link rel="canonical" href="https://example.com/cold-brew">"#));
        assert!(out.contains("og:url"));

        config.canonical_base = None;
        let out = head(&config);
        assert!(!out.contains("canonical"));
        assert!(!out.contains("og:url"));
    }

    #[test]
    fn head_social_tags_toggle() {
        let mut config = EngineConfig::default();
        config.open_graph = true;
        config.twitter_cards = true;
        let out = head(&config);
        assert!(out.contains("og:title"));
        assert!(out.contains("og:image"));
        assert!(out.contains("twitter:card"));
        assert!(out.contains("twitter:image"));

        config.open_graph = false;
        config.twitter_cards = false;
        let out = head(&config);
        assert!(!out.contains("og:title"));
        assert!(!out.contains("twitter:card"));
    }
}
