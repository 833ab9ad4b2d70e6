pub mod jsonld;
pub mod meta;
pub mod sitemap;

// Re-export commonly used functions
pub use jsonld::build_faq_jsonld;
pub use meta::{build_head, HeadMeta};
pub use sitemap::{generate_robots, generate_sitemap};

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inverse of `html_escape` for the four entities it produces.
pub(crate) fn html_unescape(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_roundtrips_entity_lookalikes() {
        for s in ["a & b", "<h2>\"x\"</h2>", "&lt;already&gt;", "&amp;quot;", "-->"] {
            assert_eq!(html_unescape(&html_escape(s)), s);
        }
    }

    #[test]
    fn escape_neutralises_comment_close() {
        assert!(!html_escape("a --> b").contains("-->"));
    }
}
