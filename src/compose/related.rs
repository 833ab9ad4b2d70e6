use log::warn;

use crate::compose::Warning;
use crate::models::asset::is_valid_image_url;
use crate::models::related::RelatedLink;
use crate::seo::html_escape;
use crate::store::Store;

/// Related pages for `page_id`, capped at `limit` (0 = no cap).
/// Lookup failures degrade to an empty list.
pub fn resolve_related(store: &dyn Store, page_id: i64, limit: usize) -> Vec<RelatedLink> {
    match store.related_for_page(page_id) {
        Ok(mut links) => {
            if limit > 0 {
                links.truncate(limit);
            }
            links
        }
        Err(e) => {
            warn!("related links for page {} unavailable: {}", page_id, e);
            Vec::new()
        }
    }
}

/// The related-pages carousel. Always emitted; hidden when there are no links so
/// client scripts find the same DOM either way.
pub fn render_carousel(links: &[RelatedLink], warnings: &mut Vec<Warning>) -> String {
    if links.is_empty() {
        return "<section class=\"lp-related\" id=\"related-pages\" data-count=\"0\" hidden>\n\
                <div class=\"lp-related-track\"></div>\n\
                </section>"
            .to_string();
    }

    let mut html = format!(
        "<section class=\"lp-related\" id=\"related-pages\" data-count=\"{}\">\n\
         <h2 class=\"lp-related-heading\">Related pages</h2>\n\
         <div class=\"lp-related-track\">\n",
        links.len()
    );
    for link in links {
        html.push_str(&format!(
            "<a class=\"lp-related-card\" href=\"/{}\">\n",
            html_escape(&link.handle)
        ));
        let image = link.hero_image.as_deref().filter(|url| {
            let ok = is_valid_image_url(url);
            if !ok {
                warnings.push(Warning::InvalidImageUrl {
                    slot: "related".to_string(),
                    url: url.to_string(),
                });
            }
            ok
        });
        if let Some(img) = image {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
                html_escape(img),
                html_escape(&link.main_keyword)
            ));
        }
        html.push_str(&format!(
            "<h3>{}</h3>\n",
            html_escape(&link.main_keyword)
        ));
        if !link.excerpt.trim().is_empty() {
            html.push_str(&format!("<p>{}</p>\n", html_escape(&link.excerpt)));
        }
        html.push_str("</a>\n");
    }
    html.push_str("</div>\n</section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(handle: &str, order: i64) -> RelatedLink {
        RelatedLink {
            handle: handle.to_string(),
            main_keyword: handle.replace('-', " "),
            excerpt: format!("About {}", handle),
            hero_image: None,
            sort_order: order,
        }
    }

    #[test]
    fn empty_carousel_is_hidden_container() {
        let html = render_carousel(&[], &mut Vec::new());
        assert!(html.contains("id=\"related-pages\""));
        assert!(html.contains(" hidden>"));
        assert!(html.contains("<div class=\"lp-related-track\"></div>"));
    }

    #[test]
    fn carousel_keeps_caller_order() {
        let html = render_carousel(&[link("zebra-tips", 0), link("apple-pie", 1)], &mut Vec::new());
        let z = html.find("/zebra-tips").unwrap();
        let a = html.find("/apple-pie").unwrap();
        assert!(z < a);
        assert!(!html.contains("hidden"));
        assert!(html.contains("data-count=\"2\""));
    }

    #[test]
    fn carousel_card_image_optional() {
        let mut with_img = link("a", 0);
        with_img.hero_image = Some("/img/a.webp".to_string());
        let html = render_carousel(&[with_img, link("b", 1)], &mut Vec::new());
        assert_eq!(html.matches("<img").count(), 1);
    }

    #[test]
    fn carousel_drops_unsafe_card_image() {
        let mut bad = link("bad", 0);
        bad.hero_image = Some("javascript:alert(1)".to_string());
        let mut warnings = Vec::new();
        let html = render_carousel(&[bad], &mut warnings);
        assert!(!html.contains("<img"));
        assert!(!html.contains("javascript:"));
        assert_eq!(
            warnings,
            vec![Warning::InvalidImageUrl {
                slot: "related".to_string(),
                url: "javascript:alert(1)".to_string(),
            }]
        );
    }
}
