use log::debug;

use crate::compose::banners::place_banners;
use crate::compose::images::{assign_images, assignment_warnings, content_pool};
use crate::compose::related::render_carousel;
use crate::compose::sections::{
    compose_sections, serialize_merged, serialize_sections, ContentSection, HeadingLevel,
    LayoutSide, IMAGE_MARKER,
};
use crate::compose::template::{BaseTemplate, RegionValues};
use crate::compose::{AssembledDocument, EngineConfig, PageDraft, Warning};
use crate::models::asset::{is_valid_image_url, is_valid_link_url, non_blank, BannerAd, HeroSection, ImageAsset};
use crate::models::page::Page;
use crate::models::related::RelatedLink;
use crate::seo::{build_faq_jsonld, build_head, html_escape, HeadMeta};

/// Trailing script: smooth in-page anchor scrolling and a back-to-top button.
const PAGE_SCRIPT: &str = r##"<button id="back-to-top" aria-label="Back to top" hidden>↑</button>
<script>
(function(){
document.addEventListener('click',function(e){
var a=e.target.closest?e.target.closest('a[href^="#"]'):null;
if(!a)return;
var id=a.getAttribute('href').slice(1);
var el=id?document.getElementById(id):null;
if(!el)return;
e.preventDefault();
el.scrollIntoView({behavior:'smooth',block:'start'});
history.replaceState(null,'','#'+id);
});
var btn=document.getElementById('back-to-top');
if(!btn)return;
window.addEventListener('scroll',function(){btn.hidden=window.scrollY<=300;});
btn.addEventListener('click',function(){window.scrollTo({top:0,behavior:'smooth'});});
})();
</script>"##;

const BANNER_PLACEHOLDER: &str = r#"<div class="lp-banner-placeholder" aria-hidden="true"></div>"#;

/// Borrowed view of the page fields that feed rendering, shared by the authoring
/// and view paths.
pub(crate) struct DocumentParts<'a> {
    pub handle: &'a str,
    pub main_keyword: &'a str,
    pub meta_title: &'a str,
    pub meta_description: &'a str,
    pub hero: Option<&'a HeroSection>,
    pub faq_content: &'a str,
    pub faq_schema: Option<&'a str>,
    pub images: &'a [ImageAsset],
    pub banner_ads: &'a [BannerAd],
    pub related: &'a [RelatedLink],
}

impl<'a> DocumentParts<'a> {
    fn from_draft(draft: &'a PageDraft, handle: &'a str) -> Self {
        DocumentParts {
            handle,
            main_keyword: &draft.main_keyword,
            meta_title: &draft.meta_title,
            meta_description: &draft.meta_description,
            hero: draft.hero_section.as_ref(),
            faq_content: &draft.faq_content,
            faq_schema: draft.faq_schema.as_deref(),
            images: &draft.images,
            banner_ads: &draft.banner_ads,
            related: &draft.related,
        }
    }

    pub(crate) fn from_page(page: &'a Page, related: &'a [RelatedLink]) -> Self {
        DocumentParts {
            handle: &page.handle,
            main_keyword: &page.main_keyword,
            meta_title: &page.meta_title,
            meta_description: &page.meta_description,
            hero: page.hero_section.as_ref(),
            faq_content: &page.faq_content,
            faq_schema: page.faq_schema.as_deref(),
            images: &page.images,
            banner_ads: &page.banner_ads,
            related,
        }
    }
}

/// What goes into the content region.
pub(crate) enum Body<'a> {
    /// Sections still to be merged with images and banners.
    Sections(&'a [ContentSection]),
    /// A content region rendered earlier, inserted untouched.
    Verbatim(&'a str),
}

/// Assemble the full document for an authoring-time draft.
pub fn assemble_document(draft: &PageDraft, config: &EngineConfig) -> AssembledDocument {
    let sections = compose_sections(&draft.sections);
    let handle = draft.effective_handle();
    let parts = DocumentParts::from_draft(draft, &handle);
    render_document(&parts, Body::Sections(&sections), config)
}

/// The `content` string persisted for a draft: raw sections, or with `merged`
/// the rendered content region behind the merged marker.
pub fn stored_content(draft: &PageDraft, merged: bool, config: &EngineConfig) -> String {
    let sections = compose_sections(&draft.sections);
    if !merged {
        return serialize_sections(&sections);
    }
    let handle = draft.effective_handle();
    let parts = DocumentParts::from_draft(draft, &handle);
    let mut warnings = Vec::new();
    let pool = content_pool(parts.images, &mut warnings);
    serialize_merged(&render_content(&parts, &sections, &pool, config, &mut warnings))
}

pub(crate) fn render_document(parts: &DocumentParts, body: Body, config: &EngineConfig) -> AssembledDocument {
    let mut warnings = Vec::new();

    let template = match config.template.as_deref() {
        Some(source) => BaseTemplate::parse(source).unwrap_or_else(|error| {
            warnings.push(Warning::InvalidTemplate { error });
            BaseTemplate::default_template()
        }),
        None => BaseTemplate::default_template(),
    };

    let pool = content_pool(parts.images, &mut warnings);

    let content = match body {
        Body::Sections(sections) => render_content(parts, sections, &pool, config, &mut warnings),
        Body::Verbatim(raw) => fill_placeholders(raw, &pool, parts.main_keyword, &mut warnings),
    };

    let hero = parts.hero.filter(|h| h.enabled);
    let hero_html = hero
        .map(|h| render_hero(h, parts.main_keyword, config, &mut warnings))
        .unwrap_or_default();

    let schema = build_faq_jsonld(parts.faq_schema).unwrap_or_else(|error| {
        warnings.push(Warning::InvalidFaqSchema { error });
        String::new()
    });

    let og_image = hero
        .and_then(|h| non_blank(h.image1.as_deref()))
        .filter(|url| is_valid_image_url(url))
        .or_else(|| pool.first().map(|img| img.url.as_str()));
    let title = non_blank(Some(parts.meta_title)).unwrap_or(parts.main_keyword);
    let head = build_head(
        config,
        &HeadMeta {
            title,
            description: parts.meta_description,
            handle: parts.handle,
            image: og_image,
        },
    );

    let related = render_carousel(parts.related, &mut warnings);

    let values = RegionValues {
        head,
        schema,
        hero: hero_html,
        content,
        faq: parts.faq_content.to_string(),
        related,
        scripts: PAGE_SCRIPT.to_string(),
    };

    for w in &warnings {
        debug!("page {}: {}", parts.handle, w);
    }

    AssembledDocument {
        html: template.render(&values),
        warnings,
    }
}

/// Table of contents followed by section rows with banners interleaved.
fn render_content(
    parts: &DocumentParts,
    sections: &[ContentSection],
    pool: &[&ImageAsset],
    config: &EngineConfig,
    warnings: &mut Vec<Warning>,
) -> String {
    let assignment = assign_images(sections, pool.len());
    assignment_warnings(&assignment, pool.len(), warnings);
    let banner_slots = place_banners(sections, parts.banner_ads, config.banner_interval);

    let mut html = render_toc(sections);
    let mut pending = banner_slots.iter().peekable();

    for (i, section) in sections.iter().enumerate() {
        let image = assignment
            .slots
            .get(i)
            .copied()
            .flatten()
            .and_then(|k| pool.get(k).copied());
        html.push_str(&render_section_row(section, image, parts.main_keyword));

        let position = i + 1;
        while let Some(slot) = pending.next_if(|s| s.after_position == position) {
            if let Some(banner) = parts.banner_ads.get(slot.banner_index) {
                html.push_str(&render_banner_row(banner, slot.banner_index, parts.main_keyword, warnings));
            }
        }
    }

    html
}

/// Fill image placeholders left in already-rendered markup, cycling through the
/// pool in the order the placeholders appear. With an empty pool they stay.
fn fill_placeholders(raw: &str, pool: &[&ImageAsset], main_keyword: &str, warnings: &mut Vec<Warning>) -> String {
    let markers = raw.matches(IMAGE_MARKER).count();
    if markers == 0 {
        return raw.to_string();
    }
    if pool.is_empty() {
        warnings.push(Warning::NoContentImages { placeholders: markers });
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    for (k, piece) in raw.split(IMAGE_MARKER).enumerate() {
        if k > 0 {
            out.push_str(&content_image(pool[(k - 1) % pool.len()], main_keyword));
        }
        out.push_str(piece);
    }
    out
}

fn content_image(img: &ImageAsset, main_keyword: &str) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" loading=\"lazy\" class=\"img-fluid\">",
        html_escape(&img.url),
        html_escape(img.alt_or(main_keyword))
    )
}

/// Anchor id for a heading. Identical keywords share an id.
pub fn heading_id(section: &ContentSection) -> String {
    let id = slug::slugify(&section.keyword);
    if id.is_empty() {
        format!("section-{}", section.sort_order)
    } else {
        id
    }
}

fn render_toc(sections: &[ContentSection]) -> String {
    let items: Vec<String> = sections
        .iter()
        .filter(|s| s.heading_level == HeadingLevel::H2)
        .map(|s| {
            format!(
                "<li><a href=\"#{}\">{}</a></li>",
                heading_id(s),
                html_escape(&s.keyword)
            )
        })
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!(
        "<nav class=\"lp-toc\" aria-label=\"Contents\">\n<ol>\n{}\n</ol>\n</nav>\n",
        items.join("\n")
    )
}

fn render_section_row(section: &ContentSection, image: Option<&ImageAsset>, main_keyword: &str) -> String {
    let tag = section.heading_level.tag();
    let heading = format!(
        "<{tag} id=\"{}\">{}</{tag}>",
        heading_id(section),
        html_escape(&section.keyword),
        tag = tag
    );
    let text = if section.body_text.is_empty() {
        heading
    } else {
        format!("{}\n{}", heading, section.body_text)
    };
    let side = section.layout_side.as_str();

    if !section.image_placeholder {
        return format!(
            "<div class=\"row lp-section lp-{}\" data-section=\"{}\">\n<div class=\"col-md-12 lp-text\">\n{}\n</div>\n</div>\n",
            side, section.sort_order, text
        );
    }

    let media = match image {
        Some(img) => content_image(img, main_keyword),
        None => IMAGE_MARKER.to_string(),
    };
    let text_col = format!("<div class=\"col-md-8 lp-text\">\n{}\n</div>", text);
    let media_col = format!("<div class=\"col-md-4 lp-media\">\n{}\n</div>", media);
    let (first, second) = match section.layout_side {
        LayoutSide::Left => (text_col, media_col),
        LayoutSide::Right => (media_col, text_col),
    };

    format!(
        "<div class=\"row lp-section lp-{}\" data-section=\"{}\">\n{}\n{}\n</div>\n",
        side, section.sort_order, first, second
    )
}

fn render_banner_row(banner: &BannerAd, index: usize, main_keyword: &str, warnings: &mut Vec<Warning>) -> String {
    let media = match banner.image.as_ref() {
        Some(img) if is_valid_image_url(&img.url) => content_image(img, main_keyword),
        Some(img) => {
            warnings.push(Warning::InvalidImageUrl {
                slot: "banner".to_string(),
                url: img.url.clone(),
            });
            BANNER_PLACEHOLDER.to_string()
        }
        None => BANNER_PLACEHOLDER.to_string(),
    };

    let mut text = format!(
        "<h3 class=\"lp-banner-title\">{}</h3>",
        html_escape(&banner.title)
    );
    if let Some(desc) = non_blank(Some(banner.description.as_str())) {
        text.push_str(&format!(
            "\n<p class=\"lp-banner-description\">{}</p>",
            html_escape(desc)
        ));
    }
    if let Some(cta) = non_blank(Some(banner.cta.as_str())) {
        let cta_url = non_blank(banner.cta_url.as_deref()).filter(|url| {
            let ok = is_valid_link_url(url);
            if !ok {
                warnings.push(Warning::InvalidLinkUrl {
                    slot: "banner".to_string(),
                    url: url.to_string(),
                });
            }
            ok
        });
        match cta_url {
            Some(url) => text.push_str(&format!(
                "\n<a class=\"btn lp-banner-cta\" href=\"{}\">{}</a>",
                html_escape(url),
                html_escape(cta)
            )),
            None => text.push_str(&format!(
                "\n<span class=\"btn lp-banner-cta\">{}</span>",
                html_escape(cta)
            )),
        }
    }

    format!(
        "<aside class=\"row lp-banner\" data-banner=\"{}\">\n<div class=\"col-md-4 lp-banner-media\">\n{}\n</div>\n<div class=\"col-md-8 lp-banner-text\">\n{}\n</div>\n</aside>\n",
        index, media, text
    )
}

/// Stored hero image if usable, else the template default for that slot.
fn hero_image<'a>(url: Option<&'a str>, default: &'a str, slot: &str, warnings: &mut Vec<Warning>) -> &'a str {
    match non_blank(url) {
        Some(u) if is_valid_image_url(u) => u,
        Some(u) => {
            warnings.push(Warning::InvalidImageUrl {
                slot: slot.to_string(),
                url: u.to_string(),
            });
            default
        }
        None => default,
    }
}

fn render_hero(hero: &HeroSection, main_keyword: &str, config: &EngineConfig, warnings: &mut Vec<Warning>) -> String {
    let h1 = non_blank(Some(hero.h1.as_str())).unwrap_or(main_keyword);

    let mut text = format!("<h1 class=\"lp-hero-title\">{}</h1>", html_escape(h1));
    if let Some(slogan) = non_blank(hero.slogan.as_deref()) {
        text.push_str(&format!(
            "\n<p class=\"lp-hero-slogan\">{}</p>",
            html_escape(slogan)
        ));
    }
    if let Some(span) = non_blank(hero.span.as_deref()) {
        text.push_str(&format!(
            "\n<span class=\"lp-hero-span\">{}</span>",
            html_escape(span)
        ));
    }
    let button = hero.button().filter(|(url, _)| {
        let ok = is_valid_link_url(url);
        if !ok {
            warnings.push(Warning::InvalidLinkUrl {
                slot: "hero".to_string(),
                url: url.to_string(),
            });
        }
        ok
    });
    if let Some((url, label)) = button {
        text.push_str(&format!(
            "\n<a class=\"btn lp-hero-button\" href=\"{}\">{}</a>",
            html_escape(url),
            html_escape(label)
        ));
    }

    let image1 = hero_image(hero.image1.as_deref(), &config.hero_default_image_1, "hero", warnings);
    let image2 = hero_image(hero.image2.as_deref(), &config.hero_default_image_2, "hero", warnings);
    let alt1 = non_blank(hero.alt1.as_deref()).unwrap_or(main_keyword);
    let alt2 = non_blank(hero.alt2.as_deref()).unwrap_or(main_keyword);

    format!(
        "<section class=\"lp-hero\" id=\"hero\">\n<div class=\"row\">\n<div class=\"col-md-6 lp-hero-text\">\n{}\n</div>\n<div class=\"col-md-6 lp-hero-media\">\n<img class=\"lp-hero-image-1\" src=\"{}\" alt=\"{}\">\n<img class=\"lp-hero-image-2\" src=\"{}\" alt=\"{}\">\n</div>\n</div>\n</section>",
        text,
        html_escape(image1),
        html_escape(alt1),
        html_escape(image2),
        html_escape(alt2),
    )
}
