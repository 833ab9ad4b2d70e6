//! Landing page composition.
//!
//! Authoring runs sections -> images -> banners -> assembly over a [`PageDraft`];
//! serving replays the same placement rules over a stored page. Both paths
//! end in the same renderer, so a page stored from a draft reconstructs to the
//! document the draft assembled to.
//!
//! Nothing here performs I/O or reads the clock. Configuration arrives as an
//! [`EngineConfig`] snapshot and problems come back as [`Warning`]s.

pub mod assemble;
pub mod banners;
pub mod images;
pub mod reconstruct;
pub mod related;
pub mod sections;
pub mod template;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::asset::{BannerAd, HeroSection, ImageAsset};
use crate::models::page::PageForm;
use crate::models::related::RelatedLink;
use crate::store::Store;

pub use assemble::{assemble_document, stored_content};
pub use banners::DEFAULT_BANNER_INTERVAL;
pub use reconstruct::{reconstruct_view, reconstruct_view_with_warnings};
pub use sections::{HeadingLevel, SectionInput};

/// Snapshot of the settings the renderer depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub site_name: String,
    /// Canonical links are emitted only when set.
    pub canonical_base: Option<String>,
    pub open_graph: bool,
    pub twitter_cards: bool,
    pub banner_interval: usize,
    pub hero_default_image_1: String,
    pub hero_default_image_2: String,
    /// Custom base template; `None` uses the built-in one.
    pub template: Option<String>,
    /// Maximum related cards; 0 means no limit.
    pub related_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            site_name: "SEOForge".to_string(),
            canonical_base: None,
            open_graph: true,
            twitter_cards: true,
            banner_interval: DEFAULT_BANNER_INTERVAL,
            hero_default_image_1: "/static/img/hero-default-1.webp".to_string(),
            hero_default_image_2: "/static/img/hero-default-2.webp".to_string(),
            template: None,
            related_limit: 6,
        }
    }
}

impl EngineConfig {
    pub fn from_store(store: &dyn Store) -> Self {
        let defaults = EngineConfig::default();
        let non_empty = |key: &str| store.setting_get(key).filter(|v| !v.trim().is_empty());

        let interval = store.setting_get_i64("landing_banner_interval");
        let related_limit = store.setting_get_i64("landing_related_limit");

        EngineConfig {
            site_name: non_empty("site_name").unwrap_or(defaults.site_name),
            canonical_base: non_empty("seo_canonical_base"),
            open_graph: store.setting_get_bool("seo_open_graph"),
            twitter_cards: store.setting_get_bool("seo_twitter_cards"),
            banner_interval: if interval > 0 { interval as usize } else { defaults.banner_interval },
            hero_default_image_1: non_empty("landing_hero_default_image_1")
                .unwrap_or(defaults.hero_default_image_1),
            hero_default_image_2: non_empty("landing_hero_default_image_2")
                .unwrap_or(defaults.hero_default_image_2),
            template: non_empty("landing_template"),
            related_limit: related_limit.max(0) as usize,
        }
    }
}

/// Non-fatal problems found while composing. Rendering always completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    ExcessImages {
        image_count: usize,
        h2_count: usize,
        excess: usize,
    },
    NoContentImages {
        placeholders: usize,
    },
    InvalidImageUrl {
        slot: String,
        url: String,
    },
    InvalidLinkUrl {
        slot: String,
        url: String,
    },
    InvalidFaqSchema {
        error: String,
    },
    InvalidTemplate {
        error: String,
    },
    MalformedContent {
        error: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ExcessImages { image_count, h2_count, excess } => write!(
                f,
                "{} content images for {} H2 sections: {} will never be shown",
                image_count, h2_count, excess
            ),
            Warning::NoContentImages { placeholders } => {
                write!(f, "no content images: {} placeholders left empty", placeholders)
            }
            Warning::InvalidImageUrl { slot, url } => {
                write!(f, "skipped {} image with invalid url {:?}", slot, url)
            }
            Warning::InvalidLinkUrl { slot, url } => {
                write!(f, "dropped {} link with unsafe url {:?}", slot, url)
            }
            Warning::InvalidFaqSchema { error } => {
                write!(f, "FAQ schema is not valid JSON ({}); JSON-LD omitted", error)
            }
            Warning::InvalidTemplate { error } => {
                write!(f, "custom template rejected ({}); using default", error)
            }
            Warning::MalformedContent { error } => {
                write!(f, "stored content could not be parsed ({}); served verbatim", error)
            }
        }
    }
}

/// Everything needed to assemble a page at authoring time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDraft {
    #[serde(default)]
    pub handle: String,
    pub main_keyword: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    #[serde(default)]
    pub banner_ads: Vec<BannerAd>,
    #[serde(default)]
    pub hero_section: Option<HeroSection>,
    #[serde(default)]
    pub faq_content: String,
    #[serde(default)]
    pub faq_schema: Option<String>,
    #[serde(default)]
    pub related: Vec<RelatedLink>,
}

impl PageDraft {
    /// The handle the page is stored under: the given one, or the slugified keyword.
    pub fn effective_handle(&self) -> String {
        if self.handle.trim().is_empty() {
            slug::slugify(&self.main_keyword)
        } else {
            self.handle.clone()
        }
    }

    /// Form persisted for this draft. `merged` stores the rendered content
    /// region instead of raw sections.
    pub fn to_form(&self, merged: bool, config: &EngineConfig) -> PageForm {
        PageForm {
            handle: self.effective_handle(),
            main_keyword: self.main_keyword.clone(),
            content: stored_content(self, merged, config),
            faq_content: self.faq_content.clone(),
            faq_schema: self.faq_schema.clone(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
            hero_section: self.hero_section.clone(),
            banner_ads: self.banner_ads.clone(),
            images: self.images.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledDocument {
    pub html: String,
    pub warnings: Vec<Warning>,
}
