//! Collaborators that produce raw material for a landing page: section copy
//! and candidate content images. Providers sit behind traits so the HTTP layer
//! can plug in whatever is configured and tests can use stubs. Failures never
//! reach the composition engine; they degrade to fallback copy or an empty pool.

use log::warn;

use crate::compose::{HeadingLevel, SectionInput};
use crate::models::asset::{ImageAsset, ImageKind};
use crate::seo::html_escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiError(pub String);

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Traits ────────────────────────────────────────────

/// Produces HTML body text for one section heading.
pub trait ContentGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, keyword: &str, level: HeadingLevel) -> Result<String, AiError>;
}

/// Finds candidate images for a query.
pub trait ImageSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<ImageAsset>, AiError>;
}

// ── Failover ──────────────────────────────────────────

/// Tries each generator in order and returns the first success.
pub struct FailoverGenerator {
    chain: Vec<Box<dyn ContentGenerator>>,
}

impl FailoverGenerator {
    pub fn new(chain: Vec<Box<dyn ContentGenerator>>) -> Self {
        FailoverGenerator { chain }
    }
}

impl ContentGenerator for FailoverGenerator {
    fn name(&self) -> &str {
        "failover"
    }

    fn generate(&self, keyword: &str, level: HeadingLevel) -> Result<String, AiError> {
        if self.chain.is_empty() {
            return Err(AiError("No content generators configured".into()));
        }

        let mut last_error = String::new();
        for generator in &self.chain {
            match generator.generate(keyword, level) {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => {
                    warn!("generator {} returned empty text for {:?}", generator.name(), keyword);
                    last_error = format!("{} returned empty text", generator.name());
                }
                Err(e) => {
                    warn!("generator {} failed: {}", generator.name(), e);
                    last_error = e.0;
                }
            }
        }

        Err(AiError(format!("All generators failed. Last error: {}", last_error)))
    }
}

/// Generator used when nothing is configured: every section gets the fallback copy.
pub struct NoGenerator;

impl ContentGenerator for NoGenerator {
    fn name(&self) -> &str {
        "none"
    }

    fn generate(&self, _keyword: &str, _level: HeadingLevel) -> Result<String, AiError> {
        Err(AiError("content generation disabled".into()))
    }
}

/// Image search used when nothing is configured.
pub struct NoImageSearch;

impl ImageSearch for NoImageSearch {
    fn search(&self, _query: &str) -> Result<Vec<ImageAsset>, AiError> {
        Err(AiError("image search disabled".into()))
    }
}

// ── Pipeline ──────────────────────────────────────────

/// Body text used when generation fails.
pub fn fallback_text(keyword: &str) -> String {
    format!("<p>{}</p>", html_escape(keyword.trim()))
}

/// Generate a `SectionInput` per heading, in order. Never fails.
pub fn generate_sections(generator: &dyn ContentGenerator, headings: &[(String, HeadingLevel)]) -> Vec<SectionInput> {
    headings
        .iter()
        .map(|(keyword, level)| {
            let generated_text = match generator.generate(keyword, *level) {
                Ok(text) => text,
                Err(e) => {
                    warn!("section {:?}: generation failed ({}), using fallback", keyword, e);
                    fallback_text(keyword)
                }
            };
            SectionInput {
                keyword: keyword.clone(),
                generated_text,
                heading_level: *level,
            }
        })
        .collect()
}

/// Query text with whitespace collapsed.
fn search_query(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Up to `limit` search results as content images with sort order 0..n.
/// A failed search yields an empty pool.
pub fn collect_images(search: &dyn ImageSearch, query: &str, limit: usize) -> Vec<ImageAsset> {
    let found = match search.search(&search_query(query)) {
        Ok(found) => found,
        Err(e) => {
            warn!("image search for {:?} failed: {}", query, e);
            return Vec::new();
        }
    };

    found
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, mut img)| {
            img.kind = ImageKind::Content;
            img.sort_order = i as i64;
            img
        })
        .collect()
}
