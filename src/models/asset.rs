use serde::{Deserialize, Serialize};

/// Where an image came from. Only affects attribution, never rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    #[default]
    File,
    Pexels,
}

/// Which slot family an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Hero,
    Banner,
    #[default]
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub source: ImageSource,
    #[serde(rename = "type", default)]
    pub kind: ImageKind,
    #[serde(default)]
    pub sort_order: i64,
}

impl ImageAsset {
    pub fn content(url: &str, sort_order: i64) -> Self {
        ImageAsset {
            url: url.to_string(),
            alt_text: None,
            source: ImageSource::File,
            kind: ImageKind::Content,
            sort_order,
        }
    }

    /// Alt text, falling back to the page's main keyword when absent or blank.
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.alt_text.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => fallback,
        }
    }
}

/// Accepts data URIs, absolute http(s) URLs with a host, and root-relative paths.
/// Protocol-relative `//host/path` is rejected.
pub fn is_valid_image_url(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() {
        return false;
    }
    if s.starts_with("data:") {
        return s.len() > "data:".len() && s.contains(',');
    }
    if s.starts_with('/') {
        return !s.starts_with("//");
    }
    match url::Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

/// Link targets allowed in `href`: http(s) URLs, root-relative paths and
/// in-page anchors.
pub fn is_valid_link_url(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() {
        return false;
    }
    if s.starts_with('#') {
        return true;
    }
    if s.starts_with('/') {
        return !s.starts_with("//") && !s.starts_with("/\\");
    }
    match url::Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerAd {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeroSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub h1: String,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub span: Option<String>,
    #[serde(default)]
    pub button_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub image1: Option<String>,
    #[serde(default)]
    pub image2: Option<String>,
    #[serde(default)]
    pub alt1: Option<String>,
    #[serde(default)]
    pub alt2: Option<String>,
}

impl HeroSection {
    /// The call-to-action button, only when both its URL and label are non-empty.
    pub fn button(&self) -> Option<(&str, &str)> {
        let url = non_blank(self.button_url.as_deref())?;
        let text = non_blank(self.button_text.as_deref())?;
        Some((url, text))
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_url_schemes() {
        for ok in ["https://shop.example.com/sale", "http://a.example", "/pricing", "#faq"] {
            assert!(is_valid_link_url(ok), "{}", ok);
        }
        for bad in [
            "javascript:alert(1)",
            " JavaScript:alert(1)",
            "data:text/html,<b>x</b>",
            "//evil.example.com",
            "vbscript:msgbox",
            "",
        ] {
            assert!(!is_valid_link_url(bad), "{}", bad);
        }
    }
}
