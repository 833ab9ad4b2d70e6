use serde::{Deserialize, Serialize};

use crate::seo::{html_escape, html_unescape};

pub const SECTION_OPEN: &str = "<!-- lp:section ";
pub const SECTION_END: &str = "<!-- lp:end -->";
pub const IMAGE_MARKER: &str = "<!-- lp:image -->";
pub const MERGED_MARKER: &str = "<!-- lp:merged -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h2" => Some(HeadingLevel::H2),
            "h3" => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSide {
    Left,
    Right,
}

impl LayoutSide {
    pub fn for_position(sort_order: usize) -> Self {
        if sort_order % 2 == 0 {
            LayoutSide::Left
        } else {
            LayoutSide::Right
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutSide::Left => "left",
            LayoutSide::Right => "right",
        }
    }
}

/// One generated unit handed to the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInput {
    pub keyword: String,
    #[serde(default)]
    pub generated_text: String,
    pub heading_level: HeadingLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub keyword: String,
    pub heading_level: HeadingLevel,
    pub body_text: String,
    pub layout_side: LayoutSide,
    pub sort_order: usize,
    /// Whether this section carries an image placeholder.
    pub image_placeholder: bool,
}

impl ContentSection {
    fn at(position: usize, keyword: String, heading_level: HeadingLevel, body_text: String, image_placeholder: bool) -> Self {
        ContentSection {
            keyword,
            heading_level,
            body_text,
            layout_side: LayoutSide::for_position(position),
            sort_order: position,
            image_placeholder,
        }
    }
}

/// Turns generated inputs into sections, one per input, in input order.
/// H2 sections get an image placeholder; H3 sections are text-only.
pub fn compose_sections(inputs: &[SectionInput]) -> Vec<ContentSection> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            ContentSection::at(
                i,
                input.keyword.trim().to_string(),
                input.heading_level,
                input.generated_text.trim().to_string(),
                input.heading_level == HeadingLevel::H2,
            )
        })
        .collect()
}

/// Stored content, classified by whether it still needs merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredContent<'a> {
    /// Raw sections; images and banners are placed at render time.
    Sections(Vec<ContentSection>),
    /// Already-rendered content region, served as is.
    Merged(&'a str),
    /// Section markers present but unreadable; served as is.
    Malformed { raw: &'a str, error: String },
}

/// Serialise sections into the pre-merge storage format.
pub fn serialize_sections(sections: &[ContentSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!(
            "{}level=\"{}\" keyword=\"{}\" image=\"{}\" -->\n",
            SECTION_OPEN,
            section.heading_level.tag(),
            html_escape(&section.keyword),
            if section.image_placeholder { 1 } else { 0 }
        ));
        out.push_str(&section.body_text);
        out.push('\n');
        if section.image_placeholder {
            out.push_str(IMAGE_MARKER);
            out.push('\n');
        }
        out.push_str(SECTION_END);
        out.push('\n');
    }
    out
}

/// Wrap a rendered content region in the post-merge storage format.
pub fn serialize_merged(rendered: &str) -> String {
    format!("{}\n{}", MERGED_MARKER, rendered)
}

/// Classify and parse stored page content.
///
/// Content with no markers at all (hand-written or legacy) counts as merged.
pub fn parse_stored_content(content: &str) -> StoredContent<'_> {
    if let Some(rest) = content.strip_prefix(MERGED_MARKER) {
        return StoredContent::Merged(rest.strip_prefix('\n').unwrap_or(rest));
    }
    if !content.contains(SECTION_OPEN) {
        return StoredContent::Merged(content);
    }
    match parse_sections(content) {
        Ok(sections) => StoredContent::Sections(sections),
        Err(error) => StoredContent::Malformed { raw: content, error },
    }
}

fn parse_sections(content: &str) -> Result<Vec<ContentSection>, String> {
    let mut sections = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = content[cursor..].find(SECTION_OPEN) {
        let header_start = cursor + rel + SECTION_OPEN.len();
        let position = sections.len();

        let header_end = content[header_start..]
            .find("-->")
            .map(|i| header_start + i)
            .ok_or_else(|| format!("section {}: unterminated header", position))?;
        let (level, keyword, image) = parse_header(&content[header_start..header_end])
            .ok_or_else(|| format!("section {}: malformed header", position))?;

        let mut body_start = header_end + "-->".len();
        if content[body_start..].starts_with('\n') {
            body_start += 1;
        }
        let body_end = content[body_start..]
            .find(SECTION_END)
            .map(|i| body_start + i)
            .ok_or_else(|| format!("section {}: missing end marker", position))?;

        let mut inner = &content[body_start..body_end];
        let trailing = format!("{}\n", IMAGE_MARKER);
        // headers without the image attribute predate it: the trailing marker decides
        let image_placeholder = image.unwrap_or_else(|| inner.ends_with(&trailing));
        if image_placeholder {
            inner = inner.strip_suffix(&trailing).unwrap_or(inner);
        }
        let body = inner.strip_suffix('\n').unwrap_or(inner);

        sections.push(ContentSection::at(
            position,
            keyword,
            level,
            body.to_string(),
            image_placeholder,
        ));
        cursor = body_end + SECTION_END.len();
    }

    Ok(sections)
}

/// `level="h2" keyword="..." image="1"` -> (level, unescaped keyword, image flag)
fn parse_header(header: &str) -> Option<(HeadingLevel, String, Option<bool>)> {
    let rest = header.trim().strip_prefix("level=\"")?;
    let (tag, rest) = rest.split_once('"')?;
    let level = HeadingLevel::from_tag(tag)?;
    let rest = rest.trim_start().strip_prefix("keyword=\"")?;
    let (keyword, rest) = rest.split_once('"')?;
    let rest = rest.trim();
    let image = if rest.is_empty() {
        None
    } else {
        match rest.strip_prefix("image=\"")?.strip_suffix('"')? {
            "1" => Some(true),
            "0" => Some(false),
            _ => return None,
        }
    };
    Some((level, html_unescape(keyword), image))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(keyword: &str, text: &str, level: HeadingLevel) -> SectionInput {
        SectionInput {
            keyword: keyword.to_string(),
            generated_text: text.to_string(),
            heading_level: level,
        }
    }

    #[test]
    fn compose_keeps_order_and_alternates() {
        let sections = compose_sections(&[
            input("one", "<p>1</p>", HeadingLevel::H2),
            input("two", "<p>2</p>", HeadingLevel::H3),
            input("three", "<p>3</p>", HeadingLevel::H2),
            input("four", "", HeadingLevel::H2),
        ]);
        let keywords: Vec<&str> = sections.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["one", "two", "three", "four"]);
        let sides: Vec<LayoutSide> = sections.iter().map(|s| s.layout_side).collect();
        assert_eq!(
            sides,
            vec![LayoutSide::Left, LayoutSide::Right, LayoutSide::Left, LayoutSide::Right]
        );
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.sort_order, i);
        }
        assert!(sections[0].image_placeholder);
        assert!(!sections[1].image_placeholder);
    }

    #[test]
    fn compose_empty_text_still_produces_section() {
        let sections = compose_sections(&[input("lonely", "   ", HeadingLevel::H2)]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body_text, "");
        assert_eq!(sections[0].keyword, "lonely");
    }

    #[test]
    fn stored_sections_parse_back() {
        let sections = compose_sections(&[
            input("Café \"au lait\" & more --> x", "<p>a</p>\n<p>b</p>\n", HeadingLevel::H2),
            input("sub", "", HeadingLevel::H3),
            input("empty h2", "", HeadingLevel::H2),
            input("trailing", "text ending in newline\n\n", HeadingLevel::H3),
        ]);
        let stored = serialize_sections(&sections);
        assert_eq!(parse_stored_content(&stored), StoredContent::Sections(sections));
    }

    #[test]
    fn stored_body_ending_in_image_marker_parses_back() {
        let body = format!("<p>see below</p>\n{}", IMAGE_MARKER);
        let sections = compose_sections(&[
            input("sub", &body, HeadingLevel::H3),
            input("main", &body, HeadingLevel::H2),
        ]);
        assert!(!sections[0].image_placeholder);
        let stored = serialize_sections(&sections);
        assert!(stored.contains("keyword=\"sub\" image=\"0\""));
        assert_eq!(parse_stored_content(&stored), StoredContent::Sections(sections));
    }

    #[test]
    fn stored_header_without_image_attribute() {
        let raw = format!(
            "<!-- lp:section level=\"h2\" keyword=\"old\" -->\n<p>x</p>\n{}\n<!-- lp:end -->\n",
            IMAGE_MARKER
        );
        match parse_stored_content(&raw) {
            StoredContent::Sections(s) => {
                assert!(s[0].image_placeholder);
                assert_eq!(s[0].body_text, "<p>x</p>");
            }
            other => panic!("unexpected {:?}", other),
        }
        let raw = "<!-- lp:section level=\"h2\" keyword=\"x\" image=\"yes\" -->\n<!-- lp:end -->";
        assert!(matches!(parse_stored_content(raw), StoredContent::Malformed { .. }));
    }

    #[test]
    fn stored_content_merged_and_legacy() {
        let merged = serialize_merged("<div class=\"row\">x</div>");
        assert_eq!(
            parse_stored_content(&merged),
            StoredContent::Merged("<div class=\"row\">x</div>")
        );
        assert_eq!(
            parse_stored_content("<p>hand written</p>"),
            StoredContent::Merged("<p>hand written</p>")
        );
    }

    #[test]
    fn stored_content_marker_is_authoritative() {
        let raw = "<!-- lp:section level=\"h2\" keyword=\"no image\" -->\n<p>x</p>\n<!-- lp:end -->\n";
        match parse_stored_content(raw) {
            StoredContent::Sections(s) => {
                assert_eq!(s.len(), 1);
                assert!(!s[0].image_placeholder);
                assert_eq!(s[0].body_text, "<p>x</p>");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stored_content_malformed() {
        let raw = "<!-- lp:section level=\"h2\" keyword=\"open\" -->\n<p>never closed</p>";
        assert!(matches!(parse_stored_content(raw), StoredContent::Malformed { .. }));
        let raw = "<!-- lp:section level=\"h9\" keyword=\"x\" -->\n<!-- lp:end -->";
        assert!(matches!(parse_stored_content(raw), StoredContent::Malformed { .. }));
    }
}
