/// Named regions every base template must contain exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Head,
    Schema,
    Hero,
    Content,
    Faq,
    Related,
    Scripts,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Head,
        Region::Schema,
        Region::Hero,
        Region::Content,
        Region::Faq,
        Region::Related,
        Region::Scripts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Head => "head",
            Region::Schema => "schema",
            Region::Hero => "hero",
            Region::Content => "content",
            Region::Faq => "faq",
            Region::Related => "related",
            Region::Scripts => "scripts",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Region::ALL.iter().copied().find(|r| r.name() == name)
    }
}

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{{head}}
{{schema}}
</head>
<body class="landing-page">
{{hero}}
<main class="lp-main container">
{{content}}
<section class="lp-faq" id="faq">
{{faq}}
</section>
</main>
{{related}}
{{scripts}}
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Region),
}

/// A base template split once into literal text and region slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTemplate {
    segments: Vec<Segment>,
}

/// Filled region contents, one string per region.
#[derive(Debug, Default)]
pub struct RegionValues {
    pub head: String,
    pub schema: String,
    pub hero: String,
    pub content: String,
    pub faq: String,
    pub related: String,
    pub scripts: String,
}

impl RegionValues {
    fn get(&self, region: Region) -> &str {
        match region {
            Region::Head => &self.head,
            Region::Schema => &self.schema,
            Region::Hero => &self.hero,
            Region::Content => &self.content,
            Region::Faq => &self.faq,
            Region::Related => &self.related,
            Region::Scripts => &self.scripts,
        }
    }
}

impl BaseTemplate {
    /// Tokenise `source`. `{{name}}` tokens that are not known regions stay literal.
    /// Fails if any region is missing or repeated.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut seen = [false; Region::ALL.len()];
        let mut text = String::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let region = after_open
                .find("}}")
                .and_then(|close| Region::from_name(after_open[..close].trim()).map(|r| (r, close)));
            match region {
                Some((region, close)) => {
                    let idx = Region::ALL.iter().position(|r| *r == region).unwrap_or(0);
                    if seen[idx] {
                        return Err(format!("region {{{{{}}}}} appears more than once", region.name()));
                    }
                    seen[idx] = true;
                    text.push_str(&rest[..open]);
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(region));
                    rest = &after_open[close + 2..];
                }
                None => {
                    text.push_str(&rest[..open + 2]);
                    rest = after_open;
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        let missing: Vec<&str> = Region::ALL
            .iter()
            .zip(seen.iter())
            .filter(|(_, present)| !**present)
            .map(|(r, _)| r.name())
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing regions: {}", missing.join(", ")));
        }

        Ok(BaseTemplate { segments })
    }

    pub fn default_template() -> Self {
        // DEFAULT_TEMPLATE contains every region once
        match Self::parse(DEFAULT_TEMPLATE) {
            Ok(t) => t,
            Err(_) => unreachable!("default template is well-formed"),
        }
    }

    /// Single pass: each slot is written once, inserted text is never rescanned.
    pub fn render(&self, values: &RegionValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Slot(region) => out.push_str(values.get(*region)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses() {
        assert!(BaseTemplate::parse(DEFAULT_TEMPLATE).is_ok());
    }

    #[test]
    fn missing_region_rejected() {
        let err = BaseTemplate::parse("{{head}}{{content}}").unwrap_err();
        assert!(err.contains("schema"));
        assert!(err.contains("scripts"));
    }

    #[test]
    fn duplicate_region_rejected() {
        let src = DEFAULT_TEMPLATE.replace("{{faq}}", "{{faq}}{{faq}}");
        assert!(BaseTemplate::parse(&src).is_err());
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let src = format!("{{{{site_name}}}} {{{{ broken {}", DEFAULT_TEMPLATE);
        let t = BaseTemplate::parse(&src).unwrap();
        let out = t.render(&RegionValues::default());
        assert!(out.starts_with("{{site_name}} {{ broken "));
    }

    #[test]
    fn inserted_text_not_rescanned() {
        let t = BaseTemplate::default_template();
        let values = RegionValues {
            content: "literal {{faq}} text".to_string(),
            faq: "FAQ-BODY".to_string(),
            ..Default::default()
        };
        let out = t.render(&values);
        assert!(out.contains("literal {{faq}} text"));
        assert_eq!(out.matches("FAQ-BODY").count(), 1);
    }
}
