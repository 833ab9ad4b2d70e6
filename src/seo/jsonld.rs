use serde_json::Value;

/// Build the FAQ JSON-LD script tag from the stored schema string.
///
/// `Ok("")` when there is no schema (absent, blank or JSON `null`), `Err` with the
/// parser message when the string is not valid JSON. The value is re-serialised so
/// formatting differences in storage never leak into the page, and `</` is escaped
/// so the payload cannot close the script element early.
pub fn build_faq_jsonld(raw: Option<&str>) -> Result<String, String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(String::new()),
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if value.is_null() {
        return Ok(String::new());
    }

    let body = serde_json::to_string(&value).map_err(|e| e.to_string())?;
    Ok(format!(
        "<script type=\"application/ld+json\">\n{}\n</script>",
        body.replace("</", "<\\/")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonld_absent_schema() {
        assert_eq!(build_faq_jsonld(None).unwrap(), "");
        assert_eq!(build_faq_jsonld(Some("  ")).unwrap(), "");
        assert_eq!(build_faq_jsonld(Some("null")).unwrap(), "");
    }

    #[test]
    fn jsonld_invalid_schema() {
        assert!(build_faq_jsonld(Some("{invalid")).is_err());
    }

    #[test]
    fn jsonld_valid_schema_normalised() {
        let out = build_faq_jsonld(Some("{ \"@type\" :  \"FAQPage\" }")).unwrap();
        assert_eq!(
            out,
            "<script type=\"application/ld+json\">\n{\"@type\":\"FAQPage\"}\n</script>"
        );
    }

    #[test]
    fn jsonld_script_close_escaped() {
        let out = build_faq_jsonld(Some(r#"{"text":"</script><b>"}"#)).unwrap();
        assert_eq!(out.matches("</script>").count(), 1);
        assert!(out.contains(r"<\/script>"));
    }
}
