use crate::Document;
use crate::normalize::normalize;

/// A cleaned title must be longer than this to be accepted.
pub const MIN_TITLE_CHARS: usize = 10;

/// Separators between a headline and a trailing site name.
const SITE_SUFFIX_DELIMITERS: [&str; 3] = [" - ", " | ", " :: "];

/// Meta keys tried, in order, before falling back to markup.
const TITLE_META_KEYS: [&str; 4] = ["og:title", "twitter:title", "article:title", "article-title"];

const DESCRIPTION_META_KEYS: [&str; 3] = ["og:description", "description", "twitter:description"];

/// Removes a trailing site name such as `" | Example News"`.
pub fn strip_site_suffix(title: &str) -> String {
    let cut = SITE_SUFFIX_DELIMITERS
        .iter()
        .filter_map(|delimiter| title.rfind(delimiter))
        .max();

    match cut {
        Some(index) if index > 0 => title[..index].trim().to_string(),
        _ => title.trim().to_string(),
    }
}

impl Document {
    /// Raw title candidates in priority order:
    /// 1. Open Graph `og:title`
    /// 2. Twitter `twitter:title`
    /// 3. Meta `article:title` / `article-title`
    /// 4. First `<h1>` element
    /// 5. `<title>` element
    pub fn title_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = TITLE_META_KEYS.iter().filter_map(|key| self.meta_content(key)).collect();

        if let Ok(headings) = self.select("h1")
            && let Some(first) = headings.first()
        {
            candidates.push(first.text());
        }

        if let Some(title) = self.title() {
            candidates.push(title);
        }

        candidates
    }

    /// First candidate whose cleaned, suffix-stripped form is longer than
    /// [`MIN_TITLE_CHARS`].
    pub fn extract_title(&self) -> Option<String> {
        self.title_candidates()
            .iter()
            .map(|candidate| strip_site_suffix(&normalize(candidate)))
            .find(|cleaned| cleaned.chars().count() > MIN_TITLE_CHARS)
    }

    /// Page description from `og:description`, `description` or `twitter:description`.
    pub fn extract_description(&self) -> Option<String> {
        DESCRIPTION_META_KEYS
            .iter()
            .filter_map(|key| self.meta_content(key))
            .map(|desc| normalize(&desc))
            .find(|desc| !desc.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Storm batters the coast overnight - Example News", "Storm batters the coast overnight")]
    #[case("Markets rally on rate hopes | Finance Daily", "Markets rally on rate hopes")]
    #[case("Patch notes :: Game Site", "Patch notes")]
    #[case("Election - Results - Live | Site", "Election - Results - Live")]
    #[case("No suffix here", "No suffix here")]
    #[case(" - leading delimiter", "- leading delimiter")]
    fn test_strip_site_suffix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_site_suffix(input), expected);
    }

    #[test]
    fn test_og_title_wins() {
        let html = r#"<html><head>
            <meta property="og:title" content="Open Graph headline for the story">
            <title>Document title of the page</title>
        </head><body><h1>Heading in the body text</h1></body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_title(), Some("Open Graph headline for the story".to_string()));
    }

    #[test]
    fn test_h1_before_title_tag() {
        let html = r#"<html><head><title>Document title - Site</title></head>
            <body><h1>Heading in the <em>body</em></h1></body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_title(), Some("Heading in the body".to_string()));
    }

    #[test]
    fn test_short_candidates_are_skipped() {
        let html = r#"<html><head>
            <meta name="twitter:title" content="Short">
            <title>A sufficiently long page title | Site</title>
        </head><body><h1>Tiny</h1></body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_title(), Some("A sufficiently long page title".to_string()));
    }

    #[test]
    fn test_no_title() {
        let doc = Document::parse("<html><body><p>text</p></body></html>");
        assert_eq!(doc.extract_title(), None);
    }

    #[test]
    fn test_extract_description() {
        let html = r#"<html><head>
            <meta name="description" content="Plain description">
            <meta property="og:description" content="Social &amp; description">
        </head></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.extract_description(), Some("Social & description".to_string()));
    }
}
