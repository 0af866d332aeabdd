use regex::Regex;
use std::sync::LazyLock;

/// Elements whose content is never article text.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas", "template", "object"];

/// Page chrome removed wholesale. `header` is kept: article headers carry the `<h1>`.
const CHROME_TAGS: &[&str] = &["nav", "aside", "footer"];

static AD_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:.*[-_])?(ads?|advert\w*|adslot|promo\w*|sponsor\w*|newsletter|cookie\w*|consent|social|share|sharing|subscribe|paywall)(?:[-_].*)?$")
        .expect("ad block regex")
});

static HIDDEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden style regex"));

static COMMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Remove script, style and other non-content elements
    pub remove_non_content: bool,
    /// Remove nav, aside and footer elements
    pub remove_chrome: bool,
    /// Remove elements whose class or id names an ad, share or consent widget
    pub remove_ad_blocks: bool,
    /// Remove elements hidden with inline styles
    pub remove_hidden: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_non_content: true, remove_chrome: true, remove_ad_blocks: true, remove_hidden: true }
    }
}

impl PreprocessConfig {
    /// Strips scripts, styles and hidden elements but keeps navigation,
    /// footers and widgets, whose text still says what kind of page this is.
    pub fn keep_chrome() -> Self {
        Self { remove_chrome: false, remove_ad_blocks: false, ..Self::default() }
    }
}

/// Strip page furniture from HTML before structural extraction
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = COMMENT_PATTERN.replace_all(html, "").into_owned();

    if config.remove_non_content {
        processed = remove_tags(&processed, NON_CONTENT_TAGS);
    }

    if config.remove_chrome {
        processed = remove_tags(&processed, CHROME_TAGS);
    }

    if config.remove_ad_blocks || config.remove_hidden {
        processed = remove_flagged_elements(&processed, config);
    }

    processed
}

/// Remove every element with one of the given tag names, content included
fn remove_tags(html: &str, tags: &[&str]) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: tags
                .iter()
                .map(|tag| {
                    lol_html::element!(tag, |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { output }
}

fn is_ad_block(el: &lol_html::html_content::Element<'_, '_>) -> bool {
    let id_matches = el.get_attribute("id").is_some_and(|id| AD_BLOCK_PATTERN.is_match(&id));
    let class_matches = el
        .get_attribute("class")
        .is_some_and(|class| class.split_whitespace().any(|name| AD_BLOCK_PATTERN.is_match(name)));
    id_matches || class_matches
}

/// Remove ad/share/consent widgets and inline-hidden elements
fn remove_flagged_elements(html: &str, config: &PreprocessConfig) -> String {
    let remove_ads = config.remove_ad_blocks;
    let remove_hidden = config.remove_hidden;

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("*", |el| {
                if matches!(el.tag_name().as_str(), "html" | "body" | "head") {
                    return Ok(());
                }

                let hidden = remove_hidden && el.get_attribute("style").is_some_and(|s| HIDDEN_PATTERN.is_match(&s));
                if hidden || (remove_ads && is_ad_block(el)) {
                    el.remove();
                }
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { output }
}
