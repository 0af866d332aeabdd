//! Structural extraction of the main body text.
//!
//! Extraction runs a cascade of [`ExtractionLayer`]s from most to least
//! specific (semantic containers, content class names, content ids, then
//! listing containers). The first layer whose best candidate clears
//! [`ExtractConfig::layer_threshold`] wins. When no layer does, paragraphs
//! are aggregated, topped up with the direct text of divs when the
//! aggregate is still thin.
//!
//! [`Extractor::alternative_extract`] is the last resort for pages whose
//! markup defeats the cascade: it scans every small text-bearing element
//! and raw text run, keeping only fragments the validity filter accepts.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::classify::url_hints_listing;
use crate::digest::PLACEHOLDER_TITLE;
use crate::lexicon::Lexicon;
use crate::normalize::{ContentFilter, clean_text};
use crate::parse::Document;

static RAW_TEXT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([^<>]{100,})<").expect("raw text run regex"));

/// Configuration for structural extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// A layer wins once its best candidate is longer than this
    pub layer_threshold: usize,
    /// Paragraphs must be longer than this to be aggregated
    pub paragraph_min_chars: usize,
    /// Aggregated paragraphs shorter than this are topped up with div text
    pub paragraph_floor: usize,
    /// Minimum direct text of a div used to top up paragraphs
    pub div_min_chars: usize,
    /// Bodies shorter than this trigger alternative extraction
    pub min_body_chars: usize,
    /// Minimum length of an element fragment in alternative extraction
    pub fragment_min_chars: usize,
    /// Minimum length of a raw inter-tag text run in alternative extraction
    pub raw_run_min_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            layer_threshold: 200,
            paragraph_min_chars: 30,
            paragraph_floor: 300,
            div_min_chars: 50,
            min_body_chars: 50,
            fragment_min_chars: 30,
            raw_run_min_chars: 100,
        }
    }
}

/// Facts about the page available to every layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractContext {
    /// The URL path looks like a topic/tag/category listing
    pub listing_hint: bool,
}

impl ExtractContext {
    pub fn for_url(url: &str) -> Self {
        Self { listing_hint: url_hints_listing(url) }
    }
}

/// One strategy of the extraction cascade.
pub trait ExtractionLayer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Best body text this layer can find, if any.
    fn extract(&self, doc: &Document, ctx: &ExtractContext) -> Option<String>;
}

/// A layer that tries CSS selectors in order and keeps the longest match of
/// the first selector that yields enough text.
#[derive(Debug, Clone)]
pub struct SelectorLayer {
    name: &'static str,
    selectors: &'static [&'static str],
    min_chars: usize,
    listing_only: bool,
}

impl SelectorLayer {
    pub fn new(name: &'static str, selectors: &'static [&'static str], min_chars: usize) -> Self {
        Self { name, selectors, min_chars, listing_only: false }
    }

    /// Restricts the layer to pages whose URL hints at a listing.
    pub fn listing_only(mut self) -> Self {
        self.listing_only = true;
        self
    }

    fn longest_match(&self, doc: &Document, selector: &str) -> Option<String> {
        doc.select(selector)
            .ok()?
            .iter()
            .map(|el| clean_text(&el.text()))
            .max_by_key(|text| text.chars().count())
    }
}

impl ExtractionLayer for SelectorLayer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, doc: &Document, ctx: &ExtractContext) -> Option<String> {
        if self.listing_only && !ctx.listing_hint {
            return None;
        }

        self.selectors
            .iter()
            .filter_map(|selector| self.longest_match(doc, selector))
            .find(|text| text.chars().count() > self.min_chars)
    }
}

const SEMANTIC_SELECTORS: &[&str] = &["article", "[role=\"main\"]", "main"];

/// Compound names first: `[class*="content"]` alone matches page wrappers.
const CLASS_SELECTORS: &[&str] = &[
    "[class*=\"story-body\"]",
    "[class*=\"article-body\"]",
    "[class*=\"articleBody\"]",
    "[class*=\"article-content\"]",
    "[class*=\"post-content\"]",
    "[class*=\"entry-content\"]",
    "[class*=\"wp-content\"]",
    "[class*=\"story\"]",
    "[class*=\"article\"]",
    "[class*=\"content\"]",
    "[class*=\"post\"]",
    "[class*=\"entry\"]",
];

const ID_SELECTORS: &[&str] = &[
    "#article-body",
    "#story-body",
    "#article",
    "#story",
    "#content",
    "#main-content",
    "#main",
];

const LISTING_SELECTORS: &[&str] = &["[class*=\"topic\"]", "[class*=\"listing\"]", "[class*=\"stream\"]"];

/// The built-in cascade, most specific first.
pub fn default_layers(config: &ExtractConfig) -> Vec<Box<dyn ExtractionLayer>> {
    let threshold = config.layer_threshold;
    vec![
        Box::new(SelectorLayer::new("semantic", SEMANTIC_SELECTORS, threshold)),
        Box::new(SelectorLayer::new("class", CLASS_SELECTORS, threshold)),
        Box::new(SelectorLayer::new("id", ID_SELECTORS, threshold)),
        Box::new(SelectorLayer::new("listing", LISTING_SELECTORS, threshold).listing_only()),
    ]
}

/// Title and body text pulled from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub title: String,
    pub body_text: String,
    /// Name of the layer or fallback that produced the body
    pub source: &'static str,
}

/// Runs the extraction cascade and its fallbacks.
pub struct Extractor {
    config: ExtractConfig,
    layers: Vec<Box<dyn ExtractionLayer>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        let layers = default_layers(&config);
        Self { config, layers }
    }

    /// Replaces the cascade with custom layers.
    pub fn with_layers(config: ExtractConfig, layers: Vec<Box<dyn ExtractionLayer>>) -> Self {
        Self { config, layers }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts the title and body text. A missing title becomes
    /// [`PLACEHOLDER_TITLE`]; the body may be empty.
    pub fn extract(&self, doc: &Document, url: &str, lexicon: &Lexicon) -> ExtractedContent {
        let title = doc.extract_title().unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
        let ctx = ExtractContext::for_url(url);

        let layered = self.layers.iter().find_map(|layer| {
            layer
                .extract(doc, &ctx)
                .filter(|text| text.chars().count() > self.config.layer_threshold)
                .map(|text| (layer.name(), text))
        });

        let (source, body_text) = match layered {
            Some(found) => found,
            None => ("paragraphs", self.aggregate_paragraphs(doc, lexicon)),
        };

        debug!(source, chars = body_text.chars().count(), "structural extraction finished");
        ExtractedContent { title, body_text, source }
    }

    /// Whether a body is long enough to summarize.
    pub fn is_sufficient(&self, body_text: &str) -> bool {
        body_text.chars().count() >= self.config.min_body_chars
    }

    /// Joins `<p>` texts, then direct text of `<div>`s if that stays short.
    fn aggregate_paragraphs(&self, doc: &Document, lexicon: &Lexicon) -> String {
        let keep = |text: &String, min: usize| {
            text.chars().count() >= min && !lexicon.has_paragraph_boilerplate(&text.to_lowercase())
        };

        let mut parts: Vec<String> = doc
            .select("p")
            .unwrap_or_default()
            .iter()
            .map(|p| clean_text(&p.text()))
            .filter(|text| keep(text, self.config.paragraph_min_chars + 1))
            .collect();

        let total: usize = parts.iter().map(|p| p.chars().count()).sum();
        if total < self.config.paragraph_floor {
            let divs = doc.select("div").unwrap_or_default();
            parts.extend(
                divs.iter()
                    .map(|div| clean_text(&div.direct_text()))
                    .filter(|text| keep(text, self.config.div_min_chars)),
            );
        }

        parts.join(" ")
    }

    /// Fragment scan for pages whose structure defeats the cascade.
    ///
    /// Looks at the direct text of divs, the text of spans, paragraphs and
    /// list items, and raw text runs between tags. Only fragments accepted by
    /// the validity filter are kept, and fragments already contained in a
    /// kept one are skipped.
    pub fn alternative_extract(&self, doc: &Document, filter: &ContentFilter<'_>) -> String {
        let mut kept: Vec<String> = Vec::new();
        let mut accept = |text: String, min: usize| {
            if text.chars().count() >= min
                && filter.is_valid_content(&text)
                && !kept.iter().any(|existing| existing.contains(text.as_str()))
            {
                kept.push(text);
            }
        };

        for el in doc.select("div, span, p, li").unwrap_or_default() {
            let text = if el.tag_name() == "div" { el.direct_text() } else { el.text() };
            accept(clean_text(&text), self.config.fragment_min_chars);
        }

        for caps in RAW_TEXT_RUN.captures_iter(doc.source()) {
            if let Some(run) = caps.get(1) {
                accept(clean_text(run.as_str()), self.config.raw_run_min_chars);
            }
        }

        debug!(fragments = kept.len(), "alternative extraction finished");
        kept.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_sentence(topic: &str) -> String {
        format!(
            "The regional council confirmed on Tuesday that the {topic} project will move ahead after months of review by planners and residents. "
        )
    }

    #[test]
    fn test_semantic_layer_wins() {
        let body = long_sentence("harbour").repeat(3);
        let html = format!(
            r#"<html><head><title>Harbour project approved by council</title></head>
            <body><div class="content">Short wrapper text</div><article><p>{body}</p></article></body></html>"#
        );
        let doc = Document::parse(&html);
        let content = Extractor::default().extract(&doc, "https://example.com/news/harbour", &Lexicon::default());

        assert_eq!(content.source, "semantic");
        assert_eq!(content.title, "Harbour project approved by council");
        assert!(content.body_text.starts_with("The regional council confirmed"));
    }

    #[test]
    fn test_compound_class_before_generic() {
        let story = long_sentence("bridge").repeat(3);
        let html = format!(
            r#"<body><div class="page-content"><div class="story-body">{story}</div><div class="related">Related links and more related links</div></div></body>"#
        );
        let doc = Document::parse(&html);
        let content = Extractor::default().extract(&doc, "https://example.com/a", &Lexicon::default());

        assert_eq!(content.source, "class");
        assert!(!content.body_text.contains("Related links"));
    }

    #[test]
    fn test_id_layer() {
        let story = long_sentence("tunnel").repeat(3);
        let html = format!(r#"<body><section id="content">{story}</section></body>"#);
        let doc = Document::parse(&html);
        let content = Extractor::default().extract(&doc, "https://example.com/a", &Lexicon::default());

        assert_eq!(content.source, "id");
    }

    #[test]
    fn test_listing_layer_needs_url_hint() {
        let items = long_sentence("flood defence").repeat(3);
        let html = format!(r#"<body><ul class="topic-feed"><li>{items}</li></ul></body>"#);
        let doc = Document::parse(&html);
        let extractor = Extractor::default();
        let lexicon = Lexicon::default();

        let listing = extractor.extract(&doc, "https://example.com/topic/floods", &lexicon);
        assert_eq!(listing.source, "listing");

        let article = extractor.extract(&doc, "https://example.com/2024/floods", &lexicon);
        assert_eq!(article.source, "paragraphs");
    }

    #[test]
    fn test_paragraph_aggregation_skips_short_and_denylisted() {
        let html = r#"<body>
            <p>Too short to keep.</p>
            <p>The first real paragraph talks about the harbour redevelopment plan in detail.</p>
            <p>Click here to subscribe to our newsletter for daily updates on every story.</p>
            <p>We use cookies to personalise content and analyse traffic on this site.</p>
            <p>Subscribers only: unlock unlimited access to every story for a low monthly fee.</p>
            <p>Advertisements help fund the independent reporting you rely on every day.</p>
            <p>The second real paragraph covers the reaction from local business owners.</p>
        </body>"#;
        let doc = Document::parse(html);
        let content = Extractor::default().extract(&doc, "https://example.com/a", &Lexicon::default());

        assert_eq!(content.source, "paragraphs");
        assert!(content.body_text.contains("first real paragraph"));
        assert!(content.body_text.contains("second real paragraph"));
        assert!(!content.body_text.contains("Too short"));
        assert!(!content.body_text.contains("subscribe"));
        assert!(!content.body_text.contains("cookies"));
        assert!(!content.body_text.contains("Subscribers"));
        assert!(!content.body_text.contains("Advertisements"));
    }

    #[test]
    fn test_div_direct_text_tops_up_thin_paragraphs() {
        let html = r#"<body>
            <div>Officials said the new schedule would take effect next month across the network. <span>ignored</span></div>
        </body>"#;
        let doc = Document::parse(html);
        let content = Extractor::default().extract(&doc, "https://example.com/a", &Lexicon::default());

        assert!(content.body_text.contains("Officials said the new schedule"));
        assert!(!content.body_text.contains("ignored"));
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let doc = Document::parse("<body><p>Nothing</p></body>");
        let content = Extractor::default().extract(&doc, "https://example.com/a", &Lexicon::default());
        assert_eq!(content.title, PLACEHOLDER_TITLE);
        assert!(!Extractor::default().is_sufficient(&content.body_text));
    }

    #[test]
    fn test_alternative_extract_filters_and_dedupes() {
        let html = r#"<body>
            <span>Police said the investigation into the fire in 2023 is still ongoing.</span>
            <li>Police said the investigation into the fire in 2023 is still ongoing.</li>
            <span>&#9608;&#9608;&#9608; &#9619;&#9619; x y z w v u</span>
            <span>Accept all cookies to continue browsing this website today</span>
        </body>"#;
        let doc = Document::parse(html);
        let lexicon = Lexicon::default();
        let filter = ContentFilter::new(&lexicon);
        let text = Extractor::default().alternative_extract(&doc, &filter);

        assert_eq!(text.matches("Police said").count(), 1);
        assert!(!text.contains("cookies"));
        assert!(!text.contains('\u{2588}'));
    }

    #[test]
    fn test_custom_layers() {
        struct Fixed;
        impl ExtractionLayer for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn extract(&self, _doc: &Document, _ctx: &ExtractContext) -> Option<String> {
                Some("x".repeat(500))
            }
        }

        let extractor = Extractor::with_layers(ExtractConfig::default(), vec![Box::new(Fixed)]);
        let doc = Document::parse("<body></body>");
        let content = extractor.extract(&doc, "https://example.com", &Lexicon::default());
        assert_eq!(content.source, "fixed");
    }
}
