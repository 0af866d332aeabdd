//! Summarization engine.
//!
//! [`Precis`] runs the whole pipeline for a URL: fetch with identity
//! rotation, charset resolution, structural extraction with its fallbacks,
//! page-kind classification, summary, key points and keywords. Every call
//! ends in a [`Digest`]; failures are reported as an
//! [`ErrorSummary`](crate::ErrorSummary), never as an `Err` or a panic.
//!
//! # Example
//!
//! ```rust,no_run
//! use precis_core::Precis;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let engine = Precis::new();
//! let digest = engine.summarize("https://example.com/news/story").await;
//! println!("{}", digest.title());
//! # }
//! ```

use tracing::{debug, instrument, warn};
use url::Url;

use crate::classify::{PageKind, classify};
use crate::digest::{ArticleSummary, Digest};
use crate::encoding::resolve;
use crate::extract::{ExtractConfig, ExtractedContent, Extractor};
use crate::fetch::{ClientIdentity, FetchConfig, Fetcher, ReqwestTransport, Transport};
use crate::keypoints::{KeyPointConfig, extract_key_points, extract_topic_key_points};
use crate::keywords::{DEFAULT_TOP_N, extract_keywords};
use crate::lexicon::Lexicon;
use crate::normalize::ContentFilter;
use crate::parse::Document;
use crate::preprocess::PreprocessConfig;
use crate::rules::DomainRules;
use crate::scoring::ScoreConfig;
use crate::summarize::{SummaryInput, summarizer_for};
use crate::{PrecisError, Result};

/// Tuning for every pipeline stage.
///
/// # Example
///
/// ```rust
/// use precis_core::PrecisConfig;
///
/// let config = PrecisConfig::builder()
///     .timeout(10)
///     .keyword_count(10)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone)]
pub struct PrecisConfig {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub score: ScoreConfig,
    pub key_points: KeyPointConfig,
    /// Keywords kept in the digest (default: 20).
    pub keyword_count: usize,
}

impl Default for PrecisConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            extract: ExtractConfig::default(),
            score: ScoreConfig::default(),
            key_points: KeyPointConfig::default(),
            keyword_count: DEFAULT_TOP_N,
        }
    }
}

impl PrecisConfig {
    pub fn builder() -> PrecisConfigBuilder {
        PrecisConfigBuilder::new()
    }
}

/// Builder for [`PrecisConfig`].
pub struct PrecisConfigBuilder {
    config: PrecisConfig,
}

impl PrecisConfigBuilder {
    pub fn new() -> Self {
        Self { config: PrecisConfig::default() }
    }

    /// Sets the per-attempt timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the redirect hop limit.
    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.config.fetch.max_redirects = hops;
        self
    }

    /// Replaces the identity rotation.
    pub fn identities(mut self, identities: Vec<ClientIdentity>) -> Self {
        self.config.fetch.identities = identities;
        self
    }

    pub fn extract(mut self, extract: ExtractConfig) -> Self {
        self.config.extract = extract;
        self
    }

    pub fn score(mut self, score: ScoreConfig) -> Self {
        self.config.score = score;
        self
    }

    pub fn key_points(mut self, key_points: KeyPointConfig) -> Self {
        self.config.key_points = key_points;
        self
    }

    /// Sets how many keywords the digest keeps.
    pub fn keyword_count(mut self, count: usize) -> Self {
        self.config.keyword_count = count;
        self
    }

    pub fn build(self) -> PrecisConfig {
        self.config
    }
}

impl Default for PrecisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The summarization engine.
///
/// Holds only immutable configuration, so one instance can serve
/// concurrent calls.
pub struct Precis<T = ReqwestTransport> {
    config: PrecisConfig,
    lexicon: Lexicon,
    rules: DomainRules,
    extractor: Extractor,
    fetcher: Fetcher<T>,
}

impl Precis<ReqwestTransport> {
    /// Engine with default configuration and built-in domain rules.
    pub fn new() -> Self {
        Self::with_config(PrecisConfig::default())
    }

    pub fn with_config(config: PrecisConfig) -> Self {
        let fetcher = Fetcher::new(config.fetch.clone());
        Self::assemble(config, fetcher)
    }
}

impl Default for Precis<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Precis<T> {
    /// Engine that fetches through a custom [`Transport`].
    pub fn with_transport(config: PrecisConfig, transport: T) -> Self {
        let fetcher = Fetcher::with_transport(config.fetch.clone(), transport);
        Self::assemble(config, fetcher)
    }

    fn assemble(config: PrecisConfig, fetcher: Fetcher<T>) -> Self {
        let extractor = Extractor::new(config.extract.clone());
        Self { config, lexicon: Lexicon::default(), rules: DomainRules::default(), extractor, fetcher }
    }

    /// Replaces the domain rules.
    pub fn with_rules(mut self, rules: DomainRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the vocabulary tables.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn config(&self) -> &PrecisConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn rules(&self) -> &DomainRules {
        &self.rules
    }

    /// Fetches and digests `url`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn summarize(&self, url: &str) -> Digest {
        into_digest(self.try_summarize(url).await)
    }

    /// Like [`summarize`](Self::summarize), keeping the error value.
    pub async fn try_summarize(&self, url: &str) -> Result<ArticleSummary> {
        let fetched = self.fetcher.fetch(url, &self.rules).await?;
        self.digest_bytes(&fetched.raw_bytes, fetched.declared_charset.as_deref(), url)
    }

    /// Digests already-fetched HTML. `url` drives page-kind detection and
    /// domain rules; it may be empty.
    pub fn summarize_html(&self, html: &str, url: &str) -> Digest {
        into_digest(self.digest_html(html, url))
    }

    /// Digests raw page bytes, resolving their charset first.
    pub fn summarize_bytes(&self, bytes: &[u8], declared_charset: Option<&str>, url: &str) -> Digest {
        into_digest(self.digest_bytes(bytes, declared_charset, url))
    }

    pub fn digest_bytes(&self, bytes: &[u8], declared_charset: Option<&str>, url: &str) -> Result<ArticleSummary> {
        let decoded = resolve(bytes, declared_charset);
        debug!(encoding = decoded.encoding, fell_back = decoded.fell_back, "decoded page");
        self.digest_html(&decoded.html, url)
    }

    /// Runs extraction through aggregation on decoded HTML.
    pub fn digest_html(&self, html: &str, url: &str) -> Result<ArticleSummary> {
        let doc = Document::parse_with_preprocessing(html);
        let content = self.extract_content(&doc, url)?;

        // Pagination lines often sit in nav or footer, which extraction strips.
        let page_text = Document::parse_with_config(html, &PreprocessConfig::keep_chrome()).text_content();
        let page_kind = classify(url, &page_text);
        debug!(?page_kind, title = %content.title, "classified page");

        let description = doc.extract_description();
        let input =
            SummaryInput { title: &content.title, body: &content.body_text, description: description.as_deref() };
        let summary = summarizer_for(page_kind, &self.config.score).summarize(&input, &self.lexicon);
        if summary.trim().is_empty() {
            return Err(self.insufficient(url, 0));
        }

        let key_points = match page_kind {
            PageKind::SingleArticle => extract_key_points(&content.body_text, &self.lexicon, &self.config.key_points),
            PageKind::TopicListing => {
                extract_topic_key_points(&content.body_text, &self.lexicon, &self.config.key_points)
            }
        };
        let keywords = extract_keywords(&content.body_text, self.config.keyword_count, &self.lexicon);

        Ok(ArticleSummary {
            title: content.title,
            summary,
            key_points,
            keywords,
            source_text_length: content.body_text.chars().count(),
            url: url.to_string(),
            page_kind,
        })
    }

    /// Structural extraction, then the alternative pass when the body is too thin.
    fn extract_content(&self, doc: &Document, url: &str) -> Result<ExtractedContent> {
        let mut content = self.extractor.extract(doc, url, &self.lexicon);
        if self.extractor.is_sufficient(&content.body_text) {
            return Ok(content);
        }

        let filter = ContentFilter::new(&self.lexicon);
        let alternative = self.extractor.alternative_extract(doc, &filter);
        if alternative.chars().count() > content.body_text.chars().count() {
            content.body_text = alternative;
            content.source = "alternative";
        }

        if self.extractor.is_sufficient(&content.body_text) {
            Ok(content)
        } else {
            Err(self.insufficient(url, content.body_text.chars().count()))
        }
    }

    /// Insufficient-content error, with host guidance when the host is listed.
    fn insufficient(&self, url: &str, chars: usize) -> PrecisError {
        let host = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string));
        match host.as_deref().and_then(|h| self.rules.difficult_for(h)) {
            Some(rule) => PrecisError::KnownDifficultDomain {
                host: host.unwrap_or_else(|| rule.host.clone()),
                guidance: rule.guidance.clone(),
            },
            None => PrecisError::InsufficientContent { chars },
        }
    }
}

fn into_digest(result: Result<ArticleSummary>) -> Digest {
    match result {
        Ok(article) => Digest::Article(article),
        Err(err) => {
            warn!(error = %err, "summarization failed");
            Digest::from(err)
        }
    }
}

/// Fetches and digests `url` with a default engine.
pub async fn summarize(url: &str) -> Digest {
    Precis::new().summarize(url).await
}

/// Blocking wrapper over [`summarize`] for callers without an async context.
///
/// Builds a current-thread runtime per call, so it must not be called from
/// inside another tokio runtime.
pub fn summarize_blocking(url: &str) -> Digest {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(summarize(url)),
        Err(err) => Digest::from(PrecisError::Io(err)),
    }
}
