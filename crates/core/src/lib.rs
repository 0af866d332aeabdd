pub mod classify;
pub mod digest;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod keypoints;
pub mod keywords;
pub mod lexicon;
pub mod metadata;
pub mod normalize;
pub mod parse;
pub mod preprocess;
pub mod rules;
pub mod scoring;
pub mod summarize;

pub use classify::{PageKind, classify};
pub use digest::{ArticleSummary, Category, Digest, ErrorSummary, KeyPoint, Keyword, PLACEHOLDER_TITLE};
pub use encoding::{DecodedDocument, resolve};
pub use engine::{Precis, PrecisConfig, PrecisConfigBuilder, summarize, summarize_blocking};
pub use error::{PrecisError, Result};
#[doc(hidden)]
pub use extract::{ExtractConfig, ExtractContext, ExtractedContent, ExtractionLayer, Extractor, SelectorLayer};
pub use fetch::{ClientIdentity, FetchConfig, FetchRequest, FetchResult, Fetcher, RawResponse, ReqwestTransport, Transport};
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text};
#[doc(hidden)]
pub use keypoints::{KeyPointConfig, extract_key_points, extract_topic_key_points};
pub use keywords::{DEFAULT_TOP_N, extract_keywords};
pub use lexicon::{Lexicon, TopicFamily};
pub use normalize::{ContentFilter, normalize};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use rules::{DifficultDomain, DomainRules, HeaderOverride};
#[doc(hidden)]
pub use scoring::{ScoreConfig, ScoredSentence, WordFrequencies, split_sentences};
pub use summarize::{ArticleSummarizer, Summarizer, SummaryInput, TopicSummarizer};
