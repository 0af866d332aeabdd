//! Final digest artifacts.
//!
//! A summarize call ends in exactly one [`Digest`]: either a complete
//! [`ArticleSummary`] or an [`ErrorSummary`] explaining why no summary could
//! be produced. The two never mix.

use serde::Serialize;

use crate::PrecisError;
use crate::classify::PageKind;

/// Placeholder used when no usable title could be found.
pub const PLACEHOLDER_TITLE: &str = "Article Summary";

/// Kind of standout sentence a key point represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Statistic,
    Announcement,
    Investigative,
    Quote,
    Urgent,
    Financial,
    Governmental,
    General,
}

impl Category {
    /// Icon used when rendering key points for people.
    pub fn icon(self) -> &'static str {
        match self {
            Category::Statistic => "📊",
            Category::Announcement => "📢",
            Category::Investigative => "🔍",
            Category::Quote => "💬",
            Category::Urgent => "⚠️",
            Category::Financial => "💰",
            Category::Governmental => "🏛️",
            Category::General => "•",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Statistic => "Statistic",
            Category::Announcement => "Announcement",
            Category::Investigative => "Investigative",
            Category::Quote => "Quote",
            Category::Urgent => "Urgent",
            Category::Financial => "Financial",
            Category::Governmental => "Governmental",
            Category::General => "General",
        }
    }
}

/// A categorized standout sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPoint {
    pub category: Category,
    pub text: String,
}

/// A ranked keyword and the number of times it occurs in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Successful digest of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    /// At most 15 key points.
    pub key_points: Vec<KeyPoint>,
    /// Keywords in descending frequency order.
    pub keywords: Vec<Keyword>,
    /// Character count of the normalized body text the digest was built from.
    pub source_text_length: usize,
    pub url: String,
    pub page_kind: PageKind,
}

/// Degraded terminal state: why no summary could be produced and what to try next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub title: String,
    pub message: String,
}

impl ErrorSummary {
    pub fn new(message: impl Into<String>) -> Self {
        Self { title: "Error".to_string(), message: message.into() }
    }

    /// Translates a pipeline error into a descriptive, remedy-suggesting message.
    pub fn from_error(err: &PrecisError) -> Self {
        let message = match err {
            PrecisError::AccessDenied { status, attempts } => format!(
                "Access to this page was denied (HTTP {status}) even after trying {attempts} different browser \
                 identities. The site is likely using anti-bot protection or a paywall. Try another URL for the \
                 same story, or open it in a browser."
            ),
            PrecisError::Unreachable { status } => format!(
                "The server answered with HTTP {status}. The page may have moved or been removed; check the URL \
                 and try again."
            ),
            PrecisError::Timeout { timeout } => format!(
                "The request timed out after {timeout} seconds. The site may be slow or unreachable right now; \
                 try again later."
            ),
            PrecisError::HttpError(e) => {
                format!("Could not reach the site: {e}. Check your network connection and the URL.")
            }
            PrecisError::InvalidUrl(reason) => format!(
                "The address is not a valid URL ({reason}). Include the scheme, for example \
                 https://example.com/story."
            ),
            PrecisError::InsufficientContent { .. } => "Could not extract meaningful content from this page. It \
                 may be rendered with JavaScript, sit behind a paywall, or use heavily obfuscated markup. Try a \
                 different article URL."
                .to_string(),
            PrecisError::KnownDifficultDomain { host, guidance } => {
                format!("Could not extract meaningful content from {host}. {guidance}")
            }
            PrecisError::HtmlParseError(_)
            | PrecisError::FileNotFound(_)
            | PrecisError::Io(_)
            | PrecisError::ConfigError(_) => format!("Could not read the page: {err}."),
            PrecisError::SerializeError(_) => format!("Could not render the digest: {err}."),
        };

        Self::new(message)
    }
}

/// Outcome of a summarize call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Digest {
    Article(ArticleSummary),
    Error(ErrorSummary),
}

impl Digest {
    pub fn is_error(&self) -> bool {
        matches!(self, Digest::Error(_))
    }

    pub fn title(&self) -> &str {
        match self {
            Digest::Article(article) => &article.title,
            Digest::Error(error) => &error.title,
        }
    }

    pub fn as_article(&self) -> Option<&ArticleSummary> {
        match self {
            Digest::Article(article) => Some(article),
            Digest::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorSummary> {
        match self {
            Digest::Article(_) => None,
            Digest::Error(error) => Some(error),
        }
    }
}

impl From<PrecisError> for Digest {
    fn from(err: PrecisError) -> Self {
        Digest::Error(ErrorSummary::from_error(&err))
    }
}
