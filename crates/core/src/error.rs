//! Error types for precis operations.
//!
//! This module defines [`PrecisError`], which represents every failure that
//! can occur while fetching, decoding and digesting a page. The public
//! summarize entry points never return it directly: they convert it into an
//! [`ErrorSummary`](crate::ErrorSummary) with a user-facing message.
//!
//! # Example
//!
//! ```rust
//! use precis_core::{PrecisError, Result};
//!
//! fn require_body(text: &str) -> Result<&str> {
//!     if text.chars().count() < 50 {
//!         return Err(PrecisError::InsufficientContent { chars: text.chars().count() });
//!     }
//!     Ok(text)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the digest pipeline.
#[derive(Error, Debug)]
pub enum PrecisError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps DNS failures, refused connections, TLS problems, redirect loops
    /// and other transport-level failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every client identity was refused with 401/403.
    #[error("Access denied (HTTP {status}) after {attempts} attempts")]
    AccessDenied { status: u16, attempts: usize },

    /// The server answered with a status that is not worth retrying.
    #[error("Server returned HTTP {status}")]
    Unreachable { status: u16 },

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Too little article text survived extraction and the alternative pass.
    #[error("Only {chars} characters of content could be extracted")]
    InsufficientContent { chars: usize },

    /// Extraction failed on a host listed in the known-difficult-domain table.
    #[error("{host} is known to block automated readers")]
    KnownDifficultDomain { host: String, guidance: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid domain rules or other configuration input.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A digest could not be rendered as JSON.
    #[error("Failed to serialize digest: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl PrecisError {
    /// Whether this error came from the network layer rather than from the page content.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            PrecisError::HttpError(_)
                | PrecisError::Timeout { .. }
                | PrecisError::AccessDenied { .. }
                | PrecisError::Unreachable { .. }
        )
    }
}

/// Result type alias for PrecisError.
pub type Result<T> = std::result::Result<T, PrecisError>;
