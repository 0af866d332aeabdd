//! Single article vs. topic/listing page detection.

use serde::Serialize;
use url::Url;

/// Path segments that mark aggregation pages.
const LISTING_PATH_MARKERS: [&str; 3] = ["/topic/", "/tag/", "/category/"];

/// Whether a page carries one story or aggregates many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    SingleArticle,
    TopicListing,
}

/// Whether the URL path looks like a topic, tag or category listing.
pub fn url_hints_listing(url: &str) -> bool {
    let path = Url::parse(url)
        .map(|parsed| parsed.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());

    LISTING_PATH_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Whether page text carries a "Showing N of M results" pagination signature.
pub fn text_hints_listing(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("showing") && lower.contains("results")
}

/// Classifies a page from its URL and its text.
pub fn classify(url: &str, page_text: &str) -> PageKind {
    if url_hints_listing(url) || text_hints_listing(page_text) {
        PageKind::TopicListing
    } else {
        PageKind::SingleArticle
    }
}
