//! HTML parsing and DOM access.
//!
//! This module provides the [`Document`] and [`Element`] types the
//! structural extractor works against: CSS selection, spaced text
//! collection, direct text of a node, and meta tag lookup.
//!
//! # Example
//!
//! ```rust
//! use precis_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><meta property="og:title" content="A headline"></head>
//!         <body><p class="lede">First<b>bold</b></p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.meta_content("og:title"), Some("A headline".to_string()));
//! assert_eq!(doc.select("p.lede").unwrap()[0].text(), "First bold");
//! ```

use scraper::{Html, Selector};

use crate::normalize::collapse_whitespace;
use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{PrecisError, Result};

/// A parsed HTML document.
pub struct Document {
    html: Html,
    source: String,
}

impl Document {
    /// Parses HTML as-is.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), source: html.to_string() }
    }

    /// Parses HTML after removing scripts, styles, comments and hidden elements.
    ///
    /// ```rust
    /// use precis_core::parse::Document;
    ///
    /// let doc = Document::parse_with_preprocessing("<body><script>x()</script><p>Text</p></body>");
    /// assert!(!doc.source().contains("x()"));
    /// ```
    pub fn parse_with_preprocessing(html: &str) -> Self {
        Self::parse_with_config(html, &PreprocessConfig::default())
    }

    /// Parses HTML after preprocessing with `config`.
    pub fn parse_with_config(html: &str, config: &PreprocessConfig) -> Self {
        Self::parse(&preprocess_html(html, config))
    }

    /// Markup the document was parsed from (after any preprocessing).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`PrecisError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Content of the `<title>` element, whitespace-collapsed.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    /// All text in the document, text nodes separated by spaces.
    pub fn text_content(&self) -> String {
        collapse_whitespace(&self.html.root_element().text().collect::<Vec<_>>().join(" "))
    }

    /// Content of a `<meta>` tag matched by `name` or `property`.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|attr| {
            let selector = format!("meta[{}=\"{}\"]", attr, key);
            self.select(&selector)
                .ok()?
                .iter()
                .find_map(|el| el.attr("content").map(str::trim).filter(|c| !c.is_empty()).map(str::to_string))
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PrecisError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A single element of a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Text of every descendant text node, space separated and collapsed.
    pub fn text(&self) -> String {
        collapse_whitespace(&self.element.text().collect::<Vec<_>>().join(" "))
    }

    /// Text of this element's own text-node children, ignoring nested elements.
    pub fn direct_text(&self) -> String {
        let parts: Vec<&str> = self
            .element
            .children()
            .filter_map(|child| child.value().as_text().map(|text| &**text))
            .collect();
        collapse_whitespace(&parts.join(" "))
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }
}
