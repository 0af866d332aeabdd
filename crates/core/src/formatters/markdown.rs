use crate::classify::PageKind;
use crate::digest::{ArticleSummary, Digest, ErrorSummary};

/// Configuration for Markdown output
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with digest metadata
    pub include_frontmatter: bool,
    /// Include title as H1 heading at the start of content
    pub include_title_heading: bool,
    /// Render keywords as a table instead of an inline list
    pub keyword_table: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_frontmatter: false, include_title_heading: true, keyword_table: false }
    }
}

/// Markdown formatter for digests
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, digest: &Digest) -> String {
        convert_to_markdown(digest, &self.config)
    }
}

/// Render a digest as Markdown
pub fn convert_to_markdown(digest: &Digest, config: &MarkdownConfig) -> String {
    match digest {
        Digest::Article(article) => article_to_markdown(article, config),
        Digest::Error(error) => error_to_markdown(error, config),
    }
}

fn page_kind_label(kind: PageKind) -> &'static str {
    match kind {
        PageKind::SingleArticle => "single_article",
        PageKind::TopicListing => "topic_listing",
    }
}

/// Generate TOML frontmatter for an article digest
fn generate_frontmatter(article: &ArticleSummary) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(&article.title)));
    if !article.url.is_empty() {
        frontmatter.push_str(&format!("\nurl = {}", toml_escape_string(&article.url)));
    }
    frontmatter.push_str(&format!("\npage_kind = \"{}\"", page_kind_label(article.page_kind)));
    frontmatter.push_str(&format!("\nsource_text_length = {}", article.source_text_length));
    frontmatter.push_str("\n+++\n");
    frontmatter
}

fn toml_escape_string(s: &str) -> String {
    let needs_escape = s.contains('"') || s.contains('\\') || s.contains('\n');
    if needs_escape {
        format!(
            "\"{}\"",
            s.replace('\\', "\\\\").replace('\"', "\\\"").replace('\n', "\\n")
        )
    } else {
        format!("\"{}\"", s)
    }
}

/// Escape characters that would break a Markdown table cell
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn article_to_markdown(article: &ArticleSummary, config: &MarkdownConfig) -> String {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(article));
        output.push('\n');
    }

    if config.include_title_heading {
        output.push_str(&format!("# {}\n\n", article.title));
    }

    output.push_str(&article.summary);
    output.push('\n');

    if !article.key_points.is_empty() {
        output.push_str("\n## Key Points\n\n");
        for point in &article.key_points {
            output.push_str(&format!("- {} **{}:** {}\n", point.category.icon(), point.category.label(), point.text));
        }
    }

    if !article.keywords.is_empty() {
        output.push_str("\n## Keywords\n\n");
        if config.keyword_table {
            output.push_str("| Keyword | Count |\n|---|---|\n");
            for keyword in &article.keywords {
                output.push_str(&format!("| {} | {} |\n", escape_cell(&keyword.word), keyword.count));
            }
        } else {
            let words: Vec<String> = article.keywords.iter().map(|k| format!("`{}` ({})", k.word, k.count)).collect();
            output.push_str(&words.join(", "));
            output.push('\n');
        }
    }

    if !config.include_frontmatter && !article.url.is_empty() {
        output.push_str(&format!("\n---\n\nSource: <{}>\n", article.url));
    }

    output
}

fn error_to_markdown(error: &ErrorSummary, config: &MarkdownConfig) -> String {
    let mut output = String::new();
    if config.include_title_heading {
        output.push_str(&format!("# {}\n\n", error.title));
    }
    output.push_str(&format!("> {}\n", error.message));
    output
}
