use crate::digest::{ArticleSummary, Digest, ErrorSummary};

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Include the title underline and source line
    pub include_header: bool,

    /// Prefix key points with their category icon
    pub icons: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { line_width: 0, include_header: true, icons: true }
    }
}

/// Plain text formatter for digests
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, digest: &Digest) -> String {
        convert_to_text(digest, &self.config)
    }
}

/// Render a digest as plain text
pub fn convert_to_text(digest: &Digest, config: &TextConfig) -> String {
    match digest {
        Digest::Article(article) => article_to_text(article, config),
        Digest::Error(error) => error_to_text(error, config),
    }
}

fn generate_header(title: &str, url: &str) -> String {
    let mut header = String::new();
    header.push_str(title);
    header.push('\n');
    header.push_str(&"=".repeat(title.chars().count()));
    header.push('\n');

    if !url.is_empty() {
        header.push_str(&format!("Source: {}\n", url));
    }

    header
}

fn article_to_text(article: &ArticleSummary, config: &TextConfig) -> String {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(&article.title, &article.url));
        output.push('\n');
    }

    output.push_str(&wrap_text(&article.summary, config.line_width));

    if !article.key_points.is_empty() {
        output.push_str("\n\nKey points\n----------\n");
        let lines: Vec<String> = article
            .key_points
            .iter()
            .map(|point| {
                let marker = if config.icons { point.category.icon() } else { "-" };
                wrap_text(&format!("{} {}", marker, point.text), config.line_width)
            })
            .collect();
        output.push_str(&lines.join("\n"));
    }

    if !article.keywords.is_empty() {
        let words: Vec<String> = article.keywords.iter().map(|k| format!("{} ({})", k.word, k.count)).collect();
        output.push_str("\n\nKeywords: ");
        output.push_str(&words.join(", "));
    }

    output.trim().to_string()
}

fn error_to_text(error: &ErrorSummary, config: &TextConfig) -> String {
    let mut output = String::new();
    if config.include_header {
        output.push_str(&generate_header(&error.title, ""));
        output.push('\n');
    }
    output.push_str(&wrap_text(&error.message, config.line_width));
    output.trim().to_string()
}

/// Wrap text to specified line width, keeping paragraph and line breaks
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.split("\n\n")
        .map(|paragraph| {
            paragraph
                .lines()
                .map(|line| {
                    let words: Vec<&str> = line.split_whitespace().collect();
                    if words.is_empty() { String::new() } else { wrap_words(&words, width) }
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Wrap a slice of words to specified width
fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}
