//! Text normalization and the content validity filter.
//!
//! [`normalize`] turns a fragment of markup or scraped text into a single
//! line of clean prose: tags stripped, entities decoded, encoding debris
//! removed and whitespace collapsed. [`ContentFilter`] decides whether such
//! a fragment is article prose or page furniture.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::lexicon::Lexicon;

/// Fragments shorter than this are never valid content.
pub const MIN_VALID_CHARS: usize = 20;
/// Minimum share of letters, digits, basic punctuation and spaces.
pub const MIN_VALID_CHAR_RATIO: f64 = 0.70;
/// Valid-character ratio that, with enough words, stands in for a topical match.
pub const CLEAN_CHAR_RATIO: f64 = 0.80;
/// Word count that, with a clean ratio, stands in for a topical match.
pub const MIN_CLEAN_WORDS: usize = 5;
/// Consecutive single-character words that mark garbled text.
pub const MAX_SINGLE_CHAR_RUN: usize = 5;

const BASIC_PUNCTUATION: &str = ".,;:!?'\"-()%$&/\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}";

static BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->").expect("block regex")
});
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z][a-zA-Z0-9]{1,31});").expect("entity regex"));
static EXTENDED_LATIN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{00C0}-\u{024F}]{3,}").expect("extended latin regex"));
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(1[89]|20)\d{2}\b").expect("year regex"));

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "nbsp" | "ensp" | "emsp" | "thinsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201A}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "bdquo" => "\u{201E}",
        "laquo" => "\u{00AB}",
        "raquo" => "\u{00BB}",
        "lsaquo" => "\u{2039}",
        "rsaquo" => "\u{203A}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00B7}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "deg" => "\u{00B0}",
        "euro" => "\u{20AC}",
        "pound" => "\u{00A3}",
        "yen" => "\u{00A5}",
        "cent" => "\u{00A2}",
        "times" => "\u{00D7}",
        "divide" => "\u{00F7}",
        "frac12" => "\u{00BD}",
        "frac14" => "\u{00BC}",
        "frac34" => "\u{00BE}",
        "sect" => "\u{00A7}",
        "para" => "\u{00B6}",
        "shy" | "zwnj" | "zwj" | "lrm" | "rlm" => "",
        "eacute" => "é",
        "egrave" => "è",
        "ecirc" => "ê",
        "aacute" => "á",
        "agrave" => "à",
        "acirc" => "â",
        "iacute" => "í",
        "oacute" => "ó",
        "uacute" => "ú",
        "auml" => "ä",
        "ouml" => "ö",
        "uuml" => "ü",
        "szlig" => "ß",
        "ccedil" => "ç",
        "ntilde" => "ñ",
        _ => return None,
    };
    Some(decoded)
}

/// Decodes named and numeric HTML entities. Unknown entities are left as-is.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            let numeric = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };

            match numeric {
                Some(code) => match code {
                    160 => " ".to_string(),
                    _ => char::from_u32(code).map(String::from).unwrap_or_default(),
                },
                None if body.starts_with('#') => String::new(),
                None => named_entity(body).map(str::to_string).unwrap_or_else(|| whole.to_string()),
            }
        })
        .into_owned()
}

/// Removes script/style blocks and comments, then replaces every tag with a space.
pub fn strip_tags(html: &str) -> String {
    let without_blocks = BLOCK_REGEX.replace_all(html, " ");
    TAG_REGEX.replace_all(&without_blocks, " ").into_owned()
}

/// Symbols that only show up as decoding debris in article text.
fn is_artifact_char(c: char) -> bool {
    matches!(c,
        '\u{FFFD}'
        | '\u{2500}'..='\u{25FF}'
        | '\u{2660}'..='\u{2667}'
        | '\u{200B}'..='\u{200D}'
        | '\u{FEFF}'
    ) || (c.is_control() && !c.is_whitespace())
}

/// Drops control characters, symbol debris and runs of three or more
/// extended-Latin characters.
pub fn remove_artifacts(text: &str) -> String {
    let filtered: String = text.chars().filter(|&c| !is_artifact_char(c)).collect();
    EXTENDED_LATIN_RUN.replace_all(&filtered, "").into_owned()
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Cleans text that is already free of markup: entities, artifacts, whitespace.
pub fn clean_text(text: &str) -> String {
    let text = decode_entities(text);
    let text = remove_artifacts(&text);
    collapse_whitespace(&text)
}

/// Full normalization: tags, entities, artifacts, whitespace.
pub fn normalize(raw: &str) -> String {
    clean_text(&strip_tags(raw))
}

fn is_valid_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || BASIC_PUNCTUATION.contains(c)
}

/// Share of characters that are letters, digits, basic punctuation or spaces.
pub fn valid_char_ratio(text: &str) -> f64 {
    let (total, valid) = text
        .chars()
        .fold((0usize, 0usize), |(total, valid), c| (total + 1, valid + usize::from(is_valid_char(c))));

    if total == 0 { 0.0 } else { valid as f64 / total as f64 }
}

/// Share of whitespace-separated words made only of letters and digits once
/// surrounding punctuation is trimmed.
pub fn readable_word_ratio(text: &str) -> f64 {
    let (total, readable) = text.split_whitespace().fold((0usize, 0usize), |(total, readable), word| {
        let core = word.trim_matches(|c: char| !c.is_alphanumeric());
        let ok = !core.is_empty() && core.chars().all(|c| c.is_alphanumeric() || c == '\'' || c == '-');
        (total + 1, readable + usize::from(ok))
    });

    if total == 0 { 0.0 } else { readable as f64 / total as f64 }
}

/// Longest run of consecutive one-character words.
fn longest_single_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for word in text.split_whitespace() {
        if word.chars().count() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Whether `text` contains a four-digit year.
pub fn has_year(text: &str) -> bool {
    YEAR_REGEX.is_match(text)
}

/// Gate that separates article prose from boilerplate and corrupted text.
#[derive(Debug, Clone, Copy)]
pub struct ContentFilter<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> ContentFilter<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// A candidate must be clean (long enough, no boilerplate phrases, mostly
    /// valid characters, no garbled single-letter runs) and plausible (a
    /// topical keyword, a year, or at least five words of very clean text).
    pub fn is_valid_content(&self, candidate: &str) -> bool {
        let text = candidate.trim();
        if text.chars().count() < MIN_VALID_CHARS {
            return false;
        }

        let lower = text.to_lowercase();
        if self.lexicon.has_boilerplate(&lower) {
            return false;
        }

        let ratio = valid_char_ratio(text);
        if ratio < MIN_VALID_CHAR_RATIO {
            return false;
        }

        if longest_single_char_run(text) >= MAX_SINGLE_CHAR_RUN {
            return false;
        }

        let word_count = text.split_whitespace().count();
        self.lexicon.has_topical_keyword(&lower)
            || has_year(text)
            || (word_count >= MIN_CLEAN_WORDS && ratio > CLEAN_CHAR_RATIO)
    }
}
