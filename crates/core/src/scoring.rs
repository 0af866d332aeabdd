//! Sentence segmentation, word frequencies and extractive sentence scoring.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::lexicon::Lexicon;

/// Tokens preceding a period that do not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "sen", "rep", "gov", "gen", "col", "lt", "sgt", "jr", "sr", "vs",
    "inc", "ltd", "co", "no", "u.s", "u.k", "e.g", "i.e",
];

const CLOSING_MARKS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']'];
const QUOTE_MARKS: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'];

/// Configuration for sentence scoring
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Multiplier for sentences in the first quarter of the text
    pub lead_multiplier: f64,
    /// Multiplier for sentences in the last quarter of the text
    pub tail_multiplier: f64,
    /// Multiplier for sentences containing a discourse marker
    pub discourse_multiplier: f64,
    /// Multiplier for sentences containing a digit
    pub numeric_multiplier: f64,
    /// Multiplier for sentences longer than `run_on_words`
    pub run_on_multiplier: f64,
    /// Word count above which a sentence counts as a run-on
    pub run_on_words: usize,
    /// Multiplier for sentences dominated by quotation marks
    pub quote_multiplier: f64,
    /// Quotation mark share of characters above which `quote_multiplier` applies
    pub quote_ratio: f64,
    /// Sentences shorter than this are never scored
    pub min_sentence_chars: usize,
    /// Fewest sentences selected when enough are available
    pub min_selected: usize,
    /// Most sentences selected
    pub max_selected: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            lead_multiplier: 1.8,
            tail_multiplier: 1.3,
            discourse_multiplier: 1.4,
            numeric_multiplier: 1.2,
            run_on_multiplier: 0.9,
            run_on_words: 35,
            quote_multiplier: 0.7,
            quote_ratio: 0.10,
            min_sentence_chars: 20,
            min_selected: 8,
            max_selected: 15,
        }
    }
}

fn is_abbreviation(before: &str) -> bool {
    let last = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str()) || (last.chars().count() == 1 && last.chars().all(char::is_uppercase))
}

/// Splits text after `.`, `!` or `?` (plus any closing quotes or brackets)
/// when followed by whitespace. Common abbreviations do not end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if matches!(next, '.' | '!' | '?') || CLOSING_MARKS.contains(&next) {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if !at_boundary || (c == '.' && is_abbreviation(&text[start..idx])) {
            continue;
        }

        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = end;
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

/// Lowercase word tokens with surrounding punctuation and a possessive `'s` removed.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|word| {
            let mut word = word.trim_matches(|c: char| c == '\'' || c == '\u{2019}').to_lowercase();
            if let Some(len) = word.strip_suffix("'s").or_else(|| word.strip_suffix("\u{2019}s")).map(str::len) {
                word.truncate(len);
            }
            word
        })
        .filter(|word| !word.is_empty())
}

/// Counts of non-stop words, remembering the order words were first seen.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencies {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl WordFrequencies {
    pub fn build(text: &str, lexicon: &Lexicon) -> Self {
        let mut freq = Self::default();
        for word in tokenize(text) {
            if word.chars().count() < 2 || lexicon.is_stop_word(&word) {
                continue;
            }
            match freq.counts.get_mut(&word) {
                Some(count) => *count += 1,
                None => {
                    freq.counts.insert(word.clone(), 1);
                    freq.order.push(word);
                }
            }
        }
        freq
    }

    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Words by descending count; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.order.iter().map(|w| (w.as_str(), self.get(w))).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// A sentence with its score and position in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    pub text: String,
    pub score: f64,
    pub index: usize,
}

fn quote_share(sentence: &str) -> f64 {
    let (total, quotes) = sentence
        .chars()
        .fold((0usize, 0usize), |(t, q), c| (t + 1, q + usize::from(QUOTE_MARKS.contains(&c))));
    if total == 0 { 0.0 } else { quotes as f64 / total as f64 }
}

/// Scores one sentence at `index` of `total`.
///
/// The base is the summed frequency of its non-stop words. Position,
/// discourse markers and digits boost it; run-on length and heavy quoting
/// damp it. The result is normalized by the square root of the word count.
pub fn score_sentence(
    sentence: &str, index: usize, total: usize, freq: &WordFrequencies, lexicon: &Lexicon, config: &ScoreConfig,
) -> f64 {
    let base: usize = tokenize(sentence)
        .filter(|word| !lexicon.is_stop_word(word))
        .map(|word| freq.get(&word))
        .sum();
    let mut score = base as f64;

    let position = if total == 0 { 0.0 } else { index as f64 / total as f64 };
    if position < 0.25 {
        score *= config.lead_multiplier;
    } else if position >= 0.75 {
        score *= config.tail_multiplier;
    }

    if lexicon.has_discourse_marker(&sentence.to_lowercase()) {
        score *= config.discourse_multiplier;
    }

    if sentence.chars().any(|c| c.is_ascii_digit()) {
        score *= config.numeric_multiplier;
    }

    let word_count = sentence.split_whitespace().count();
    if word_count > config.run_on_words {
        score *= config.run_on_multiplier;
    }

    if quote_share(sentence) > config.quote_ratio {
        score *= config.quote_multiplier;
    }

    score / (word_count.max(1) as f64).sqrt()
}

/// Scores every sentence long enough to be considered.
pub fn score_sentences(
    sentences: &[String], freq: &WordFrequencies, lexicon: &Lexicon, config: &ScoreConfig,
) -> Vec<ScoredSentence> {
    let total = sentences.len();
    sentences
        .iter()
        .enumerate()
        .filter(|(_, s)| s.chars().count() >= config.min_sentence_chars)
        .map(|(index, s)| ScoredSentence {
            text: s.clone(),
            score: score_sentence(s, index, total, freq, lexicon, config),
            index,
        })
        .collect()
}

/// Number of sentences to keep out of `total`: half, clamped to the configured range.
pub fn selection_size(total: usize, config: &ScoreConfig) -> usize {
    (total / 2).clamp(config.min_selected, config.max_selected)
}

/// Keeps the highest scoring sentences and returns them in source order.
pub fn select_top(mut scored: Vec<ScoredSentence>, total: usize, config: &ScoreConfig) -> Vec<ScoredSentence> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then(a.index.cmp(&b.index)));
    scored.truncate(selection_size(total, config));
    scored.sort_by_key(|s| s.index);
    scored
}
