//! Narrative summaries for single articles and topic listings.
//!
//! A [`Summarizer`] is a strategy over cleaned body text. The engine picks
//! [`ArticleSummarizer`] or [`TopicSummarizer`] from the page kind, so both
//! are reachable through [`summarizer_for`].

use crate::classify::{PageKind, text_hints_listing};
use crate::digest::PLACEHOLDER_TITLE;
use crate::lexicon::Lexicon;
use crate::normalize::{ContentFilter, readable_word_ratio};
use crate::scoring::{ScoreConfig, ScoredSentence, WordFrequencies, score_sentences, select_top, split_sentences};

/// Selected sentences per paragraph of an article summary.
const SENTENCES_PER_PARAGRAPH: usize = 3;
/// A transition phrase is inserted before every this-many selected sentences.
const TRANSITION_EVERY: usize = 4;
/// Summaries with a body longer than this get a closing remark.
const CLOSING_MIN_CHARS: usize = 200;

const CLOSING_REMARK: &str =
    "Taken together, these points outline the central developments in the story and what comes next.";

/// Topic context lines kept from marker matches.
const MAX_CONTEXT_LINES: usize = 10;
/// Below this many marker matches, topic summaries fall back to plain sentences.
const MIN_CONTEXT_LINES: usize = 6;
/// Total lines once the fallback has run.
const RELAXED_CONTEXT_LINES: usize = 8;
const RELAXED_READABLE_RATIO: f64 = 0.7;
const FALLBACK_ICON: &str = "•";

/// What a summarizer works from.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub description: Option<&'a str>,
}

/// A summarization strategy. Returns an empty string when nothing usable was found.
pub trait Summarizer {
    fn summarize(&self, input: &SummaryInput<'_>, lexicon: &Lexicon) -> String;
}

/// Frequency-scored extractive summary stitched into paragraphs.
#[derive(Debug, Clone, Default)]
pub struct ArticleSummarizer {
    pub config: ScoreConfig,
}

impl ArticleSummarizer {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Top sentences of `body`, in source order.
    pub fn select(&self, body: &str, lexicon: &Lexicon) -> Vec<ScoredSentence> {
        let sentences = split_sentences(body);
        let freq = WordFrequencies::build(body, lexicon);
        let scored = score_sentences(&sentences, &freq, lexicon, &self.config);
        select_top(scored, sentences.len(), &self.config)
    }
}

fn framing_line(title: &str) -> String {
    if title.is_empty() || title == PLACEHOLDER_TITLE {
        "Here is an overview of the main points in this article.".to_string()
    } else {
        format!("This summary covers \"{}\" and the key developments it reports.", title)
    }
}

/// Capitalized only at its first letter, like "The" but not "US" or "I".
fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => first.is_uppercase() && !second.is_uppercase(),
        _ => false,
    }
}

/// Prefixes `sentence` with a transition, lowercasing its first letter when
/// the sentence opens with a title-case stop word. Acronyms and "I" keep
/// their case.
fn with_transition(sentence: &str, transition: &str, lexicon: &Lexicon) -> String {
    let opener = transition.trim_end_matches(',').to_lowercase();
    if sentence.to_lowercase().starts_with(&opener) {
        return sentence.to_string();
    }

    let first_word = sentence
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .unwrap_or_default();

    if is_title_case(first_word) && lexicon.is_stop_word(&first_word.to_lowercase()) {
        let mut chars = sentence.chars();
        let lowered: String = match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{} {}", transition, lowered)
    } else {
        format!("{} {}", transition, sentence)
    }
}

/// Groups selected sentences into paragraphs, inserting rotating transitions.
pub fn compose_paragraphs(selected: &[ScoredSentence], lexicon: &Lexicon) -> String {
    let sentences: Vec<String> = selected
        .iter()
        .enumerate()
        .map(|(j, s)| {
            if j > 0
                && j % TRANSITION_EVERY == 0
                && let Some(transition) = lexicon.transition(j / TRANSITION_EVERY - 1)
            {
                with_transition(&s.text, transition, lexicon)
            } else {
                s.text.clone()
            }
        })
        .collect();

    sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl Summarizer for ArticleSummarizer {
    fn summarize(&self, input: &SummaryInput<'_>, lexicon: &Lexicon) -> String {
        let selected = self.select(input.body, lexicon);
        let body = compose_paragraphs(&selected, lexicon);
        if body.is_empty() {
            return String::new();
        }

        let mut summary = format!("{}\n\n{}", framing_line(input.title), body);
        if body.chars().count() > CLOSING_MIN_CHARS {
            summary.push_str("\n\n");
            summary.push_str(CLOSING_REMARK);
        }
        summary
    }
}

/// Overview line plus icon-tagged context lines for listing pages.
#[derive(Debug, Clone)]
pub struct TopicSummarizer {
    pub min_sentence_chars: usize,
}

impl Default for TopicSummarizer {
    fn default() -> Self {
        Self { min_sentence_chars: ScoreConfig::default().min_sentence_chars }
    }
}

impl TopicSummarizer {
    /// Context lines as `(source index, icon, sentence)`, in source order.
    pub fn context_lines(&self, body: &str, lexicon: &Lexicon) -> Vec<(usize, &'static str, String)> {
        let sentences = split_sentences(body);
        let candidates: Vec<(usize, &String)> = sentences
            .iter()
            .enumerate()
            .filter(|(_, s)| s.chars().count() >= self.min_sentence_chars && !text_hints_listing(s))
            .collect();

        let mut lines: Vec<(usize, &'static str, String)> = candidates
            .iter()
            .filter_map(|(i, s)| lexicon.topic_family(&s.to_lowercase()).map(|family| (*i, family.icon(), (*s).clone())))
            .take(MAX_CONTEXT_LINES)
            .collect();

        if lines.len() < MIN_CONTEXT_LINES {
            let filter = ContentFilter::new(lexicon);
            let needed = RELAXED_CONTEXT_LINES.saturating_sub(lines.len());
            let extra: Vec<(usize, &'static str, String)> = candidates
                .iter()
                .filter(|(i, _)| !lines.iter().any(|(taken, _, _)| taken == i))
                .filter(|(_, s)| filter.is_valid_content(s) && readable_word_ratio(s) >= RELAXED_READABLE_RATIO)
                .take(needed)
                .map(|(i, s)| (*i, FALLBACK_ICON, (*s).clone()))
                .collect();
            lines.extend(extra);
            lines.sort_by_key(|(i, _, _)| *i);
        }

        lines
    }
}

impl Summarizer for TopicSummarizer {
    fn summarize(&self, input: &SummaryInput<'_>, lexicon: &Lexicon) -> String {
        let overview = match input.description {
            Some(desc) if !desc.is_empty() => format!("Overview: {}", desc),
            _ => format!("Overview: This page collects recent coverage of \"{}\".", input.title),
        };

        let lines = self.context_lines(input.body, lexicon);
        if lines.is_empty() {
            return overview;
        }

        let body: Vec<String> = lines.iter().map(|(_, icon, s)| format!("{} {}", icon, s)).collect();
        format!("{}\n\n{}", overview, body.join("\n"))
    }
}

/// Strategy for a page kind.
pub fn summarizer_for(kind: PageKind, config: &ScoreConfig) -> Box<dyn Summarizer> {
    match kind {
        PageKind::SingleArticle => Box::new(ArticleSummarizer::new(config.clone())),
        PageKind::TopicListing => Box::new(TopicSummarizer { min_sentence_chars: config.min_sentence_chars }),
    }
}
