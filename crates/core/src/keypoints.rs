//! Categorized key point extraction.

use std::cmp::Ordering;

use crate::classify::text_hints_listing;
use crate::digest::{Category, KeyPoint};
use crate::lexicon::{Lexicon, TopicFamily};
use crate::normalize::has_year;
use crate::scoring::{WordFrequencies, split_sentences, tokenize};

/// Configuration for key point extraction
#[derive(Debug, Clone)]
pub struct KeyPointConfig {
    /// Shortest sentence considered
    pub min_chars: usize,
    /// Longest sentence considered
    pub max_chars: usize,
    /// Score a sentence must exceed on the strict pass
    pub strict_threshold: f64,
    /// Score a sentence must exceed on the relaxed pass
    pub relaxed_threshold: f64,
    /// The relaxed pass runs when the strict pass accepts fewer than this
    pub min_accepted: usize,
    /// Most key points returned
    pub max_points: usize,
    /// Bonus per matching category
    pub category_bonus: f64,
    /// Bonus for containing a digit
    pub digit_bonus: f64,
    /// Bonus per capitalized word after the first
    pub capital_bonus: f64,
    /// Weight applied to the count of frequent words
    pub frequency_weight: f64,
    /// Words must occur more often than this to add frequency weight
    pub frequency_gate: usize,
}

impl Default for KeyPointConfig {
    fn default() -> Self {
        Self {
            min_chars: 35,
            max_chars: 250,
            strict_threshold: 8.0,
            relaxed_threshold: 5.0,
            min_accepted: 8,
            max_points: 15,
            category_bonus: 3.0,
            digit_bonus: 2.0,
            capital_bonus: 1.0,
            frequency_weight: 0.25,
            frequency_gate: 2,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    score: f64,
    point: KeyPoint,
}

fn in_window(sentence: &str, config: &KeyPointConfig) -> bool {
    let len = sentence.chars().count();
    len >= config.min_chars && len <= config.max_chars
}

fn capitalized_words(sentence: &str) -> usize {
    sentence
        .split_whitespace()
        .skip(1)
        .filter(|word| word.trim_start_matches(|c: char| !c.is_alphanumeric()).starts_with(char::is_uppercase))
        .count()
}

/// Scores a sentence. The relaxed pass counts at most one category.
fn score_sentence(
    sentence: &str, categories: &[Category], freq: &WordFrequencies, lexicon: &Lexicon, config: &KeyPointConfig,
    relaxed: bool,
) -> f64 {
    let category_hits = if relaxed { categories.len().min(1) } else { categories.len() };
    let mut score = category_hits as f64 * config.category_bonus;

    if sentence.chars().any(|c| c.is_ascii_digit()) {
        score += config.digit_bonus;
    }

    score += capitalized_words(sentence) as f64 * config.capital_bonus;

    let frequent: usize = tokenize(sentence)
        .filter(|word| !lexicon.is_stop_word(word))
        .map(|word| freq.get(&word))
        .filter(|&count| count > config.frequency_gate)
        .sum();
    score + frequent as f64 * config.frequency_weight
}

fn scoring_pass(
    sentences: &[String], freq: &WordFrequencies, lexicon: &Lexicon, config: &KeyPointConfig, relaxed: bool,
) -> Vec<Candidate> {
    let threshold = if relaxed { config.relaxed_threshold } else { config.strict_threshold };

    sentences
        .iter()
        .enumerate()
        .filter(|(_, s)| in_window(s, config))
        .filter_map(|(index, s)| {
            let categories = lexicon.matching_categories(&s.to_lowercase());
            let score = score_sentence(s, &categories, freq, lexicon, config, relaxed);
            let category = categories.first().copied().unwrap_or(Category::General);
            (score > threshold).then(|| Candidate { index, score, point: KeyPoint { category, text: s.clone() } })
        })
        .collect()
}

/// Keeps the best `max` candidates, drops repeated text and restores source order.
fn finalize(mut candidates: Vec<Candidate>, max: usize) -> Vec<KeyPoint> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then(a.index.cmp(&b.index)));

    let mut kept: Vec<Candidate> = Vec::with_capacity(max);
    for candidate in candidates {
        if kept.len() == max {
            break;
        }
        if !kept.iter().any(|k| k.point.text == candidate.point.text) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|c| c.index);
    kept.into_iter().map(|c| c.point).collect()
}

/// Key points of a single article.
///
/// Sentences inside the length window are scored on category matches,
/// digits, capitalized words and word frequency. A relaxed pass with a lower
/// threshold replaces the strict one when the strict pass accepts too few.
pub fn extract_key_points(body: &str, lexicon: &Lexicon, config: &KeyPointConfig) -> Vec<KeyPoint> {
    let sentences = split_sentences(body);
    let freq = WordFrequencies::build(body, lexicon);

    let strict = scoring_pass(&sentences, &freq, lexicon, config, false);
    let candidates = if strict.len() < config.min_accepted {
        scoring_pass(&sentences, &freq, lexicon, config, true)
    } else {
        strict
    };

    finalize(candidates, config.max_points)
}

/// Key points of a topic listing: sentences carrying a topic signal, filed
/// under the category of their family.
pub fn extract_topic_key_points(body: &str, lexicon: &Lexicon, config: &KeyPointConfig) -> Vec<KeyPoint> {
    let mut points: Vec<KeyPoint> = Vec::new();

    for sentence in split_sentences(body) {
        if points.len() == config.max_points {
            break;
        }
        if !in_window(&sentence, config) || text_hints_listing(&sentence) {
            continue;
        }

        let family = lexicon
            .topic_family(&sentence.to_lowercase())
            .or_else(|| has_year(&sentence).then_some(TopicFamily::Date));

        if let Some(family) = family
            && !points.iter().any(|p| p.text == sentence)
        {
            points.push(KeyPoint { category: family.category(), text: sentence });
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_words_skip_first() {
        assert_eq!(capitalized_words("The Mayor met \"Council\" members in Paris"), 3);
        assert_eq!(capitalized_words("Nothing else here"), 0);
    }

    #[test]
    fn test_strict_pass_categorizes() {
        let body = "Officials announced that the Harbour Authority will invest $40 million in the new port. \
            A short one. \
            The government minister said the investment would double cargo capacity by 2030.";
        let config = KeyPointConfig { min_accepted: 1, ..Default::default() };
        let points = extract_key_points(body, &Lexicon::default(), &config);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category, Category::Statistic);
        assert!(points[0].text.starts_with("Officials announced"));
        assert!(points[1].text.starts_with("The government minister"));
    }

    #[test]
    fn test_relaxed_pass_runs_when_strict_is_thin() {
        let body = "The Harbour Authority met on Monday in Dover to review the plan for 2025.";
        let lexicon = Lexicon::default();
        let config = KeyPointConfig::default();

        let sentences = split_sentences(body);
        let freq = WordFrequencies::build(body, &lexicon);
        assert!(scoring_pass(&sentences, &freq, &lexicon, &config, false).is_empty());

        let points = extract_key_points(body, &lexicon, &config);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].category, Category::General);
    }

    #[test]
    fn test_window_excludes_short_and_long() {
        let long = format!("The Council said {} in 2024.", "word ".repeat(60));
        let body = format!("The Mayor said 2024 plans. {}", long);
        assert!(extract_key_points(&body, &Lexicon::default(), &KeyPointConfig::default()).is_empty());
    }

    #[test]
    fn test_at_most_max_points_in_source_order() {
        let body: String = (0..30)
            .map(|i| format!("The Ministry of Finance announced {} new Budget measures for Region {}. ", i + 10, i))
            .collect();
        let config = KeyPointConfig::default();
        let points = extract_key_points(&body, &Lexicon::default(), &config);

        assert_eq!(points.len(), config.max_points);
        let positions: Vec<usize> = points.iter().filter_map(|p| body.find(&p.text)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicates_removed() {
        let sentence = "The Ministry of Finance announced 40 new Budget measures today. ";
        let points = extract_key_points(&sentence.repeat(3), &Lexicon::default(), &KeyPointConfig::default());
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_topic_key_points_use_family_categories() {
        let body = "Showing 1-20 of 340 results for this topic. \
            Two people were injured in the blast near the station on Friday. \
            Investigators have arrested three suspects in connection with the case. \
            The festival returns in 2026 with a larger programme of events. \
            Organisers praised the volunteers for their hard work this season.";
        let points = extract_topic_key_points(body, &Lexicon::default(), &KeyPointConfig::default());
        let categories: Vec<Category> = points.iter().map(|p| p.category).collect();

        assert_eq!(categories, vec![Category::Urgent, Category::Investigative, Category::General]);
        assert!(points.iter().all(|p| !p.text.contains("Showing")));
    }
}
