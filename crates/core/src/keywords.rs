//! Frequency-ranked keyword extraction.

use crate::digest::Keyword;
use crate::lexicon::Lexicon;
use crate::scoring::WordFrequencies;

/// Keywords returned when the caller does not choose.
pub const DEFAULT_TOP_N: usize = 20;

/// Keywords must be longer than this.
const MIN_KEYWORD_CHARS: usize = 3;

/// Most frequent non-stop words longer than three characters, excluding
/// purely numeric tokens. Ties keep the order words first appear in `text`.
pub fn extract_keywords(text: &str, top_n: usize, lexicon: &Lexicon) -> Vec<Keyword> {
    WordFrequencies::build(text, lexicon)
        .ranked()
        .into_iter()
        .filter(|(word, _)| word.chars().count() > MIN_KEYWORD_CHARS && !word.chars().all(|c| c.is_numeric()))
        .take(top_n)
        .map(|(word, count)| Keyword { word: word.to_string(), count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(keywords: &[Keyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.word.as_str()).collect()
    }

    #[test]
    fn test_ranked_by_count_then_first_seen() {
        let text = "Bridge repairs delayed. The bridge reopens in spring. Traffic on the bridge and traffic nearby.";
        let keywords = extract_keywords(text, DEFAULT_TOP_N, &Lexicon::default());

        assert_eq!(keywords[0], Keyword { word: "bridge".to_string(), count: 3 });
        assert_eq!(keywords[1], Keyword { word: "traffic".to_string(), count: 2 });
        assert_eq!(words(&keywords[2..]), vec!["repairs", "delayed", "reopens", "spring", "nearby"]);
    }

    #[test]
    fn test_excludes_short_numeric_and_stop_words() {
        let text = "In 2024 the city and its mayor paid 1500 for the road there.";
        let keywords = extract_keywords(text, DEFAULT_TOP_N, &Lexicon::default());

        assert_eq!(words(&keywords), vec!["city", "mayor", "paid", "road"]);
    }

    #[test]
    fn test_top_n_limit() {
        let text = "alpha bravo charlie delta foxtrot hotel";
        assert_eq!(extract_keywords(text, 2, &Lexicon::default()).len(), 2);
        assert!(extract_keywords(text, 0, &Lexicon::default()).is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_keywords("", DEFAULT_TOP_N, &Lexicon::default()).is_empty());
    }
}
