//! Word lists and phrase tables shared by the text stages.
//!
//! Every heuristic that keys off vocabulary (stop words, boilerplate
//! denylists, discourse markers, key point categories, topic signals) reads
//! from a [`Lexicon`]. The engine builds one at construction time and hands
//! it to each stage by reference, so the tables can be swapped or extended
//! without touching the scoring code.

use std::collections::HashSet;

use crate::digest::Category;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "doing", "down", "during", "each", "even", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "like", "made", "make", "many", "may", "me",
    "might", "more", "most", "much", "must", "my", "myself", "new", "no", "nor", "not", "now", "of", "off",
    "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "said",
    "same", "say", "says", "she", "should", "since", "so", "some", "still", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "two", "under", "until", "up", "upon", "us", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Markers that disqualify a paragraph during paragraph aggregation.
const PARAGRAPH_DENYLIST: &[&str] = &[
    "subscribe",
    "advertisement",
    "cookie",
    "privacy policy",
    "copyright",
    "all rights reserved",
];

/// Phrases that mark a fragment as page furniture rather than prose.
const BOILERPLATE_PHRASES: &[&str] = &[
    "cookie",
    "cookies",
    "subscribe",
    "subscription",
    "newsletter",
    "login",
    "log in",
    "sign in",
    "sign up",
    "create an account",
    "copyright",
    "all rights reserved",
    "privacy policy",
    "terms of service",
    "terms of use",
    "skip to content",
    "skip to main content",
    "main menu",
    "navigation",
    "breadcrumb",
    "advertisement",
    "sponsored content",
    "follow us",
    "share this",
    "click here",
    "enable javascript",
    "read more",
];

/// Vocabulary that makes a fragment plausibly newsworthy.
const TOPICAL_KEYWORDS: &[&str] = &[
    "attack", "government", "report", "reported", "official", "officials", "police", "minister",
    "president", "election", "economy", "market", "company", "court", "study", "research", "percent",
    "million", "billion", "war", "security", "health", "according", "announced", "investigation",
    "people", "city", "country", "state", "university", "data", "killed", "injured", "crisis",
];

const DISCOURSE_MARKERS: &[&str] = &[
    "according to",
    "however",
    "therefore",
    "revealed",
    "announced",
    "confirmed",
    "reported",
    "found that",
    "as a result",
    "in addition",
    "despite",
    "significant",
    "important",
    "concluded",
    "because",
];

const TRANSITIONS: &[&str] = &[
    "Furthermore,",
    "Meanwhile,",
    "However,",
    "Additionally,",
    "In addition,",
    "Moreover,",
];

const STATISTIC_TERMS: &[&str] = &[
    "percent", "%", "per cent", "million", "billion", "thousand", "rate", "average", "survey", "figures",
    "statistics", "data", "doubled", "tripled", "increase", "decrease",
];
const ANNOUNCEMENT_TERMS: &[&str] = &[
    "announced", "announce", "launched", "unveiled", "introduced", "declared", "released", "plans to",
    "will launch", "revealed plans",
];
const INVESTIGATIVE_TERMS: &[&str] = &[
    "investigation", "investigators", "revealed", "found that", "discovered", "uncovered", "probe",
    "evidence", "alleged", "allegedly", "documents show", "inquiry",
];
const QUOTE_TERMS: &[&str] = &["said", "says", "stated", "told", "according to", "explained", "added", "\""];
const URGENT_TERMS: &[&str] = &[
    "breaking", "urgent", "emergency", "crisis", "immediately", "warning", "alert", "evacuate", "deadly",
];
const FINANCIAL_TERMS: &[&str] = &[
    "dollar", "dollars", "$", "€", "£", "market", "markets", "stock", "shares", "revenue", "profit",
    "economy", "economic", "investment", "funding", "budget", "inflation", "bank",
];
const GOVERNMENTAL_TERMS: &[&str] = &[
    "government", "minister", "ministry", "president", "parliament", "congress", "senate", "official",
    "officials", "policy", "legislation", "law", "regulator", "agency", "administration",
];

const DATE_TERMS: &[&str] = &[
    "january", "february", "march", "april", "june", "july", "august", "september", "october", "november",
    "december", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "yesterday",
    "today", "last week", "this week",
];
const CASUALTY_TERMS: &[&str] = &[
    "killed", "dead", "died", "deaths", "injured", "wounded", "casualties", "victims", "fatalities",
];
const ATTACK_TERMS: &[&str] = &[
    "attack", "attacks", "bomb", "bombing", "shooting", "explosion", "assault", "strike", "gunmen",
    "incident", "clashes",
];
const GOVERNMENT_SIGNAL_TERMS: &[&str] = &[
    "government", "minister", "president", "authorities", "officials", "parliament", "ministry",
    "security forces", "police", "army",
];
const INVESTIGATION_TERMS: &[&str] = &[
    "investigation", "investigating", "probe", "arrested", "suspects", "charged", "inquiry", "court",
];

/// A family of signal words used on topic and listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicFamily {
    Date,
    Casualty,
    Attack,
    Government,
    Investigation,
}

impl TopicFamily {
    /// Icon prepended to context lines in a topic summary.
    pub fn icon(self) -> &'static str {
        match self {
            TopicFamily::Date => "📅",
            TopicFamily::Casualty => "🚑",
            TopicFamily::Attack => "⚠️",
            TopicFamily::Government => "🏛️",
            TopicFamily::Investigation => "🔍",
        }
    }

    /// Key point category a topic sentence of this family is filed under.
    pub fn category(self) -> Category {
        match self {
            TopicFamily::Date => Category::General,
            TopicFamily::Casualty | TopicFamily::Attack => Category::Urgent,
            TopicFamily::Government => Category::Governmental,
            TopicFamily::Investigation => Category::Investigative,
        }
    }
}

/// Immutable vocabulary tables used across the pipeline.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub stop_words: HashSet<String>,
    pub paragraph_denylist: Vec<String>,
    pub boilerplate_phrases: Vec<String>,
    pub topical_keywords: Vec<String>,
    pub discourse_markers: Vec<String>,
    pub transitions: Vec<String>,
    /// Category tables in assignment priority order.
    pub categories: Vec<(Category, Vec<String>)>,
    /// Topic signal tables in matching priority order.
    pub topic_families: Vec<(TopicFamily, Vec<String>)>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            paragraph_denylist: owned(PARAGRAPH_DENYLIST),
            boilerplate_phrases: owned(BOILERPLATE_PHRASES),
            topical_keywords: owned(TOPICAL_KEYWORDS),
            discourse_markers: owned(DISCOURSE_MARKERS),
            transitions: owned(TRANSITIONS),
            categories: vec![
                (Category::Urgent, owned(URGENT_TERMS)),
                (Category::Statistic, owned(STATISTIC_TERMS)),
                (Category::Announcement, owned(ANNOUNCEMENT_TERMS)),
                (Category::Investigative, owned(INVESTIGATIVE_TERMS)),
                (Category::Financial, owned(FINANCIAL_TERMS)),
                (Category::Governmental, owned(GOVERNMENTAL_TERMS)),
                (Category::Quote, owned(QUOTE_TERMS)),
            ],
            topic_families: vec![
                (TopicFamily::Casualty, owned(CASUALTY_TERMS)),
                (TopicFamily::Attack, owned(ATTACK_TERMS)),
                (TopicFamily::Investigation, owned(INVESTIGATION_TERMS)),
                (TopicFamily::Government, owned(GOVERNMENT_SIGNAL_TERMS)),
                (TopicFamily::Date, owned(DATE_TERMS)),
            ],
        }
    }
}

impl Lexicon {
    /// Whether `word` (already lowercased) is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Adds extra topical keywords, for callers tuning the validity filter to a domain.
    pub fn with_topical_keywords(mut self, words: &[&str]) -> Self {
        self.topical_keywords.extend(words.iter().map(|w| w.to_lowercase()));
        self
    }

    /// Denylist terms match inflected forms too ("cookie" catches "cookies").
    pub fn has_paragraph_boilerplate(&self, lower: &str) -> bool {
        self.paragraph_denylist.iter().any(|term| contains_stem(lower, term))
    }

    pub fn has_boilerplate(&self, lower: &str) -> bool {
        self.boilerplate_phrases.iter().any(|term| contains_stem(lower, term))
    }

    pub fn has_topical_keyword(&self, lower: &str) -> bool {
        contains_any(lower, &self.topical_keywords)
    }

    pub fn has_discourse_marker(&self, lower: &str) -> bool {
        contains_any(lower, &self.discourse_markers)
    }

    /// Categories whose tables match `lower`, in priority order.
    pub fn matching_categories(&self, lower: &str) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|(_, terms)| contains_any(lower, terms))
            .map(|(category, _)| *category)
            .collect()
    }

    /// First topic family whose table matches `lower`.
    pub fn topic_family(&self, lower: &str) -> Option<TopicFamily> {
        self.topic_families
            .iter()
            .find(|(_, terms)| contains_any(lower, terms))
            .map(|(family, _)| *family)
    }

    /// Transition phrase for the `n`th insertion, rotating through the table.
    pub fn transition(&self, n: usize) -> Option<&str> {
        if self.transitions.is_empty() {
            None
        } else {
            self.transitions.get(n % self.transitions.len()).map(String::as_str)
        }
    }
}

/// Whether any term occurs in `haystack` as a whole word or phrase.
pub fn contains_any(haystack: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| contains_term(haystack, term))
}

/// Whole-word containment: an alphanumeric edge of `term` must not be glued
/// to another alphanumeric character in `haystack`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    let starts_alnum = term.chars().next().is_some_and(char::is_alphanumeric);
    let ends_alnum = term.chars().last().is_some_and(char::is_alphanumeric);

    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = !starts_alnum || !haystack[..start].chars().last().is_some_and(char::is_alphanumeric);
        let after_ok = !ends_alnum || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        before_ok && after_ok
    })
}

/// Prefix containment: `term` must start a word in `haystack` but may run
/// on into a suffix, so "subscribe" matches "subscribers" and "subscribed".
pub fn contains_stem(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    let starts_alnum = term.chars().next().is_some_and(char::is_alphanumeric);
    haystack
        .match_indices(term)
        .any(|(start, _)| !starts_alnum || !haystack[..start].chars().last().is_some_and(char::is_alphanumeric))
}
