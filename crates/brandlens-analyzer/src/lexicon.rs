//! Word lists and the bag-of-words sentiment scorer.
//!
//! A [`Lexicon`] is plain data: build it once (usually via `Default`) and
//! hand it to [`crate::ContentAnalyzer`]. Tests construct their own.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid url regex"));

/// Tokens this short carry no signal.
const MIN_TOKEN_CHARS: usize = 3;

/// Raw ratios are multiplied by this before clamping.
const SENTIMENT_SCALE: f64 = 5.0;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "best", "love", "quality", "reliable", "trusted",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "worst", "hate", "sorry", "negative", "problem", "failure",
];

/// Indicator word and the value label it stands for.
const VALUE_INDICATORS: &[(&str, &str)] = &[
    ("quality", "Quality"),
    ("innovation", "Innovation"),
    ("excellence", "Excellence"),
    ("integrity", "Integrity"),
    ("service", "Service"),
    ("customer", "Customer Focus"),
    ("solution", "Solutions"),
    ("expert", "Expertise"),
];

const DEFAULT_KEYWORDS: &[&str] = &[
    "professional",
    "service",
    "quality",
    "experience",
    "solution",
    "innovation",
    "customer",
];

const DEFAULT_KEY_VALUES: &[&str] = &["Quality", "Innovation", "Customer Focus", "Excellence", "Integrity"];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
    "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
    "that", "with", "have", "this", "will", "your", "from", "they", "know", "want", "been",
    "good", "much", "some", "time", "very", "when", "come", "here", "just", "like", "long",
    "make", "many", "more", "only", "over", "such", "take", "than", "them", "well", "were",
    "what", "into", "their", "there", "these", "those", "about", "which", "would", "could",
    "should", "other", "after", "where", "while", "being", "every", "because", "through",
    "also", "each", "most", "then", "both", "same", "does", "done", "post", "bio",
];

/// Word lists used by the analyzer.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub value_indicators: Vec<(String, String)>,
    pub stop_words: HashSet<String>,
    pub default_keywords: Vec<String>,
    pub default_key_values: Vec<String>,
}

fn owned_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn owned_vec(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive: owned_set(POSITIVE_WORDS),
            negative: owned_set(NEGATIVE_WORDS),
            value_indicators: VALUE_INDICATORS
                .iter()
                .map(|(word, label)| ((*word).to_string(), (*label).to_string()))
                .collect(),
            stop_words: owned_set(STOP_WORDS),
            default_keywords: owned_vec(DEFAULT_KEYWORDS),
            default_key_values: owned_vec(DEFAULT_KEY_VALUES),
        }
    }
}

impl Lexicon {
    #[must_use]
    pub fn is_value_indicator(&self, word: &str) -> bool {
        self.value_indicators.iter().any(|(w, _)| w == word)
    }

    #[must_use]
    pub fn value_label(&self, word: &str) -> Option<&str> {
        self.value_indicators
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, label)| label.as_str())
    }

    /// Polarity and subjectivity of `tokens`.
    #[must_use]
    pub fn score(&self, tokens: &[String]) -> Sentiment {
        if tokens.is_empty() {
            return Sentiment::default();
        }
        let positive = tokens.iter().filter(|t| self.positive.contains(*t)).count();
        let negative = tokens.iter().filter(|t| self.negative.contains(*t)).count();

        #[allow(clippy::cast_precision_loss)]
        let (positive, negative, total) = (positive as f64, negative as f64, tokens.len() as f64);

        Sentiment {
            polarity: ((positive - negative) / total * SENTIMENT_SCALE).clamp(-1.0, 1.0),
            subjectivity: ((positive + negative) / total * SENTIMENT_SCALE).min(1.0),
        }
    }
}

/// Lexicon sentiment. `polarity` is in `[-1, 1]`, `subjectivity` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl Sentiment {
    /// Reported when there is too little text to score.
    pub const NEUTRAL_DEFAULT: Self = Self {
        polarity: 0.1,
        subjectivity: 0.3,
    };
}

/// Lowercase, drop URLs and punctuation, keep words of three or more chars.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let without_urls = URL_RE.replace_all(&lower, " ");
    let cleaned = NON_WORD_RE.replace_all(&without_urls, " ");
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> Sentiment {
        Lexicon::default().score(&tokenize(text))
    }

    #[test]
    fn tokenize_strips_punctuation_and_short_words() {
        assert_eq!(
            tokenize("We're the BEST, at coffee! Visit https://acme.com/x today."),
            vec!["the", "best", "coffee", "visit", "today"]
        );
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(score(""), Sentiment::default());
        assert_eq!(score("   "), Sentiment::default());
    }

    #[test]
    fn unknown_words_have_zero_polarity() {
        let s = score("the quick brown fox");
        assert!(s.polarity.abs() < f64::EPSILON);
        assert!(s.subjectivity.abs() < f64::EPSILON);
    }

    #[test]
    fn positive_words_raise_polarity() {
        let s = score("great coffee and friendly staff");
        // 1 positive of 5 tokens, scaled by 5.
        assert!((s.polarity - 1.0).abs() < f64::EPSILON, "{s:?}");
    }

    #[test]
    fn negative_words_lower_polarity() {
        let s = score("terrible service, slow delivery, cold coffee, rude staff today");
        assert!(s.polarity < 0.0, "{s:?}");
    }

    #[test]
    fn mixed_text_stays_in_range() {
        let s = score("great product but a terrible problem with shipping every time");
        assert!(s.polarity > -1.0 && s.polarity < 1.0, "{s:?}");
        assert!(s.subjectivity <= 1.0);
    }

    #[test]
    fn scores_clamp() {
        assert!((score("great excellent best love").polarity - 1.0).abs() < f64::EPSILON);
        assert!((score("bad awful worst hate").polarity + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn value_labels() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_value_indicator("customer"));
        assert_eq!(lexicon.value_label("customer"), Some("Customer Focus"));
        assert_eq!(lexicon.value_label("coffee"), None);
    }
}
