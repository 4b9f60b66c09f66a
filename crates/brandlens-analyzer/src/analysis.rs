//! Keywords, key values, tone and sentiment over website and profile text.

use std::collections::{BTreeMap, HashMap};

use brandlens_core::{PlatformProfile, WebsiteContent};
use serde::{Deserialize, Serialize};

use crate::lexicon::{tokenize, Lexicon, Sentiment};

/// Combined text shorter than this is not analysed.
const MIN_ANALYSIS_CHARS: usize = 50;
const KEYWORD_COUNT: usize = 10;
const KEY_VALUE_COUNT: usize = 5;
/// Words longer than this qualify as keywords even when not value words.
const KEYWORD_MIN_CHARS: usize = 4;
const TONE_CAP: f64 = 0.8;
const TONE_STEP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Informative,
    Enthusiastic,
    Formal,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Informative,
        Tone::Enthusiastic,
        Tone::Formal,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Informative => "Informative",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Formal => "Formal",
        }
    }

    fn default_weight(self) -> f64 {
        match self {
            Tone::Professional => 0.7,
            Tone::Friendly => 0.4,
            Tone::Informative => 0.6,
            Tone::Enthusiastic => 0.3,
            Tone::Formal => 0.5,
        }
    }
}

pub type ToneMap = BTreeMap<Tone, f64>;

#[must_use]
pub fn default_tones() -> ToneMap {
    Tone::ALL.into_iter().map(|t| (t, t.default_weight())).collect()
}

/// Highest-weighted tone; ties go to the earlier tone in [`Tone::ALL`].
#[must_use]
pub fn dominant_tone(tones: &ToneMap) -> Tone {
    let mut best = Tone::Informative;
    let mut best_weight = f64::NEG_INFINITY;
    for tone in Tone::ALL {
        if let Some(&weight) = tones.get(&tone) {
            if weight > best_weight {
                best = tone;
                best_weight = weight;
            }
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentAnalysis {
    pub keywords: Vec<String>,
    pub key_values: Vec<String>,
    pub tone_analysis: ToneMap,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default)]
pub struct ContentAnalyzer {
    lexicon: Lexicon,
}

impl ContentAnalyzer {
    #[must_use]
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Analyse the website body plus every profile's content excerpt.
    #[must_use]
    pub fn analyze(&self, website: &WebsiteContent, profiles: &[PlatformProfile]) -> ContentAnalysis {
        let mut text = website.content.clone();
        for profile in profiles {
            text.push(' ');
            text.push_str(&profile.content);
        }
        self.analyze_text(&text)
    }

    #[must_use]
    pub fn analyze_text(&self, text: &str) -> ContentAnalysis {
        if text.trim().chars().count() < MIN_ANALYSIS_CHARS {
            tracing::debug!(chars = text.len(), "too little text, using default analysis");
            return self.defaults();
        }

        let tokens = tokenize(text);
        let sentiment = self.lexicon.score(&tokens);
        let ranked = rank_by_frequency(&tokens);

        ContentAnalysis {
            keywords: self.keywords(&ranked),
            key_values: self.key_values(&ranked),
            tone_analysis: adjust_tones(sentiment.polarity),
            sentiment,
        }
    }

    fn defaults(&self) -> ContentAnalysis {
        ContentAnalysis {
            keywords: self
                .lexicon
                .default_keywords
                .iter()
                .take(KEYWORD_COUNT)
                .cloned()
                .collect(),
            key_values: self
                .lexicon
                .default_key_values
                .iter()
                .take(KEY_VALUE_COUNT)
                .cloned()
                .collect(),
            tone_analysis: default_tones(),
            sentiment: Sentiment::NEUTRAL_DEFAULT,
        }
    }

    fn keywords(&self, ranked: &[&str]) -> Vec<String> {
        let mut keywords: Vec<String> = ranked
            .iter()
            .take(KEYWORD_COUNT * 2)
            .filter(|w| !self.lexicon.stop_words.contains(**w))
            .filter(|w| self.lexicon.is_value_indicator(w) || w.chars().count() >= KEYWORD_MIN_CHARS)
            .take(KEYWORD_COUNT)
            .map(|w| (*w).to_string())
            .collect();
        pad(&mut keywords, &self.lexicon.default_keywords, KEYWORD_COUNT);
        keywords
    }

    fn key_values(&self, ranked: &[&str]) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for label in ranked.iter().filter_map(|w| self.lexicon.value_label(w)) {
            if !values.iter().any(|v| v == label) {
                values.push(label.to_string());
            }
        }
        values.truncate(KEY_VALUE_COUNT);
        pad(&mut values, &self.lexicon.default_key_values, KEY_VALUE_COUNT);
        values
    }
}

/// Append unused defaults until `items` holds `target` entries or the
/// defaults run out.
fn pad(items: &mut Vec<String>, defaults: &[String], target: usize) {
    for d in defaults {
        if items.len() >= target {
            break;
        }
        if !items.contains(d) {
            items.push(d.clone());
        }
    }
}

/// Distinct tokens, most frequent first; ties keep first-seen order.
fn rank_by_frequency(tokens: &[String]) -> Vec<&str> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, token) in tokens.iter().enumerate() {
        counts.entry(token.as_str()).or_insert((0, i)).0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> =
        counts.into_iter().map(|(w, (count, first))| (w, count, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(w, _, _)| w).collect()
}

fn adjust_tones(polarity: f64) -> ToneMap {
    let mut tones = default_tones();
    let mut bump = |tone: Tone| {
        if let Some(weight) = tones.get_mut(&tone) {
            *weight = (*weight + TONE_STEP).min(TONE_CAP);
        }
    };
    if polarity > 0.2 {
        bump(Tone::Friendly);
        bump(Tone::Enthusiastic);
    } else if polarity < -0.1 {
        bump(Tone::Formal);
    }
    tones
}
