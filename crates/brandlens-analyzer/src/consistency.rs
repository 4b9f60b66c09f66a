//! Brand consistency score.

use brandlens_core::{PlatformProfile, RealData, WebsiteContent};

use crate::lexicon::Sentiment;

const BASE: u32 = 50;
const PER_PROFILE: u32 = 5;
const PROFILE_CAP: u32 = 20;
const PER_REAL_PROFILE: u32 = 3;
const REAL_PROFILE_CAP: u32 = 15;
const BRAND_NAME_BONUS: u32 = 5;
const DESCRIPTION_BONUS: u32 = 5;
const DESCRIPTION_MIN_CHARS: usize = 50;
const SENTIMENT_BONUS: u32 = 5;
const BALANCED_POLARITY: std::ops::RangeInclusive<f64> = -0.3..=0.7;

/// Score in `0..=100` rewarding social reach, live data, a named and
/// described brand, and balanced sentiment.
#[must_use]
pub fn consistency_score(website: &WebsiteContent, profiles: &[PlatformProfile], sentiment: Sentiment) -> u8 {
    let count = u32::try_from(profiles.len()).unwrap_or(u32::MAX);
    let real = u32::try_from(
        profiles
            .iter()
            .filter(|p| p.real_data != RealData::None)
            .count(),
    )
    .unwrap_or(u32::MAX);

    let mut score = BASE;
    score += count.saturating_mul(PER_PROFILE).min(PROFILE_CAP);
    score += real.saturating_mul(PER_REAL_PROFILE).min(REAL_PROFILE_CAP);
    if !website.brand_name.trim().is_empty() {
        score += BRAND_NAME_BONUS;
    }
    if website.description.chars().count() > DESCRIPTION_MIN_CHARS {
        score += DESCRIPTION_BONUS;
    }
    if BALANCED_POLARITY.contains(&sentiment.polarity) {
        score += SENTIMENT_BONUS;
    }
    u8::try_from(score.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use brandlens_core::{Engagement, Frequency, ProfileType};

    use super::*;

    fn website(name: &str, description: &str) -> WebsiteContent {
        WebsiteContent {
            brand_name: name.to_string(),
            description: description.to_string(),
            content: String::new(),
        }
    }

    fn profile(real_data: RealData) -> PlatformProfile {
        PlatformProfile {
            platform: "Facebook".to_string(),
            profile_type: ProfileType::Page,
            followers: "100".to_string(),
            engagement: Engagement::Medium,
            frequency: Frequency::Weekly,
            content: String::new(),
            url: "https://facebook.com/acme".to_string(),
            real_data,
            error: None,
        }
    }

    fn neutral() -> Sentiment {
        Sentiment {
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }

    #[test]
    fn bare_brand_scores_base_plus_bonuses() {
        assert_eq!(consistency_score(&website("", ""), &[], neutral()), 55);
        assert_eq!(consistency_score(&website("Acme", ""), &[], neutral()), 60);
    }

    #[test]
    fn profiles_and_real_data_are_capped() {
        let profiles: Vec<_> = (0..8).map(|_| profile(RealData::Live)).collect();
        let long = "x".repeat(60);
        assert_eq!(consistency_score(&website("Acme", &long), &profiles, neutral()), 100);
    }

    #[test]
    fn estimated_profiles_earn_presence_only() {
        let profiles = vec![profile(RealData::None), profile(RealData::Partial)];
        // 50 + 10 presence + 3 for the partial one + 5 sentiment
        assert_eq!(consistency_score(&website("", ""), &profiles, neutral()), 68);
    }

    #[test]
    fn extreme_sentiment_loses_bonus() {
        let negative = Sentiment {
            polarity: -0.8,
            subjectivity: 0.9,
        };
        assert_eq!(consistency_score(&website("", ""), &[], negative), 50);
    }
}
