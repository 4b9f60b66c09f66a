//! Template brand-story generator producing Markdown.

use brandlens_core::{PlatformProfile, RealData, FOLLOWERS_UNAVAILABLE};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::analysis::{dominant_tone, ContentAnalysis, Tone};

const THEME_KEYWORDS: usize = 6;
const SECONDARY_TONE_MIN: f64 = 0.3;
const FALLBACK_VALUES: &[&str] = &["Quality", "Innovation", "Customer Focus", "Excellence", "Integrity"];
const MIN_VALUE_POINTS: usize = 3;
const MAX_VALUE_POINTS: usize = 5;

/// Everything the story template reads.
#[derive(Debug, Clone, Copy)]
pub struct StoryInput<'a> {
    pub brand_name: &'a str,
    pub description: &'a str,
    pub analysis: &'a ContentAnalysis,
    pub profiles: &'a [PlatformProfile],
}

/// Render the brand story. `rng` picks among equivalent phrasings.
pub fn generate_brand_story<R: Rng + ?Sized>(input: &StoryInput<'_>, rng: &mut R) -> String {
    let brand = if input.brand_name.trim().is_empty() {
        "Brand"
    } else {
        input.brand_name.trim()
    };
    let description = if input.description.trim().is_empty() {
        format!("{brand} is a professional organization providing quality products and services.")
    } else {
        input.description.trim().to_string()
    };
    let values: Vec<&str> = if input.analysis.key_values.is_empty() {
        FALLBACK_VALUES.to_vec()
    } else {
        input.analysis.key_values.iter().map(String::as_str).collect()
    };
    let tone = dominant_tone(&input.analysis.tone_analysis);

    [
        overview(brand, &description, &values, tone, rng),
        brand_values(brand, &values, tone),
        voice(tone, input.analysis, rng),
        social_presence(brand, input.profiles),
        conclusion(brand, &values, tone, rng),
    ]
    .join("\n\n")
}

fn overview<R: Rng + ?Sized>(brand: &str, description: &str, values: &[&str], tone: Tone, rng: &mut R) -> String {
    let first = values.first().copied().unwrap_or("Excellence");
    let second = values.get(1).copied().unwrap_or("Quality");
    let openings = match tone {
        Tone::Professional => [
            format!("{brand} is an established name in its industry, known for its commitment to {first} and {second}."),
            format!("{brand} has built its reputation on {first} and {second}."),
            format!("{brand} holds itself to a high standard, putting {first} into every part of the business."),
        ],
        Tone::Friendly => [
            format!("Meet {brand}, an approachable brand that is all about {first}."),
            format!("{brand} is where community meets {first}, a place where customers feel at home."),
            format!("The story of {brand} is one of connection and {first}."),
        ],
        Tone::Informative => [
            format!("{brand} provides solutions centred on {first} and {second}."),
            format!("Founded on {first}, {brand} takes a practical approach to the problems its customers face."),
            format!("{brand} shares expertise in its field, grounded in {first}."),
        ],
        Tone::Enthusiastic => [
            format!("{brand} is passionate about {first}!"),
            format!("Full of energy and committed to {first}, {brand} stands out in its industry."),
            format!("{brand} brings excitement to {first} and turns everyday moments into something special!"),
        ],
        Tone::Formal => [
            format!("{brand} adheres closely to {first} and {second}, maintaining rigorous standards."),
            format!("In keeping with its principles of {first}, {brand} delivers consistent and dependable service."),
            format!("{brand} maintains a distinguished presence in its sector, defined by {first}."),
        ],
    };
    let opening = openings.choose(rng).cloned().unwrap_or_default();

    let mut description = description.to_string();
    if !description.ends_with(['.', '!', '?']) {
        description.push('.');
    }
    format!("# {brand}: Brand Story\n\n## Overview\n\n{opening} {description}")
}

fn value_line(brand: &str, value: &str) -> String {
    let detail = match value {
        "Quality" => format!("Delivering {brand} products and services that exceed expectations."),
        "Innovation" => format!("Finding new approaches that keep {brand} ahead."),
        "Customer Focus" => format!("Putting {brand} customers at the centre of every decision."),
        "Excellence" => format!("Striving for outstanding results across {brand}."),
        "Integrity" => format!("Keeping every {brand} business practice honest and ethical."),
        "Service" => format!("Giving {brand} customers attentive support."),
        "Expertise" => format!("Keeping deep knowledge and skill in {brand}'s specialism."),
        "Solutions" => format!("Turning customer problems into practical {brand} solutions."),
        other => format!("{} guides how {brand} works.", capitalize_first(other)),
    };
    format!("- **{value}**: {detail}")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn brand_values(brand: &str, values: &[&str], tone: Tone) -> String {
    let intro = match tone {
        Tone::Professional => format!("The philosophy of {brand} rests on a few principles that guide every decision:"),
        Tone::Friendly => format!("Here is what {brand} cares about most:"),
        Tone::Informative => format!("{brand} works according to these values:"),
        Tone::Enthusiastic => format!("{brand} is driven by these values:"),
        Tone::Formal => format!("The conduct of {brand} is founded on the following principles:"),
    };

    let mut chosen: Vec<&str> = values.iter().copied().take(MAX_VALUE_POINTS).collect();
    if chosen.len() < MIN_VALUE_POINTS {
        for fallback in FALLBACK_VALUES {
            if chosen.len() >= MAX_VALUE_POINTS {
                break;
            }
            if !chosen.contains(fallback) {
                chosen.push(fallback);
            }
        }
    }

    let lines: Vec<String> = chosen.iter().map(|v| value_line(brand, v)).collect();
    format!("## Brand Values\n\n{intro}\n\n{}", lines.join("\n"))
}

fn voice<R: Rng + ?Sized>(tone: Tone, analysis: &ContentAnalysis, rng: &mut R) -> String {
    let intro = match tone {
        Tone::Professional => "The brand speaks with a polished, authoritative voice that inspires confidence.",
        Tone::Friendly => "The brand speaks in a warm, approachable way that builds connection.",
        Tone::Informative => "The brand explains things clearly and helpfully.",
        Tone::Enthusiastic => "The brand writes with energy and passion.",
        Tone::Formal => "The brand keeps a structured, measured style that conveys expertise.",
    };

    let secondary: Vec<&str> = analysis
        .tone_analysis
        .iter()
        .filter(|(t, weight)| **t != tone && **weight > SECONDARY_TONE_MIN)
        .map(|(t, _)| match t {
            Tone::Professional => "professional confidence",
            Tone::Friendly => "approachable warmth",
            Tone::Informative => "helpful clarity",
            Tone::Enthusiastic => "energetic passion",
            Tone::Formal => "structured sophistication",
        })
        .collect();
    let balance = if secondary.is_empty() {
        String::new()
    } else {
        format!(" This is balanced with notes of {}.", secondary.join(" and "))
    };

    let mut themes: Vec<&String> = analysis.keywords.iter().collect();
    themes.shuffle(rng);
    themes.truncate(THEME_KEYWORDS);
    let themes = if themes.is_empty() {
        "**quality**, **service**, **expertise**".to_string()
    } else {
        themes.iter().map(|k| format!("**{k}**")).collect::<Vec<_>>().join(", ")
    };

    format!(
        "## Brand Tone and Voice\n\n{intro}{balance}\n\nKey themes and language that define the brand include:\n\n{themes}"
    )
}

/// Follower phrase with an estimate marker for figures not read live.
fn followers_phrase(profile: &PlatformProfile, noun: &str) -> String {
    if profile.followers == FOLLOWERS_UNAVAILABLE || profile.followers.is_empty() {
        return format!("an undisclosed number of {noun}");
    }
    match profile.real_data {
        RealData::Live => format!("{} {noun}", profile.followers),
        RealData::Partial => format!("{} {noun} (partly estimated)", profile.followers),
        RealData::None => format!("{} {noun} (estimated)", profile.followers),
    }
}

fn platform_line(profile: &PlatformProfile) -> String {
    let name = &profile.platform;
    let engagement = profile.engagement.to_string().to_lowercase();
    let frequency = profile.frequency.to_string().to_lowercase();
    let line = match name.to_lowercase().as_str() {
        "facebook" => format!(
            "Keeps a {engagement}-engagement community of {} with {frequency} updates.",
            followers_phrase(profile, "followers")
        ),
        "twitter" => format!(
            "Reaches {} with {frequency} posts and {engagement} engagement.",
            followers_phrase(profile, "followers")
        ),
        "instagram" => format!(
            "Shows visual content to {}, posting {frequency} with {engagement} engagement.",
            followers_phrase(profile, "followers")
        ),
        "linkedin" => format!(
            "Shares company news with {}, {frequency}, drawing {engagement} engagement.",
            followers_phrase(profile, "professional followers")
        ),
        "youtube" => format!(
            "Publishes video for {} with {frequency} uploads and {engagement} viewer engagement.",
            followers_phrase(profile, "subscribers")
        ),
        "tiktok" => format!(
            "Creates short-form video for {}, posting {frequency} with {engagement} engagement.",
            followers_phrase(profile, "followers")
        ),
        _ => format!(
            "Maintains a presence with {}, posting {frequency} with {engagement} engagement.",
            followers_phrase(profile, "followers")
        ),
    };
    format!("- **{name}**: {line}")
}

fn social_presence(brand: &str, profiles: &[PlatformProfile]) -> String {
    if profiles.is_empty() {
        return format!(
            "## Social Media Presence\n\n{brand} has a limited public social media presence or relies on private channels."
        );
    }

    let lines: Vec<String> = profiles.iter().map(platform_line).collect();

    let has = |names: &[&str]| {
        profiles
            .iter()
            .any(|p| names.contains(&p.platform.to_lowercase().as_str()))
    };
    let mut strategy = Vec::new();
    if has(&["instagram", "tiktok", "pinterest"]) {
        strategy.push("- A strong visual identity for visually oriented audiences");
    }
    if has(&["linkedin"]) {
        strategy.push("- Emphasis on industry expertise and professional networking");
    }
    if has(&["youtube", "medium"]) {
        strategy.push("- Investment in longer-form educational content");
    }
    if profiles.len() >= 3 {
        strategy.push("- A multi-platform approach that reaches diverse audience segments");
    } else {
        strategy.push("- A focused platform selection that concentrates effort on key channels");
    }

    let mut section = format!(
        "## Social Media Presence\n\n{brand} engages its audience across these platforms:\n\n{}\n\nThe platform mix suggests:\n\n{}",
        lines.join("\n"),
        strategy.join("\n")
    );
    if profiles.iter().any(|p| !p.real_data.is_live()) {
        section.push_str(
            "\n\n_Figures marked as estimated could not be read from the live profile and were approximated._",
        );
    }
    section
}

fn conclusion<R: Rng + ?Sized>(brand: &str, values: &[&str], tone: Tone, rng: &mut R) -> String {
    let primary = values.first().copied().unwrap_or("Quality");
    let closing = match tone {
        Tone::Professional => format!("{brand} continues to set standards through its commitment to {primary}, positioning itself as a trusted authority in its field."),
        Tone::Friendly => format!("{brand} thrives on genuine connections and a community united by {primary}."),
        Tone::Informative => format!("{brand} remains dedicated to useful insight and solutions, delivering on its promise of {primary}."),
        Tone::Enthusiastic => format!("{brand} keeps bringing energy to everything it does, inspiring its audience with a passion for {primary}!"),
        Tone::Formal => format!("{brand} maintains its position through rigorous adherence to {primary}."),
    };
    let foundation = if values.len() >= 2 {
        values[..2].join(" and ")
    } else {
        primary.to_string()
    };
    let outlooks = [
        format!("As the brand evolves, its foundation in {foundation} will keep guiding it."),
        format!("Looking ahead, {brand} is well placed to build on these strengths."),
        format!("The future of {brand} will be shaped by these values as it grows."),
    ];
    let outlook = outlooks.choose(rng).cloned().unwrap_or_default();
    format!("## Conclusion\n\n{closing} {outlook}")
}
