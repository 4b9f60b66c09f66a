//! Engagement and posting-frequency heuristics.

use std::sync::LazyLock;

use brandlens_core::{Engagement, EngagementRule, Frequency};
use regex::Regex;

static RECENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:today|just now|an? (?:hour|minute) ago|\d+\s*(?:h|hrs?|hours?|m|mins?|minutes?|s|secs?|seconds?)\s+ago)\b",
    )
    .expect("valid recency regex")
});

const DAILY_PHRASES: &[&str] = &["daily post", "daily update", "every day", "posts daily"];
const WEEKLY_PHRASES: &[&str] = &["weekly post", "weekly update", "every week", "posts weekly"];

fn level(count: usize, high: usize, medium: usize, very_high: Option<usize>) -> Engagement {
    match count {
        n if very_high.is_some_and(|v| n >= v) => Engagement::VeryHigh,
        n if n >= high => Engagement::High,
        n if n >= medium => Engagement::Medium,
        _ => Engagement::Low,
    }
}

/// Apply `rule` to the page text and extracted posts.
///
/// `PageText` counts distinct keywords present in the page; `Posts` counts
/// every (post, keyword) pair where the post mentions the keyword.
#[must_use]
pub fn estimate_engagement(rule: &EngagementRule, page_text: &str, posts: &[String]) -> Engagement {
    match rule {
        EngagementRule::PageText {
            keywords,
            high,
            medium,
        } => {
            let lower = page_text.to_lowercase();
            let hits = keywords
                .iter()
                .filter(|k| lower.contains(&k.to_lowercase()))
                .count();
            level(hits, *high, *medium, None)
        }
        EngagementRule::Posts {
            keywords,
            high,
            medium,
            very_high,
        } => {
            let hits = posts
                .iter()
                .map(|post| {
                    let lower = post.to_lowercase();
                    keywords
                        .iter()
                        .filter(|k| lower.contains(&k.to_lowercase()))
                        .count()
                })
                .sum();
            level(hits, *high, *medium, *very_high)
        }
        EngagementRule::Fixed { level } => *level,
    }
}

/// Coarse posting cadence.
///
/// Explicit phrases on the page win ("daily update", "every week"). After
/// that: two or more posts stamped within the day mean `Daily`, four or more
/// posts `Weekly`, two or more `Bi-weekly`, otherwise `Monthly`.
#[must_use]
pub fn estimate_posting_frequency(posts: &[String], page_text: &str) -> Frequency {
    let lower = page_text.to_lowercase();
    if DAILY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Frequency::Daily;
    }
    if WEEKLY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Frequency::Weekly;
    }

    let recent = posts.iter().filter(|p| RECENT_RE.is_match(p)).count();
    let frequency = if recent >= 2 {
        Frequency::Daily
    } else if posts.len() >= 4 {
        Frequency::Weekly
    } else if posts.len() >= 2 {
        Frequency::BiWeekly
    } else {
        Frequency::Monthly
    };
    tracing::debug!(posts = posts.len(), recent, %frequency, "estimated posting frequency");
    frequency
}
