//! Selector- and pattern-driven text pulls. A selector or pattern that
//! matches nothing yields an empty result, never an error.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::page::Page;

static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,.]*\s?[kKmM]?\b").expect("valid number regex"));

/// Keywords that mark a sentence as talking about audience size, in
/// priority order.
const AUDIENCE_KEYWORDS: &[&str] = &["follower", "subscriber", "following", "member", "like"];

pub const BIO_MIN_LENGTH: usize = 5;
pub const BIO_MAX_RESULTS: usize = 1;
pub const MAX_POSTS: usize = 5;
pub const POST_MIN_LENGTH: usize = 15;

/// Visible text of the first elements that are at least `min_length`
/// characters long, trying selectors in order and stopping once
/// `max_results` texts are collected.
#[must_use]
pub fn extract_text_from_selectors(
    page: &Page,
    selectors: &[Selector],
    min_length: usize,
    max_results: usize,
) -> Vec<String> {
    let mut results = Vec::new();
    for selector in selectors {
        for text in page.select_texts(selector) {
            if text.chars().count() >= min_length {
                results.push(text);
                if results.len() >= max_results {
                    return results;
                }
            }
        }
    }
    tracing::debug!(found = results.len(), "text selector pass complete");
    results
}

/// Up to `max_posts` distinct post texts of at least `min_length` characters.
#[must_use]
pub fn extract_post_texts(
    page: &Page,
    selectors: &[Selector],
    max_posts: usize,
    min_length: usize,
) -> Vec<String> {
    let mut posts = Vec::new();
    let mut seen = HashSet::new();
    for selector in selectors {
        for text in page.select_texts(selector) {
            if text.chars().count() < min_length || !seen.insert(text.clone()) {
                continue;
            }
            posts.push(text);
            if posts.len() >= max_posts {
                return posts;
            }
        }
    }
    tracing::debug!(found = posts.len(), "post selector pass complete");
    posts
}

/// First capture of the first pattern that matches `text`.
#[must_use]
pub fn match_count_patterns(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().trim().to_string())
            .find(|s| !s.is_empty())
    })
}

/// First number in a sentence mentioning followers, subscribers, members
/// or likes. Keywords are tried in priority order.
#[must_use]
pub fn count_near_keywords(text: &str) -> Option<String> {
    let sentences: Vec<(&str, String)> = SENTENCE_BREAK_RE
        .split(text)
        .map(|s| (s, s.to_lowercase()))
        .collect();
    AUDIENCE_KEYWORDS.iter().find_map(|keyword| {
        sentences
            .iter()
            .filter(|(_, lower)| lower.contains(keyword))
            .find_map(|(s, _)| NUMBER_RE.find(s).map(|m| m.as_str().trim().to_string()))
    })
}

/// Count from page text: configured patterns first, then `element_count`
/// (usually [`count_from_elements`]), then the keyword proximity search.
#[must_use]
pub fn extract_count_from_text<F>(text: &str, patterns: &[Regex], element_count: F) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    if text.trim().is_empty() {
        return None;
    }
    match_count_patterns(text, patterns)
        .or_else(element_count)
        .or_else(|| count_near_keywords(text))
}

/// Number inside the first matching element whose text mentions one of
/// `keywords`.
#[must_use]
pub fn count_from_elements(page: &Page, selectors: &[Selector], keywords: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        page.select_texts(selector).find_map(|text| {
            let lower = text.to_lowercase();
            if !keywords.iter().any(|k| lower.contains(k)) {
                return None;
            }
            NUMBER_RE.find(&text).map(|m| m.as_str().trim().to_string())
        })
    })
}
