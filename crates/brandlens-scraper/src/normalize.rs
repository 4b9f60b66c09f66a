//! Canonical forms for audience counts and free text.
//!
//! Counts scraped from profile pages arrive as `"12.3K"`, `"1,204 followers"`
//! or `"3M"`. Everything downstream works with plain digit strings, so the
//! collector runs every raw match through [`normalize_follower_count`].

use std::sync::LazyLock;

use regex::Regex;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*([kKmM])?(?:[^a-zA-Z]|$)").expect("valid count regex")
});
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Convert a raw count into a digit string.
///
/// `"1,204"` → `"1204"`, `"1.2K"` → `"1200"`, `"3M"` → `"3000000"`.
/// Already-canonical input is returned unchanged. Input without a leading
/// number is returned as given.
#[must_use]
pub fn normalize_follower_count(raw: &str) -> String {
    let Some(caps) = COUNT_RE.captures(raw) else {
        return raw.to_string();
    };
    let number = caps[1].replace(',', "");
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("k" | "K") => 1_000.0,
        Some("m" | "M") => 1_000_000.0,
        _ => return number,
    };

    match number.parse::<f64>() {
        Ok(value) => format!("{:.0}", value * multiplier),
        Err(_) => raw.to_string(),
    }
}

/// Numeric value of a canonical or raw count, if it has one.
#[must_use]
pub fn parse_follower_count(raw: &str) -> Option<u64> {
    let canonical = normalize_follower_count(raw);
    let value = canonical.parse::<f64>().ok()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

/// Render a count above 1,000 with a `K` suffix (`4321` → `"4.3K"`).
#[must_use]
pub fn humanize_count(count: u64) -> String {
    if count > 1_000 {
        #[allow(clippy::cast_precision_loss)]
        let thousands = count as f64 / 1_000.0;
        format!("{thousands:.1}K")
    } else {
        count.to_string()
    }
}

/// Collapse whitespace runs, trim, and cap at `max_length` characters.
///
/// Truncated output ends in `"..."` and is exactly `max_length` characters.
#[must_use]
pub fn clean_text_content(text: &str, max_length: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let collapsed = collapsed.trim();
    if collapsed.chars().count() <= max_length {
        return collapsed.to_string();
    }
    let keep = max_length.saturating_sub(3);
    let mut truncated: String = collapsed.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
