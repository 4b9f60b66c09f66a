//! Follower estimates for profiles whose count could not be extracted.
//!
//! Two strategies, tried in order:
//!
//! 1. **Relative**: scale a live count from another platform in the same run
//!    by the ratio of typical audience sizes, with ±20% jitter.
//! 2. **Synthetic**: draw from a plausible per-platform range.
//!
//! Every estimate leaves the profile's live-count flag unset, so
//! `real_data` never reports a fabricated figure as real.

use brandlens_core::{Platform, FOLLOWERS_UNAVAILABLE};
use rand::Rng;

use crate::normalize::humanize_count;

/// Whether and how missing follower counts are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// When false, missing counts are reported as `"N/A"`.
    pub enabled: bool,
    /// Render roughly half of the estimates above 1,000 as `"4.3K"`.
    pub humanize: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            humanize: false,
        }
    }
}

/// Typical audience size relative to Facebook.
fn audience_index(platform: Platform) -> Option<f64> {
    match platform {
        Platform::Facebook => Some(1.0),
        Platform::Instagram => Some(0.8),
        Platform::Twitter => Some(0.6),
        Platform::Linkedin => Some(0.4),
        Platform::Youtube => Some(0.3),
        Platform::Tiktok => Some(1.2),
        Platform::Pinterest => Some(0.25),
        _ => None,
    }
}

/// Static multiplier from `reference`'s audience to `target`'s, when both
/// platforms have a known index.
#[must_use]
pub fn platform_ratio(reference: Platform, target: Platform) -> Option<f64> {
    Some(audience_index(target)? / audience_index(reference)?)
}

/// Inclusive range of plausible follower counts.
#[must_use]
pub fn synthetic_range(platform: Option<Platform>) -> (u64, u64) {
    match platform {
        Some(Platform::Twitter) => (200, 5_000),
        Some(Platform::Tiktok) => (500, 15_000),
        Some(Platform::Facebook) => (500, 10_000),
        Some(Platform::Instagram) => (300, 8_000),
        Some(Platform::Linkedin | Platform::Pinterest) => (100, 3_000),
        Some(Platform::Youtube | Platform::Medium) => (50, 2_000),
        Some(Platform::Reddit) => (100, 5_000),
        Some(Platform::Github) => (10, 1_000),
        _ => (100, 2_000),
    }
}

/// Estimate `target`'s count from a live count on `reference`. Pairs
/// without a known index on both sides get a random ratio in `[0.3, 1.5]`.
pub fn estimate_relative<R: Rng + ?Sized>(
    rng: &mut R,
    reference: Option<Platform>,
    reference_count: u64,
    target: Option<Platform>,
) -> u64 {
    let ratio = reference
        .zip(target)
        .and_then(|(r, t)| platform_ratio(r, t))
        .unwrap_or_else(|| rng.random_range(0.3..=1.5));
    let jitter = rng.random_range(0.8..=1.2);
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let estimate = (reference_count as f64 * ratio * jitter).round() as u64;
    estimate.max(1)
}

/// Draw a count uniformly from [`synthetic_range`].
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, target: Option<Platform>) -> u64 {
    let (low, high) = synthetic_range(target);
    rng.random_range(low..=high)
}

fn render<R: Rng + ?Sized>(rng: &mut R, count: u64, policy: FallbackPolicy) -> String {
    if policy.humanize && count > 1_000 && rng.random_bool(0.5) {
        humanize_count(count)
    } else {
        count.to_string()
    }
}

/// One profile's follower state as seen by the fallback pass.
#[derive(Debug)]
pub(crate) struct FollowerSlot<'a> {
    pub platform: Option<Platform>,
    /// Live count extracted from the page, if any.
    pub live_count: Option<u64>,
    pub followers: &'a mut String,
}

/// Fill every slot without a live count.
///
/// The first slot with a live count, on any platform, is the reference for
/// relative estimates.
pub(crate) fn fill_missing_followers<R: Rng + ?Sized>(
    slots: &mut [FollowerSlot<'_>],
    policy: FallbackPolicy,
    rng: &mut R,
) {
    let reference = slots
        .iter()
        .find_map(|s| s.live_count.map(|count| (s.platform, count)));

    for slot in slots.iter_mut().filter(|s| s.live_count.is_none()) {
        if !policy.enabled {
            *slot.followers = FOLLOWERS_UNAVAILABLE.to_string();
            continue;
        }
        let estimate = match reference {
            Some((ref_platform, ref_count))
                if ref_platform.is_none() || ref_platform != slot.platform =>
            {
                estimate_relative(rng, ref_platform, ref_count, slot.platform)
            }
            _ => synthesize(rng, slot.platform),
        };
        tracing::warn!(
            platform = ?slot.platform,
            estimate,
            relative = reference.is_some(),
            "no live follower count, using estimate"
        );
        *slot.followers = render(rng, estimate, policy);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn ratio_uses_audience_index() {
        let r = platform_ratio(Platform::Facebook, Platform::Instagram).unwrap();
        assert!((r - 0.8).abs() < f64::EPSILON);
        assert!(platform_ratio(Platform::Facebook, Platform::Github).is_none());
    }

    #[test]
    fn relative_estimate_stays_within_jitter_band() {
        let mut rng = rng();
        for _ in 0..100 {
            let n = estimate_relative(&mut rng, Some(Platform::Facebook), 10_000, Some(Platform::Linkedin));
            assert!((3_200..=4_800).contains(&n), "{n}");
        }
    }

    #[test]
    fn relative_estimate_for_unknown_pair_uses_wide_ratio() {
        let mut rng = rng();
        for _ in 0..100 {
            let n = estimate_relative(&mut rng, Some(Platform::Facebook), 1_000, Some(Platform::Github));
            assert!((240..=1_800).contains(&n), "{n}");
        }
    }

    #[test]
    fn synthetic_counts_fall_in_platform_range() {
        let mut rng = rng();
        for platform in [Some(Platform::Twitter), Some(Platform::Tiktok), None] {
            let (low, high) = synthetic_range(platform);
            for _ in 0..50 {
                let n = synthesize(&mut rng, platform);
                assert!((low..=high).contains(&n));
            }
        }
    }

    #[test]
    fn fill_uses_live_reference_and_skips_live_slots() {
        let mut fb = "2000".to_string();
        let mut ig = String::new();
        let mut unknown = "N/A".to_string();
        let mut slots = vec![
            FollowerSlot {
                platform: Some(Platform::Facebook),
                live_count: Some(2_000),
                followers: &mut fb,
            },
            FollowerSlot {
                platform: Some(Platform::Instagram),
                live_count: None,
                followers: &mut ig,
            },
            FollowerSlot {
                platform: None,
                live_count: None,
                followers: &mut unknown,
            },
        ];
        fill_missing_followers(&mut slots, FallbackPolicy::default(), &mut rng());
        drop(slots);

        assert_eq!(fb, "2000");
        let ig: u64 = ig.parse().unwrap();
        assert!((1_280..=1_920).contains(&ig), "{ig}");
        let unknown: u64 = unknown.parse().unwrap();
        assert!((480..=3_600).contains(&unknown), "{unknown}");
    }

    #[test]
    fn unindexed_platform_can_be_the_reference() {
        let mut gh = "100000".to_string();
        let mut ig = String::new();
        let mut slots = vec![
            FollowerSlot {
                platform: Some(Platform::Github),
                live_count: Some(100_000),
                followers: &mut gh,
            },
            FollowerSlot {
                platform: Some(Platform::Instagram),
                live_count: None,
                followers: &mut ig,
            },
        ];
        fill_missing_followers(&mut slots, FallbackPolicy::default(), &mut StdRng::seed_from_u64(1));
        drop(slots);

        assert_eq!(gh, "100000");
        let ig: u64 = ig.parse().unwrap();
        // 100k scaled by a random ratio in [0.3, 1.5] and ±20% jitter.
        assert!((24_000..=180_000).contains(&ig), "{ig}");
    }

    #[test]
    fn fill_without_reference_synthesizes() {
        let mut tw = String::new();
        let mut slots = vec![FollowerSlot {
            platform: Some(Platform::Twitter),
            live_count: None,
            followers: &mut tw,
        }];
        fill_missing_followers(&mut slots, FallbackPolicy::default(), &mut rng());
        drop(slots);
        let n: u64 = tw.parse().unwrap();
        assert!((200..=5_000).contains(&n));
    }

    #[test]
    fn disabled_policy_reports_unavailable() {
        let mut tw = String::new();
        let mut slots = vec![FollowerSlot {
            platform: Some(Platform::Twitter),
            live_count: None,
            followers: &mut tw,
        }];
        let policy = FallbackPolicy {
            enabled: false,
            humanize: false,
        };
        fill_missing_followers(&mut slots, policy, &mut rng());
        drop(slots);
        assert_eq!(tw, FOLLOWERS_UNAVAILABLE);
    }

    #[test]
    fn humanized_estimates_use_k_suffix_or_digits() {
        let policy = FallbackPolicy {
            enabled: true,
            humanize: true,
        };
        let mut rng = rng();
        let mut saw_k = false;
        for _ in 0..64 {
            let out = render(&mut rng, 4_321, policy);
            if out == "4.3K" {
                saw_k = true;
            } else {
                assert_eq!(out, "4321");
            }
        }
        assert!(saw_k);
        assert_eq!(render(&mut rng, 999, policy), "999");
    }
}
