//! Extraction orchestrator: links in, one profile record per domain out.

use std::collections::HashSet;
use std::sync::Arc;

use brandlens_core::{
    Engagement, Frequency, Platform, PlatformProfile, RealData, SocialLink, FOLLOWERS_UNAVAILABLE,
};

use crate::client::{FetchPolicy, PageClient};
use crate::error::{ExtractionError, ScraperError};
use crate::extract::{ExtractorRegistry, PartialProfile};
use crate::fallback::{fill_missing_followers, FallbackPolicy, FollowerSlot};
use crate::normalize::{clean_text_content, normalize_follower_count, parse_follower_count};
use crate::page::Page;
use crate::urls::{authority, clean_url, detect_platform, extract_domain};

const BIO_EXCERPT_CHARS: usize = 300;
const POST_EXCERPT_CHARS: usize = 250;
const NO_CONTENT: &str = "Limited content available";

/// A profile plus the provenance flags the fallback pass needs.
#[derive(Debug)]
struct ProfileDraft {
    platform: Option<Platform>,
    live_text: bool,
    live_count: Option<u64>,
    profile: PlatformProfile,
}

impl ProfileDraft {
    fn real_data(&self) -> RealData {
        match (self.live_text, self.live_count.is_some()) {
            (true, true) => RealData::Live,
            (true, false) | (false, true) => RealData::Partial,
            (false, false) => RealData::None,
        }
    }
}

/// Drives fetch, parse, extract and normalise for a batch of links.
///
/// Links are processed one at a time. A failing link becomes a placeholder
/// record; it never aborts the batch.
#[derive(Debug, Clone)]
pub struct SocialCollector {
    policy: FetchPolicy,
    registry: Arc<ExtractorRegistry>,
    fallback: FallbackPolicy,
}

impl SocialCollector {
    #[must_use]
    pub fn new(policy: FetchPolicy, registry: Arc<ExtractorRegistry>, fallback: FallbackPolicy) -> Self {
        Self {
            policy,
            registry,
            fallback,
        }
    }

    /// Extract one profile per distinct domain in `links`, sorted by
    /// platform display name.
    ///
    /// Builds one [`PageClient`] for the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] only if the HTTP client cannot be
    /// built. Per-link failures are reported inside the returned records.
    pub async fn collect(&self, links: &[SocialLink]) -> Result<Vec<PlatformProfile>, ScraperError> {
        if links.is_empty() {
            return Ok(Vec::new());
        }
        let client = PageClient::new(self.policy)?;
        Ok(self.collect_with(&client, links).await)
    }

    /// Same as [`Self::collect`] but reuses a caller-owned client.
    pub async fn collect_with(&self, client: &PageClient, links: &[SocialLink]) -> Vec<PlatformProfile> {
        let mut seen = HashSet::new();
        let mut drafts = Vec::with_capacity(links.len());

        for link in links {
            let key = authority(&link.url).unwrap_or_else(|| clean_url(&link.url));
            if !seen.insert(key) {
                tracing::debug!(url = %link.url, "skipping duplicate domain");
                continue;
            }

            let platform = link.platform.or_else(|| detect_platform(&link.url));
            let draft = match self.extract_link(client, platform, &link.url).await {
                Ok(partial) => draft_from_partial(partial, &link.url),
                Err(err) => {
                    tracing::warn!(url = %link.url, error = %err, "profile extraction failed");
                    self.placeholder(platform, &link.url, &err)
                }
            };
            tracing::info!(
                url = %link.url,
                platform = %draft.profile.platform,
                live_text = draft.live_text,
                live_count = draft.live_count.is_some(),
                "processed social link"
            );
            drafts.push(draft);
        }

        finish(drafts, self.fallback)
    }

    async fn extract_link(
        &self,
        client: &PageClient,
        platform: Option<Platform>,
        url: &str,
    ) -> Result<PartialProfile, ExtractionError> {
        let html = client
            .fetch_page(url)
            .await
            .map_err(|source| ExtractionError::Fetch {
                url: url.to_string(),
                source,
            })?;
        self.parse_and_extract(platform, url, &html)
    }

    fn parse_and_extract(
        &self,
        platform: Option<Platform>,
        url: &str,
        html: &str,
    ) -> Result<PartialProfile, ExtractionError> {
        let page = Page::parse(html);
        if page.is_empty() {
            return Err(ExtractionError::EmptyPage {
                url: url.to_string(),
            });
        }
        Ok(self.registry.extract(platform, &page))
    }

    fn placeholder(&self, platform: Option<Platform>, url: &str, err: &ExtractionError) -> ProfileDraft {
        let name = display_name(platform, url);
        ProfileDraft {
            platform,
            live_text: false,
            live_count: None,
            profile: PlatformProfile {
                content: format!("Could not access content from {name}"),
                platform: name,
                profile_type: self.registry.profile_type(platform),
                followers: FOLLOWERS_UNAVAILABLE.to_string(),
                engagement: Engagement::Low,
                frequency: Frequency::Unknown,
                url: url.to_string(),
                real_data: RealData::None,
                error: Some(err.to_string()),
            },
        }
    }
}

fn draft_from_partial(partial: PartialProfile, url: &str) -> ProfileDraft {
    let live_count = partial
        .audience
        .as_ref()
        .map(|a| normalize_follower_count(&a.raw))
        .and_then(|canonical| parse_follower_count(&canonical))
        .filter(|n| *n > 0);
    let live_text = partial.has_text();

    ProfileDraft {
        platform: partial.platform,
        live_text,
        live_count,
        profile: PlatformProfile {
            platform: display_name(partial.platform, url),
            profile_type: partial.profile_type,
            followers: live_count.map_or_else(|| FOLLOWERS_UNAVAILABLE.to_string(), |n| n.to_string()),
            engagement: partial.engagement,
            frequency: partial.frequency,
            content: build_content(partial.bio.as_deref(), &partial.posts),
            url: url.to_string(),
            real_data: RealData::None,
            error: None,
        },
    }
}

/// Fallback pass, provenance flags and ordering. Kept synchronous so the
/// thread-local RNG is never held across an `.await`.
fn finish(mut drafts: Vec<ProfileDraft>, fallback: FallbackPolicy) -> Vec<PlatformProfile> {
    let provenance: Vec<RealData> = drafts.iter().map(ProfileDraft::real_data).collect();

    let mut slots: Vec<FollowerSlot<'_>> = drafts
        .iter_mut()
        .map(|d| FollowerSlot {
            platform: d.platform,
            live_count: d.live_count,
            followers: &mut d.profile.followers,
        })
        .collect();
    fill_missing_followers(&mut slots, fallback, &mut rand::rng());
    drop(slots);

    let mut profiles: Vec<PlatformProfile> = drafts
        .into_iter()
        .zip(provenance)
        .map(|(draft, real_data)| PlatformProfile {
            real_data,
            ..draft.profile
        })
        .collect();
    profiles.sort_by(|a, b| a.platform.cmp(&b.platform));
    profiles
}

/// `"Bio: ... | Post 1: ... | Post 2: ..."`, each part truncated.
fn build_content(bio: Option<&str>, posts: &[String]) -> String {
    let mut parts = Vec::with_capacity(posts.len() + 1);
    if let Some(bio) = bio.filter(|b| !b.trim().is_empty()) {
        parts.push(format!("Bio: {}", clean_text_content(bio, BIO_EXCERPT_CHARS)));
    }
    for (i, post) in posts.iter().enumerate() {
        parts.push(format!(
            "Post {}: {}",
            i + 1,
            clean_text_content(post, POST_EXCERPT_CHARS)
        ));
    }
    if parts.is_empty() {
        NO_CONTENT.to_string()
    } else {
        parts.join(" | ")
    }
}

/// Capitalised platform name, or the capitalised first domain label for
/// unclassified links.
fn display_name(platform: Option<Platform>, url: &str) -> String {
    if let Some(p) = platform {
        return p.display_name().to_string();
    }
    let label = extract_domain(url)
        .map(|d| {
            let d = d.strip_prefix("www.").unwrap_or(&d).to_string();
            d.split('.').next().unwrap_or_default().to_string()
        })
        .unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use brandlens_core::ProfileType;

    use super::*;

    fn collector(fallback: FallbackPolicy) -> SocialCollector {
        SocialCollector::new(
            FetchPolicy::default(),
            Arc::new(ExtractorRegistry::builtin().unwrap()),
            fallback,
        )
    }

    #[test]
    fn content_joins_bio_and_numbered_posts() {
        let posts = vec!["First post here".to_string(), "Second post here".to_string()];
        assert_eq!(
            build_content(Some("About us"), &posts),
            "Bio: About us | Post 1: First post here | Post 2: Second post here"
        );
        assert_eq!(build_content(None, &[]), NO_CONTENT);
    }

    #[test]
    fn content_truncates_long_bio() {
        let bio = "x".repeat(400);
        let content = build_content(Some(&bio), &[]);
        assert_eq!(content.chars().count(), "Bio: ".len() + BIO_EXCERPT_CHARS);
        assert!(content.ends_with("..."));
    }

    #[test]
    fn display_name_for_unknown_platform_uses_domain() {
        assert_eq!(display_name(None, "https://www.example.com/x"), "Example");
        assert_eq!(display_name(Some(Platform::Youtube), "https://youtube.com"), "YouTube");
        assert_eq!(display_name(None, "::"), "Unknown");
    }

    #[test]
    fn real_data_reflects_provenance() {
        let c = collector(FallbackPolicy::default());
        let page_html = r#"<div id="channel-description">Videos about roasting coffee.</div><span>3M subscribers</span>"#;
        let partial = c
            .parse_and_extract(Some(Platform::Youtube), "https://youtube.com/@acme", page_html)
            .unwrap();
        let draft = draft_from_partial(partial, "https://youtube.com/@acme");
        assert_eq!(draft.live_count, Some(3_000_000));
        assert_eq!(draft.profile.followers, "3000000");
        assert_eq!(draft.real_data(), RealData::Live);
        assert_eq!(draft.profile.profile_type, ProfileType::Channel);
    }

    #[test]
    fn empty_page_is_an_extraction_error() {
        let c = collector(FallbackPolicy::default());
        let err = c
            .parse_and_extract(Some(Platform::Twitter), "https://twitter.com/acme", "<html></html>")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyPage { .. }));
    }

    #[test]
    fn finish_fills_followers_and_sorts() {
        let c = collector(FallbackPolicy::default());
        let err = ExtractionError::EmptyPage {
            url: "https://twitter.com/acme".to_string(),
        };
        let drafts = vec![
            c.placeholder(Some(Platform::Twitter), "https://twitter.com/acme", &err),
            c.placeholder(Some(Platform::Facebook), "https://facebook.com/acme", &err),
        ];
        let profiles = finish(drafts, FallbackPolicy::default());
        assert_eq!(profiles[0].platform, "Facebook");
        assert_eq!(profiles[1].platform, "Twitter");
        for p in &profiles {
            assert!(!p.followers.is_empty());
            assert_ne!(p.followers, FOLLOWERS_UNAVAILABLE);
            assert_eq!(p.real_data, RealData::None);
            assert_eq!(p.frequency, Frequency::Unknown);
            assert!(p.error.is_some());
        }
    }

    #[tokio::test]
    async fn empty_input_returns_empty_output() {
        let c = collector(FallbackPolicy::default());
        assert!(c.collect(&[]).await.unwrap().is_empty());
    }
}
