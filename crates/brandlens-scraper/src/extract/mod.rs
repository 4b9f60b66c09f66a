//! Platform extractors.
//!
//! One extraction procedure parameterised by per-platform configuration: the
//! [`PlatformCatalog`] is compiled once into an [`ExtractorRegistry`] and
//! each page is run through the selectors and patterns for its platform, or
//! the generic set when the platform has no entry.

pub mod signals;
pub mod text;

use std::collections::HashMap;

use brandlens_core::{
    CountLabel, Engagement, EngagementRule, Frequency, Platform, PlatformCatalog, ProfileType,
    SelectorSet,
};
use regex::{Regex, RegexBuilder};
use scraper::Selector;

use crate::error::ScraperError;
use crate::page::Page;

pub use signals::{estimate_engagement, estimate_posting_frequency};
pub use text::{extract_count_from_text, extract_post_texts, extract_text_from_selectors};

/// Words that mark an element as holding an audience figure.
const COUNT_ELEMENT_KEYWORDS: &[&str] = &["follower", "subscriber", "member", "like", "follow"];

/// Raw audience figure as displayed, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceCount {
    /// YouTube reports subscribers and Reddit members; the collector maps
    /// every label onto `followers`.
    pub label: CountLabel,
    pub raw: String,
}

/// What one extractor pass found on a page. Absent fields are `None` or
/// empty rather than missing keys.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialProfile {
    pub platform: Option<Platform>,
    pub profile_type: ProfileType,
    pub bio: Option<String>,
    pub posts: Vec<String>,
    pub audience: Option<AudienceCount>,
    pub engagement: Engagement,
    pub frequency: Frequency,
}

impl PartialProfile {
    /// True when the page yielded any text at all.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.bio.is_some() || !self.posts.is_empty()
    }
}

struct CompiledSelectors {
    bio: Vec<Selector>,
    posts: Vec<Selector>,
    patterns: Vec<Regex>,
    count_elements: Vec<Selector>,
}

impl CompiledSelectors {
    fn compile(set: &SelectorSet) -> Result<Self, ScraperError> {
        Ok(Self {
            bio: compile_selectors(&set.bio_selectors)?,
            posts: compile_selectors(&set.post_selectors)?,
            patterns: compile_patterns(&set.follower_patterns)?,
            count_elements: compile_selectors(&set.count_selectors)?,
        })
    }
}

struct CompiledPlatform {
    profile_type: ProfileType,
    count_label: CountLabel,
    selectors: CompiledSelectors,
    engagement: EngagementRule,
}

fn compile_selectors(raw: &[String]) -> Result<Vec<Selector>, ScraperError> {
    raw.iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| ScraperError::InvalidSelector {
                selector: s.clone(),
                reason: format!("{e:?}"),
            })
        })
        .collect()
}

fn compile_patterns(raw: &[String]) -> Result<Vec<Regex>, ScraperError> {
    raw.iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|source| ScraperError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
        })
        .collect()
}

/// Compiled selectors and patterns for every configured platform.
pub struct ExtractorRegistry {
    platforms: HashMap<Platform, CompiledPlatform>,
    generic: CompiledSelectors,
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut platforms: Vec<_> = self.platforms.keys().map(|p| p.id()).collect();
        platforms.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("platforms", &platforms)
            .finish_non_exhaustive()
    }
}

impl ExtractorRegistry {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] or
    /// [`ScraperError::InvalidPattern`] for the first entry that does not
    /// compile.
    pub fn from_catalog(catalog: &PlatformCatalog) -> Result<Self, ScraperError> {
        let mut platforms = HashMap::new();
        for spec in &catalog.platforms {
            platforms.insert(
                spec.platform,
                CompiledPlatform {
                    profile_type: spec.profile_type,
                    count_label: spec.count_label,
                    selectors: CompiledSelectors::compile(&spec.selectors)?,
                    engagement: spec.engagement.clone(),
                },
            );
        }
        Ok(Self {
            platforms,
            generic: CompiledSelectors::compile(&catalog.generic)?,
        })
    }

    /// Registry built from the built-in catalog.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in tables contain an invalid entry.
    pub fn builtin() -> Result<Self, ScraperError> {
        Self::from_catalog(&PlatformCatalog::default())
    }

    #[must_use]
    pub fn profile_type(&self, platform: Option<Platform>) -> ProfileType {
        platform.map_or(ProfileType::Profile, |p| {
            self.platforms
                .get(&p)
                .map_or_else(|| p.default_profile_type(), |c| c.profile_type)
        })
    }

    /// Run bio, post and count extraction for `platform` over `page`.
    #[must_use]
    pub fn extract(&self, platform: Option<Platform>, page: &Page) -> PartialProfile {
        let configured = platform.and_then(|p| self.platforms.get(&p));
        let (selectors, count_label, engagement_rule) = match configured {
            Some(c) => (&c.selectors, c.count_label, Some(&c.engagement)),
            None => {
                tracing::debug!(?platform, "using generic extractor");
                (&self.generic, CountLabel::Followers, None)
            }
        };

        let bio_texts = extract_text_from_selectors(
            page,
            &selectors.bio,
            text::BIO_MIN_LENGTH,
            text::BIO_MAX_RESULTS,
        );
        let bio = (!bio_texts.is_empty()).then(|| bio_texts.join(" "));
        let posts =
            extract_post_texts(page, &selectors.posts, text::MAX_POSTS, text::POST_MIN_LENGTH);

        let page_text = page.text();
        let raw_count = extract_count_from_text(page_text, &selectors.patterns, || {
            text::count_from_elements(page, &selectors.count_elements, COUNT_ELEMENT_KEYWORDS)
        });

        let default_rule = EngagementRule::default();
        let engagement =
            estimate_engagement(engagement_rule.unwrap_or(&default_rule), page_text, &posts);
        let frequency = estimate_posting_frequency(&posts, page_text);

        tracing::debug!(
            ?platform,
            bio = bio.is_some(),
            posts = posts.len(),
            count = ?raw_count,
            %engagement,
            "extraction complete"
        );

        PartialProfile {
            platform,
            profile_type: self.profile_type(platform),
            bio,
            posts,
            audience: raw_count.map(|raw| AudienceCount {
                label: count_label,
                raw,
            }),
            engagement,
            frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use brandlens_core::PlatformSpec;

    use super::*;

    fn registry() -> ExtractorRegistry {
        ExtractorRegistry::builtin().expect("builtin catalog compiles")
    }

    #[test]
    fn builtin_catalog_compiles() {
        let reg = registry();
        assert_eq!(reg.profile_type(Some(Platform::Linkedin)), ProfileType::Company);
        assert_eq!(reg.profile_type(Some(Platform::Vimeo)), ProfileType::Channel);
        assert_eq!(reg.profile_type(None), ProfileType::Profile);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let mut catalog = PlatformCatalog::default();
        catalog.generic.bio_selectors.push("div[".to_string());
        let err = ExtractorRegistry::from_catalog(&catalog).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidSelector { ref selector, .. } if selector == "div["));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let mut catalog = PlatformCatalog::default();
        catalog.platforms.push(PlatformSpec {
            platform: Platform::Vimeo,
            profile_type: ProfileType::Channel,
            count_label: CountLabel::Followers,
            selectors: SelectorSet {
                follower_patterns: vec!["(unclosed".to_string()],
                ..SelectorSet::default()
            },
            engagement: EngagementRule::default(),
        });
        let err = ExtractorRegistry::from_catalog(&catalog).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidPattern { .. }));
    }

    #[test]
    fn facebook_page_extraction() {
        let page = Page::parse(
            r#"<html><body>
            <div id="entity_sidebar">Acme Coffee roasts beans in Portland.</div>
            <div class="userContent">Our new single origin drops this Friday!</div>
            <div class="userContent">Thanks for 10 years of great coffee together.</div>
            <span>12,345 people like this</span>
            <span>Like Comment Share</span>
            </body></html>"#,
        );
        let profile = registry().extract(Some(Platform::Facebook), &page);
        assert_eq!(profile.profile_type, ProfileType::Page);
        assert_eq!(profile.bio.as_deref(), Some("Acme Coffee roasts beans in Portland."));
        assert_eq!(profile.posts.len(), 2);
        assert_eq!(
            profile.audience,
            Some(AudienceCount {
                label: CountLabel::Followers,
                raw: "12,345".to_string()
            })
        );
        assert_eq!(profile.engagement, Engagement::High);
        assert_eq!(profile.frequency, Frequency::BiWeekly);
    }

    #[test]
    fn youtube_reports_subscribers() {
        let page = Page::parse(
            r#"<div id="channel-description">Weekly videos about home roasting.</div>
            <span>1.2K subscribers</span>"#,
        );
        let profile = registry().extract(Some(Platform::Youtube), &page);
        let audience = profile.audience.unwrap();
        assert_eq!(audience.label, CountLabel::Subscribers);
        assert_eq!(audience.raw, "1.2K");
    }

    #[test]
    fn unknown_platform_uses_generic_selectors() {
        let page = Page::parse(
            r#"<div class="bio">Independent maker of ceramics.</div>
            <div class="post">Kiln firing tonight, wish us luck everyone</div>
            <p>Followers: 321</p>"#,
        );
        let profile = registry().extract(None, &page);
        assert_eq!(profile.bio.as_deref(), Some("Independent maker of ceramics."));
        assert_eq!(profile.posts.len(), 1);
        assert_eq!(profile.audience.unwrap().raw, "321");
        assert_eq!(profile.engagement, Engagement::Medium);
    }

    #[test]
    fn empty_page_yields_empty_partial() {
        let profile = registry().extract(Some(Platform::Twitter), &Page::parse(""));
        assert!(!profile.has_text());
        assert!(profile.audience.is_none());
        assert_eq!(profile.engagement, Engagement::Low);
        assert_eq!(profile.frequency, Frequency::Monthly);
    }
}
