//! Per-platform extraction configuration.
//!
//! The catalog is plain data: ordered CSS selectors for bio and post text,
//! ordered regexes for audience counts, and the engagement rule for each
//! platform. The scraper compiles it once at startup. A YAML file with the
//! same shape can replace the built-in tables.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::social::{Engagement, Platform, ProfileType};
use crate::ConfigError;

/// Name of the audience figure a platform displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountLabel {
    #[default]
    Followers,
    Subscribers,
    Members,
}

/// How an engagement level is derived from a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngagementRule {
    /// Count how many distinct keywords appear anywhere in the page text.
    PageText {
        keywords: Vec<String>,
        high: usize,
        medium: usize,
    },
    /// Count every keyword occurrence across the extracted posts.
    Posts {
        keywords: Vec<String>,
        high: usize,
        medium: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        very_high: Option<usize>,
    },
    Fixed { level: Engagement },
}

impl Default for EngagementRule {
    fn default() -> Self {
        EngagementRule::Fixed {
            level: Engagement::Medium,
        }
    }
}

/// Ordered selector and pattern lists. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectorSet {
    #[serde(default)]
    pub bio_selectors: Vec<String>,
    #[serde(default)]
    pub post_selectors: Vec<String>,
    /// Regexes matched case-insensitively against the page text; capture
    /// group 1 holds the raw count.
    #[serde(default)]
    pub follower_patterns: Vec<String>,
    /// Elements searched for a count when no pattern matches the page text.
    #[serde(default)]
    pub count_selectors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub platform: Platform,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    #[serde(default)]
    pub count_label: CountLabel,
    #[serde(flatten)]
    pub selectors: SelectorSet,
    #[serde(default)]
    pub engagement: EngagementRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCatalog {
    pub platforms: Vec<PlatformSpec>,
    /// Used for platforms missing from `platforms` and for unclassified links.
    pub generic: SelectorSet,
}

impl PlatformCatalog {
    #[must_use]
    pub fn spec(&self, platform: Platform) -> Option<&PlatformSpec> {
        self.platforms.iter().find(|s| s.platform == platform)
    }

    /// Check the catalog for duplicate platforms, blank entries and
    /// inverted thresholds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for spec in &self.platforms {
            if !seen.insert(spec.platform) {
                return Err(ConfigError::Validation(format!(
                    "duplicate platform: {}",
                    spec.platform
                )));
            }
            validate_selectors(spec.platform.id(), &spec.selectors)?;
            validate_engagement(spec.platform.id(), &spec.engagement)?;
        }
        validate_selectors("generic", &self.generic)
    }
}

fn validate_selectors(owner: &str, set: &SelectorSet) -> Result<(), ConfigError> {
    let lists = [
        ("bio_selectors", &set.bio_selectors),
        ("post_selectors", &set.post_selectors),
        ("follower_patterns", &set.follower_patterns),
        ("count_selectors", &set.count_selectors),
    ];
    for (field, entries) in lists {
        if entries.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{owner}: {field} contains an empty entry"
            )));
        }
    }
    Ok(())
}

fn validate_engagement(owner: &str, rule: &EngagementRule) -> Result<(), ConfigError> {
    let (keywords, high, medium, very_high) = match rule {
        EngagementRule::PageText {
            keywords,
            high,
            medium,
        } => (keywords, *high, *medium, None),
        EngagementRule::Posts {
            keywords,
            high,
            medium,
            very_high,
        } => (keywords, *high, *medium, *very_high),
        EngagementRule::Fixed { .. } => return Ok(()),
    };
    if keywords.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{owner}: engagement rule has no keywords"
        )));
    }
    if medium > high || very_high.is_some_and(|v| v < high) {
        return Err(ConfigError::Validation(format!(
            "{owner}: engagement thresholds must increase from medium to very_high"
        )));
    }
    Ok(())
}

/// Load and validate a platform catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_platform_catalog(path: &Path) -> Result<PlatformCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PlatformsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: PlatformCatalog =
        serde_yaml::from_str(&content).map_err(ConfigError::PlatformsFileParse)?;

    catalog.validate()?;

    Ok(catalog)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// `(\d[\d,.]*[km]?)\s*<label>` and `<label>:?\s*(\d[\d,.]*[km]?)`.
fn label_patterns(label: &str) -> Vec<String> {
    vec![
        format!(r"(\d[\d,.]*\s?[km]?)\s*{label}"),
        format!(r"{label}:?\s*(\d[\d,.]*\s?[km]?)"),
    ]
}

fn selectors(bio: &[&str], posts: &[&str], patterns: Vec<String>) -> SelectorSet {
    SelectorSet {
        bio_selectors: strings(bio),
        post_selectors: strings(posts),
        follower_patterns: patterns,
        count_selectors: Vec::new(),
    }
}

fn page_text(keywords: &[&str], high: usize, medium: usize) -> EngagementRule {
    EngagementRule::PageText {
        keywords: strings(keywords),
        high,
        medium,
    }
}

fn posts(keywords: &[&str], high: usize, medium: usize, very_high: Option<usize>) -> EngagementRule {
    EngagementRule::Posts {
        keywords: strings(keywords),
        high,
        medium,
        very_high,
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_platforms() -> Vec<PlatformSpec> {
    let mut facebook = selectors(
        &[
            "#PagesProfileAboutInfoPagelet",
            ".about_header",
            r#"[data-key="about"]"#,
            ".uiHeaderTitle + div",
            "#entity_sidebar",
        ],
        &[
            ".userContent",
            "._5pbx",
            ".text_exposed_root",
            r#"[data-testid="post_message"]"#,
            ".story_body_container",
        ],
        vec![
            r"(\d[\d,.]*\s?[km]?)\s*people\s*like\s*this".to_string(),
            r"(\d[\d,.]*\s?[km]?)\s*likes".to_string(),
            r"(\d[\d,.]*\s?[km]?)\s*followers".to_string(),
        ],
    );
    facebook.count_selectors = strings(&[r#"[data-key="followers_count"]"#, ".clearfix ._4bl9"]);

    let mut twitter = selectors(
        &[
            r#"[data-testid="UserDescription"]"#,
            r#"[data-testid="UserName"]"#,
            ".ProfileHeaderCard",
            ".ProfileCard-bio",
        ],
        &[
            r#"[data-testid="tweet"]"#,
            ".tweet",
            ".js-tweet-text-container",
            "article",
        ],
        label_patterns("followers"),
    );
    twitter.count_selectors = strings(&[
        r#"[data-testid="UserProfileHeader_Items"]"#,
        r#"[data-nav="followers"]"#,
        ".ProfileNav-item--followers",
    ]);

    vec![
        PlatformSpec {
            platform: Platform::Facebook,
            profile_type: ProfileType::Page,
            count_label: CountLabel::Followers,
            selectors: facebook,
            engagement: page_text(&["like", "comment", "share"], 2, 1),
        },
        PlatformSpec {
            platform: Platform::Twitter,
            profile_type: ProfileType::Profile,
            count_label: CountLabel::Followers,
            selectors: twitter,
            engagement: posts(&["retweet", "like", "reply", "favorite"], 5, 2, Some(10)),
        },
        PlatformSpec {
            platform: Platform::Instagram,
            profile_type: ProfileType::Profile,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[".QGPIr", ".X7jCj", "header section", "header h2", ".Fy4o8"],
                &[".C4VMK span", "._a9zr", ".xil3i", ".EtaWk", "._97aPb + div"],
                label_patterns("followers"),
            ),
            engagement: EngagementRule::Fixed {
                level: Engagement::High,
            },
        },
        PlatformSpec {
            platform: Platform::Linkedin,
            profile_type: ProfileType::Company,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[
                    ".org-about-us-organization-description__text",
                    ".org-page-details__description",
                    ".org-top-card-summary__headline",
                    ".break-words",
                ],
                &[
                    ".feed-shared-update-v2__description",
                    ".update-components-text",
                    ".feed-shared-text",
                    ".occludable-update",
                ],
                label_patterns("followers"),
            ),
            engagement: posts(&["comment", "like", "share", "reaction"], 5, 2, None),
        },
        PlatformSpec {
            platform: Platform::Youtube,
            profile_type: ProfileType::Channel,
            count_label: CountLabel::Subscribers,
            selectors: selectors(
                &[
                    "#channel-description",
                    "#description-container",
                    ".about-description",
                    "#meta-contents",
                ],
                &[
                    "#video-title",
                    ".yt-lockup-title",
                    ".ytd-grid-video-renderer",
                    ".ytd-video-renderer",
                ],
                label_patterns("subscribers"),
            ),
            engagement: page_text(&["view", "like", "comment", "subscribe"], 3, 2),
        },
        PlatformSpec {
            platform: Platform::Pinterest,
            profile_type: ProfileType::Profile,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[
                    ".UserInfoBanner",
                    ".ProfileHeader",
                    ".headerDescription",
                    r#"[data-test-id="profile-about"]"#,
                ],
                &[".Pin__description", ".pinDescription", ".Pin__title", ".PinGridItem"],
                label_patterns("followers"),
            ),
            engagement: EngagementRule::default(),
        },
        PlatformSpec {
            platform: Platform::Tiktok,
            profile_type: ProfileType::Profile,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[".share-desc", ".share-title", ".share-sub-title"],
                &[".video-feed-item-wrapper", ".video-card-big", ".video-card-container"],
                label_patterns("followers"),
            ),
            engagement: page_text(&["like", "comment", "share", "view"], 3, 1),
        },
        PlatformSpec {
            platform: Platform::Github,
            profile_type: ProfileType::Repository,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[
                    r#"[itemprop="description"]"#,
                    ".js-repo-meta-container",
                    ".repository-meta-content",
                    ".repo-meta-section",
                ],
                &[".repo-description", ".Box-body", ".markdown-body"],
                vec![
                    r"(\d[\d,.]*\s?[km]?)\s*followers".to_string(),
                    r"(\d[\d,.]*\s?[km]?)\s*stars".to_string(),
                    r"(\d[\d,.]*\s?[km]?)\s*watching".to_string(),
                ],
            ),
            engagement: page_text(&["star", "fork", "issue", "pull request"], 3, 1),
        },
        PlatformSpec {
            platform: Platform::Medium,
            profile_type: ProfileType::Publication,
            count_label: CountLabel::Followers,
            selectors: selectors(
                &[".pw-author-bio", ".pw-author-bio-content", ".hero-description"],
                &[".pw-post-title", ".pw-post-body-paragraph", ".postArticle-content", ".graf--p"],
                label_patterns("followers"),
            ),
            engagement: page_text(&["clap", "response", "comment"], 2, 1),
        },
        PlatformSpec {
            platform: Platform::Reddit,
            profile_type: ProfileType::Subreddit,
            count_label: CountLabel::Members,
            selectors: selectors(
                &[".side", ".community-details", ".md"],
                &[".thing", ".Post", r#"[data-click-id="body"]"#, ".scrollerItem"],
                vec![
                    r"(\d[\d,.]*\s?[km]?)\s*members".to_string(),
                    r"(\d[\d,.]*\s?[km]?)\s*subscribers".to_string(),
                ],
            ),
            engagement: page_text(&["upvote", "comment", "award"], 2, 1),
        },
    ]
}

fn builtin_generic() -> SelectorSet {
    selectors(
        &[
            ".bio",
            ".about",
            ".description",
            ".profile-info",
            r#"[itemprop="description"]"#,
            ".user-profile",
            ".profile-header",
        ],
        &[
            ".post",
            ".content",
            ".feed-item",
            ".status",
            "article",
            ".entry",
            ".media",
            ".card",
        ],
        vec![
            r"(\d[\d,.]*\s?[km]?)\s*followers".to_string(),
            r"followers:?\s*(\d[\d,.]*\s?[km]?)".to_string(),
            r"(\d[\d,.]*\s?[km]?)\s*subscribers".to_string(),
            r"(\d[\d,.]*\s?[km]?)\s*fans".to_string(),
        ],
    )
}

impl Default for PlatformCatalog {
    fn default() -> Self {
        Self {
            platforms: builtin_platforms(),
            generic: builtin_generic(),
        }
    }
}
