//! Social-profile data model shared by the scraper, analyzer and front ends.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

/// Follower value reported when no count could be extracted or estimated.
pub const FOLLOWERS_UNAVAILABLE: &str = "N/A";

/// A social-media service recognised by discovery and extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    #[serde(alias = "x")]
    Twitter,
    Instagram,
    Linkedin,
    Youtube,
    Pinterest,
    Tiktok,
    Github,
    Medium,
    Reddit,
    Snapchat,
    Tumblr,
    Flickr,
    Vimeo,
}

impl Platform {
    /// Every platform, in the fixed order used for deterministic lookups.
    pub const ALL: [Platform; 14] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Pinterest,
        Platform::Tiktok,
        Platform::Github,
        Platform::Medium,
        Platform::Reddit,
        Platform::Snapchat,
        Platform::Tumblr,
        Platform::Flickr,
        Platform::Vimeo,
    ];

    /// Lowercase identifier, also used as the serde representation.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Pinterest => "pinterest",
            Platform::Tiktok => "tiktok",
            Platform::Github => "github",
            Platform::Medium => "medium",
            Platform::Reddit => "reddit",
            Platform::Snapchat => "snapchat",
            Platform::Tumblr => "tumblr",
            Platform::Flickr => "flickr",
            Platform::Vimeo => "vimeo",
        }
    }

    /// Capitalised name used in `PlatformProfile::platform`.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
            Platform::Youtube => "YouTube",
            Platform::Pinterest => "Pinterest",
            Platform::Tiktok => "TikTok",
            Platform::Github => "GitHub",
            Platform::Medium => "Medium",
            Platform::Reddit => "Reddit",
            Platform::Snapchat => "Snapchat",
            Platform::Tumblr => "Tumblr",
            Platform::Flickr => "Flickr",
            Platform::Vimeo => "Vimeo",
        }
    }

    /// Registrable domains served by the platform. The first entry is the
    /// canonical host used when constructing profile URLs.
    #[must_use]
    pub fn domains(self) -> &'static [&'static str] {
        match self {
            Platform::Facebook => &["facebook.com", "fb.com"],
            Platform::Twitter => &["twitter.com", "x.com"],
            Platform::Instagram => &["instagram.com"],
            Platform::Linkedin => &["linkedin.com"],
            Platform::Youtube => &["youtube.com", "youtu.be"],
            Platform::Pinterest => &["pinterest.com"],
            Platform::Tiktok => &["tiktok.com"],
            Platform::Github => &["github.com"],
            Platform::Medium => &["medium.com"],
            Platform::Reddit => &["reddit.com"],
            Platform::Snapchat => &["snapchat.com"],
            Platform::Tumblr => &["tumblr.com"],
            Platform::Flickr => &["flickr.com"],
            Platform::Vimeo => &["vimeo.com"],
        }
    }

    /// Profile type used when the selector catalog has no entry for the platform.
    #[must_use]
    pub fn default_profile_type(self) -> ProfileType {
        match self {
            Platform::Facebook => ProfileType::Page,
            Platform::Linkedin => ProfileType::Company,
            Platform::Youtube | Platform::Vimeo => ProfileType::Channel,
            Platform::Github => ProfileType::Repository,
            Platform::Medium => ProfileType::Publication,
            Platform::Reddit => ProfileType::Subreddit,
            _ => ProfileType::Profile,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        if needle == "x" {
            return Ok(Platform::Twitter);
        }
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == needle)
            .ok_or_else(|| CoreError::UnknownPlatform(s.to_string()))
    }
}

/// A discovered link to a social profile. `platform` is `None` when the
/// link could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: Option<Platform>,
    pub url: String,
}

impl SocialLink {
    #[must_use]
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform: Some(platform),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Page,
    Profile,
    Company,
    Channel,
    Repository,
    Publication,
    Subreddit,
}

/// Coarse audience-interaction level derived from keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Engagement {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl fmt::Display for Engagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engagement::Low => "Low",
            Engagement::Medium => "Medium",
            Engagement::High => "High",
            Engagement::VeryHigh => "Very High",
        })
    }
}

/// Coarse estimate of how often a profile publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    #[serde(rename = "Bi-weekly")]
    BiWeekly,
    Monthly,
    Unknown,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::BiWeekly => "Bi-weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Unknown => "Unknown",
        })
    }
}

/// Provenance of a profile record.
///
/// Serialises as `true`, `"partial"` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealData {
    /// Text content and follower count both came from the live page.
    Live,
    /// Only one of text content or follower count came from the live page.
    Partial,
    /// Nothing on the record came from the live page.
    None,
}

impl RealData {
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, RealData::Live)
    }
}

impl Serialize for RealData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RealData::Live => serializer.serialize_bool(true),
            RealData::Partial => serializer.serialize_str("partial"),
            RealData::None => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for RealData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RealDataVisitor;

        impl Visitor<'_> for RealDataVisitor {
            type Value = RealData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or the string \"partial\"")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<RealData, E> {
                Ok(if v { RealData::Live } else { RealData::None })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RealData, E> {
                if v.eq_ignore_ascii_case("partial") {
                    Ok(RealData::Partial)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(RealDataVisitor)
    }
}

/// Canonical extraction result for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub platform: String,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    /// Canonical digit string, or [`FOLLOWERS_UNAVAILABLE`]. Never empty.
    pub followers: String,
    pub engagement: Engagement,
    pub frequency: Frequency,
    pub content: String,
    pub url: String,
    pub real_data: RealData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The reduced per-platform view returned as `social_analytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAnalytics {
    pub platform: String,
    pub followers: String,
    pub engagement: Engagement,
    pub frequency: Frequency,
}

impl From<&PlatformProfile> for SocialAnalytics {
    fn from(profile: &PlatformProfile) -> Self {
        Self {
            platform: profile.platform.clone(),
            followers: profile.followers.clone(),
            engagement: profile.engagement,
            frequency: profile.frequency,
        }
    }
}

/// Text pulled from the brand's own website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteContent {
    pub brand_name: String,
    pub description: String,
    pub content: String,
}
