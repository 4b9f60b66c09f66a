use brandlens_core::{SocialAnalytics, SocialLink};
use serde::Serialize;

use crate::analysis::ToneMap;
use crate::visual::VisualProfile;

/// Response of one `analyze(url)` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub brand_name: String,
    pub brand_description: String,
    pub social_links: Vec<SocialLink>,
    /// Platform, followers, engagement and frequency of each profile.
    pub social_analytics: Vec<SocialAnalytics>,
    pub keywords: Vec<String>,
    pub key_values: Vec<String>,
    pub tone_analysis: ToneMap,
    /// Markdown.
    pub brand_story: String,
    pub visual_profile: VisualProfile,
    /// 0 to 100.
    pub consistency_score: u8,
    /// What degraded, when the run fell back to defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
