//! `analyze(url)`: homepage to brand report.

use std::sync::Arc;

use brandlens_core::{
    load_platform_catalog, AppConfig, PlatformCatalog, PlatformProfile, SocialAnalytics, SocialLink,
    WebsiteContent,
};
use brandlens_scraper::{
    discover_links_in_html, discover_social_links, fallback_website_content,
    fetch_website_content, normalize_input_url, ExtractorRegistry, FallbackPolicy, FetchPolicy,
    PageClient, ScraperError, SocialCollector,
};
use reqwest::Url;

use crate::analysis::{ContentAnalysis, ContentAnalyzer};
use crate::consistency::consistency_score;
use crate::error::AnalyzeError;
use crate::lexicon::Lexicon;
use crate::story::{generate_brand_story, StoryInput};
use crate::types::AnalysisResult;
use crate::visual::generate_visual_profile;

/// Runs the whole pipeline. Cheap to clone; share one per process.
#[derive(Debug, Clone)]
pub struct Analyzer {
    policy: FetchPolicy,
    collector: SocialCollector,
    content: ContentAnalyzer,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        policy: FetchPolicy,
        registry: Arc<ExtractorRegistry>,
        fallback: FallbackPolicy,
        lexicon: Lexicon,
    ) -> Self {
        Self {
            policy,
            collector: SocialCollector::new(policy, registry, fallback),
            content: ContentAnalyzer::new(lexicon),
        }
    }

    /// Build from application config, loading the platform catalog from
    /// `platforms_path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Config`] if the catalog file cannot be read or
    /// fails validation, and [`AnalyzeError::Scraper`] if one of its
    /// selectors or patterns does not compile.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalyzeError> {
        let catalog = match &config.platforms_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading platform catalog");
                load_platform_catalog(path)?
            }
            None => PlatformCatalog::default(),
        };
        let registry = Arc::new(ExtractorRegistry::from_catalog(&catalog)?);
        let fallback = FallbackPolicy {
            enabled: config.synthesize_followers,
            ..FallbackPolicy::default()
        };
        Ok(Self::new(
            FetchPolicy::from_config(config),
            registry,
            fallback,
            Lexicon::default(),
        ))
    }

    /// Social links found on the homepage at `url`.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::InvalidUrl`] for unusable input; [`AnalyzeError::Scraper`]
    /// if the HTTP client cannot be built.
    pub async fn discover(&self, url: &str) -> Result<Vec<SocialLink>, AnalyzeError> {
        let base = parse_input(url)?;
        let client = PageClient::new(self.policy)?;
        discover_social_links(&client, base.as_str())
            .await
            .map_err(from_scraper)
    }

    /// Discovered links run through the extraction orchestrator, all on one
    /// client.
    ///
    /// # Errors
    ///
    /// Same as [`Self::discover`].
    pub async fn profiles(&self, url: &str) -> Result<Vec<PlatformProfile>, AnalyzeError> {
        let base = parse_input(url)?;
        let client = PageClient::new(self.policy)?;
        let links = discover_social_links(&client, base.as_str())
            .await
            .map_err(from_scraper)?;
        Ok(self.collector.collect_with(&client, &links).await)
    }

    /// Full analysis of the brand behind `url`.
    ///
    /// Fetches the homepage once; discovery and website-content extraction
    /// both read that HTML. A failed homepage fetch degrades to defaults and
    /// sets `error` rather than failing the call.
    ///
    /// # Errors
    ///
    /// [`AnalyzeError::InvalidUrl`] for unusable input; [`AnalyzeError::Scraper`]
    /// if the HTTP client cannot be built.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzeError> {
        let base = parse_input(url)?;
        let client = PageClient::new(self.policy)?;
        tracing::info!(url = %base, "analysis started");

        let (links, website, error) = match client.fetch_page(base.as_str()).await {
            Ok(html) => {
                let links = discover_links_in_html(&base, &html);
                let website = fetch_website_content(&client, &base, &html).await;
                (links, website, None)
            }
            Err(err) => {
                tracing::warn!(url = %base, error = %err, "homepage fetch failed, using defaults");
                (
                    discover_links_in_html(&base, ""),
                    fallback_website_content(&base),
                    Some(format!("could not fetch {base}: {err}")),
                )
            }
        };

        let profiles = self.collector.collect_with(&client, &links).await;
        let analysis = self.content.analyze(&website, &profiles);
        let result = assemble(links, website, &profiles, analysis, error);

        tracing::info!(
            url = %base,
            brand = %result.brand_name,
            links = result.social_links.len(),
            score = result.consistency_score,
            "analysis complete"
        );
        Ok(result)
    }
}

fn parse_input(url: &str) -> Result<Url, AnalyzeError> {
    normalize_input_url(url).map_err(from_scraper)
}

fn from_scraper(err: ScraperError) -> AnalyzeError {
    match err {
        ScraperError::InvalidUrl { url, reason } => AnalyzeError::InvalidUrl { url, reason },
        other => AnalyzeError::Scraper(other),
    }
}

/// Story, visual profile and score. Synchronous so the thread-local RNG
/// never crosses an `.await`.
fn assemble(
    links: Vec<SocialLink>,
    website: WebsiteContent,
    profiles: &[PlatformProfile],
    analysis: ContentAnalysis,
    error: Option<String>,
) -> AnalysisResult {
    let brand_story = generate_brand_story(
        &StoryInput {
            brand_name: &website.brand_name,
            description: &website.description,
            analysis: &analysis,
            profiles,
        },
        &mut rand::rng(),
    );
    let visual_profile = generate_visual_profile(&analysis.tone_analysis);
    let consistency_score = consistency_score(&website, profiles, analysis.sentiment);

    AnalysisResult {
        social_analytics: profiles.iter().map(SocialAnalytics::from).collect(),
        social_links: links,
        keywords: analysis.keywords,
        key_values: analysis.key_values,
        tone_analysis: analysis.tone_analysis,
        brand_story,
        visual_profile,
        consistency_score,
        brand_name: website.brand_name,
        brand_description: website.description,
        error,
    }
}

#[cfg(test)]
mod tests {
    use brandlens_core::{Engagement, Frequency, Platform, ProfileType, RealData};

    use super::*;

    fn website() -> WebsiteContent {
        WebsiteContent {
            brand_name: "Acme".to_string(),
            description: "Acme roasts single-origin coffee in small batches for cafes and homes.".to_string(),
            content: "Acme roasts single-origin coffee in small batches. Quality and service matter to every customer.".to_string(),
        }
    }

    fn profile() -> PlatformProfile {
        PlatformProfile {
            platform: "Facebook".to_string(),
            profile_type: ProfileType::Page,
            followers: "12345".to_string(),
            engagement: Engagement::High,
            frequency: Frequency::Daily,
            content: "Bio: Coffee people".to_string(),
            url: "https://facebook.com/acme".to_string(),
            real_data: RealData::Live,
            error: None,
        }
    }

    #[test]
    fn assemble_derives_analytics_view() {
        let profiles = vec![profile()];
        let analysis = ContentAnalyzer::default().analyze(&website(), &profiles);
        let links = vec![SocialLink::new(Platform::Facebook, "https://facebook.com/acme")];
        let result = assemble(links, website(), &profiles, analysis, None);

        assert_eq!(result.brand_name, "Acme");
        assert_eq!(result.social_analytics.len(), 1);
        assert_eq!(result.social_analytics[0].followers, "12345");
        assert!(result.brand_story.contains("12345 followers"));
        assert!(result.consistency_score > 50);
        assert!(result.error.is_none());
    }

    #[test]
    fn result_json_omits_absent_error() {
        let analysis = ContentAnalyzer::default().analyze(&website(), &[]);
        let result = assemble(Vec::new(), website(), &[], analysis, None);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert!(json["tone_analysis"]["professional"].is_number());
        assert!(json["consistency_score"].is_u64());
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(matches!(parse_input(""), Err(AnalyzeError::InvalidUrl { .. })));
        assert!(matches!(parse_input("ftp://acme.com"), Err(AnalyzeError::InvalidUrl { .. })));
        assert_eq!(parse_input("acme.com").unwrap().as_str(), "https://acme.com/");
    }
}
