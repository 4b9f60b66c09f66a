//! Command handlers. Each returns the text to print on stdout so `main` owns
//! the only `println!`.

use brandlens_analyzer::Analyzer;

use crate::{report::render_markdown, OutputFormat};

/// # Errors
///
/// Returns an error for an unusable URL or if the result cannot be serialised.
pub(crate) async fn run_analyze(
    analyzer: &Analyzer,
    url: &str,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let result = analyzer.analyze(url).await?;
    if let Some(error) = &result.error {
        tracing::warn!(url, error = %error, "analysis degraded");
    }
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Markdown => render_markdown(&result),
    })
}

/// # Errors
///
/// Returns an error for an unusable URL.
pub(crate) async fn run_links(analyzer: &Analyzer, url: &str) -> anyhow::Result<String> {
    let links = analyzer.discover(url).await?;
    tracing::info!(url, count = links.len(), "links discovered");
    Ok(serde_json::to_string_pretty(&links)?)
}

/// # Errors
///
/// Returns an error for an unusable URL.
pub(crate) async fn run_profiles(analyzer: &Analyzer, url: &str) -> anyhow::Result<String> {
    let profiles = analyzer.profiles(url).await?;
    let failed = profiles.iter().filter(|p| p.error.is_some()).count();
    tracing::info!(url, count = profiles.len(), failed, "profiles extracted");
    Ok(serde_json::to_string_pretty(&profiles)?)
}
