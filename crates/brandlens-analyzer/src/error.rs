use brandlens_core::ConfigError;
use brandlens_scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Empty, unparseable or non-http(s) input. The only caller-facing
    /// rejection; everything downstream degrades instead.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scraper setup failed: {0}")]
    Scraper(#[from] ScraperError),
}
