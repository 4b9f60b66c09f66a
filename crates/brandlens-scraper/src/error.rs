use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// 403, 429 and LinkedIn's 999: the platform is refusing automated access.
    #[error("blocked by {url} (HTTP {status})")]
    Blocked { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid count pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a single link produced no live data. Turned into a placeholder
/// profile by the collector; never aborts a batch.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ScraperError,
    },

    #[error("no readable content at {url}")]
    EmptyPage { url: String },
}
