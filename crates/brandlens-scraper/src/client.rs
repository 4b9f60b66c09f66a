use std::time::Duration;

use brandlens_core::AppConfig;
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::{jitter_delay, retry_with_backoff};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

const ACCEPT_LANGUAGES: &[&str] = &["en-US,en;q=0.9", "en-GB,en;q=0.8", "en-US,en;q=0.8,es;q=0.5"];

const REFERERS: &[&str] = &[
    "https://www.google.com/",
    "https://www.bing.com/",
    "https://duckduckgo.com/",
];

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// LinkedIn answers automated requests with this non-standard status.
const STATUS_REQUEST_DENIED: u16 = 999;

/// Timeout, retry and politeness settings for [`PageClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout_secs: u64,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Upper bound of the random pause before each request. `0` disables it.
    pub jitter_max_ms: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 12,
            max_retries: 2,
            backoff_base_ms: 500,
            jitter_max_ms: 1_000,
        }
    }
}

impl FetchPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.fetch_timeout_secs,
            max_retries: config.fetch_max_retries,
            backoff_base_ms: config.fetch_backoff_base_ms,
            jitter_max_ms: config.fetch_jitter_max_ms,
        }
    }
}

/// Browser-like headers chosen per request.
#[derive(Debug, Clone, Copy)]
struct RequestHeaders {
    user_agent: &'static str,
    accept_language: &'static str,
    referer: Option<&'static str>,
}

fn pick_headers<R: Rng + ?Sized>(rng: &mut R) -> RequestHeaders {
    RequestHeaders {
        user_agent: USER_AGENTS.choose(rng).copied().unwrap_or(USER_AGENTS[0]),
        accept_language: ACCEPT_LANGUAGES
            .choose(rng)
            .copied()
            .unwrap_or(ACCEPT_LANGUAGES[0]),
        referer: if rng.random_bool(0.5) {
            REFERERS.choose(rng).copied()
        } else {
            None
        },
    }
}

/// HTML page fetcher with rotating headers, jitter and retry.
///
/// One `PageClient` owns one pooled `reqwest::Client`; build one per
/// analysis run and reuse it for every fetch in that run.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
    policy: FetchPolicy,
}

impl PageClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(policy: FetchPolicy) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(policy.timeout_secs))
            .connect_timeout(Duration::from_secs(policy.timeout_secs.min(10)))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client, policy })
    }

    #[must_use]
    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// Fetch the HTML body of `url`.
    ///
    /// Sleeps a random jitter first, then sends a GET with freshly rotated
    /// headers on every attempt. Only `200 OK` counts as success.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Blocked`]: 403, 429 or 999 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-200 status.
    /// - [`ScraperError::Http`]: network failure or timeout after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let pause = jitter_delay(self.policy.jitter_max_ms);
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        retry_with_backoff(self.policy.max_retries, self.policy.backoff_base_ms, || {
            let headers = pick_headers(&mut rand::rng());
            let url = url.to_owned();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .header(USER_AGENT, headers.user_agent)
                    .header(ACCEPT, HTML_ACCEPT)
                    .header(ACCEPT_LANGUAGE, headers.accept_language);
                if let Some(referer) = headers.referer {
                    request = request.header(REFERER, referer);
                }

                let response = request.send().await?;
                let status = response.status().as_u16();

                match status {
                    200 => {
                        let body = response.text().await?;
                        tracing::debug!(url = %url, bytes = body.len(), "fetched page");
                        Ok(body)
                    }
                    403 | 429 | STATUS_REQUEST_DENIED => Err(ScraperError::Blocked { status, url }),
                    _ => Err(ScraperError::UnexpectedStatus { status, url }),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn default_policy_matches_documented_defaults() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.timeout_secs, 12);
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.backoff_base_ms, 500);
        assert_eq!(policy.jitter_max_ms, 1_000);
    }

    #[test]
    fn picked_headers_come_from_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut saw_referer = false;
        let mut saw_no_referer = false;
        for _ in 0..64 {
            let headers = pick_headers(&mut rng);
            assert!(USER_AGENTS.contains(&headers.user_agent));
            assert!(ACCEPT_LANGUAGES.contains(&headers.accept_language));
            match headers.referer {
                Some(r) => {
                    assert!(REFERERS.contains(&r));
                    saw_referer = true;
                }
                None => saw_no_referer = true,
            }
        }
        assert!(saw_referer && saw_no_referer);
    }

    #[test]
    fn new_client_keeps_policy() {
        let policy = FetchPolicy {
            timeout_secs: 3,
            max_retries: 0,
            backoff_base_ms: 0,
            jitter_max_ms: 0,
        };
        let client = PageClient::new(policy).unwrap();
        assert_eq!(client.policy(), policy);
    }
}
