use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings shared by the server and CLI front ends.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML override for the built-in platform selector catalog.
    pub platforms_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    /// Retries after the first attempt; total attempts are `fetch_max_retries + 1`.
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
    /// Upper bound of the random pause taken before each outbound page fetch.
    pub fetch_jitter_max_ms: u64,
    /// When false, profiles without an extracted count report `"N/A"`.
    pub synthesize_followers: bool,
    pub rate_limit_per_minute: u32,
}
