//! Shared domain types and configuration for brandlens.

pub mod app_config;
pub mod config;
pub mod platforms;
pub mod social;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use platforms::{
    load_platform_catalog, CountLabel, EngagementRule, PlatformCatalog, PlatformSpec, SelectorSet,
};
pub use social::{
    Engagement, Frequency, Platform, PlatformProfile, ProfileType, RealData, SocialAnalytics,
    SocialLink, WebsiteContent, FOLLOWERS_UNAVAILABLE,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read platforms file at {path}: {source}")]
    PlatformsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse platforms file: {0}")]
    PlatformsFileParse(#[source] serde_yaml::Error),

    #[error("platform catalog validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
