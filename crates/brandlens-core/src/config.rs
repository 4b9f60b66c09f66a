use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Does not read `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Every variable is optional; parsing is kept separate from the process
/// environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("BRANDLENS_ENV", "development"))?;

    let bind_addr = or_default("BRANDLENS_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BRANDLENS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("BRANDLENS_LOG_LEVEL", "info");
    let platforms_path = lookup("BRANDLENS_PLATFORMS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let fetch_timeout_secs = parse_u64("BRANDLENS_FETCH_TIMEOUT_SECS", "12")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "BRANDLENS_FETCH_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let fetch_max_retries = parse_u32("BRANDLENS_FETCH_MAX_RETRIES", "2")?;
    let fetch_backoff_base_ms = parse_u64("BRANDLENS_FETCH_BACKOFF_BASE_MS", "500")?;
    let fetch_jitter_max_ms = parse_u64("BRANDLENS_FETCH_JITTER_MAX_MS", "1000")?;
    let synthesize_followers = parse_bool(
        "BRANDLENS_SYNTHESIZE_FOLLOWERS",
        &or_default("BRANDLENS_SYNTHESIZE_FOLLOWERS", "true"),
    )?;
    let rate_limit_per_minute = parse_u32("BRANDLENS_RATE_LIMIT_PER_MINUTE", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        platforms_path,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_backoff_base_ms,
        fetch_jitter_max_ms,
        synthesize_followers,
        rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BRANDLENS_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
