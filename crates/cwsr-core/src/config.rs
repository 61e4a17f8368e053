use crate::app_config::{AppConfig, Environment};
use crate::product::ProductIdentity;
use crate::ConfigError;

const DEFAULT_EXTENSION_ID: &str = "abcdefghijklmnopabcdefghijklmn";
const DEFAULT_EXTENSION_SLUG: &str = "anime-episode-tracker";
const DEFAULT_STORE_BASE_URL: &str = "https://chromewebstore.google.com";
const DEFAULT_USER_AGENT: &str = "AnimeEpisodeTracker/1.0 (+https://example.com)";
/// 12 hours.
const DEFAULT_CACHE_TTL_SECS: &str = "43200";
/// One hundred years; larger windows overflow date arithmetic.
const MAX_WINDOW_DAYS: u32 = 36_500;
/// One year.
const MAX_CACHE_TTL_SECS: u64 = 31_536_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CWSR_ENV", "development"))?;

    let bind_addr = or_default("CWSR_BIND_ADDR", "0.0.0.0:8787")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CWSR_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CWSR_LOG_LEVEL", "info");

    let extension_id = or_default("CWSR_EXTENSION_ID", DEFAULT_EXTENSION_ID);
    if extension_id.trim().is_empty() {
        return Err(invalid("CWSR_EXTENSION_ID", "must not be empty".to_string()));
    }
    let base_url = or_default("CWSR_STORE_BASE_URL", DEFAULT_STORE_BASE_URL);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "CWSR_STORE_BASE_URL",
            "must start with http:// or https://".to_string(),
        ));
    }
    let product = ProductIdentity {
        extension_id,
        slug: or_default("CWSR_EXTENSION_SLUG", DEFAULT_EXTENSION_SLUG),
        base_url,
    };

    let user_agent = or_default("CWSR_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64("CWSR_REQUEST_TIMEOUT_SECS", "30")?;
    let cache_ttl_secs = parse_u64("CWSR_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
    if cache_ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(invalid(
            "CWSR_CACHE_TTL_SECS",
            format!("must be at most {MAX_CACHE_TTL_SECS}"),
        ));
    }
    let top_reviews_window_days = parse_u32("CWSR_TOP_REVIEWS_WINDOW_DAYS", "7")?;
    if top_reviews_window_days > MAX_WINDOW_DAYS {
        return Err(invalid(
            "CWSR_TOP_REVIEWS_WINDOW_DAYS",
            format!("must be at most {MAX_WINDOW_DAYS}"),
        ));
    }
    let top_reviews_count = parse_usize("CWSR_TOP_REVIEWS_COUNT", "3")?;
    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        product,
        user_agent,
        request_timeout_secs,
        cache_ttl_secs,
        top_reviews_window_days,
        top_reviews_count,
        database_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CWSR_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
