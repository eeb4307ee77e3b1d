use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_WEEKLY_AD_URL: &str = "https://www.publix.com/savings/weekly-ad/view-all";
pub const DEFAULT_CACHE_PATH: &str = "./.dealfinder/cache.json";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
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
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got '{raw}'")))
    };

    let env = parse_environment(&or_default("DEALFINDER_ENV", "development"))?;
    let log_level = or_default("DEALFINDER_LOG_LEVEL", "info");
    let weekly_ad_url = or_default("DEALFINDER_WEEKLY_AD_URL", DEFAULT_WEEKLY_AD_URL);
    let cache_path = PathBuf::from(or_default("DEALFINDER_CACHE_PATH", DEFAULT_CACHE_PATH));
    let cache_enabled = parse_bool("DEALFINDER_CACHE_ENABLED", "true")?;
    let cache_ttl_secs = parse_u64("DEALFINDER_CACHE_TTL_SECS", "3600")?;
    let profile_path = lookup("DEALFINDER_CONFIG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("DEALFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DEALFINDER_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("DEALFINDER_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("DEALFINDER_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        env,
        log_level,
        weekly_ad_url,
        cache_path,
        cache_enabled,
        cache_ttl_secs,
        profile_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DEALFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
