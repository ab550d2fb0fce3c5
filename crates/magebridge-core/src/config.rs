use crate::app_config::{Environment, MagentoConfig};
use crate::version::MagentoVersion;
use crate::ConfigError;

/// Release assumed when `MAGENTO_VERSION` is unset.
pub const DEFAULT_MAGENTO_VERSION: MagentoVersion = MagentoVersion::new(2, 4, 0);

/// Store used when `MAGENTO_STORE_ID` is unset.
pub const DEFAULT_STORE_ID: u32 = 1;

/// Load Magento connection configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<MagentoConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config_from_env() -> Result<MagentoConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<MagentoConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = require("MAGENTO_BASE_URL")?;
    let access_token = lookup("MAGENTO_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let magento_version = match lookup("MAGENTO_VERSION") {
        Ok(raw) => raw
            .parse::<MagentoVersion>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "MAGENTO_VERSION".to_string(),
                reason: e.to_string(),
            })?,
        Err(_) => DEFAULT_MAGENTO_VERSION,
    };
    let store_id = parse_u32("MAGENTO_STORE_ID", &DEFAULT_STORE_ID.to_string())?;

    let env = parse_environment(&or_default("MAGEBRIDGE_ENV", "development"))?;
    let log_level = or_default("MAGEBRIDGE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("MAGEBRIDGE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MAGEBRIDGE_USER_AGENT", "magebridge/0.1 (catalog-sync)");
    let max_retries = parse_u32("MAGEBRIDGE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("MAGEBRIDGE_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(MagentoConfig {
        base_url,
        access_token,
        magento_version,
        store_id,
        env,
        log_level,
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
            var: "MAGEBRIDGE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
