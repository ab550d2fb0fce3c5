use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("MAGENTO_BASE_URL", "https://shop.example.com/rest/default");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MAGEBRIDGE_ENV"));
}

#[test]
fn build_config_fails_without_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "MAGENTO_BASE_URL"),
        "expected MissingEnvVar(MAGENTO_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_config_treats_blank_base_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("MAGENTO_BASE_URL", "   ");
    let result = build_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.base_url, "https://shop.example.com/rest/default");
    assert!(cfg.access_token.is_none());
    assert_eq!(cfg.magento_version, MagentoVersion::new(2, 4, 0));
    assert_eq!(cfg.store_id, 1);
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "magebridge/0.1 (catalog-sync)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
}

#[test]
fn build_config_reads_overrides() {
    let mut map = full_env();
    map.insert("MAGENTO_ACCESS_TOKEN", "tok-123");
    map.insert("MAGENTO_VERSION", "2.1.18");
    map.insert("MAGENTO_STORE_ID", "4");
    map.insert("MAGEBRIDGE_ENV", "production");
    map.insert("MAGEBRIDGE_MAX_RETRIES", "0");
    let cfg = build_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.access_token.as_deref(), Some("tok-123"));
    assert_eq!(cfg.magento_version, MagentoVersion::new(2, 1, 18));
    assert_eq!(cfg.store_id, 4);
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn build_config_ignores_blank_access_token() {
    let mut map = full_env();
    map.insert("MAGENTO_ACCESS_TOKEN", "");
    let cfg = build_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.access_token.is_none());
}

#[test]
fn build_config_rejects_invalid_version() {
    let mut map = full_env();
    map.insert("MAGENTO_VERSION", "latest");
    let result = build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAGENTO_VERSION"),
        "expected InvalidEnvVar(MAGENTO_VERSION), got: {result:?}"
    );
}

#[test]
fn build_config_rejects_invalid_store_id() {
    let mut map = full_env();
    map.insert("MAGENTO_STORE_ID", "default");
    let result = build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAGENTO_STORE_ID"),
        "expected InvalidEnvVar(MAGENTO_STORE_ID), got: {result:?}"
    );
}

#[test]
fn build_config_rejects_invalid_timeout() {
    let mut map = full_env();
    map.insert("MAGEBRIDGE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAGEBRIDGE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MAGEBRIDGE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_access_token() {
    let mut map = full_env();
    map.insert("MAGENTO_ACCESS_TOKEN", "super-secret");
    let cfg = build_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
