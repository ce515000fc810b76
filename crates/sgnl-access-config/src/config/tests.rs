// crates/sgnl-access-config/src/config/tests.rs
// ============================================================================
// Module: Access Configuration Tests
// Description: Unit tests for file parsing, resolution, and validity.
// Purpose: Validate defaults, legacy keys, endpoint derivation, and redaction.
// Dependencies: sgnl-access-config
// ============================================================================

//! ## Overview
//! Exercises [`AccessConfig::resolve`] without touching the filesystem.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::use_debug,
    reason = "Test-only assertions use unwrap/expect and inspect Debug output."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use super::AccessConfig;
use super::ConfigError;
use super::FileConfig;
use crate::env::EnvSource;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn empty_env() -> EnvSource {
    EnvSource::fixed(Vec::<(String, String)>::new())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn defaults_match_documented_values() {
    let config = AccessConfig::resolve(FileConfig::default(), &empty_env());
    assert_eq!(config.asset_attribute, "type");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.retry_count, 2);
    assert_eq!(config.retry_delay, Duration::from_millis(1000));
    assert!(config.validate_ssl);
    assert!(config.user_agent.starts_with("sgnl-access-client/"));
    assert!(!config.enable_debug_logging);
    assert!(!config.enable_access_logging);
    assert!(!config.is_valid());
}

#[test]
fn file_values_are_applied() {
    let file = FileConfig::from_json(
        r#"{
            "api_url": "x.example.com",
            "api_token": "t",
            "tenant": "acme",
            "timeout_seconds": 5,
            "retry_count": 0,
            "retry_delay_ms": 250,
            "validate_ssl": false,
            "enable_access_logging": true
        }"#,
    )
    .unwrap();
    let config = AccessConfig::resolve(file, &empty_env());
    assert!(config.is_valid());
    assert_eq!(config.tenant.as_deref(), Some("acme"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.retry_count, 0);
    assert_eq!(config.retry_delay, Duration::from_millis(250));
    assert!(!config.validate_ssl);
    assert!(config.enable_access_logging);
}

#[test]
fn legacy_token_key_is_used_when_api_token_absent() {
    let file =
        FileConfig::from_json(r#"{"api_url":"u","protected_system_token":"legacy"}"#).unwrap();
    let config = AccessConfig::resolve(file, &empty_env());
    assert_eq!(config.api_token, "legacy");
}

#[test]
fn api_token_wins_over_legacy_key() {
    let file = FileConfig::from_json(
        r#"{"api_url":"u","api_token":"current","protected_system_token":"legacy"}"#,
    )
    .unwrap();
    assert_eq!(AccessConfig::resolve(file, &empty_env()).api_token, "current");
}

#[test]
fn unknown_keys_are_ignored() {
    let file = FileConfig::from_json(r#"{"api_url":"u","pam":{"enabled":true}}"#).unwrap();
    assert_eq!(file.api_url.as_deref(), Some("u"));
}

#[test]
fn wrong_value_type_is_a_parse_error() {
    let err = FileConfig::from_json(r#"{"timeout_seconds":"thirty"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn non_object_is_a_parse_error() {
    assert!(matches!(FileConfig::from_json("[1,2]"), Err(ConfigError::Parse(_))));
}

#[test]
fn validate_names_missing_field() {
    let mut config = AccessConfig::default();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("api_url"));
    config.api_url = "x.example.com".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("api_token"));
    config.api_token = "t".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn service_url_prefixes_tenant_and_defaults_to_https() {
    let config = AccessConfig {
        api_url: "x.example.com".to_string(),
        tenant: Some("acme".to_string()),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "https://acme.x.example.com");
    assert!(!config.is_cleartext());
}

#[test]
fn service_url_honors_explicit_scheme() {
    let config = AccessConfig {
        api_url: "http://127.0.0.1:8080/".to_string(),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "http://127.0.0.1:8080");
    assert!(config.is_cleartext());
}

#[test]
fn service_url_scheme_is_case_insensitive() {
    let config = AccessConfig {
        api_url: "HTTPS://x.example.com".to_string(),
        tenant: Some("acme".to_string()),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "https://acme.x.example.com");
    assert!(!config.is_cleartext());

    let config = AccessConfig {
        api_url: "Http://127.0.0.1:8080".to_string(),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "http://127.0.0.1:8080");
    assert!(config.is_cleartext());
}

#[test]
fn service_url_handles_short_and_multibyte_urls() {
    let config = AccessConfig {
        api_url: "h\u{e9}.io".to_string(),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "https://h\u{e9}.io");
    assert!(!config.is_cleartext());

    let config = AccessConfig {
        api_url: "http:/\u{e9}xample".to_string(),
        ..AccessConfig::default()
    };
    assert_eq!(config.service_url(), "https://http:/\u{e9}xample");
    assert!(!config.is_cleartext());
}

#[test]
fn debug_output_redacts_token() {
    let config = AccessConfig {
        api_token: "super-secret".to_string(),
        ..AccessConfig::default()
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}
