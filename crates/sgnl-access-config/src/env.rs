// crates/sgnl-access-config/src/env.rs
// ============================================================================
// Module: Environment Overrides
// Description: Environment variable lookup and per-field override resolution.
// Purpose: Express env > file > default precedence as a pure function.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment overrides are read through an [`EnvSource`], which is either
//! the live process environment or a fixed map used for deterministic
//! lookups. Values that are unset or empty never override. Boolean variables
//! accept `1/true/yes/on` case-insensitively; numeric variables that fail to
//! parse fall through to the file value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "SGNL_CONFIG_PATH";
/// Overrides the service base URL.
pub const API_URL_ENV: &str = "SGNL_API_URL";
/// Overrides the API bearer token.
pub const API_TOKEN_ENV: &str = "SGNL_API_TOKEN";
/// Overrides the tenant identifier.
pub const TENANT_ENV: &str = "SGNL_TENANT";
/// Overrides the debug logging flag.
pub const DEBUG_ENV: &str = "SGNL_DEBUG";
/// Overrides the access logging flag.
pub const ACCESS_LOGGING_ENV: &str = "SGNL_ACCESS_LOGGING";
/// Overrides the total request timeout (seconds).
pub const TIMEOUT_ENV: &str = "SGNL_TIMEOUT";
/// Overrides the connect timeout (seconds).
pub const CONNECT_TIMEOUT_ENV: &str = "SGNL_CONNECT_TIMEOUT";
/// Overrides the retry count.
pub const RETRY_COUNT_ENV: &str = "SGNL_RETRY_COUNT";
/// Overrides the inter-retry delay (milliseconds).
pub const RETRY_DELAY_ENV: &str = "SGNL_RETRY_DELAY";
/// Overrides the TLS verification flag.
pub const VALIDATE_SSL_ENV: &str = "SGNL_VALIDATE_SSL";
/// Overrides the user agent string.
pub const USER_AGENT_ENV: &str = "SGNL_USER_AGENT";
/// Overrides the custom CA bundle path.
pub const CA_BUNDLE_ENV: &str = "SGNL_CA_BUNDLE";

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves one field: environment value, then file value, then default.
#[must_use]
pub fn resolve<T>(env_value: Option<T>, file_value: Option<T>, default: T) -> T {
    env_value.or(file_value).unwrap_or(default)
}

/// Parses a boolean environment value (`1/true/yes/on`, case-insensitive).
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// ============================================================================
// SECTION: Environment Source
// ============================================================================

/// Source of environment variables for override resolution.
///
/// # Invariants
/// - Empty values are indistinguishable from unset values.
#[derive(Clone, Default)]
pub enum EnvSource {
    /// Read from the live process environment.
    #[default]
    Process,
    /// Read from a fixed map.
    Fixed(BTreeMap<String, String>),
}

impl EnvSource {
    /// Builds a fixed environment from key/value pairs.
    #[must_use]
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(vars.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }

    /// Returns the variable when set and non-empty.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(key).ok(),
            Self::Fixed(vars) => vars.get(key).cloned(),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Returns the variable interpreted as a boolean flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.string(key).map(|value| parse_flag(&value))
    }

    /// Returns the variable parsed as a number; unparseable values are ignored.
    #[must_use]
    pub fn number<T: FromStr>(&self, key: &str) -> Option<T> {
        self.string(key).and_then(|value| value.trim().parse().ok())
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => f.write_str("EnvSource::Process"),
            Self::Fixed(vars) => {
                f.debug_tuple("EnvSource::Fixed").field(&vars.keys().collect::<Vec<_>>()).finish()
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
