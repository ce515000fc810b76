// crates/sgnl-access-config/src/config.rs
// ============================================================================
// Module: Access Configuration
// Description: Configuration model, file parsing, and resolution for the client.
// Purpose: Load config.json, layer environment overrides, and validate.
// Dependencies: serde, serde_json, sgnl-access-core, thiserror
// ============================================================================

//! ## Overview
//! [`FileConfig`] mirrors the JSON file as written: every key is optional and
//! unknown keys are ignored, so the file may be shared with other host
//! modules. [`AccessConfig::resolve`] combines a parsed file with an
//! [`EnvSource`] into the immutable configuration the client runs with.
//! [`ConfigResolver`] owns the load lifecycle and reports load failures
//! through a [`LogSink`].
//!
//! Security posture: the config path and file content are untrusted. Loads
//! are bounded in size, must be UTF-8, and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sgnl_access_core::LogEvent;
use sgnl_access_core::LogLevel;
use sgnl_access_core::LogSink;
use sgnl_access_core::StderrLogSink;
use thiserror::Error;

use crate::env;
use crate::env::EnvSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sgnl/config.json";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default asset attribute used to describe the asset in evaluation queries.
pub const DEFAULT_ASSET_ATTRIBUTE: &str = "type";
/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_COUNT: u32 = 2;
/// Default pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Returns the default user agent string.
#[must_use]
pub fn default_user_agent() -> String {
    format!("sgnl-access-client/{}", sgnl_access_core::VERSION)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
///
/// # Invariants
/// - Messages never include the API token.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file is not a valid JSON config object.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The config path, content, or resolved values are invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: File Model
// ============================================================================

/// Raw configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Service base URL (host, optionally with scheme).
    pub api_url: Option<String>,
    /// API bearer token.
    pub api_token: Option<String>,
    /// Legacy token key, used when `api_token` is absent.
    pub protected_system_token: Option<String>,
    /// Tenant identifier prefixed onto the service host.
    pub tenant: Option<String>,
    /// Asset attribute name.
    pub asset_attribute: Option<String>,
    /// Total request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_seconds: Option<u64>,
    /// Retries after the first attempt.
    pub retry_count: Option<u32>,
    /// Pause between attempts in milliseconds.
    pub retry_delay_ms: Option<u64>,
    /// TLS certificate verification flag.
    pub validate_ssl: Option<bool>,
    /// Custom CA bundle path (PEM).
    pub ca_bundle_path: Option<PathBuf>,
    /// User agent string.
    pub user_agent: Option<String>,
    /// Debug logging flag.
    pub enable_debug_logging: Option<bool>,
    /// Access logging flag.
    pub enable_access_logging: Option<bool>,
}

impl FileConfig {
    /// Parses a config file body.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the body is not a JSON object or a
    /// recognized key carries the wrong type.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Reads and parses a config file with path and size limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is invalid, the file cannot be
    /// read, exceeds the size limit, is not UTF-8, or fails to parse.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_json(&content)
    }

    /// Returns the token, preferring `api_token` over the legacy key.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.api_token.clone().or_else(|| self.protected_system_token.clone())
    }
}

/// Validates config path length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config path must not be empty".to_string()));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Resolved Config
// ============================================================================

/// Resolved, immutable client configuration.
///
/// # Invariants
/// - Valid iff `api_url` and `api_token` are both non-empty.
/// - Never mutated after resolution; share by cloning.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Service base URL (host, optionally with scheme).
    pub api_url: String,
    /// API bearer token.
    pub api_token: String,
    /// Tenant identifier prefixed onto the service host.
    pub tenant: Option<String>,
    /// Asset attribute name for evaluation queries.
    pub asset_attribute: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Retries after the first attempt.
    pub retry_count: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// TLS certificate verification flag.
    pub validate_ssl: bool,
    /// Custom CA bundle path (PEM).
    pub ca_bundle_path: Option<PathBuf>,
    /// User agent string.
    pub user_agent: String,
    /// Debug logging flag.
    pub enable_debug_logging: bool,
    /// Access logging flag.
    pub enable_access_logging: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
            tenant: None,
            asset_attribute: DEFAULT_ASSET_ATTRIBUTE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            validate_ssl: true,
            ca_bundle_path: None,
            user_agent: default_user_agent(),
            enable_debug_logging: false,
            enable_access_logging: false,
        }
    }
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.api_token.is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("AccessConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &token)
            .field("tenant", &self.tenant)
            .field("asset_attribute", &self.asset_attribute)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry_count", &self.retry_count)
            .field("retry_delay", &self.retry_delay)
            .field("validate_ssl", &self.validate_ssl)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .field("user_agent", &self.user_agent)
            .field("enable_debug_logging", &self.enable_debug_logging)
            .field("enable_access_logging", &self.enable_access_logging)
            .finish()
    }
}

impl AccessConfig {
    /// Resolves every field: environment, then file, then default.
    #[must_use]
    pub fn resolve(file: FileConfig, source: &EnvSource) -> Self {
        let defaults = Self::default();
        let token = file.token();
        Self {
            api_url: env::resolve(source.string(env::API_URL_ENV), file.api_url, defaults.api_url),
            api_token: env::resolve(source.string(env::API_TOKEN_ENV), token, defaults.api_token),
            tenant: source
                .string(env::TENANT_ENV)
                .or(file.tenant)
                .filter(|tenant| !tenant.is_empty()),
            asset_attribute: file.asset_attribute.unwrap_or(defaults.asset_attribute),
            timeout: env::resolve(
                source.number(env::TIMEOUT_ENV).map(Duration::from_secs),
                file.timeout_seconds.map(Duration::from_secs),
                defaults.timeout,
            ),
            connect_timeout: env::resolve(
                source.number(env::CONNECT_TIMEOUT_ENV).map(Duration::from_secs),
                file.connect_timeout_seconds.map(Duration::from_secs),
                defaults.connect_timeout,
            ),
            retry_count: env::resolve(
                source.number(env::RETRY_COUNT_ENV),
                file.retry_count,
                defaults.retry_count,
            ),
            retry_delay: env::resolve(
                source.number(env::RETRY_DELAY_ENV).map(Duration::from_millis),
                file.retry_delay_ms.map(Duration::from_millis),
                defaults.retry_delay,
            ),
            validate_ssl: env::resolve(
                source.flag(env::VALIDATE_SSL_ENV),
                file.validate_ssl,
                defaults.validate_ssl,
            ),
            ca_bundle_path: source
                .string(env::CA_BUNDLE_ENV)
                .map(PathBuf::from)
                .or(file.ca_bundle_path),
            user_agent: env::resolve(
                source.string(env::USER_AGENT_ENV),
                file.user_agent,
                defaults.user_agent,
            ),
            enable_debug_logging: env::resolve(
                source.flag(env::DEBUG_ENV),
                file.enable_debug_logging,
                defaults.enable_debug_logging,
            ),
            enable_access_logging: env::resolve(
                source.flag(env::ACCESS_LOGGING_ENV),
                file.enable_access_logging,
                defaults.enable_access_logging,
            ),
        }
    }

    /// Returns true when the required connection fields are present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.api_url.is_empty() && !self.api_token.is_empty()
    }

    /// Checks the required connection fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::Invalid("api_url is required".to_string()));
        }
        if self.api_token.is_empty() {
            return Err(ConfigError::Invalid("api_token is required".to_string()));
        }
        Ok(())
    }

    /// Returns the scheme and effective host (`{tenant}.{api_url}`).
    ///
    /// The scheme defaults to `https` unless `api_url` carries one, matched
    /// case-insensitively and returned lowercase. A trailing slash on `api_url`
    /// is dropped.
    #[must_use]
    pub fn service_origin(&self) -> (&str, String) {
        let (scheme, host) = if let Some(rest) = strip_scheme(&self.api_url, "https://") {
            ("https", rest)
        } else if let Some(rest) = strip_scheme(&self.api_url, "http://") {
            ("http", rest)
        } else {
            ("https", self.api_url.as_str())
        };
        let host = host.trim_end_matches('/');
        match self.tenant.as_deref() {
            Some(tenant) => (scheme, format!("{tenant}.{host}")),
            None => (scheme, host.to_string()),
        }
    }

    /// Returns the base URL requests are sent to, without a trailing slash.
    #[must_use]
    pub fn service_url(&self) -> String {
        let (scheme, host) = self.service_origin();
        format!("{scheme}://{host}")
    }

    /// Returns true when the service URL explicitly requests cleartext HTTP.
    #[must_use]
    pub fn is_cleartext(&self) -> bool {
        strip_scheme(&self.api_url, "http://").is_some()
    }
}

/// Strips an ASCII scheme prefix from `url`, ignoring case.
fn strip_scheme<'a>(url: &'a str, scheme: &str) -> Option<&'a str> {
    url.get(.. scheme.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .and_then(|_| url.get(scheme.len() ..))
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Loads and holds the client configuration.
///
/// # Invariants
/// - `config()` is the default (invalid) configuration until a load succeeds.
/// - A failed load emits exactly one error event to the sink.
pub struct ConfigResolver {
    /// Config file path.
    path: PathBuf,
    /// Environment override source.
    env: EnvSource,
    /// Sink for load diagnostics.
    sink: Arc<dyn LogSink>,
    /// Most recently resolved configuration.
    config: AccessConfig,
    /// True after a successful load.
    loaded: bool,
}

impl ConfigResolver {
    /// Creates a resolver reading the process environment.
    ///
    /// The path comes from `SGNL_CONFIG_PATH` when set, else the default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(EnvSource::Process)
    }

    /// Creates a resolver reading the given environment source.
    #[must_use]
    pub fn with_env(env: EnvSource) -> Self {
        let path =
            env.string(env::CONFIG_PATH_ENV).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self {
            path: PathBuf::from(path),
            env,
            sink: Arc::new(StderrLogSink),
            config: AccessConfig::default(),
            loaded: false,
        }
    }

    /// Overrides the config file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Overrides the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads, resolves, and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or the
    /// resolved configuration is missing required fields.
    pub fn try_load(&mut self) -> Result<&AccessConfig, ConfigError> {
        self.loaded = false;
        self.config = AccessConfig::default();
        let file = FileConfig::read(&self.path)?;
        let config = AccessConfig::resolve(file, &self.env);
        config.validate()?;
        self.config = config;
        self.loaded = true;
        Ok(&self.config)
    }

    /// Loads the configuration, reporting failure through the sink.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(_) => true,
            Err(err) => {
                self.sink.record(&LogEvent::new(
                    "config_load_failed",
                    LogLevel::Error,
                    None,
                    format!("{}: {err}", self.path.display()),
                ));
                false
            }
        }
    }

    /// Returns true when a load succeeded and the configuration is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.loaded && self.config.is_valid()
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Consumes the resolver, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AccessConfig {
        self.config
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
