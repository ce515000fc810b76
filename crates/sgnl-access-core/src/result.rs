// crates/sgnl-access-core/src/result.rs
// ============================================================================
// Module: Result Taxonomy
// Description: Closed result codes and the host-facing verdict mapping.
// Purpose: Give the enforcement point a small, stable result vocabulary.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`AccessResult`] is the closed taxonomy every decision path resolves to.
//! Numeric codes are stable because they cross the boundary to the host.
//! [`HostVerdict::from_result`] is the only place that translates the
//! taxonomy into the host's accept/reject/error vocabulary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Access Result
// ============================================================================

/// Result codes for access decisions.
///
/// # Invariants
/// - Numeric codes are stable and shared with host-side integrations.
/// - [`AccessResult::MemoryError`] is reserved; the network path never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessResult {
    /// Operation succeeded.
    Ok = 0,
    /// Access denied.
    Denied = 1,
    /// Access allowed.
    Allowed = 2,
    /// General error.
    Error = 3,
    /// Configuration error.
    ConfigError = 4,
    /// Network or HTTP error.
    NetworkError = 5,
    /// Authentication or authorization error against the service.
    AuthError = 6,
    /// Timeout error.
    TimeoutError = 7,
    /// Invalid request input.
    InvalidRequest = 8,
    /// Memory allocation error (host compatibility only).
    MemoryError = 9,
}

impl AccessResult {
    /// Every variant, ordered by numeric code.
    pub const ALL: [Self; 10] = [
        Self::Ok,
        Self::Denied,
        Self::Allowed,
        Self::Error,
        Self::ConfigError,
        Self::NetworkError,
        Self::AuthError,
        Self::TimeoutError,
        Self::InvalidRequest,
        Self::MemoryError,
    ];

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a result by its numeric code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Denied),
            2 => Some(Self::Allowed),
            3 => Some(Self::Error),
            4 => Some(Self::ConfigError),
            5 => Some(Self::NetworkError),
            6 => Some(Self::AuthError),
            7 => Some(Self::TimeoutError),
            8 => Some(Self::InvalidRequest),
            9 => Some(Self::MemoryError),
            _ => None,
        }
    }

    /// Returns the stable symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Denied => "DENIED",
            Self::Allowed => "ALLOWED",
            Self::Error => "ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::AuthError => "AUTH_ERROR",
            Self::TimeoutError => "TIMEOUT_ERROR",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::MemoryError => "MEMORY_ERROR",
        }
    }

    /// Returns a human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::Denied => "Access Denied",
            Self::Allowed => "Access Allowed",
            Self::Error => "General Error",
            Self::ConfigError => "Configuration Error",
            Self::NetworkError => "Network Error",
            Self::AuthError => "Authentication Error",
            Self::TimeoutError => "Timeout Error",
            Self::InvalidRequest => "Invalid Request",
            Self::MemoryError => "Memory Error",
        }
    }

    /// Returns true for every code other than `OK`, `ALLOWED`, and `DENIED`.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Ok | Self::Allowed | Self::Denied)
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Host Verdict
// ============================================================================

/// Tri-state verdict consumed by the command-authorization host.
///
/// # Invariants
/// - Only [`AccessResult::Allowed`] maps to [`HostVerdict::Accept`].
/// - Every result other than allowed/denied maps to [`HostVerdict::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostVerdict {
    /// Host should run the command.
    Accept,
    /// Host should refuse the command.
    Reject,
    /// Host should treat the check as failed (fail closed).
    Error,
}

impl HostVerdict {
    /// Maps a result code to the host verdict.
    #[must_use]
    pub const fn from_result(result: AccessResult) -> Self {
        match result {
            AccessResult::Allowed => Self::Accept,
            AccessResult::Denied => Self::Reject,
            _ => Self::Error,
        }
    }

    /// Returns the host return code (accept `1`, reject `0`, error `-1`).
    #[must_use]
    pub const fn rc(self) -> i32 {
        match self {
            Self::Accept => 1,
            Self::Reject => 0,
            Self::Error => -1,
        }
    }

    /// Returns a stable label for the verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Error => "error",
        }
    }
}

impl From<AccessResult> for HostVerdict {
    fn from(result: AccessResult) -> Self {
        Self::from_result(result)
    }
}

impl fmt::Display for HostVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
