// crates/sgnl-access-core/src/correlation.rs
// ============================================================================
// Module: Request Correlation
// Description: Per-request correlation identifiers for decision calls.
// Purpose: Trace one decision request across retries, errors, and logs.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! Every evaluate, batch, or search call issues a fresh [`RequestId`]. The
//! identifier is sent as the `X-Request-Id` header and echoed into every
//! error and log record for that call. Identifiers are request-scoped: they
//! are never reused across calls and never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header name carrying the client-generated correlation identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// ============================================================================
// SECTION: Request Id
// ============================================================================

/// Random, request-scoped correlation identifier.
///
/// # Invariants
/// - Generated values are RFC 4122 version 4 UUID strings (lowercase hex).
/// - Values are valid HTTP header values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Issues a new random correlation identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
