// crates/sgnl-access-client/src/error.rs
// ============================================================================
// Module: Access Errors
// Description: Closed error taxonomy and HTTP/transport classification.
// Purpose: Map every failure below the decision layer to one result code.
// Dependencies: sgnl-access-core, thiserror
// ============================================================================

//! ## Overview
//! [`AccessError`] is the closed set of failures a decision request can hit.
//! Each variant maps to exactly one [`AccessResult`] and carries the
//! correlation id of the call that produced it. [`classify_status`] and
//! [`classify_transport`] are the only constructors for transport-level
//! failures and are pure, so the retry policy can be tested exhaustively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use sgnl_access_core::AccessResult;
use sgnl_access_core::RequestId;
use thiserror::Error;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Decision request failure.
///
/// # Invariants
/// - Every variant carries the correlation id of the originating call.
/// - [`AccessError::result`] is total and never returns an allow/deny code.
/// - Only [`AccessError::Timeout`] and [`AccessError::Network`] are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Configuration is missing or unusable.
    #[error("configuration error: {message}")]
    Config {
        /// Failure detail.
        message: String,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Caller supplied invalid input.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Failure detail.
        message: String,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Service rejected the credentials.
    #[error("authentication error: {message}")]
    Auth {
        /// Failure detail.
        message: String,
        /// HTTP status (401 or 403).
        status: u16,
        /// Raw response body, if any.
        body: Option<String>,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Request exceeded a timeout.
    #[error("timeout: {message}")]
    Timeout {
        /// Failure detail.
        message: String,
        /// HTTP status when the service reported the timeout.
        status: Option<u16>,
        /// Raw response body, if any.
        body: Option<String>,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Transport failure or unexpected HTTP status.
    #[error("network error: {message}")]
    Network {
        /// Failure detail.
        message: String,
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Raw response body, if any.
        body: Option<String>,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Failure outside the classified taxonomy.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Failure detail.
        message: String,
        /// Correlation id.
        request_id: RequestId,
    },
}

impl AccessError {
    /// Builds a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self::Config {
            message: message.into(),
            request_id: request_id.clone(),
        }
    }

    /// Builds an invalid-request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            request_id: request_id.clone(),
        }
    }

    /// Builds a network error without an HTTP status.
    #[must_use]
    pub fn network(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
            body: None,
            request_id: request_id.clone(),
        }
    }

    /// Builds an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self::Unexpected {
            message: message.into(),
            request_id: request_id.clone(),
        }
    }

    /// Returns the result code for this error.
    #[must_use]
    pub const fn result(&self) -> AccessResult {
        match self {
            Self::Config { .. } => AccessResult::ConfigError,
            Self::InvalidRequest { .. } => AccessResult::InvalidRequest,
            Self::Auth { .. } => AccessResult::AuthError,
            Self::Timeout { .. } => AccessResult::TimeoutError,
            Self::Network { .. } => AccessResult::NetworkError,
            Self::Unexpected { .. } => AccessResult::Error,
        }
    }

    /// Returns true when another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }

    /// Returns the failure detail without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::InvalidRequest { message, .. }
            | Self::Auth { message, .. }
            | Self::Timeout { message, .. }
            | Self::Network { message, .. }
            | Self::Unexpected { message, .. } => message,
        }
    }

    /// Returns the correlation id.
    #[must_use]
    pub const fn request_id(&self) -> &RequestId {
        match self {
            Self::Config { request_id, .. }
            | Self::InvalidRequest { request_id, .. }
            | Self::Auth { request_id, .. }
            | Self::Timeout { request_id, .. }
            | Self::Network { request_id, .. }
            | Self::Unexpected { request_id, .. } => request_id,
        }
    }

    /// Returns the HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } => Some(*status),
            Self::Timeout { status, .. } | Self::Network { status, .. } => *status,
            Self::Config { .. } | Self::InvalidRequest { .. } | Self::Unexpected { .. } => None,
        }
    }

    /// Returns the raw response body, when one was captured.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Auth { body, .. } | Self::Timeout { body, .. } | Self::Network { body, .. } => {
                body.as_deref()
            }
            Self::Config { .. } | Self::InvalidRequest { .. } | Self::Unexpected { .. } => None,
        }
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Failure observed below HTTP, before a status line was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// A connect, read, or total timeout expired.
    TimedOut,
    /// Connection establishment failed.
    Connect(String),
    /// Any other transport or body-read failure.
    Other(String),
}

/// Classifies a non-200 HTTP response.
#[must_use]
pub fn classify_status(status: u16, body: Option<String>, request_id: &RequestId) -> AccessError {
    let body = body.filter(|body| !body.is_empty());
    let request_id = request_id.clone();
    match status {
        401 => AccessError::Auth {
            message: "invalid API token".to_string(),
            status,
            body,
            request_id,
        },
        403 => AccessError::Auth {
            message: "insufficient permissions".to_string(),
            status,
            body,
            request_id,
        },
        408 => AccessError::Timeout {
            message: "service reported request timeout (HTTP 408)".to_string(),
            status: Some(status),
            body,
            request_id,
        },
        500 .. => AccessError::Network {
            message: format!("server error (HTTP {status})"),
            status: Some(status),
            body,
            request_id,
        },
        _ => AccessError::Network {
            message: format!("unexpected HTTP status {status}"),
            status: Some(status),
            body,
            request_id,
        },
    }
}

/// Classifies a failure that happened before an HTTP status was received.
#[must_use]
pub fn classify_transport(
    failure: TransportFailure,
    request_id: &RequestId,
    timeout: Duration,
) -> AccessError {
    match failure {
        TransportFailure::TimedOut => AccessError::Timeout {
            message: format!("request timed out after {}ms", timeout.as_millis()),
            status: None,
            body: None,
            request_id: request_id.clone(),
        },
        TransportFailure::Connect(detail) => {
            AccessError::network(format!("connection failed: {detail}"), request_id)
        }
        TransportFailure::Other(detail) => {
            AccessError::network(format!("request failed: {detail}"), request_id)
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
