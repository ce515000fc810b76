// crates/sgnl-access-client/src/decision.rs
// ============================================================================
// Module: Decision Model
// Description: Access decisions, search results, and service wire shapes.
// Purpose: Hold per-call outcomes in an auditable, caller-owned form.
// Dependencies: serde, serde_json, sgnl-access-core
// ============================================================================

//! ## Overview
//! [`AccessDecision`] is built fresh for every evaluated query and is never
//! shared. It keeps the raw decision string and reason next to the coarse
//! [`AccessResult`] so audit records retain what the service actually said.
//! [`SearchResult`] is the equivalent for asset searches.
//!
//! Decision strings are matched case-sensitively: only `Allow` and `Deny`
//! are recognized, and anything else is an error carrying the literal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use sgnl_access_core::AccessResult;
use sgnl_access_core::HostVerdict;
use sgnl_access_core::RequestId;

use crate::error::AccessError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Decision string granting access.
pub const ALLOW: &str = "Allow";
/// Decision string refusing access.
pub const DENY: &str = "Deny";

// ============================================================================
// SECTION: Access Decision
// ============================================================================

/// Outcome of one access query.
///
/// # Invariants
/// - `result` is [`AccessResult::Allowed`] only when `decision == "Allow"`.
/// - `error_message` is set whenever `result` is an error code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDecision {
    /// Principal the query was evaluated for.
    pub principal_id: String,
    /// Asset the query targeted.
    pub asset_id: String,
    /// Requested action.
    pub action: String,
    /// Raw decision string from the service (empty when none was received).
    pub decision: String,
    /// Service-supplied reason (empty when none was received).
    pub reason: String,
    /// Correlation id of the call.
    pub request_id: RequestId,
    /// Wall-clock time the decision was assembled (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Coarse outcome.
    pub result: AccessResult,
    /// Failure detail for error outcomes.
    pub error_message: Option<String>,
    /// Additional attributes carried on the service decision.
    pub attributes: BTreeMap<String, Value>,
}

impl AccessDecision {
    /// Creates an error decision with no service response.
    #[must_use]
    pub fn failed(
        principal_id: &str,
        asset_id: &str,
        action: &str,
        request_id: &RequestId,
        result: AccessResult,
        message: impl Into<String>,
    ) -> Self {
        Self {
            principal_id: principal_id.to_string(),
            asset_id: asset_id.to_string(),
            action: action.to_string(),
            decision: String::new(),
            reason: String::new(),
            request_id: request_id.clone(),
            timestamp_ms: now_ms(),
            result,
            error_message: Some(message.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Creates an error decision from a classified request failure.
    #[must_use]
    pub fn from_error(
        principal_id: &str,
        asset_id: &str,
        action: &str,
        error: &AccessError,
    ) -> Self {
        Self::failed(
            principal_id,
            asset_id,
            action,
            error.request_id(),
            error.result(),
            error.message(),
        )
    }

    /// Creates a decision from one service decision entry.
    #[must_use]
    pub(crate) fn from_wire(
        principal_id: &str,
        asset_id: &str,
        action: &str,
        request_id: &RequestId,
        wire: WireDecision,
    ) -> Self {
        let decision = wire.decision.unwrap_or_default();
        let (result, error_message) = match decision.as_str() {
            ALLOW => (AccessResult::Allowed, None),
            DENY => (AccessResult::Denied, None),
            other => (AccessResult::Error, Some(format!("unknown decision: {other}"))),
        };
        Self {
            principal_id: principal_id.to_string(),
            asset_id: asset_id.to_string(),
            action: action.to_string(),
            decision,
            reason: wire.reason.unwrap_or_default(),
            request_id: request_id.clone(),
            timestamp_ms: now_ms(),
            result,
            error_message,
            attributes: wire.attributes,
        }
    }

    /// Returns true when access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.result == AccessResult::Allowed
    }

    /// Returns true when access was refused.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        self.result == AccessResult::Denied
    }

    /// Returns true when no allow/deny decision was reached.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.result.is_error()
    }

    /// Returns the host verdict for this decision.
    #[must_use]
    pub const fn verdict(&self) -> HostVerdict {
        HostVerdict::from_result(self.result)
    }
}

// ============================================================================
// SECTION: Search Result
// ============================================================================

/// Outcome of an asset search.
///
/// # Invariants
/// - `asset_ids` is empty whenever `result` is an error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Principal the search ran for.
    pub principal_id: String,
    /// Searched action.
    pub action: String,
    /// Assets whose decision was exactly `Allow`, in response order.
    pub asset_ids: Vec<String>,
    /// Token for the next page, when the service returned one.
    pub next_page_token: Option<String>,
    /// True when more pages are available.
    pub has_more_pages: bool,
    /// Correlation id of the call.
    pub request_id: RequestId,
    /// [`AccessResult::Ok`] on success, an error code otherwise.
    pub result: AccessResult,
    /// Failure detail for error outcomes.
    pub error_message: Option<String>,
}

impl SearchResult {
    /// Creates a failed search result.
    #[must_use]
    pub fn failed(principal_id: &str, action: &str, error: &AccessError) -> Self {
        Self {
            principal_id: principal_id.to_string(),
            action: action.to_string(),
            asset_ids: Vec::new(),
            next_page_token: None,
            has_more_pages: false,
            request_id: error.request_id().clone(),
            result: error.result(),
            error_message: Some(error.message().to_string()),
        }
    }
}

// ============================================================================
// SECTION: Wire Model
// ============================================================================

/// Response body of the evaluation and search endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DecisionsResponse {
    /// Decisions in query order (evaluation) or response order (search).
    #[serde(default)]
    pub(crate) decisions: Option<Vec<WireDecision>>,
    /// Pagination token for search responses.
    #[serde(default, rename = "nextPageToken")]
    pub(crate) next_page_token: Option<String>,
}

impl DecisionsResponse {
    /// Parses a response body, failing on shape mismatches.
    pub(crate) fn parse(body: Value, request_id: &RequestId) -> Result<Self, AccessError> {
        serde_json::from_value(body).map_err(|err| {
            AccessError::unexpected(format!("malformed decision response: {err}"), request_id)
        })
    }

    /// Returns the decisions, treating a missing array as empty.
    pub(crate) fn into_decisions(self) -> Vec<WireDecision> {
        self.decisions.unwrap_or_default()
    }
}

/// One decision entry as returned by the service.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireDecision {
    /// Decision string (`Allow` or `Deny`).
    #[serde(default)]
    pub(crate) decision: Option<String>,
    /// Service-supplied reason.
    #[serde(default)]
    pub(crate) reason: Option<String>,
    /// Asset identifier the decision applies to.
    #[serde(default, rename = "assetId")]
    pub(crate) asset_id: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub(crate) attributes: BTreeMap<String, Value>,
}

/// Returns the current wall-clock time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
