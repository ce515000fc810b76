// crates/sgnl-access-client/src/client.rs
// ============================================================================
// Module: Decision Client
// Description: Evaluate, batch-evaluate, and search operations.
// Purpose: Drive the retry orchestrator and fold every outcome into a result.
// Dependencies: serde_json, sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! [`DecisionClient`] owns an immutable [`AccessConfig`], a [`Transport`],
//! and a [`RetryPause`]. Each public operation issues a fresh
//! [`RequestId`], checks configuration and inputs before any network
//! activity, and runs the request through [`RetryPolicy::run`].
//!
//! Security posture: operations never return `Err` and never panic. Every
//! failure is folded into an error result, which the host maps to a
//! fail-closed verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use sgnl_access_config::AccessConfig;
use sgnl_access_core::AccessResult;
use sgnl_access_core::LogSink;
use sgnl_access_core::RequestId;

use crate::decision::ALLOW;
use crate::decision::AccessDecision;
use crate::decision::DecisionsResponse;
use crate::decision::SearchResult;
use crate::error::AccessError;
use crate::logger::DecisionLogger;
use crate::retry::RetryPause;
use crate::retry::RetryPolicy;
use crate::retry::ThreadPause;
use crate::transport::AttemptRequest;
use crate::transport::Endpoint;
use crate::transport::HttpsTransport;
use crate::transport::Transport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Action used when an evaluation or search passes an empty action.
pub const DEFAULT_ACTION: &str = "execute";
/// Page size used when a detailed search passes zero.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Maximum principal or asset identifier length, in characters.
pub const MAX_ID_LENGTH: usize = 255;
/// Asset attribute value that suppresses the `asset` object in queries.
const ID_ATTRIBUTE: &str = "id";

// ============================================================================
// SECTION: Identifier Validation
// ============================================================================

/// Returns true when `value` is a usable principal or asset identifier.
#[must_use]
pub fn is_valid_identifier(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().count() <= MAX_ID_LENGTH
}

/// Checks a principal or asset identifier.
///
/// # Errors
///
/// Returns [`AccessError::InvalidRequest`] when the identifier is empty,
/// whitespace-only, or longer than [`MAX_ID_LENGTH`] characters.
pub fn validate_identifier(
    kind: &str,
    value: &str,
    request_id: &RequestId,
) -> Result<(), AccessError> {
    if value.trim().is_empty() {
        return Err(AccessError::invalid_request(
            format!("{kind} id must not be empty"),
            request_id,
        ));
    }
    if value.chars().count() > MAX_ID_LENGTH {
        return Err(AccessError::invalid_request(
            format!("{kind} id exceeds {MAX_ID_LENGTH} characters"),
            request_id,
        ));
    }
    Ok(())
}

/// Returns `action`, or [`DEFAULT_ACTION`] when it is blank.
fn effective_action(action: &str) -> &str {
    if action.trim().is_empty() { DEFAULT_ACTION } else { action }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Access decision client.
///
/// # Invariants
/// - The configuration is never mutated after construction.
/// - An invalid configuration fails every request before any transport call.
pub struct DecisionClient<T: Transport = HttpsTransport> {
    /// Connection and resilience settings.
    config: AccessConfig,
    /// Single-attempt transport.
    transport: T,
    /// Pause between retry attempts.
    pause: Arc<dyn RetryPause>,
    /// Config-gated logger.
    logger: DecisionLogger,
}

impl DecisionClient<HttpsTransport> {
    /// Creates a client using the HTTPS transport and stderr logging.
    #[must_use]
    pub fn new(config: AccessConfig) -> Self {
        Self::with_transport(config, HttpsTransport)
    }
}

impl<T: Transport> DecisionClient<T> {
    /// Creates a client using a custom transport.
    #[must_use]
    pub fn with_transport(config: AccessConfig, transport: T) -> Self {
        let logger = DecisionLogger::stderr(&config);
        Self {
            config,
            transport,
            pause: Arc::new(ThreadPause),
            logger,
        }
    }

    /// Routes log events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.logger = DecisionLogger::new(&self.config, sink);
        self
    }

    /// Replaces the retry pause.
    #[must_use]
    pub fn with_pause(mut self, pause: Arc<dyn RetryPause>) -> Self {
        self.pause = pause;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Reports whether the configuration can serve requests. No network call.
    #[must_use]
    pub fn validate(&self) -> AccessResult {
        if self.config.is_valid() { AccessResult::Ok } else { AccessResult::ConfigError }
    }

    /// Evaluates whether `principal_id` may perform `action` on `asset_id`.
    ///
    /// An empty `action` evaluates [`DEFAULT_ACTION`].
    #[must_use]
    pub fn evaluate_access(
        &self,
        principal_id: &str,
        asset_id: &str,
        action: &str,
    ) -> AccessDecision {
        let request_id = RequestId::generate();
        let action = effective_action(action);
        self.logger.debug(
            "evaluate_access",
            &request_id,
            format!("principal={principal_id} asset={asset_id} action={action}"),
        );
        let decision = self
            .try_evaluate(principal_id, asset_id, action, &request_id)
            .unwrap_or_else(|err| AccessDecision::from_error(principal_id, asset_id, action, &err));
        self.record_decision(&decision);
        decision
    }

    /// Returns the coarse result of [`DecisionClient::evaluate_access`].
    #[must_use]
    pub fn check_access(&self, principal_id: &str, asset_id: &str, action: &str) -> AccessResult {
        self.evaluate_access(principal_id, asset_id, action).result
    }

    /// Evaluates several `(asset, action)` queries in one request.
    ///
    /// Decisions map to queries by position. A query with no matching
    /// decision gets an error entry; a request-level failure gives every
    /// entry the same error.
    #[must_use]
    pub fn evaluate_access_batch(
        &self,
        principal_id: &str,
        queries: &[(&str, &str)],
    ) -> Vec<AccessDecision> {
        let request_id = RequestId::generate();
        let queries: Vec<(&str, &str)> = queries
            .iter()
            .map(|(asset_id, action)| (*asset_id, effective_action(action)))
            .collect();
        self.logger.debug(
            "evaluate_access_batch",
            &request_id,
            format!("principal={principal_id} queries={}", queries.len()),
        );
        let decisions = match self.try_evaluate_batch(principal_id, &queries, &request_id) {
            Ok(decisions) => decisions,
            Err(err) => queries
                .iter()
                .map(|(asset_id, action)| {
                    AccessDecision::from_error(principal_id, asset_id, action, &err)
                })
                .collect(),
        };
        for decision in &decisions {
            self.record_decision(decision);
        }
        decisions
    }

    /// Returns the assets `principal_id` may perform `action` on.
    ///
    /// Any failure yields an empty list.
    #[must_use]
    pub fn asset_search(&self, principal_id: &str, action: &str) -> Vec<String> {
        let result = self.search(principal_id, action, None);
        if result.result == AccessResult::Ok { result.asset_ids } else { Vec::new() }
    }

    /// Searches one page of permitted assets.
    ///
    /// A `page_size` of zero requests [`DEFAULT_PAGE_SIZE`] entries.
    #[must_use]
    pub fn search_assets_detailed(
        &self,
        principal_id: &str,
        action: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> SearchResult {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        self.search(principal_id, action, Some((page_token, page_size)))
    }

    // ------------------------------------------------------------------------
    // Request pipeline
    // ------------------------------------------------------------------------

    /// Fails fast when the configuration cannot serve requests.
    fn ensure_configured(&self, request_id: &RequestId) -> Result<(), AccessError> {
        self.config
            .validate()
            .map_err(|err| AccessError::config(err.to_string(), request_id))
    }

    /// Runs one request through the retry orchestrator.
    fn execute(
        &self,
        endpoint: Endpoint,
        payload: &Value,
        request_id: &RequestId,
    ) -> Result<Value, AccessError> {
        let request = AttemptRequest {
            endpoint,
            payload,
            request_id,
            config: &self.config,
            logger: &self.logger,
        };
        RetryPolicy::from_config(&self.config).run(
            self.pause.as_ref(),
            &self.logger,
            request_id,
            |_| self.transport.send(&request),
        )
    }

    /// Builds one evaluation query object.
    fn query(&self, asset_id: &str, action: &str) -> Value {
        let mut query = Map::new();
        query.insert("action".to_string(), Value::String(action.to_string()));
        query.insert("assetId".to_string(), Value::String(asset_id.to_string()));
        let attribute = self.config.asset_attribute.as_str();
        if !attribute.is_empty() && attribute != ID_ATTRIBUTE {
            let mut asset = Map::new();
            asset.insert(attribute.to_string(), Value::String(asset_id.to_string()));
            query.insert("asset".to_string(), Value::Object(asset));
        }
        Value::Object(query)
    }

    /// Evaluates a single query, propagating request-level failures.
    fn try_evaluate(
        &self,
        principal_id: &str,
        asset_id: &str,
        action: &str,
        request_id: &RequestId,
    ) -> Result<AccessDecision, AccessError> {
        validate_identifier("principal", principal_id, request_id)?;
        validate_identifier("asset", asset_id, request_id)?;
        self.ensure_configured(request_id)?;
        let payload = json!({
            "principal": { "id": principal_id },
            "queries": [self.query(asset_id, action)],
        });
        let body = self.execute(Endpoint::Evaluations, &payload, request_id)?;
        let response = DecisionsResponse::parse(body, request_id)?;
        let Some(wire) = response.into_decisions().into_iter().next() else {
            return Ok(AccessDecision::failed(
                principal_id,
                asset_id,
                action,
                request_id,
                AccessResult::Error,
                "no decisions in response",
            ));
        };
        Ok(AccessDecision::from_wire(principal_id, asset_id, action, request_id, wire))
    }

    /// Evaluates a batch, propagating request-level failures.
    fn try_evaluate_batch(
        &self,
        principal_id: &str,
        queries: &[(&str, &str)],
        request_id: &RequestId,
    ) -> Result<Vec<AccessDecision>, AccessError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        validate_identifier("principal", principal_id, request_id)?;
        for (asset_id, _) in queries {
            validate_identifier("asset", asset_id, request_id)?;
        }
        self.ensure_configured(request_id)?;
        let payload = json!({
            "principal": { "id": principal_id },
            "queries": queries
                .iter()
                .map(|(asset_id, action)| self.query(asset_id, action))
                .collect::<Vec<_>>(),
        });
        let body = self.execute(Endpoint::Evaluations, &payload, request_id)?;
        let mut wires = DecisionsResponse::parse(body, request_id)?.into_decisions().into_iter();
        Ok(queries
            .iter()
            .map(|(asset_id, action)| match wires.next() {
                Some(wire) => {
                    AccessDecision::from_wire(principal_id, asset_id, action, request_id, wire)
                }
                None => AccessDecision::failed(
                    principal_id,
                    asset_id,
                    action,
                    request_id,
                    AccessResult::Error,
                    "no decision for query",
                ),
            })
            .collect())
    }

    /// Runs a search, folding failures into the result.
    fn search(
        &self,
        principal_id: &str,
        action: &str,
        paging: Option<(Option<&str>, u32)>,
    ) -> SearchResult {
        let request_id = RequestId::generate();
        let action = effective_action(action);
        self.logger.debug(
            "asset_search",
            &request_id,
            format!("principal={principal_id} action={action}"),
        );
        match self.try_search(principal_id, action, paging, &request_id) {
            Ok(result) => {
                self.logger.access(
                    "asset_search_completed",
                    &request_id,
                    format!(
                        "principal={principal_id} action={action} assets={}",
                        result.asset_ids.len()
                    ),
                );
                result
            }
            Err(err) => {
                self.logger.error(
                    "asset_search_failed",
                    &request_id,
                    format!("principal={principal_id} action={action}: {err}"),
                );
                SearchResult::failed(principal_id, action, &err)
            }
        }
    }

    /// Runs a search, propagating request-level failures.
    fn try_search(
        &self,
        principal_id: &str,
        action: &str,
        paging: Option<(Option<&str>, u32)>,
        request_id: &RequestId,
    ) -> Result<SearchResult, AccessError> {
        validate_identifier("principal", principal_id, request_id)?;
        self.ensure_configured(request_id)?;
        let mut query = Map::new();
        query.insert("action".to_string(), Value::String(action.to_string()));
        if let Some((page_token, page_size)) = paging {
            if let Some(token) = page_token.filter(|token| !token.is_empty()) {
                query.insert("pageToken".to_string(), Value::String(token.to_string()));
            }
            query.insert("pageSize".to_string(), Value::from(page_size));
        }
        let payload = json!({
            "principal": { "id": principal_id },
            "queries": [Value::Object(query)],
        });
        let body = self.execute(Endpoint::Search, &payload, request_id)?;
        let response = DecisionsResponse::parse(body, request_id)?;
        let next_page_token = response.next_page_token.clone().filter(|token| !token.is_empty());
        let asset_ids = response
            .into_decisions()
            .into_iter()
            .filter(|wire| wire.decision.as_deref() == Some(ALLOW))
            .filter_map(|wire| wire.asset_id)
            .collect();
        Ok(SearchResult {
            principal_id: principal_id.to_string(),
            action: action.to_string(),
            asset_ids,
            has_more_pages: next_page_token.is_some(),
            next_page_token,
            request_id: request_id.clone(),
            result: AccessResult::Ok,
            error_message: None,
        })
    }

    /// Emits the access record or failure event for a finished decision.
    fn record_decision(&self, decision: &AccessDecision) {
        if let Some(message) = decision.error_message.as_deref().filter(|_| decision.is_error()) {
            self.logger.error(
                "access_decision_failed",
                &decision.request_id,
                format!(
                    "principal={} asset={} action={} result={}: {message}",
                    decision.principal_id, decision.asset_id, decision.action, decision.result
                ),
            );
        } else {
            self.logger.access(
                "access_decision",
                &decision.request_id,
                format!(
                    "principal={} asset={} action={} decision={} reason={}",
                    decision.principal_id,
                    decision.asset_id,
                    decision.action,
                    decision.decision,
                    decision.reason
                ),
            );
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
