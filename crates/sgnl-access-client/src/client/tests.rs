// crates/sgnl-access-client/src/client/tests.rs
// ============================================================================
// Module: Decision Client Tests
// Description: Unit tests for the client pipeline using a scripted transport.
// Purpose: Validate fail-fast checks, payloads, retries, and result folding.
// Dependencies: sgnl-access-client, serde_json
// ============================================================================

//! ## Overview
//! A scripted [`Transport`] records payloads and replays canned outcomes so
//! attempt and pause counts can be asserted without a network.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use sgnl_access_config::AccessConfig;
use sgnl_access_core::AccessResult;
use sgnl_access_core::LogLevel;
use sgnl_access_core::MemoryLogSink;

use super::DecisionClient;
use crate::error::AccessError;
use crate::error::TransportFailure;
use crate::error::classify_status;
use crate::error::classify_transport;
use crate::retry::RetryPause;
use crate::transport::AttemptRequest;
use crate::transport::Endpoint;
use crate::transport::Transport;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Canned transport outcome.
#[derive(Clone)]
enum Outcome {
    Body(Value),
    Status(u16),
    Timeout,
}

/// Transport replaying outcomes; the last outcome repeats.
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    calls: AtomicUsize,
    sent: Mutex<Vec<(Endpoint, Value)>>,
}

impl ScriptedTransport {
    fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_payload(&self) -> Value {
        self.sent.lock().unwrap().last().unwrap().1.clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &AttemptRequest<'_>) -> Result<Value, AccessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((request.endpoint, request.payload.clone()));
        let mut outcomes = self.outcomes.lock().unwrap();
        let outcome =
            if outcomes.len() > 1 { outcomes.pop_front().unwrap() } else { outcomes[0].clone() };
        match outcome {
            Outcome::Body(body) => Ok(body),
            Outcome::Status(status) => Err(classify_status(status, None, request.request_id)),
            Outcome::Timeout => Err(classify_transport(
                TransportFailure::TimedOut,
                request.request_id,
                request.config.timeout,
            )),
        }
    }
}

/// Pause that counts calls.
#[derive(Default)]
struct CountingPause(AtomicUsize);

impl RetryPause for CountingPause {
    fn pause(&self, _delay: Duration) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn valid_config() -> AccessConfig {
    AccessConfig {
        api_url: "x.example.com".to_string(),
        api_token: "t".to_string(),
        tenant: Some("acme".to_string()),
        ..AccessConfig::default()
    }
}

fn client_with(
    config: AccessConfig,
    outcomes: Vec<Outcome>,
) -> (DecisionClient<ScriptedTransport>, Arc<CountingPause>, Arc<MemoryLogSink>) {
    let pause = Arc::new(CountingPause::default());
    let sink = Arc::new(MemoryLogSink::new());
    let client = DecisionClient::with_transport(config, ScriptedTransport::new(outcomes))
        .with_pause(Arc::clone(&pause) as _)
        .with_sink(Arc::clone(&sink) as _);
    (client, pause, sink)
}

fn decision_body(decision: &str, reason: &str) -> Outcome {
    Outcome::Body(json!({"decisions": [{"decision": decision, "reason": reason}]}))
}

// ============================================================================
// SECTION: Configuration and Input Checks
// ============================================================================

#[test]
fn missing_url_fails_with_config_error_and_no_transport_call() {
    let config = AccessConfig {
        api_url: String::new(),
        ..valid_config()
    };
    let (client, _, _) = client_with(config, vec![decision_body("Allow", "")]);
    let decision = client.evaluate_access("alice", "/bin/ls", "execute");
    assert_eq!(decision.result, AccessResult::ConfigError);
    assert_eq!(client.transport().calls(), 0);
    assert_eq!(client.validate(), AccessResult::ConfigError);
}

#[test]
fn missing_token_fails_with_config_error() {
    let config = AccessConfig {
        api_token: String::new(),
        ..valid_config()
    };
    let (client, _, _) = client_with(config, vec![decision_body("Allow", "")]);
    assert_eq!(client.check_access("alice", "/bin/ls", ""), AccessResult::ConfigError);
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn invalid_identifiers_fail_without_transport_call() {
    let long = "a".repeat(256);
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    let cases = [
        ("", "/bin/ls"),
        ("   ", "/bin/ls"),
        ("alice", ""),
        ("alice", "\t"),
        (long.as_str(), "x"),
        ("alice", long.as_str()),
    ];
    for (principal, asset) in cases {
        let decision = client.evaluate_access(principal, asset, "execute");
        assert_eq!(decision.result, AccessResult::InvalidRequest, "[{principal}] [{asset}]");
    }
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn invalid_identifiers_are_reported_before_missing_config() {
    let config = AccessConfig {
        api_url: String::new(),
        ..valid_config()
    };
    let long = "a".repeat(256);
    let (client, _, _) = client_with(config, vec![decision_body("Allow", "")]);
    let decision = client.evaluate_access("", "/bin/ls", "execute");
    assert_eq!(decision.result, AccessResult::InvalidRequest);
    assert_eq!(client.check_access("alice", &long, "execute"), AccessResult::InvalidRequest);
    let decisions = client.evaluate_access_batch("alice", &[("/bin/ls", ""), (long.as_str(), "")]);
    assert!(decisions.iter().all(|decision| decision.result == AccessResult::InvalidRequest));
    let search = client.search_assets_detailed(" ", "execute", None, 10);
    assert_eq!(search.result, AccessResult::InvalidRequest);
    assert_eq!(client.check_access("alice", "/bin/ls", "execute"), AccessResult::ConfigError);
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn identifiers_at_limit_are_accepted() {
    let limit = "a".repeat(255);
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    assert!(client.evaluate_access(&limit, &limit, "execute").is_allowed());
}

#[test]
fn validate_reports_ok_for_complete_config() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    assert_eq!(client.validate(), AccessResult::Ok);
    assert_eq!(client.transport().calls(), 0);
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

#[test]
fn evaluate_payload_includes_asset_attribute() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "ok")]);
    let decision = client.evaluate_access("alice", "/usr/bin/passwd", "");
    assert!(decision.is_allowed());
    assert_eq!(decision.action, "execute");
    assert_eq!(
        client.transport().last_payload(),
        json!({
            "principal": {"id": "alice"},
            "queries": [{
                "action": "execute",
                "assetId": "/usr/bin/passwd",
                "asset": {"type": "/usr/bin/passwd"}
            }]
        })
    );
}

#[test]
fn id_attribute_omits_asset_object() {
    let config = AccessConfig {
        asset_attribute: "id".to_string(),
        ..valid_config()
    };
    let (client, _, _) = client_with(config, vec![decision_body("Deny", "")]);
    let _ = client.evaluate_access("alice", "/bin/ls", "run");
    let payload = client.transport().last_payload();
    assert_eq!(payload["queries"][0], json!({"action": "run", "assetId": "/bin/ls"}));
}

#[test]
fn deny_carries_reason() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Deny", "not permitted")]);
    let decision = client.evaluate_access("alice", "/usr/bin/passwd", "execute");
    assert!(decision.is_denied());
    assert_eq!(decision.reason, "not permitted");
}

#[test]
fn empty_or_missing_decisions_are_errors() {
    for body in [json!({"decisions": []}), json!({})] {
        let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(body)]);
        let decision = client.evaluate_access("alice", "/bin/ls", "execute");
        assert_eq!(decision.result, AccessResult::Error);
        assert_eq!(decision.error_message.as_deref(), Some("no decisions in response"));
    }
}

#[test]
fn unknown_decision_names_literal() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Maybe", "")]);
    let decision = client.evaluate_access("alice", "/bin/ls", "execute");
    assert!(decision.is_error());
    assert!(decision.error_message.unwrap().contains("Maybe"));
}

// ============================================================================
// SECTION: Retry Behavior
// ============================================================================

#[test]
fn retryable_failure_uses_every_attempt() {
    let config = AccessConfig {
        retry_count: 3,
        ..valid_config()
    };
    let (client, pause, _) = client_with(config, vec![Outcome::Status(503)]);
    let decision = client.evaluate_access("alice", "/bin/ls", "execute");
    assert_eq!(decision.result, AccessResult::NetworkError);
    assert_eq!(client.transport().calls(), 4);
    assert_eq!(pause.0.load(Ordering::SeqCst), 3);
}

#[test]
fn timeouts_are_retried_then_reported() {
    let (client, pause, _) = client_with(valid_config(), vec![Outcome::Timeout]);
    assert_eq!(client.check_access("alice", "/bin/ls", "execute"), AccessResult::TimeoutError);
    assert_eq!(client.transport().calls(), 3);
    assert_eq!(pause.0.load(Ordering::SeqCst), 2);
}

#[test]
fn auth_error_aborts_after_one_attempt() {
    let (client, pause, _) = client_with(valid_config(), vec![Outcome::Status(401)]);
    let decision = client.evaluate_access("alice", "/bin/ls", "execute");
    assert_eq!(decision.result, AccessResult::AuthError);
    assert_eq!(client.transport().calls(), 1);
    assert_eq!(pause.0.load(Ordering::SeqCst), 0);
}

#[test]
fn transient_failure_then_success_is_allowed() {
    let (client, _, _) =
        client_with(valid_config(), vec![Outcome::Status(502), decision_body("Allow", "")]);
    assert!(client.evaluate_access("alice", "/bin/ls", "execute").is_allowed());
    assert_eq!(client.transport().calls(), 2);
}

#[test]
fn each_call_gets_a_fresh_request_id() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    let first = client.evaluate_access("alice", "/bin/ls", "execute");
    let second = client.evaluate_access("alice", "/bin/ls", "execute");
    assert_ne!(first.request_id, second.request_id);
}

// ============================================================================
// SECTION: Batch Evaluation
// ============================================================================

#[test]
fn batch_maps_decisions_by_position() {
    let body = json!({"decisions": [
        {"decision": "Allow"},
        {"decision": "Deny", "reason": "no"}
    ]});
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(body)]);
    let decisions = client.evaluate_access_batch(
        "alice",
        &[("/bin/ls", ""), ("/bin/rm", "delete"), ("/bin/cat", "read")],
    );
    assert_eq!(decisions.len(), 3);
    assert!(decisions[0].is_allowed());
    assert_eq!(decisions[0].action, "execute");
    assert!(decisions[1].is_denied());
    assert_eq!(decisions[1].asset_id, "/bin/rm");
    assert_eq!(decisions[2].result, AccessResult::Error);
    assert_eq!(decisions[2].error_message.as_deref(), Some("no decision for query"));
    let payload = client.transport().last_payload();
    assert_eq!(payload["queries"].as_array().unwrap().len(), 3);
    assert_eq!(client.transport().calls(), 1);
}

#[test]
fn batch_invalid_input_fails_every_entry() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    let decisions =
        client.evaluate_access_batch("alice", &[("/bin/ls", "execute"), ("", "execute")]);
    assert!(decisions.iter().all(|decision| decision.result == AccessResult::InvalidRequest));
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn batch_transport_failure_fails_every_entry() {
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Status(403)]);
    let decisions = client.evaluate_access_batch("alice", &[("/bin/ls", "x"), ("/bin/id", "y")]);
    assert_eq!(decisions.len(), 2);
    assert!(decisions.iter().all(|decision| decision.result == AccessResult::AuthError));
    assert_eq!(decisions[0].request_id, decisions[1].request_id);
}

#[test]
fn empty_batch_makes_no_request() {
    let (client, _, _) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    assert!(client.evaluate_access_batch("alice", &[]).is_empty());
    assert_eq!(client.transport().calls(), 0);
}

// ============================================================================
// SECTION: Search
// ============================================================================

#[test]
fn asset_search_returns_allowed_assets_in_order() {
    let body = json!({"decisions": [
        {"decision": "Allow", "assetId": "/bin/b"},
        {"decision": "Deny", "assetId": "/bin/x"},
        {"decision": "allow", "assetId": "/bin/y"},
        {"decision": "Allow", "assetId": "/bin/a"}
    ]});
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(body)]);
    assert_eq!(client.asset_search("alice", "execute"), vec!["/bin/b", "/bin/a"]);
    assert_eq!(
        client.transport().last_payload(),
        json!({"principal": {"id": "alice"}, "queries": [{"action": "execute"}]})
    );
    assert_eq!(client.transport().sent.lock().unwrap()[0].0, Endpoint::Search);
}

#[test]
fn asset_search_is_empty_on_failure() {
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Status(500)]);
    assert!(client.asset_search("alice", "execute").is_empty());
    let (client, _, _) = client_with(AccessConfig::default(), vec![Outcome::Status(500)]);
    assert!(client.asset_search("alice", "execute").is_empty());
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn asset_search_is_empty_for_malformed_or_empty_bodies() {
    for body in [json!({"decisions": "x"}), json!({}), json!({"decisions": []})] {
        let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(body.clone())]);
        assert!(client.asset_search("alice", "execute").is_empty(), "{body}");
    }
}

#[test]
fn detailed_search_reports_malformed_body_as_error() {
    let (client, _, _) =
        client_with(valid_config(), vec![Outcome::Body(json!({"decisions": "x"}))]);
    let result = client.search_assets_detailed("alice", "execute", None, 10);
    assert_eq!(result.result, AccessResult::Error);
    assert!(result.asset_ids.is_empty());
    assert!(result.error_message.unwrap().contains("malformed decision response"));

    let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(json!({}))]);
    let result = client.search_assets_detailed("alice", "execute", None, 10);
    assert_eq!(result.result, AccessResult::Ok);
    assert!(result.asset_ids.is_empty());
    assert!(!result.has_more_pages);
}

#[test]
fn detailed_search_sends_paging_and_reports_next_page() {
    let body = json!({
        "decisions": [{"decision": "Allow", "assetId": "/bin/a"}],
        "nextPageToken": "page-2"
    });
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Body(body)]);
    let result = client.search_assets_detailed("alice", "", Some("page-1"), 0);
    assert_eq!(result.result, AccessResult::Ok);
    assert_eq!(result.action, "execute");
    assert_eq!(result.asset_ids, vec!["/bin/a"]);
    assert_eq!(result.next_page_token.as_deref(), Some("page-2"));
    assert!(result.has_more_pages);
    assert_eq!(
        client.transport().last_payload()["queries"][0],
        json!({"action": "execute", "pageToken": "page-1", "pageSize": 50})
    );
}

#[test]
fn detailed_search_failure_keeps_classification() {
    let (client, _, _) = client_with(valid_config(), vec![Outcome::Status(401)]);
    let result = client.search_assets_detailed("alice", "execute", None, 10);
    assert_eq!(result.result, AccessResult::AuthError);
    assert!(result.asset_ids.is_empty());
    assert!(!result.has_more_pages);
}

// ============================================================================
// SECTION: Logging
// ============================================================================

#[test]
fn access_records_require_opt_in() {
    let (client, _, sink) = client_with(valid_config(), vec![decision_body("Allow", "")]);
    let _ = client.evaluate_access("alice", "/bin/ls", "execute");
    assert!(sink.events().is_empty());

    let config = AccessConfig {
        enable_access_logging: true,
        ..valid_config()
    };
    let (client, _, sink) = client_with(config, vec![decision_body("Allow", "")]);
    let decision = client.evaluate_access("alice", "/bin/ls", "execute");
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[0].request_id.as_deref(), Some(decision.request_id.as_str()));
}

#[test]
fn failures_are_always_logged_without_token() {
    let config = AccessConfig {
        api_token: "secret-token-value".to_string(),
        retry_count: 0,
        ..valid_config()
    };
    let (client, _, sink) = client_with(config, vec![Outcome::Status(500)]);
    let _ = client.evaluate_access("alice", "/bin/ls", "execute");
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, LogLevel::Error);
    assert!(events.iter().all(|event| !event.message.contains("secret-token-value")));
}
