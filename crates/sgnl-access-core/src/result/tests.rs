// crates/sgnl-access-core/src/result/tests.rs
// ============================================================================
// Module: Result Taxonomy Tests
// Description: Unit tests for result codes and host verdict mapping.
// Purpose: Pin numeric codes and the fail-closed verdict translation.
// Dependencies: sgnl-access-core
// ============================================================================

//! ## Overview
//! Validates that numeric codes stay stable and that only an explicit allow
//! produces an accept verdict.

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

use super::AccessResult;
use super::HostVerdict;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn numeric_codes_are_stable() {
    let codes: Vec<i32> = AccessResult::ALL.iter().map(|result| result.code()).collect();
    assert_eq!(codes, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(AccessResult::Denied.code(), 1);
    assert_eq!(AccessResult::Allowed.code(), 2);
}

#[test]
fn from_code_round_trips_every_variant() {
    for result in AccessResult::ALL {
        assert_eq!(AccessResult::from_code(result.code()), Some(result));
    }
    assert_eq!(AccessResult::from_code(10), None);
    assert_eq!(AccessResult::from_code(-1), None);
}

#[test]
fn only_allowed_maps_to_accept() {
    for result in AccessResult::ALL {
        let verdict = HostVerdict::from_result(result);
        match result {
            AccessResult::Allowed => assert_eq!(verdict, HostVerdict::Accept),
            AccessResult::Denied => assert_eq!(verdict, HostVerdict::Reject),
            _ => assert_eq!(verdict, HostVerdict::Error, "{result} must fail closed"),
        }
    }
}

#[test]
fn ok_is_not_an_accept() {
    assert_eq!(HostVerdict::from(AccessResult::Ok), HostVerdict::Error);
}

#[test]
fn host_return_codes_match_plugin_api() {
    assert_eq!(HostVerdict::Accept.rc(), 1);
    assert_eq!(HostVerdict::Reject.rc(), 0);
    assert_eq!(HostVerdict::Error.rc(), -1);
}

#[test]
fn error_classification_excludes_decisions() {
    assert!(!AccessResult::Ok.is_error());
    assert!(!AccessResult::Allowed.is_error());
    assert!(!AccessResult::Denied.is_error());
    assert!(AccessResult::MemoryError.is_error());
    assert!(AccessResult::TimeoutError.is_error());
}

#[test]
fn labels_and_descriptions() {
    assert_eq!(AccessResult::InvalidRequest.as_str(), "INVALID_REQUEST");
    assert_eq!(AccessResult::Allowed.description(), "Access Allowed");
    assert_eq!(AccessResult::AuthError.to_string(), "AUTH_ERROR");
    let json = serde_json::to_string(&AccessResult::ConfigError).unwrap();
    assert_eq!(json, "\"CONFIG_ERROR\"");
}
