// crates/sgnl-access-client/src/lib.rs
// ============================================================================
// Module: SGNL Access Client Library
// Description: Resilient access-decision client for the SGNL policy service.
// Purpose: Turn (principal, asset, action) into a fail-closed decision.
// Dependencies: sgnl-access-config, sgnl-access-core, reqwest, serde, thiserror
// ============================================================================

//! ## Overview
//! `sgnl-access-client` is the decision-request pipeline that sits on the
//! critical path of a command-authorization host. A [`DecisionClient`] builds
//! request payloads, drives a bounded retry loop around single
//! [`Transport`] attempts, classifies failures into the closed
//! [`AccessError`] taxonomy, and folds every outcome into an
//! [`AccessDecision`].
//!
//! Security posture: no operation on [`DecisionClient`] returns an error or
//! panics on a transport or classification failure; every failure becomes
//! an error result that the host maps to a fail-closed verdict.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod decision;
pub mod error;
pub mod logger;
pub mod retry;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::DEFAULT_ACTION;
pub use client::DEFAULT_PAGE_SIZE;
pub use client::DecisionClient;
pub use client::MAX_ID_LENGTH;
pub use client::is_valid_identifier;
pub use client::validate_identifier;
pub use decision::AccessDecision;
pub use decision::SearchResult;
pub use error::AccessError;
pub use error::TransportFailure;
pub use error::classify_status;
pub use error::classify_transport;
pub use logger::DecisionLogger;
pub use retry::RetryPause;
pub use retry::RetryPolicy;
pub use retry::ThreadPause;
pub use sgnl_access_core::AccessResult;
pub use sgnl_access_core::HostVerdict;
pub use sgnl_access_core::RequestId;
pub use transport::AttemptRequest;
pub use transport::Endpoint;
pub use transport::HttpsTransport;
pub use transport::MAX_RESPONSE_BYTES;
pub use transport::Transport;
