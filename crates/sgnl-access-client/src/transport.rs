// crates/sgnl-access-client/src/transport.rs
// ============================================================================
// Module: Transport Attempt
// Description: Single HTTPS request/response cycle against the decision API.
// Purpose: Enforce TLS policy, timeouts, headers, and response size limits.
// Dependencies: reqwest, serde_json, sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! A [`Transport`] performs exactly one request. [`HttpsTransport`] builds a
//! fresh blocking client for every attempt with idle pooling disabled, so no
//! connection outlives the attempt that opened it. Non-200 responses and
//! transport failures are handed to the classifier; only a 200 response with
//! a JSON body is a success.
//!
//! Security posture: responses are untrusted and read under a hard byte
//! limit. Disabling certificate verification or using cleartext HTTP is
//! logged as a warning on every attempt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::io::Read;

use reqwest::Certificate;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use sgnl_access_config::AccessConfig;
use sgnl_access_core::RequestId;
use sgnl_access_core::correlation::REQUEST_ID_HEADER;

use crate::error::AccessError;
use crate::error::TransportFailure;
use crate::error::classify_status;
use crate::error::classify_transport;
use crate::logger::DecisionLogger;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the service.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Media type for request and response bodies.
const JSON_MEDIA_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Request Model
// ============================================================================

/// Decision service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Access evaluation for explicit assets.
    Evaluations,
    /// Search for assets the principal may act on.
    Search,
}

impl Endpoint {
    /// Returns the endpoint path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Evaluations => "/access/v2/evaluations",
            Self::Search => "/access/v2/search",
        }
    }

    /// Returns the full request URL for this endpoint.
    #[must_use]
    pub fn url(self, config: &AccessConfig) -> String {
        format!("{}{}", config.service_url(), self.path())
    }
}

/// Inputs for one transport attempt.
pub struct AttemptRequest<'a> {
    /// Target endpoint.
    pub endpoint: Endpoint,
    /// JSON request body.
    pub payload: &'a Value,
    /// Correlation id sent as `X-Request-Id`.
    pub request_id: &'a RequestId,
    /// Connection settings.
    pub config: &'a AccessConfig,
    /// Logger for attempt diagnostics.
    pub logger: &'a DecisionLogger,
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Performs one request/response cycle.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the parsed JSON body of a 200 response.
    ///
    /// # Errors
    ///
    /// Returns a classified [`AccessError`] for every other outcome.
    fn send(&self, request: &AttemptRequest<'_>) -> Result<Value, AccessError>;
}

// ============================================================================
// SECTION: HTTPS Transport
// ============================================================================

/// Blocking HTTPS transport backed by `reqwest`.
///
/// # Invariants
/// - Each attempt uses its own client; no idle connections are kept.
/// - Redirects are not followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpsTransport;

impl Transport for HttpsTransport {
    fn send(&self, request: &AttemptRequest<'_>) -> Result<Value, AccessError> {
        let AttemptRequest {
            endpoint,
            payload,
            request_id,
            config,
            logger,
        } = *request;
        let client = build_client(config, request_id, logger)?;
        let url = endpoint.url(config);
        if config.is_cleartext() {
            logger.warn(
                "cleartext_transport",
                request_id,
                format!("sending request over cleartext HTTP to {url}"),
            );
        }
        logger.debug("request_sent", request_id, format!("POST {url}"));
        let body = serde_json::to_vec(payload).map_err(|err| {
            AccessError::unexpected(format!("request serialization failed: {err}"), request_id)
        })?;
        let mut response = client
            .post(&url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .bearer_auth(&config.api_token)
            .body(body)
            .send()
            .map_err(|err| classify_transport(send_failure(&err), request_id, config.timeout))?;
        let status = response.status().as_u16();
        let bytes = read_response_limited(&mut response, MAX_RESPONSE_BYTES)
            .map_err(|failure| classify_transport(failure, request_id, config.timeout))?;
        logger.debug(
            "response_received",
            request_id,
            format!("HTTP {status}, {} bytes", bytes.len()),
        );
        let text = String::from_utf8_lossy(&bytes).into_owned();
        if status != 200 {
            return Err(classify_status(status, Some(text), request_id));
        }
        serde_json::from_slice(&bytes).map_err(|err| AccessError::Network {
            message: format!("invalid JSON response: {err}"),
            status: Some(status),
            body: Some(text),
            request_id: request_id.clone(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a single-use HTTP client honoring the TLS and timeout settings.
fn build_client(
    config: &AccessConfig,
    request_id: &RequestId,
    logger: &DecisionLogger,
) -> Result<Client, AccessError> {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .pool_max_idle_per_host(0);
    if config.validate_ssl {
        if let Some(path) = &config.ca_bundle_path {
            let pem = fs::read(path).map_err(|err| {
                AccessError::config(
                    format!("failed to read CA bundle {}: {err}", path.display()),
                    request_id,
                )
            })?;
            let certificates = Certificate::from_pem_bundle(&pem).map_err(|err| {
                AccessError::config(
                    format!("invalid CA bundle {}: {err}", path.display()),
                    request_id,
                )
            })?;
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }
    } else {
        logger.warn(
            "tls_verification_disabled",
            request_id,
            "TLS certificate verification is disabled for this request",
        );
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder.build().map_err(|err| {
        AccessError::unexpected(format!("http client build failed: {err}"), request_id)
    })
}

/// Maps a send failure onto the transport failure kinds.
fn send_failure(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::TimedOut
    } else if err.is_connect() {
        TransportFailure::Connect(err.to_string())
    } else {
        TransportFailure::Other(err.to_string())
    }
}

/// Maps a body read failure onto the transport failure kinds.
fn read_failure(err: &io::Error) -> TransportFailure {
    let inner_timeout = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
        .is_some_and(reqwest::Error::is_timeout);
    if inner_timeout || err.kind() == io::ErrorKind::TimedOut {
        TransportFailure::TimedOut
    } else {
        TransportFailure::Other(format!("failed to read response: {err}"))
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportFailure> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| TransportFailure::Other("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(TransportFailure::Other("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle.read_to_end(&mut buf).map_err(|err| read_failure(&err))?;
    if buf.len() > max_bytes {
        return Err(TransportFailure::Other("response exceeds size limit".to_string()));
    }
    Ok(buf)
}
