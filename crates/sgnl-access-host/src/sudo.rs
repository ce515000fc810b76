// crates/sgnl-access-host/src/sudo.rs
// ============================================================================
// Module: Sudo Policy Adapter
// Description: PolicyPlugin implementation for sudo-style command checks.
// Purpose: Map commands and arguments onto decision queries and verdicts.
// Dependencies: sgnl-access-client, sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! A command with no arguments is one evaluation of the program with the
//! `sudo` action. A command with arguments is a single batch request: the
//! program with the `sudo` action, plus one query per non-empty argument
//! whose action is the program itself. Every query must be allowed; the
//! first non-allowed result decides the outcome.
//!
//! Security posture: the adapter refuses to construct over an invalid
//! configuration, and an empty decision set is an error, never an allow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use sgnl_access_client::AccessDecision;
use sgnl_access_client::DEFAULT_ACTION;
use sgnl_access_client::DecisionClient;
use sgnl_access_client::HttpsTransport;
use sgnl_access_client::Transport;
use sgnl_access_client::is_valid_identifier;
use sgnl_access_config::ConfigResolver;
use sgnl_access_core::AccessResult;
use sgnl_access_core::LogSink;

use crate::context::HostContext;
use crate::plugin::PluginError;
use crate::plugin::PolicyCheck;
use crate::plugin::PolicyPlugin;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Action evaluated for the program being elevated.
pub const SUDO_ACTION: &str = "sudo";

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Sudo policy plugin backed by a decision client.
///
/// # Invariants
/// - The wrapped client has a valid configuration.
pub struct SudoPolicyAdapter<T: Transport = HttpsTransport> {
    /// Decision client used for every query.
    client: DecisionClient<T>,
}

impl SudoPolicyAdapter<HttpsTransport> {
    /// Loads configuration and builds an adapter over the HTTPS transport.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the configuration cannot be
    /// loaded or is incomplete. The resolver has already logged the cause.
    pub fn load(
        resolver: &mut ConfigResolver,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, PluginError> {
        if !resolver.load() {
            return Err(PluginError::Config(format!(
                "failed to load {}",
                resolver.path().display()
            )));
        }
        Self::new(DecisionClient::new(resolver.config().clone()).with_sink(sink))
    }
}

impl<T: Transport> SudoPolicyAdapter<T> {
    /// Wraps a decision client.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the client configuration is invalid.
    pub fn new(client: DecisionClient<T>) -> Result<Self, PluginError> {
        client
            .config()
            .validate()
            .map_err(|err| PluginError::Config(err.to_string()))?;
        Ok(Self {
            client,
        })
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn client(&self) -> &DecisionClient<T> {
        &self.client
    }

    /// Answers a list request for the context's principal.
    ///
    /// With a command, reports whether that command may be executed.
    /// Without one, lists every allowed command.
    #[must_use]
    pub fn list(&self, command: Option<&str>, context: &HostContext) -> Vec<String> {
        let principal = context.principal();
        match command {
            Some(command) => {
                let result = self.client.check_access(principal, command, DEFAULT_ACTION);
                if result == AccessResult::Allowed {
                    vec![format!("You are allowed to execute '{command}'")]
                } else {
                    vec![format!("You are NOT allowed to execute '{command}'")]
                }
            }
            None => {
                let allowed = self.list_allowed(principal);
                if allowed.is_empty() {
                    return vec!["No commands are currently allowed.".to_string()];
                }
                let mut lines = Vec::with_capacity(allowed.len() + 1);
                lines.push("Allowed commands:".to_string());
                lines.extend(allowed.into_iter().map(|command| format!("  - {command}")));
                lines
            }
        }
    }

    /// Returns the version banner, plus connection details when `verbose`.
    #[must_use]
    pub fn version_lines(&self, verbose: bool) -> Vec<String> {
        let mut lines = vec![self.report_version()];
        if verbose {
            let config = self.client.config();
            lines.push(format!("  decision service: {}", config.service_url()));
            lines.push(format!("  request timeout: {}s", config.timeout.as_secs()));
            lines.push(format!("  retry count: {}", config.retry_count));
            let tls = if config.validate_ssl { "enabled" } else { "disabled" };
            lines.push(format!("  TLS verification: {tls}"));
        }
        lines
    }
}

impl<T: Transport> PolicyPlugin for SudoPolicyAdapter<T> {
    fn check_policy(&self, command: &[String], context: &HostContext) -> PolicyCheck {
        let principal = context.principal();
        let Some((program, args)) = command.split_first() else {
            return PolicyCheck::new(
                principal,
                AccessResult::InvalidRequest,
                "no command specified",
                Vec::new(),
            );
        };
        if !is_valid_identifier(principal) {
            return PolicyCheck::new(
                principal,
                AccessResult::InvalidRequest,
                "invalid principal in host user info",
                Vec::new(),
            );
        }
        let args: Vec<&str> =
            args.iter().map(String::as_str).filter(|arg| !arg.is_empty()).collect();
        let decisions = if args.is_empty() {
            vec![self.client.evaluate_access(principal, program, SUDO_ACTION)]
        } else {
            let mut queries = Vec::with_capacity(args.len() + 1);
            queries.push((program.as_str(), SUDO_ACTION));
            queries.extend(args.iter().map(|arg| (*arg, program.as_str())));
            self.client.evaluate_access_batch(principal, &queries)
        };
        let result = combined_result(&decisions);
        let message = if result == AccessResult::Allowed {
            format!("access granted for {principal} to run {program}")
        } else {
            format!(
                "access denied for {principal} to run '{}': {}",
                command.join(" "),
                result.description()
            )
        };
        PolicyCheck::new(principal, result, message, decisions)
    }

    fn list_allowed(&self, principal: &str) -> Vec<String> {
        self.client.asset_search(principal, DEFAULT_ACTION)
    }

    fn validate_config(&self) -> bool {
        self.client.validate() == AccessResult::Ok
    }

    fn report_version(&self) -> String {
        version_banner()
    }
}

/// Returns the plugin version banner.
#[must_use]
pub fn version_banner() -> String {
    format!("SGNL sudo policy plugin version {}", sgnl_access_core::VERSION)
}

/// Folds per-query decisions into one result.
///
/// Returns `ALLOWED` only when every decision is allowed; an empty set is
/// an error.
#[must_use]
pub fn combined_result(decisions: &[AccessDecision]) -> AccessResult {
    if decisions.is_empty() {
        return AccessResult::Error;
    }
    decisions
        .iter()
        .map(|decision| decision.result)
        .find(|result| *result != AccessResult::Allowed)
        .unwrap_or(AccessResult::Allowed)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
