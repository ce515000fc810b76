// crates/sgnl-access-host/src/plugin.rs
// ============================================================================
// Module: Policy Plugin Interface
// Description: Lifecycle operations a command-authorization host invokes.
// Purpose: Give hosts one explicit seam instead of global plugin state.
// Dependencies: serde, sgnl-access-client, sgnl-access-core, thiserror
// ============================================================================

//! ## Overview
//! [`PolicyPlugin`] is the full surface a host needs: check a command,
//! list what a principal may run, validate configuration, and report a
//! version. Implementations are constructed by a loader and hold all of
//! their state; nothing is process-global.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sgnl_access_client::AccessDecision;
use sgnl_access_core::AccessResult;
use sgnl_access_core::HostVerdict;
use thiserror::Error;

use crate::context::HostContext;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Plugin construction errors.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Configuration could not be loaded or is incomplete.
    #[error("invalid configuration: {0}")]
    Config(String),
}

// ============================================================================
// SECTION: Check Outcome
// ============================================================================

/// Outcome of a command check.
///
/// # Invariants
/// - `verdict == HostVerdict::from_result(result)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyCheck {
    /// Principal the check ran for.
    pub principal: String,
    /// Combined result across every evaluated query.
    pub result: AccessResult,
    /// Host-facing verdict.
    pub verdict: HostVerdict,
    /// Human-readable summary for the host log.
    pub message: String,
    /// Individual decisions, in query order.
    pub decisions: Vec<AccessDecision>,
}

impl PolicyCheck {
    /// Builds an outcome whose verdict follows from `result`.
    #[must_use]
    pub fn new(
        principal: &str,
        result: AccessResult,
        message: impl Into<String>,
        decisions: Vec<AccessDecision>,
    ) -> Self {
        Self {
            principal: principal.to_string(),
            result,
            verdict: HostVerdict::from_result(result),
            message: message.into(),
            decisions,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Policy plugin lifecycle.
pub trait PolicyPlugin {
    /// Decides whether the host may run `command` (program then arguments).
    fn check_policy(&self, command: &[String], context: &HostContext) -> PolicyCheck;

    /// Returns the commands `principal` may run.
    fn list_allowed(&self, principal: &str) -> Vec<String>;

    /// Returns true when the plugin configuration can serve requests.
    fn validate_config(&self) -> bool;

    /// Returns the one-line version banner.
    fn report_version(&self) -> String;
}
