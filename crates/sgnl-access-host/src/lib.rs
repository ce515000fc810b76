// crates/sgnl-access-host/src/lib.rs
// ============================================================================
// Module: SGNL Access Host Library
// Description: Policy plugin interface for command-authorization hosts.
// Purpose: Translate host requests into decision client calls and verdicts.
// Dependencies: sgnl-access-client, sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! `sgnl-access-host` defines the [`PolicyPlugin`] lifecycle a
//! command-authorization host drives, and [`SudoPolicyAdapter`], which
//! implements it over a [`sgnl_access_client::DecisionClient`]. The host
//! passes its user-info entries as a [`HostContext`]; the adapter extracts
//! the principal, evaluates the command, and answers with a
//! [`sgnl_access_core::HostVerdict`].
//!
//! Security posture: an unloadable configuration refuses to construct an
//! adapter, and every ambiguous outcome is reported as an error verdict.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod plugin;
pub mod sudo;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::HostContext;
pub use context::UNKNOWN_PRINCIPAL;
pub use plugin::PluginError;
pub use plugin::PolicyCheck;
pub use plugin::PolicyPlugin;
pub use sudo::SUDO_ACTION;
pub use sudo::SudoPolicyAdapter;
pub use sudo::combined_result;
pub use sudo::version_banner;
