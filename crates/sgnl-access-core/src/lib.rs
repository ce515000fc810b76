// crates/sgnl-access-core/src/lib.rs
// ============================================================================
// Module: SGNL Access Core
// Description: Shared vocabulary for the SGNL access decision client.
// Purpose: Define the result taxonomy, host verdicts, correlation ids, and sinks.
// Dependencies: serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! `sgnl-access-core` holds the types every other crate in the workspace
//! agrees on: the closed [`AccessResult`] taxonomy that crosses the boundary
//! to the enforcement point, the fail-closed [`HostVerdict`] mapping, the
//! per-request [`RequestId`], and the [`LogSink`] interface used for
//! diagnostics and access logging.
//!
//! Security posture: every ambiguous outcome maps to an error verdict; no
//! path through this crate produces an implicit allow.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod correlation;
pub mod log;
pub mod result;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use correlation::RequestId;
pub use log::FileLogSink;
pub use log::LogEvent;
pub use log::LogLevel;
pub use log::LogSink;
pub use log::MemoryLogSink;
pub use log::NoopLogSink;
pub use log::StderrLogSink;
pub use result::AccessResult;
pub use result::HostVerdict;

/// Version string of the SGNL access workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
