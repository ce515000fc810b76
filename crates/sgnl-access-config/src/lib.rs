// crates/sgnl-access-config/src/lib.rs
// ============================================================================
// Module: SGNL Access Config Library
// Description: Configuration model and resolution for the access client.
// Purpose: Single source of truth for config.json semantics and env overrides.
// Dependencies: sgnl-access-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `sgnl-access-config` loads the decision-service connection and resilience
//! settings from `/etc/sgnl/config.json` (or `SGNL_CONFIG_PATH`), layers
//! environment overrides on top, and validates the result. Every field is
//! resolved independently: environment value, then file value, then the
//! built-in default.
//!
//! Security posture: config inputs are untrusted; loading fails closed and
//! an invalid configuration blocks every decision request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AccessConfig;
pub use config::ConfigError;
pub use config::ConfigResolver;
pub use config::DEFAULT_CONFIG_PATH;
pub use config::FileConfig;
pub use env::EnvSource;
pub use env::parse_flag;
pub use env::resolve;
