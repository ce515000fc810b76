// crates/sgnl-access-client/src/logger.rs
// ============================================================================
// Module: Decision Logger
// Description: Config-gated front end over a log sink.
// Purpose: Apply the debug and access logging switches in one place.
// Dependencies: sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! [`DecisionLogger`] wraps a [`LogSink`] and drops events the configuration
//! has not opted into. Debug events require `enable_debug_logging`; access
//! records require `enable_access_logging`. Warnings and errors are always
//! forwarded because they describe security posture or failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use sgnl_access_config::AccessConfig;
use sgnl_access_core::LogEvent;
use sgnl_access_core::LogLevel;
use sgnl_access_core::LogSink;
use sgnl_access_core::RequestId;
use sgnl_access_core::StderrLogSink;

// ============================================================================
// SECTION: Logger
// ============================================================================

/// Level-gated logger bound to one sink.
#[derive(Clone)]
pub struct DecisionLogger {
    /// Destination for forwarded events.
    sink: Arc<dyn LogSink>,
    /// Forward debug events.
    debug: bool,
    /// Forward access (info) events.
    access: bool,
}

impl DecisionLogger {
    /// Creates a logger using the config switches and the given sink.
    #[must_use]
    pub fn new(config: &AccessConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            debug: config.enable_debug_logging,
            access: config.enable_access_logging,
        }
    }

    /// Creates a logger writing JSON lines to stderr.
    #[must_use]
    pub fn stderr(config: &AccessConfig) -> Self {
        Self::new(config, Arc::new(StderrLogSink))
    }

    /// Returns true when events at `level` are forwarded.
    #[must_use]
    pub const fn enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.access,
            LogLevel::Warn | LogLevel::Error => true,
        }
    }

    /// Forwards an event when its level is enabled.
    pub fn log(
        &self,
        level: LogLevel,
        event: &'static str,
        request_id: Option<&RequestId>,
        message: impl Into<String>,
    ) {
        if self.enabled(level) {
            self.sink.record(&LogEvent::new(event, level, request_id, message));
        }
    }

    /// Records a debug event.
    pub fn debug(&self, event: &'static str, request_id: &RequestId, message: impl Into<String>) {
        self.log(LogLevel::Debug, event, Some(request_id), message);
    }

    /// Records an access decision.
    pub fn access(&self, event: &'static str, request_id: &RequestId, message: impl Into<String>) {
        self.log(LogLevel::Info, event, Some(request_id), message);
    }

    /// Records a warning.
    pub fn warn(&self, event: &'static str, request_id: &RequestId, message: impl Into<String>) {
        self.log(LogLevel::Warn, event, Some(request_id), message);
    }

    /// Records an error.
    pub fn error(&self, event: &'static str, request_id: &RequestId, message: impl Into<String>) {
        self.log(LogLevel::Error, event, Some(request_id), message);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
