// crates/sgnl-access-core/src/log.rs
// ============================================================================
// Module: Decision Logging
// Description: Structured log events and sinks for decision requests.
// Purpose: Route diagnostics and access records to the host's logging pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The client never writes diagnostics directly. It hands [`LogEvent`]
//! records to a [`LogSink`] supplied by the host, so deployments can route
//! events to syslog, the sudo log, or a file without redesign. Built-in sinks
//! write JSON lines to stderr or an append-only file.
//!
//! Security posture: events must never carry the bearer token; callers are
//! responsible for redaction before constructing a message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::correlation::RequestId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity of a log event.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Verbose request tracing (opt-in).
    Debug,
    /// Access decisions (opt-in).
    Info,
    /// Security-relevant posture changes.
    Warn,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Returns a stable label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Structured log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event severity.
    pub level: LogLevel,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Correlation id of the request this event belongs to.
    pub request_id: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl LogEvent {
    /// Creates a new event with a consistent timestamp.
    #[must_use]
    pub fn new(
        event: &'static str,
        level: LogLevel,
        request_id: Option<&RequestId>,
        message: impl Into<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            level,
            timestamp_ms,
            request_id: request_id.map(|id| id.as_str().to_string()),
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for decision log events.
pub trait LogSink: Send + Sync {
    /// Record a log event.
    fn record(&self, event: &LogEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that writes JSON lines to stderr.
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn record(&self, event: &LogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileLogSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileLogSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn record(&self, event: &LogEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op log sink.
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn record(&self, _event: &LogEvent) {}
}

/// Sink that keeps events in memory, for hosts that inspect them directly.
#[derive(Default)]
pub struct MemoryLogSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
