// crates/sgnl-access-client/src/retry.rs
// ============================================================================
// Module: Retry Orchestrator
// Description: Bounded retry loop around single transport attempts.
// Purpose: Tolerate transient failures without unbounded blocking.
// Dependencies: serde_json, sgnl-access-config, sgnl-access-core
// ============================================================================

//! ## Overview
//! [`RetryPolicy::run`] performs up to `retry_count + 1` sequential attempts.
//! Timeout and network errors are retried after a fixed pause; every other
//! error stops the loop at once. The pause goes through [`RetryPause`] so
//! callers can observe or suppress sleeping.
//!
//! Worst-case latency is `N * request_timeout + (N - 1) * retry_delay` for
//! `N = retry_count + 1`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use sgnl_access_config::AccessConfig;
use sgnl_access_core::RequestId;

use crate::error::AccessError;
use crate::logger::DecisionLogger;

// ============================================================================
// SECTION: Pause
// ============================================================================

/// Blocks between retry attempts.
pub trait RetryPause: Send + Sync {
    /// Pauses for `delay`.
    fn pause(&self, delay: Duration);
}

/// Pause that sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl RetryPause for ThreadPause {
    fn pause(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Attempt budget and pause length.
///
/// # Invariants
/// - At least one attempt is always made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first.
    pub retry_count: u32,
    /// Pause before each attempt after the first.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Reads the policy from the configuration.
    #[must_use]
    pub const fn from_config(config: &AccessConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            retry_delay: config.retry_delay,
        }
    }

    /// Returns the total attempt budget.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Runs `attempt` until it succeeds, fails terminally, or the budget is spent.
    ///
    /// `attempt` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns the terminal error, the last retryable error, or a synthesized
    /// network error when no attempt recorded one.
    pub fn run<T, F>(
        &self,
        pause: &dyn RetryPause,
        logger: &DecisionLogger,
        request_id: &RequestId,
        mut attempt: F,
    ) -> Result<T, AccessError>
    where
        F: FnMut(u32) -> Result<T, AccessError>,
    {
        let attempts = self.attempts();
        let mut last_error: Option<AccessError> = None;
        for number in 1 ..= attempts {
            if number > 1 {
                logger.debug(
                    "retry_scheduled",
                    request_id,
                    format!(
                        "attempt {number}/{attempts} after {}ms",
                        self.retry_delay.as_millis()
                    ),
                );
                pause.pause(self.retry_delay);
            }
            match attempt(number) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    logger.debug(
                        "attempt_failed",
                        request_id,
                        format!("attempt {number}/{attempts} failed: {err}"),
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error
            .unwrap_or_else(|| AccessError::network("all retry attempts failed", request_id)))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
