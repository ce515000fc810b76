// crates/sgnl-access-host/src/context.rs
// ============================================================================
// Module: Host Context
// Description: Host-supplied user information for a policy request.
// Purpose: Resolve the requesting principal from `key=value` entries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Hosts describe the invoking user as a list of `key=value` strings.
//! [`HostContext`] parses that list once and resolves the principal from
//! `user`, then `username`, falling back to [`UNKNOWN_PRINCIPAL`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Principal reported when the host supplies no user name.
pub const UNKNOWN_PRINCIPAL: &str = "unknown";
/// User-info keys consulted for the principal, in priority order.
const PRINCIPAL_KEYS: [&str; 2] = ["user", "username"];

// ============================================================================
// SECTION: Context
// ============================================================================

/// User information supplied by the host.
///
/// # Invariants
/// - The first entry for a key wins; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostContext {
    /// Parsed user-info entries.
    user_info: BTreeMap<String, String>,
}

impl HostContext {
    /// Parses `key=value` entries; entries without `=` are skipped.
    #[must_use]
    pub fn from_user_info<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut user_info = BTreeMap::new();
        for entry in entries {
            if let Some((key, value)) = entry.as_ref().split_once('=') {
                user_info.entry(key.to_string()).or_insert_with(|| value.to_string());
            }
        }
        Self {
            user_info,
        }
    }

    /// Creates a context naming only the invoking user.
    #[must_use]
    pub fn for_user(user: &str) -> Self {
        Self::from_user_info([format!("user={user}")])
    }

    /// Returns a user-info value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.user_info.get(key).map(String::as_str)
    }

    /// Returns the requesting principal.
    #[must_use]
    pub fn principal(&self) -> &str {
        PRINCIPAL_KEYS
            .iter()
            .find_map(|key| self.get(key).filter(|value| !value.is_empty()))
            .unwrap_or(UNKNOWN_PRINCIPAL)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
