// crates/opsgate-core/src/model/time.rs
// ============================================================================
// Module: OpsGate Time Model
// Description: Canonical timestamp representation for envelopes and audit.
// Purpose: Keep every OpsGate timestamp in unix milliseconds.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Timestamps are unix epoch milliseconds. Library code takes timestamps from
//! [`Timestamp::now`] at the edges (result construction, audit emission) and
//! passes them explicitly everywhere else so tests can pin time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in execution results, audit events, and
/// credential expiry.
///
/// # Invariants
/// - Values are unix epoch milliseconds.
/// - A clock before the epoch reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Builds a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Reads the system clock.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Returns the timestamp as unix milliseconds.
    #[must_use]
    pub const fn as_unix_millis(&self) -> i64 {
        self.0
    }

    /// Returns the timestamp as whole unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(&self) -> i64 {
        self.0 / 1000
    }
}
