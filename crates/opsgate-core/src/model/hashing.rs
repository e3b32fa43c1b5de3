// crates/opsgate-core/src/model/hashing.rs
// ============================================================================
// Module: OpsGate Hashing
// Description: SHA-256 digests and secret masking helpers.
// Purpose: Keep credential material out of memory dumps and logs.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! Stored API keys are reduced to SHA-256 digests so comparison runs over
//! fixed-width values. Offered secrets are only ever logged through
//! [`mask_secret`].
//!
//! Security posture: digests are fingerprints, not password hashes; API keys
//! are expected to carry enough entropy on their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of leading characters kept visible by [`mask_secret`].
pub const MASK_VISIBLE_CHARS: usize = 8;

/// Suffix appended to masked secrets.
const MASK_SUFFIX: &str = "****";

/// Byte width of a SHA-256 digest.
pub const SHA256_LEN: usize = 32;

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns the raw SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256(bytes: &[u8]) -> [u8; SHA256_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Masks a secret for logging, keeping only a short visible prefix.
///
/// Secrets no longer than the visible prefix are fully masked.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE_CHARS {
        return MASK_SUFFIX.to_string();
    }
    let mut masked: String = secret.chars().take(MASK_VISIBLE_CHARS).collect();
    masked.push_str(MASK_SUFFIX);
    masked
}

// ============================================================================
// SECTION: Tests
// ============================================================================
