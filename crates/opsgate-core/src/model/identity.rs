// crates/opsgate-core/src/model/identity.rs
// ============================================================================
// Module: OpsGate Identity
// Description: Authenticated caller identity.
// Purpose: Carry the verified subject and its parsed entitlements through a request.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`Identity`] is produced by an authenticator for a single request and
//! dropped when the request completes. Permission strings are parsed into
//! [`Entitlement`] values at construction; entries that fail to parse grant
//! nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::permission::Entitlement;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Subject recorded when authentication fails.
pub const UNKNOWN_SUBJECT: &str = "unknown";

/// Attribute key for the credential identifier.
pub const ATTR_KEY_ID: &str = "key_id";

/// Attribute key for the token subject claim.
pub const ATTR_USER_ID: &str = "user_id";

/// Attribute key for the token issue time (unix seconds).
pub const ATTR_ISSUED_AT: &str = "issued_at";

/// Attribute key for credential or token expiry (unix seconds).
pub const ATTR_EXPIRES_AT: &str = "expires_at";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Verified caller identity.
///
/// # Invariants
/// - `entitlements` is derived from `permissions` and never edited directly.
/// - Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// Authentication scheme that produced this identity.
    pub scheme: String,
    /// Caller subject (user or key name).
    pub subject: String,
    /// Raw permission entries as issued.
    pub permissions: BTreeSet<String>,
    /// Free-form attributes (key id, token times).
    pub attributes: BTreeMap<String, String>,
    /// Parsed permission entries, in `permissions` order.
    #[serde(skip)]
    entitlements: Vec<Entitlement>,
}

impl Identity {
    /// Builds an identity and parses its permissions.
    #[must_use]
    pub fn new<I, S>(scheme: impl Into<String>, subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions: BTreeSet<String> = permissions.into_iter().map(Into::into).collect();
        let entitlements =
            permissions.iter().filter_map(|entry| Entitlement::parse(entry).ok()).collect();
        Self {
            scheme: scheme.into(),
            subject: subject.into(),
            permissions,
            attributes: BTreeMap::new(),
            entitlements,
        }
    }

    /// Returns a copy with an attribute set.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the parsed permission entries.
    #[must_use]
    pub fn entitlements(&self) -> &[Entitlement] {
        &self.entitlements
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
