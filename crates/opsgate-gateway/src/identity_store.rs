// crates/opsgate-gateway/src/identity_store.rs
// ============================================================================
// Module: Identity Store
// Description: Credential-to-identity mappings for shared-secret API keys.
// Purpose: Resolve offered keys with constant-time, length-independent comparison.
// Dependencies: opsgate-core, subtle, thiserror
// ============================================================================

//! ## Overview
//! The store keeps only SHA-256 digests of API keys. A lookup hashes the
//! offered secret and compares it against every stored digest with
//! [`subtle::ConstantTimeEq`], without exiting early, so timing reveals
//! neither which record matched nor how long the stored key is.
//!
//! Concurrency: records sit behind a [`RwLock`]. Lookups take the read lock;
//! administrative writes (insert, revoke, enable/disable) take the write
//! lock. No I/O happens while either lock is held. A poisoned lock fails
//! closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::RwLock;

use opsgate_core::Timestamp;
use opsgate_core::hashing::SHA256_LEN;
use opsgate_core::hashing::sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Identity template stored for one API key.
///
/// # Invariants
/// - `id` is unique within a store.
/// - Read-only while requests are processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Stable key identifier.
    pub id: String,
    /// Subject the key authenticates as.
    pub subject: String,
    /// Permission entries granted to the subject.
    pub permissions: Vec<String>,
    /// Whether the key may authenticate.
    pub enabled: bool,
    /// Optional expiry.
    pub expires_at: Option<Timestamp>,
}

impl CredentialRecord {
    /// Builds an enabled, non-expiring record.
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            subject: subject.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            enabled: true,
            expires_at: None,
        }
    }

    /// Returns a copy with an expiry.
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns true when the record has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Stored digest plus record.
struct StoredCredential {
    /// SHA-256 of the key material.
    digest: [u8; SHA256_LEN],
    /// Identity template.
    record: CredentialRecord,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identity store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityStoreError {
    /// The store lock was poisoned by a panicking writer.
    #[error("identity store unavailable")]
    Unavailable,
    /// A record with the same id already exists.
    #[error("duplicate credential id: {0}")]
    DuplicateId(String),
    /// The same key material is already registered.
    #[error("duplicate credential material for id: {0}")]
    DuplicateSecret(String),
    /// No record has the given id.
    #[error("unknown credential id: {0}")]
    UnknownId(String),
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Read interface used by authenticators.
pub trait IdentityStore: Send + Sync {
    /// Returns the record whose key equals `secret`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Unavailable`] when the store cannot be
    /// read.
    fn lookup(&self, secret: &str) -> Result<Option<CredentialRecord>, IdentityStoreError>;
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Process-local identity store.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    /// Stored credentials in insertion order.
    entries: RwLock<Vec<StoredCredential>>,
}

impl InMemoryIdentityStore {
    /// Builds an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError`] when the id or key material is already
    /// registered or the store is unavailable.
    pub fn insert(&self, secret: &str, record: CredentialRecord) -> Result<(), IdentityStoreError> {
        let digest = sha256(secret.as_bytes());
        let mut entries = self.entries.write().map_err(|_| IdentityStoreError::Unavailable)?;
        if entries.iter().any(|entry| entry.record.id == record.id) {
            return Err(IdentityStoreError::DuplicateId(record.id));
        }
        let duplicate = entries
            .iter()
            .any(|entry| bool::from(entry.digest.as_slice().ct_eq(digest.as_slice())));
        if duplicate {
            return Err(IdentityStoreError::DuplicateSecret(record.id));
        }
        entries.push(StoredCredential {
            digest,
            record,
        });
        Ok(())
    }

    /// Removes a key by id and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::UnknownId`] when no record matches.
    pub fn revoke(&self, id: &str) -> Result<CredentialRecord, IdentityStoreError> {
        let mut entries = self.entries.write().map_err(|_| IdentityStoreError::Unavailable)?;
        let index = entries
            .iter()
            .position(|entry| entry.record.id == id)
            .ok_or_else(|| IdentityStoreError::UnknownId(id.to_string()))?;
        Ok(entries.remove(index).record)
    }

    /// Enables or disables a key by id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::UnknownId`] when no record matches.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), IdentityStoreError> {
        let mut entries = self.entries.write().map_err(|_| IdentityStoreError::Unavailable)?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.record.id == id)
            .ok_or_else(|| IdentityStoreError::UnknownId(id.to_string()))?;
        entry.record.enabled = enabled;
        Ok(())
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns true when no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn lookup(&self, secret: &str) -> Result<Option<CredentialRecord>, IdentityStoreError> {
        let offered = sha256(secret.as_bytes());
        let entries = self.entries.read().map_err(|_| IdentityStoreError::Unavailable)?;
        let mut found: Option<&StoredCredential> = None;
        for entry in entries.iter() {
            let hit = bool::from(entry.digest.as_slice().ct_eq(offered.as_slice()));
            if hit && found.is_none() {
                found = Some(entry);
            }
        }
        Ok(found.map(|entry| entry.record.clone()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use super::*;

    #[test]
    fn lookup_finds_matching_record_only() {
        let store = InMemoryIdentityStore::new();
        store.insert("key-alpha-0000000", CredentialRecord::new("a", "alice", ["x:y:z"])).unwrap();
        store.insert("key-bravo-0000000", CredentialRecord::new("b", "bob", ["x:y:z"])).unwrap();
        assert_eq!(store.lookup("key-bravo-0000000").unwrap().unwrap().subject, "bob");
        assert!(store.lookup("key-bravo-000000").unwrap().is_none());
        assert!(store.lookup("").unwrap().is_none());
    }

    #[test]
    fn insert_rejects_duplicate_ids_and_secrets() {
        let store = InMemoryIdentityStore::new();
        store.insert("key-alpha-0000000", CredentialRecord::new("a", "alice", ["x:y:z"])).unwrap();
        assert_eq!(
            store.insert("other-key-0000000", CredentialRecord::new("a", "eve", ["x:y:z"])),
            Err(IdentityStoreError::DuplicateId("a".to_string()))
        );
        assert_eq!(
            store.insert("key-alpha-0000000", CredentialRecord::new("c", "eve", ["x:y:z"])),
            Err(IdentityStoreError::DuplicateSecret("c".to_string()))
        );
    }

    #[test]
    fn revoke_removes_record() {
        let store = InMemoryIdentityStore::new();
        store.insert("key-alpha-0000000", CredentialRecord::new("a", "alice", ["x:y:z"])).unwrap();
        assert_eq!(store.revoke("a").unwrap().subject, "alice");
        assert!(store.lookup("key-alpha-0000000").unwrap().is_none());
        assert!(store.is_empty());
        assert_eq!(store.revoke("a"), Err(IdentityStoreError::UnknownId("a".to_string())));
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let record = CredentialRecord::new("a", "alice", ["x:y:z"])
            .with_expiry(Timestamp::from_unix_millis(1_000));
        assert!(!record.is_expired(Timestamp::from_unix_millis(999)));
        assert!(record.is_expired(Timestamp::from_unix_millis(1_000)));
    }
}
