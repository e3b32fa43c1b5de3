// crates/opsgate-gateway/src/auth/api_key.rs
// ============================================================================
// Module: API Key Authenticator
// Description: Shared-secret authentication against the identity store.
// Purpose: Map an offered API key to an identity with enable and expiry checks.
// Dependencies: async-trait, opsgate-core, tracing
// ============================================================================

//! ## Overview
//! The API key strategy delegates comparison to the [`IdentityStore`], which
//! compares digests in constant time. Disabled and expired keys are reported
//! as distinct failures so operators can tell them apart in the audit trail.
//! Offered keys are only ever logged masked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use opsgate_core::Identity;
use opsgate_core::Timestamp;
use opsgate_core::identity::ATTR_EXPIRES_AT;
use opsgate_core::identity::ATTR_KEY_ID;
use opsgate_core::mask_secret;
use tracing::debug;
use tracing::warn;

use crate::auth::AuthError;
use crate::auth::Authenticator;
use crate::auth::SCHEME_API_KEY;
use crate::identity_store::IdentityStore;

// ============================================================================
// SECTION: Authenticator
// ============================================================================

/// Authenticates shared-secret API keys.
pub struct ApiKeyAuthenticator {
    /// Credential records.
    store: Arc<dyn IdentityStore>,
}

impl ApiKeyAuthenticator {
    /// Builds an authenticator over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, credential: &str) -> Result<Identity, AuthError> {
        let record = self.store.lookup(credential).map_err(|err| {
            warn!(error = %err, "identity store lookup failed");
            AuthError::StoreUnavailable
        })?;
        let Some(record) = record else {
            debug!(key = %mask_secret(credential), "unknown api key");
            return Err(AuthError::InvalidCredential);
        };
        if !record.enabled {
            debug!(key_id = %record.id, "disabled api key");
            return Err(AuthError::DisabledCredential);
        }
        if record.is_expired(Timestamp::now()) {
            debug!(key_id = %record.id, "expired api key");
            return Err(AuthError::ExpiredCredential);
        }
        let mut identity = Identity::new(SCHEME_API_KEY, record.subject, record.permissions)
            .with_attribute(ATTR_KEY_ID, record.id);
        if let Some(expires_at) = record.expires_at {
            identity = identity
                .with_attribute(ATTR_EXPIRES_AT, expires_at.as_unix_seconds().to_string());
        }
        Ok(identity)
    }
}
