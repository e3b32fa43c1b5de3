// crates/opsgate-gateway/src/auth.rs
// ============================================================================
// Module: Gateway Authentication
// Description: Authenticator interface, scheme dispatch, and header parsing.
// Purpose: Turn a raw credential into a verified identity, failing closed.
// Dependencies: async-trait, opsgate-core, thiserror
// ============================================================================

//! ## Overview
//! An [`Authenticator`] verifies one kind of credential. The
//! [`MultiAuthenticator`] owns one strategy per scheme name and dispatches on
//! the scheme the caller declared; it never guesses. Authenticators do not
//! audit: the security middleware records every attempt.
//!
//! Security posture: errors carry a machine-readable [`AuthError::kind`] for
//! the audit trail. Callers only ever see "authentication failed".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use opsgate_core::Identity;
use thiserror::Error;

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod api_key;
pub mod token;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scheme name for shared-secret API keys.
pub const SCHEME_API_KEY: &str = "apikey";

/// Scheme name for signed tokens.
pub const SCHEME_JWT: &str = "jwt";

/// Default upper bound on credential size.
pub const DEFAULT_MAX_CREDENTIAL_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No strategy is registered for the declared scheme.
    #[error("unsupported authentication scheme: {0}")]
    UnknownScheme(String),
    /// Credential was empty.
    #[error("missing credential")]
    MissingCredential,
    /// Credential exceeded the size limit.
    #[error("credential exceeds size limit")]
    CredentialTooLarge,
    /// Credential did not verify.
    #[error("invalid credential")]
    InvalidCredential,
    /// Credential verified but is disabled.
    #[error("credential is disabled")]
    DisabledCredential,
    /// Credential verified but has expired.
    #[error("credential has expired")]
    ExpiredCredential,
    /// Token header declared an algorithm other than HS256.
    #[error("unexpected token algorithm")]
    UnexpectedAlgorithm,
    /// Token could not be decoded or lacked a required claim.
    #[error("malformed token: {0}")]
    MalformedToken(String),
    /// Credential storage could not be read.
    #[error("credential store unavailable")]
    StoreUnavailable,
}

impl AuthError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownScheme(_) => "unknown_scheme",
            Self::MissingCredential => "missing_credential",
            Self::CredentialTooLarge => "credential_too_large",
            Self::InvalidCredential => "invalid_credential",
            Self::DisabledCredential => "disabled_credential",
            Self::ExpiredCredential => "expired_credential",
            Self::UnexpectedAlgorithm => "unexpected_algorithm",
            Self::MalformedToken(_) => "malformed_token",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// One credential verification strategy.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verifies `credential` and returns the caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the credential does not verify.
    async fn authenticate(&self, credential: &str) -> Result<Identity, AuthError>;
}

// ============================================================================
// SECTION: Multi-Authenticator
// ============================================================================

/// Dispatches authentication by declared scheme.
pub struct MultiAuthenticator {
    /// Strategies keyed by scheme name.
    strategies: BTreeMap<String, Arc<dyn Authenticator>>,
    /// Largest credential accepted.
    max_credential_bytes: usize,
}

impl Default for MultiAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CREDENTIAL_BYTES)
    }
}

impl MultiAuthenticator {
    /// Builds a dispatcher with no strategies.
    #[must_use]
    pub const fn new(max_credential_bytes: usize) -> Self {
        Self {
            strategies: BTreeMap::new(),
            max_credential_bytes,
        }
    }

    /// Returns a copy with a strategy registered under `scheme`.
    #[must_use]
    pub fn with_strategy(mut self, scheme: &str, strategy: Arc<dyn Authenticator>) -> Self {
        self.strategies.insert(scheme.to_string(), strategy);
        self
    }

    /// Returns the largest credential accepted.
    #[must_use]
    pub const fn max_credential_bytes(&self) -> usize {
        self.max_credential_bytes
    }

    /// Returns the registered scheme names.
    #[must_use]
    pub fn schemes(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Authenticates `credential` with the strategy registered for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownScheme`] for unregistered schemes, size or
    /// presence errors before dispatch, and the strategy's error otherwise.
    pub async fn authenticate(&self, scheme: &str, credential: &str) -> Result<Identity, AuthError> {
        let strategy = self
            .strategies
            .get(scheme)
            .ok_or_else(|| AuthError::UnknownScheme(scheme.to_string()))?;
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        if credential.len() > self.max_credential_bytes {
            return Err(AuthError::CredentialTooLarge);
        }
        strategy.authenticate(credential).await
    }
}

// ============================================================================
// SECTION: Header Parsing
// ============================================================================

/// Splits an `Authorization` header value into `(scheme, credential)`.
///
/// `Bearer` maps to [`SCHEME_JWT`] and `ApiKey` to [`SCHEME_API_KEY`]
/// (case-insensitive); any other scheme is returned lowercased so dispatch
/// reports it as unknown.
///
/// # Errors
///
/// Returns [`AuthError`] when the header is oversized, has no credential, or
/// has no scheme.
pub fn parse_authorization_header(
    header: &str,
    max_credential_bytes: usize,
) -> Result<(String, String), AuthError> {
    if header.len() > max_credential_bytes {
        return Err(AuthError::CredentialTooLarge);
    }
    let trimmed = header.trim();
    let Some((scheme, credential)) = trimmed.split_once(char::is_whitespace) else {
        return Err(AuthError::MissingCredential);
    };
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    let scheme = match scheme.to_ascii_lowercase().as_str() {
        "bearer" => SCHEME_JWT.to_string(),
        "apikey" => SCHEME_API_KEY.to_string(),
        other => other.to_string(),
    };
    Ok((scheme, credential.to_string()))
}
