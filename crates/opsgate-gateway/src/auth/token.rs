// crates/opsgate-gateway/src/auth/token.rs
// ============================================================================
// Module: Signed Token Authenticator
// Description: HS256 token verification and issuance.
// Purpose: Authenticate callers from self-contained signed tokens.
// Dependencies: async-trait, jsonwebtoken, opsgate-core, serde, tracing
// ============================================================================

//! ## Overview
//! Tokens are HMAC-SHA256 JWTs carrying `sub`, `username`, `permissions`,
//! `iss`, `iat`, `nbf`, and `exp`. Verification pins the algorithm: the
//! header is inspected first and anything other than HS256 is rejected
//! before the signature is checked. Issuer, expiry, and not-before are always
//! validated; a missing or malformed claim fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use jsonwebtoken::errors::ErrorKind;
use opsgate_core::Identity;
use opsgate_core::Timestamp;
use opsgate_core::identity::ATTR_EXPIRES_AT;
use opsgate_core::identity::ATTR_ISSUED_AT;
use opsgate_core::identity::ATTR_USER_ID;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::auth::AuthError;
use crate::auth::Authenticator;
use crate::auth::SCHEME_JWT;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// The only accepted signing algorithm.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Registered claims every token must carry.
const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "nbf", "sub"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Claims carried by gateway tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Stable user identifier.
    pub sub: String,
    /// Display name used as the identity subject.
    pub username: String,
    /// Permission entries.
    pub permissions: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Not-before (unix seconds).
    pub nbf: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Token issuance errors.
#[derive(Debug, Error)]
pub enum TokenIssueError {
    /// Claims were rejected before signing.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

// ============================================================================
// SECTION: Authenticator
// ============================================================================

/// Verifies and issues HS256 tokens.
pub struct TokenAuthenticator {
    /// Signing key.
    encoding_key: EncodingKey,
    /// Verification key.
    decoding_key: DecodingKey,
    /// Pinned verification rules.
    validation: Validation,
    /// Issuer written into and required on tokens.
    issuer: String,
    /// Lifetime used when the caller does not pass one.
    default_ttl: Duration,
}

impl TokenAuthenticator {
    /// Builds an authenticator for `secret` and `issuer`.
    #[must_use]
    pub fn new(secret: &[u8], issuer: &str, leeway_secs: u64, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_secs;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: issuer.to_string(),
            default_ttl,
        }
    }

    /// Issues a token valid from now for `ttl` (or the default lifetime).
    ///
    /// # Errors
    ///
    /// Returns [`TokenIssueError`] when the claims are empty or signing fails.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        permissions: &[String],
        ttl: Option<Duration>,
    ) -> Result<String, TokenIssueError> {
        let now = Timestamp::now().as_unix_seconds();
        let ttl = i64::try_from(ttl.unwrap_or(self.default_ttl).as_secs())
            .map_err(|_| TokenIssueError::InvalidClaims("ttl out of range".to_string()))?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            permissions: permissions.to_vec(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(ttl),
        };
        self.sign(&claims)
    }

    /// Signs explicit claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenIssueError`] when `sub` or `username` is empty or
    /// signing fails.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenIssueError> {
        if claims.sub.trim().is_empty() || claims.username.trim().is_empty() {
            return Err(TokenIssueError::InvalidClaims(
                "sub and username must be non-empty".to_string(),
            ));
        }
        jsonwebtoken::encode(&Header::new(TOKEN_ALGORITHM), claims, &self.encoding_key)
            .map_err(|err| TokenIssueError::Signing(err.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|err| map_token_error(err.kind()))?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(AuthError::UnexpectedAlgorithm);
        }
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| map_token_error(err.kind()))?;
        let claims = data.claims;
        if claims.sub.trim().is_empty() || claims.username.trim().is_empty() {
            return Err(AuthError::MalformedToken("empty subject".to_string()));
        }
        Ok(claims)
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> Result<Identity, AuthError> {
        let claims = self.verify(credential).inspect_err(|err| {
            debug!(reason = err.kind(), "token rejected");
        })?;
        Ok(Identity::new(SCHEME_JWT, claims.username, claims.permissions)
            .with_attribute(ATTR_USER_ID, claims.sub)
            .with_attribute(ATTR_ISSUED_AT, claims.iat.to_string())
            .with_attribute(ATTR_EXPIRES_AT, claims.exp.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps library error kinds onto gateway authentication errors.
fn map_token_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => AuthError::UnexpectedAlgorithm,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature => AuthError::InvalidCredential,
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::MalformedToken(format!("missing claim {claim}"))
        }
        _ => AuthError::MalformedToken("token could not be decoded".to_string()),
    }
}
