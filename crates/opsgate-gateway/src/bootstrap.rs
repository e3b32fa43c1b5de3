// crates/opsgate-gateway/src/bootstrap.rs
// ============================================================================
// Module: Gateway Bootstrap
// Description: Builds a ready-to-serve middleware from validated configuration.
// Purpose: Wire identity store, authenticators, policy, catalog, and audit sink.
// Dependencies: opsgate-config, opsgate-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`build_gateway`] resolves secrets (inline or from the environment),
//! compiles policy and the operation catalog, and opens the audit sink.
//! Anything that fails here fails startup; nothing is resolved lazily.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use opsgate_config::AuditSinkKind;
use opsgate_config::ConfigError;
use opsgate_config::GatewayConfig;
use opsgate_config::JwtConfig;
use opsgate_core::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::audit::AuditLogger;
use crate::audit::AuditSink;
use crate::audit::JsonFileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::audit::TracingAuditSink;
use crate::auth::MultiAuthenticator;
use crate::auth::SCHEME_API_KEY;
use crate::auth::SCHEME_JWT;
use crate::auth::api_key::ApiKeyAuthenticator;
use crate::auth::token::TokenAuthenticator;
use crate::catalog::CatalogError;
use crate::catalog::OperationCatalog;
use crate::executor::HandlerRegistry;
use crate::executor::InfraCollaborator;
use crate::executor::ToolExecutor;
use crate::identity_store::CredentialRecord;
use crate::identity_store::IdentityStoreError;
use crate::identity_store::InMemoryIdentityStore;
use crate::middleware::MiddlewareParts;
use crate::middleware::SecurityMiddleware;
use crate::rbac::PolicyStore;
use crate::rbac::PolicyStoreError;
use crate::rbac::RbacEnforcer;
use crate::validation::InputValidator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Startup failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration or secret resolution failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Policy did not compile.
    #[error("policy: {0}")]
    Policy(#[from] PolicyStoreError),
    /// Operation catalog did not compile.
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    /// API keys could not be registered.
    #[error("identity store: {0}")]
    IdentityStore(#[from] IdentityStoreError),
    /// Audit sink could not be opened.
    #[error("audit sink: {0}")]
    AuditSink(String),
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the security middleware for `config`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when any component cannot be built.
pub fn build_gateway(
    config: &GatewayConfig,
    collaborator: Arc<dyn InfraCollaborator>,
) -> Result<SecurityMiddleware, BootstrapError> {
    let store = Arc::new(build_identity_store(config)?);
    let mut authenticator = MultiAuthenticator::new(config.gateway.max_credential_bytes)
        .with_strategy(SCHEME_API_KEY, Arc::new(ApiKeyAuthenticator::new(store)));
    if let Some(jwt) = &config.auth.jwt {
        authenticator =
            authenticator.with_strategy(SCHEME_JWT, Arc::new(build_token_authenticator(jwt)?));
    }
    let policy = Arc::new(PolicyStore::from_document(&config.policy_document()?)?);
    let catalog = Arc::new(OperationCatalog::new(
        &config.gateway.permission_domain,
        config.operation_catalog(),
    )?);
    let audit = AuditLogger::new(build_audit_sink(config)?);
    let executor = ToolExecutor::new(HandlerRegistry::with_builtin_handlers(), collaborator);
    info!(
        schemes = authenticator.schemes().join(","),
        operations = catalog.names().len(),
        "gateway built"
    );
    Ok(SecurityMiddleware::new(MiddlewareParts {
        authenticator: Arc::new(authenticator),
        enforcer: RbacEnforcer::new(policy),
        validator: InputValidator::new(Arc::clone(&catalog)),
        executor,
        audit,
        catalog,
        default_namespace: config.gateway.default_namespace.clone(),
    }))
}

/// Registers every configured API key.
///
/// # Errors
///
/// Returns [`BootstrapError`] when key material cannot be resolved or is
/// registered twice.
pub fn build_identity_store(config: &GatewayConfig) -> Result<InMemoryIdentityStore, BootstrapError> {
    let store = InMemoryIdentityStore::new();
    for entry in &config.auth.api_keys {
        let secret = entry.resolve_key()?;
        let mut record = CredentialRecord::new(&entry.id, &entry.subject, &entry.permissions);
        record.enabled = entry.enabled;
        if let Some(expires_at_ms) = entry.expires_at_ms {
            record = record.with_expiry(Timestamp::from_unix_millis(expires_at_ms));
        }
        store.insert(&secret, record)?;
    }
    Ok(store)
}

/// Builds the signed-token strategy.
///
/// # Errors
///
/// Returns [`BootstrapError::Config`] when the secret cannot be resolved.
pub fn build_token_authenticator(jwt: &JwtConfig) -> Result<TokenAuthenticator, BootstrapError> {
    let secret = jwt.resolve_secret()?;
    Ok(TokenAuthenticator::new(
        secret.as_bytes(),
        &jwt.issuer,
        jwt.leeway_secs,
        Duration::from_secs(jwt.default_ttl_secs),
    ))
}

/// Opens the configured audit sink.
///
/// # Errors
///
/// Returns [`BootstrapError::AuditSink`] when the audit file cannot be opened.
pub fn build_audit_sink(config: &GatewayConfig) -> Result<Arc<dyn AuditSink>, BootstrapError> {
    let sink: Arc<dyn AuditSink> = match config.audit.sink {
        AuditSinkKind::Tracing => Arc::new(TracingAuditSink),
        AuditSinkKind::Stderr => Arc::new(StderrAuditSink),
        AuditSinkKind::None => Arc::new(NoopAuditSink),
        AuditSinkKind::File => {
            let raw = config
                .audit
                .path
                .as_deref()
                .ok_or_else(|| BootstrapError::AuditSink("audit.path is required".to_string()))?;
            let path = config.resolve_relative(raw);
            Arc::new(
                JsonFileAuditSink::new(&path)
                    .map_err(|err| BootstrapError::AuditSink(err.to_string()))?,
            )
        }
    };
    Ok(sink)
}
