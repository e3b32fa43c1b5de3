// crates/opsgate-gateway/tests/common/mod.rs
// =============================================================================
// Module: Gateway Test Helpers
// Description: Fixtures for gateway integration tests.
// Purpose: Build isolated gateways with in-memory audit and a recording collaborator.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwrap for clarity."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use opsgate_core::ExecutionResult;
use opsgate_core::Identity;
use opsgate_core::PolicyDocument;
use opsgate_core::RoleDefinition;
use opsgate_gateway::ApiKeyAuthenticator;
use opsgate_gateway::AuditLogger;
use opsgate_gateway::AuthError;
use opsgate_gateway::Authenticator;
use opsgate_gateway::CollaboratorError;
use opsgate_gateway::CredentialRecord;
use opsgate_gateway::HandlerRegistry;
use opsgate_gateway::InMemoryIdentityStore;
use opsgate_gateway::InfraCollaborator;
use opsgate_gateway::InputValidator;
use opsgate_gateway::MemoryAuditSink;
use opsgate_gateway::MiddlewareParts;
use opsgate_gateway::MultiAuthenticator;
use opsgate_gateway::OperationCatalog;
use opsgate_gateway::OperationTarget;
use opsgate_gateway::PolicyStore;
use opsgate_gateway::RbacEnforcer;
use opsgate_gateway::SecurityMiddleware;
use opsgate_gateway::TokenAuthenticator;
use opsgate_gateway::ToolCall;
use opsgate_gateway::ToolExecutor;
use opsgate_gateway::TypedArguments;
use opsgate_gateway::auth::SCHEME_API_KEY;
use opsgate_gateway::auth::SCHEME_JWT;
use serde_json::Map;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// HMAC secret shared by test token authenticators.
pub const JWT_SECRET: &[u8] = b"opsgate-test-secret-0123456789abcdef";
/// Issuer used by test tokens.
pub const ISSUER: &str = "opsgate-test";
/// Key holding `infra:deployments:scale` only.
pub const OPERATOR_KEY: &str = "opk_live_0123456789abcdef";
/// Key holding `infra:pods:list` only.
pub const VIEWER_KEY: &str = "vwk_live_0123456789abcdef";
/// Key holding `infra:*`.
pub const ADMIN_KEY: &str = "adk_live_0123456789abcdef";
/// Key referencing the namespace-scoped `developer` role.
pub const DEVELOPER_KEY: &str = "dvk_live_0123456789abcdef";
/// Key that is registered but disabled.
pub const DISABLED_KEY: &str = "dsk_live_0123456789abcdef";
/// Key that expired in 1970.
pub const EXPIRED_KEY: &str = "exk_live_0123456789abcdef";

/// Returns the standard test policy.
pub fn test_policy() -> PolicyDocument {
    PolicyDocument {
        roles: vec![
            RoleDefinition {
                name: "developer".to_string(),
                description: "Developers manage workloads in dev namespaces".to_string(),
                permissions: vec!["infra:pods:*".to_string(), "infra:deployments:*".to_string()],
                namespaces: vec!["dev-*".to_string()],
            },
            RoleDefinition {
                name: "viewer".to_string(),
                description: String::new(),
                permissions: vec!["infra:pods:list".to_string(), "infra:pods:logs".to_string()],
                namespaces: Vec::new(),
            },
        ],
    }
}

/// Returns a store holding every test key.
pub fn test_store() -> InMemoryIdentityStore {
    let store = InMemoryIdentityStore::new();
    store
        .insert(OPERATOR_KEY, CredentialRecord::new("operator", "ops-bot", ["infra:deployments:scale"]))
        .unwrap();
    store.insert(VIEWER_KEY, CredentialRecord::new("viewer", "viewer-bot", ["infra:pods:list"])).unwrap();
    store.insert(ADMIN_KEY, CredentialRecord::new("admin", "admin-bot", ["infra:*"])).unwrap();
    store
        .insert(DEVELOPER_KEY, CredentialRecord::new("developer", "dev-bot", ["role:developer"]))
        .unwrap();
    let mut disabled = CredentialRecord::new("disabled", "old-bot", ["infra:*"]);
    disabled.enabled = false;
    store.insert(DISABLED_KEY, disabled).unwrap();
    store
        .insert(
            EXPIRED_KEY,
            CredentialRecord::new("expired", "stale-bot", ["infra:*"])
                .with_expiry(opsgate_core::Timestamp::from_unix_millis(1_000)),
        )
        .unwrap();
    store
}

/// Returns a token authenticator over the test secret.
pub fn token_authenticator() -> TokenAuthenticator {
    TokenAuthenticator::new(JWT_SECRET, ISSUER, 0, Duration::from_secs(600))
}

/// Builds a JSON argument map from a `json!` object.
pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// SECTION: Collaborator
// ============================================================================

/// One collaborator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Operation name.
    pub operation: String,
    /// Target.
    pub target: OperationTarget,
    /// Typed arguments.
    pub arguments: TypedArguments,
}

/// Collaborator that records calls and returns a canned response.
pub struct RecordingCollaborator {
    /// Recorded invocations.
    calls: Mutex<Vec<RecordedCall>>,
    /// Canned response.
    response: Result<Map<String, Value>, CollaboratorError>,
    /// Never completes when set.
    hang: bool,
}

impl RecordingCollaborator {
    /// Succeeds with empty data.
    pub fn new() -> Self {
        Self::responding(Map::new())
    }

    /// Succeeds with `data`.
    pub fn responding(data: Map<String, Value>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Ok(data),
            hang: false,
        }
    }

    /// Fails with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Err(error),
            hang: false,
        }
    }

    /// Records the call, then never completes.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::new()
        }
    }

    /// Returns recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InfraCollaborator for RecordingCollaborator {
    async fn invoke(
        &self,
        operation: &str,
        target: &OperationTarget,
        arguments: &TypedArguments,
    ) -> Result<Map<String, Value>, CollaboratorError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: operation.to_string(),
            target: target.clone(),
            arguments: arguments.clone(),
        });
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.response.clone()
    }
}

// ============================================================================
// SECTION: Authenticators
// ============================================================================

/// Strategy that cancels the request token as it admits the caller.
pub struct CancellingAuthenticator {
    /// Token cancelled on every call.
    pub cancel: CancellationToken,
}

#[async_trait]
impl Authenticator for CancellingAuthenticator {
    async fn authenticate(&self, _credential: &str) -> Result<Identity, AuthError> {
        self.cancel.cancel();
        Ok(Identity::new("cancelling", "late-bot", ["infra:*"]))
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Fully wired gateway plus its observable collaborators.
pub struct Harness {
    /// Middleware under test.
    pub gateway: SecurityMiddleware,
    /// Audit events.
    pub audit: Arc<MemoryAuditSink>,
    /// Infrastructure calls.
    pub collaborator: Arc<RecordingCollaborator>,
    /// Token issuer sharing the gateway secret.
    pub tokens: Arc<TokenAuthenticator>,
}

impl Harness {
    /// Builds a gateway over `collaborator` with the test keys and policy.
    pub fn new(collaborator: RecordingCollaborator) -> Self {
        Self::with_extra_strategy(collaborator, None)
    }

    /// Builds a gateway that also dispatches `extra` by its scheme.
    pub fn with_extra_strategy(
        collaborator: RecordingCollaborator,
        extra: Option<(&str, Arc<dyn Authenticator>)>,
    ) -> Self {
        let audit = Arc::new(MemoryAuditSink::new());
        let collaborator = Arc::new(collaborator);
        let tokens = Arc::new(token_authenticator());
        let mut authenticator = MultiAuthenticator::default()
            .with_strategy(SCHEME_API_KEY, Arc::new(ApiKeyAuthenticator::new(Arc::new(test_store()))))
            .with_strategy(SCHEME_JWT, Arc::clone(&tokens) as _);
        if let Some((scheme, strategy)) = extra {
            authenticator = authenticator.with_strategy(scheme, strategy);
        }
        let catalog = Arc::new(OperationCatalog::builtin("infra").unwrap());
        let policy = Arc::new(PolicyStore::from_document(&test_policy()).unwrap());
        let gateway = SecurityMiddleware::new(MiddlewareParts {
            authenticator: Arc::new(authenticator),
            enforcer: RbacEnforcer::new(policy),
            validator: InputValidator::new(Arc::clone(&catalog)),
            executor: ToolExecutor::new(
                HandlerRegistry::with_builtin_handlers(),
                Arc::clone(&collaborator) as _,
            ),
            audit: AuditLogger::new(Arc::clone(&audit) as _),
            catalog,
            default_namespace: "default".to_string(),
        });
        Self {
            gateway,
            audit,
            collaborator,
            tokens,
        }
    }

    /// Runs one call with a fresh cancellation token.
    pub async fn call(
        &self,
        scheme: &str,
        credential: &str,
        operation: &str,
        arguments: Value,
    ) -> ExecutionResult {
        let call = ToolCall::new(scheme, credential, operation, args(arguments));
        self.gateway.handle(&call, &CancellationToken::new()).await
    }
}
