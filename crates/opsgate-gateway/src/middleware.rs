// crates/opsgate-gateway/src/middleware.rs
// ============================================================================
// Module: Security Middleware
// Description: Authenticate, authorize, validate, execute, and audit pipeline.
// Purpose: Provide the single entry point for tool calls.
// Dependencies: opsgate-core, serde, serde_json, thiserror, tokio, tokio-util, tracing
// ============================================================================

//! ## Overview
//! [`SecurityMiddleware::handle`] runs a [`ToolCall`] through
//! `Received -> Authenticated -> Authorized -> Validated -> Executed` and
//! always answers with an [`ExecutionResult`]. Pre-execution failures become
//! a synthetic `success=false` result through [`GatewayError::into_result`].
//! [`SecurityMiddleware::handle_header`] accepts a raw `Authorization` header
//! instead; a header that does not parse fails authentication like any other
//! bad credential.
//!
//! Audit trail: one authentication event per attempt (subject `unknown` on
//! failure), one authorization event per decision, and exactly one execution
//! event for every call that reaches execution. Validation failures go back
//! to the caller in full and are not audited.
//!
//! Cancellation: the token is checked before authentication, authorization,
//! and execution, and raced against the awaiting stages. A cancelled stage
//! records its own audit event with result `error` and message
//! `request cancelled`. Validation is synchronous and does not observe
//! cancellation; a cancel arriving during it is caught before execution.
//!
//! Security posture: callers learn only "authentication failed" or "access
//! denied"; the precise reason is kept for the audit trail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use opsgate_core::AuditResult;
use opsgate_core::ExecutionResult;
use opsgate_core::Identity;
use opsgate_core::Permission;
use opsgate_core::UNKNOWN_SUBJECT;
use opsgate_core::ValidationResult;
use opsgate_core::operation::FIELD_NAMESPACE;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

use crate::audit::AuditLogger;
use crate::audit::authentication_event;
use crate::audit::authorization_event;
use crate::audit::execution_event;
use crate::auth::AuthError;
use crate::auth::MultiAuthenticator;
use crate::auth::parse_authorization_header;
use crate::catalog::OperationCatalog;
use crate::executor::ToolExecutor;
use crate::rbac::AuthzDecision;
use crate::rbac::AuthzDenial;
use crate::rbac::RbacEnforcer;
use crate::validation::InputValidator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error text for cancelled requests.
const CANCELLED_MESSAGE: &str = "request cancelled";

/// Action label for operations missing from the catalog.
const UNKNOWN_ACTION: &str = "invoke";

/// Resource label for operations missing from the catalog.
const UNKNOWN_RESOURCE: &str = "unknown";

/// Audit action for credentials rejected while parsing the `Authorization` header.
const HEADER_ACTION: &str = "authorization_header";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inbound tool call.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Declared credential scheme (`apikey`, `jwt`).
    pub credential_scheme: String,
    /// Raw credential.
    pub credential: String,
    /// Operation to run.
    pub operation_name: String,
    /// Operation arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Builds a call.
    #[must_use]
    pub fn new(
        credential_scheme: impl Into<String>,
        credential: impl Into<String>,
        operation_name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            credential_scheme: credential_scheme.into(),
            credential: credential.into(),
            operation_name: operation_name.into(),
            arguments,
        }
    }
}

impl fmt::Debug for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCall")
            .field("credential_scheme", &self.credential_scheme)
            .field("credential", &"<redacted>")
            .field("operation_name", &self.operation_name)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Pipeline stage that observed a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Credential verification.
    Authenticate,
    /// Permission decision.
    Authorize,
    /// Operation execution.
    Execute,
}

impl PipelineStage {
    /// Returns a stable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Authorize => "authorize",
            Self::Execute => "execute",
        }
    }
}

/// Operation facts derived once per request.
struct RequestContext<'a> {
    /// Required permission.
    permission: &'a Permission,
    /// Action label.
    action: &'a str,
    /// Resource label.
    resource: &'a str,
    /// Target namespace.
    namespace: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pre-execution and cancellation failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential did not verify.
    #[error("authentication failed")]
    Authentication(#[source] AuthError),
    /// Policy denied the call.
    #[error("access denied")]
    Authorization(#[source] AuthzDenial),
    /// Arguments were rejected.
    #[error("input validation failed")]
    Validation(ValidationResult),
    /// The request was cancelled.
    #[error("request cancelled")]
    Cancelled(PipelineStage),
}

impl GatewayError {
    /// Renders the error as the synthetic result returned to callers.
    #[must_use]
    pub fn into_result(self) -> ExecutionResult {
        match self {
            Self::Authentication(_) => {
                ExecutionResult::failed("Authentication failed", "authentication failed")
            }
            Self::Authorization(_) => ExecutionResult::failed("Access denied", "access denied"),
            Self::Validation(result) => {
                let details = serde_json::to_value(&result.errors).unwrap_or_default();
                ExecutionResult::failed("Input validation failed", result.summary())
                    .with_data("validationErrors", details)
            }
            Self::Cancelled(stage) => ExecutionResult::failed("Request cancelled", CANCELLED_MESSAGE)
                .with_data("stage", Value::from(stage.label())),
        }
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Components wired into the middleware.
pub struct MiddlewareParts {
    /// Scheme dispatcher.
    pub authenticator: Arc<MultiAuthenticator>,
    /// Policy decisions.
    pub enforcer: RbacEnforcer,
    /// Argument checks.
    pub validator: InputValidator,
    /// Handler dispatch.
    pub executor: ToolExecutor,
    /// Audit trail.
    pub audit: AuditLogger,
    /// Operation catalog.
    pub catalog: Arc<OperationCatalog>,
    /// Namespace used when a call omits one.
    pub default_namespace: String,
}

/// Single entry point for tool calls.
pub struct SecurityMiddleware {
    /// Scheme dispatcher.
    authenticator: Arc<MultiAuthenticator>,
    /// Policy decisions.
    enforcer: RbacEnforcer,
    /// Argument checks.
    validator: InputValidator,
    /// Handler dispatch.
    executor: ToolExecutor,
    /// Audit trail.
    audit: AuditLogger,
    /// Operation catalog.
    catalog: Arc<OperationCatalog>,
    /// Namespace used when a call omits one.
    default_namespace: String,
}

impl SecurityMiddleware {
    /// Assembles the middleware.
    #[must_use]
    pub fn new(parts: MiddlewareParts) -> Self {
        Self {
            authenticator: parts.authenticator,
            enforcer: parts.enforcer,
            validator: parts.validator,
            executor: parts.executor,
            audit: parts.audit,
            catalog: parts.catalog,
            default_namespace: parts.default_namespace,
        }
    }

    /// Returns the operation catalog.
    #[must_use]
    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Runs `call` through the pipeline and always returns a result.
    pub async fn handle(&self, call: &ToolCall, cancel: &CancellationToken) -> ExecutionResult {
        match self.process(call, cancel).await {
            Ok(result) => result,
            Err(err) => err.into_result(),
        }
    }

    /// Parses an `Authorization` header value, then runs the call through
    /// the pipeline. A header that does not parse is audited as a failed
    /// authentication for subject `unknown`.
    pub async fn handle_header(
        &self,
        header: &str,
        operation_name: &str,
        arguments: Map<String, Value>,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        match self.parse_header(header, operation_name) {
            Ok((scheme, credential)) => {
                let call = ToolCall::new(scheme, credential, operation_name, arguments);
                self.handle(&call, cancel).await
            }
            Err(err) => err.into_result(),
        }
    }

    /// Runs `call` through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when a stage before execution fails or the
    /// request is cancelled.
    pub async fn process(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, GatewayError> {
        let identity = self.authenticate(call, cancel).await?;
        let context = self.request_context(call);
        self.authorize(&identity, call, &context, cancel)?;
        let validation = self.validator.validate(&call.operation_name, &call.arguments);
        if !validation.valid {
            debug!(
                operation = %call.operation_name,
                subject = %identity.subject,
                errors = validation.errors.len(),
                "input validation failed"
            );
            return Err(GatewayError::Validation(validation));
        }
        self.execute(&identity, call, &context, cancel).await
    }

    /// Splits the header into scheme and credential, auditing rejections.
    fn parse_header(
        &self,
        header: &str,
        operation_name: &str,
    ) -> Result<(String, String), GatewayError> {
        parse_authorization_header(header, self.authenticator.max_credential_bytes()).map_err(
            |err| {
                warn!(operation = %operation_name, reason = err.kind(), "authorization header rejected");
                self.audit.record(
                    &authentication_event(UNKNOWN_SUBJECT, HEADER_ACTION, AuditResult::Failure)
                        .with_error(err.to_string())
                        .with_metadata("operation", operation_name)
                        .with_metadata("error_kind", err.kind()),
                );
                GatewayError::Authentication(err)
            },
        )
    }

    /// Authenticates the caller and audits the attempt.
    async fn authenticate(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<Identity, GatewayError> {
        let scheme = call.credential_scheme.as_str();
        let outcome = if cancel.is_cancelled() {
            None
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                outcome = self.authenticator.authenticate(scheme, &call.credential) => Some(outcome),
            }
        };
        let Some(outcome) = outcome else {
            self.audit.record(
                &authentication_event(UNKNOWN_SUBJECT, scheme, AuditResult::Error)
                    .with_error(CANCELLED_MESSAGE)
                    .with_metadata("operation", call.operation_name.as_str()),
            );
            return Err(GatewayError::Cancelled(PipelineStage::Authenticate));
        };
        match outcome {
            Ok(identity) => {
                self.audit.record(
                    &authentication_event(&identity.subject, scheme, AuditResult::Success)
                        .with_metadata("operation", call.operation_name.as_str()),
                );
                Ok(identity)
            }
            Err(err) => {
                warn!(scheme, operation = %call.operation_name, reason = err.kind(), "authentication failed");
                self.audit.record(
                    &authentication_event(UNKNOWN_SUBJECT, scheme, AuditResult::Failure)
                        .with_error(err.to_string())
                        .with_metadata("operation", call.operation_name.as_str())
                        .with_metadata("error_kind", err.kind()),
                );
                Err(GatewayError::Authentication(err))
            }
        }
    }

    /// Derives permission, labels, and namespace for the call.
    fn request_context(&self, call: &ToolCall) -> RequestContext<'_> {
        let namespace = call
            .arguments
            .get(FIELD_NAMESPACE)
            .and_then(Value::as_str)
            .filter(|namespace| !namespace.is_empty())
            .map_or_else(|| self.default_namespace.clone(), str::to_string);
        match self.catalog.get(&call.operation_name) {
            Some(entry) => RequestContext {
                permission: &entry.permission,
                action: &entry.descriptor.action,
                resource: &entry.descriptor.resource,
                namespace,
            },
            None => RequestContext {
                permission: self.catalog.fallback_permission(),
                action: UNKNOWN_ACTION,
                resource: UNKNOWN_RESOURCE,
                namespace,
            },
        }
    }

    /// Authorizes the call and audits the decision.
    fn authorize(
        &self,
        identity: &Identity,
        call: &ToolCall,
        context: &RequestContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<(), GatewayError> {
        let event = |result| {
            authorization_event(
                &identity.subject,
                context.action,
                context.resource,
                &context.namespace,
                result,
            )
            .with_metadata("operation", call.operation_name.as_str())
            .with_metadata("permission", context.permission.as_str())
        };
        if cancel.is_cancelled() {
            self.audit.record(&event(AuditResult::Error).with_error(CANCELLED_MESSAGE));
            return Err(GatewayError::Cancelled(PipelineStage::Authorize));
        }
        match self.enforcer.authorize(identity, context.permission, &context.namespace) {
            AuthzDecision::Allow(grant) => {
                debug!(
                    subject = %identity.subject,
                    permission = %context.permission,
                    match_kind = grant.match_kind.label(),
                    "access granted"
                );
                let mut record =
                    event(AuditResult::Success).with_metadata("match_kind", grant.match_kind.label());
                if let Some(role) = grant.role {
                    record = record.with_metadata("role", role);
                }
                self.audit.record(&record);
                Ok(())
            }
            AuthzDecision::Deny(denial) => {
                warn!(
                    subject = %identity.subject,
                    permission = %context.permission,
                    namespace = %context.namespace,
                    reason = denial.reason(),
                    "access denied"
                );
                self.audit.record(
                    &event(AuditResult::Failure)
                        .with_error(denial.to_string())
                        .with_metadata("reason", denial.reason()),
                );
                Err(GatewayError::Authorization(denial))
            }
        }
    }

    /// Executes the call and records exactly one execution event.
    async fn execute(
        &self,
        identity: &Identity,
        call: &ToolCall,
        context: &RequestContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, GatewayError> {
        let started = Instant::now();
        let result = if cancel.is_cancelled() {
            None
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = self.executor.execute(&call.operation_name, &call.arguments) => Some(result),
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = |outcome| {
            execution_event(
                &identity.subject,
                context.action,
                context.resource,
                &context.namespace,
                outcome,
                duration_ms,
            )
            .with_metadata("operation", call.operation_name.as_str())
        };
        let Some(result) = result else {
            self.audit.record(&event(AuditResult::Error).with_error(CANCELLED_MESSAGE));
            return Err(GatewayError::Cancelled(PipelineStage::Execute));
        };
        let record = match &result.error {
            None if result.success => event(AuditResult::Success),
            Some(error) => event(AuditResult::Failure).with_error(error.as_str()),
            None => event(AuditResult::Failure),
        };
        self.audit.record(&record);
        Ok(result)
    }
}
