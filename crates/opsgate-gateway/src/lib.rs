// crates/opsgate-gateway/src/lib.rs
// ============================================================================
// Module: OpsGate Gateway Library
// Description: Policy-enforced tool-execution gateway for infrastructure calls.
// Purpose: Authenticate, authorize, validate, execute, and audit every tool call.
// Dependencies: opsgate-core, opsgate-config, jsonwebtoken, subtle, tokio, tracing
// ============================================================================

//! ## Overview
//! The gateway sits between an AI tool-calling client and the infrastructure
//! control plane. [`SecurityMiddleware`] is the only entry point callers use;
//! it runs each [`ToolCall`] through authentication, authorization, input
//! validation, execution, and audit, and always answers with an
//! [`opsgate_core::ExecutionResult`].
//!
//! Security posture: every stage fails closed. Callers learn only that
//! authentication failed or access was denied; the precise reason goes to
//! the audit trail.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod executor;
pub mod identity_store;
pub mod middleware;
pub mod rbac;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditLogger;
pub use audit::AuditSink;
pub use audit::MemoryAuditSink;
pub use auth::Authenticator;
pub use auth::AuthError;
pub use auth::MultiAuthenticator;
pub use auth::api_key::ApiKeyAuthenticator;
pub use auth::token::TokenAuthenticator;
pub use bootstrap::build_gateway;
pub use catalog::OperationCatalog;
pub use executor::CollaboratorError;
pub use executor::HandlerRegistry;
pub use executor::InfraCollaborator;
pub use executor::OperationTarget;
pub use executor::ToolExecutor;
pub use executor::TypedArguments;
pub use identity_store::CredentialRecord;
pub use identity_store::IdentityStore;
pub use identity_store::InMemoryIdentityStore;
pub use middleware::GatewayError;
pub use middleware::MiddlewareParts;
pub use middleware::SecurityMiddleware;
pub use middleware::ToolCall;
pub use rbac::AuthzDecision;
pub use rbac::PolicyStore;
pub use rbac::RbacEnforcer;
pub use validation::InputValidator;
