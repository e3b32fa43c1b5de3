// crates/opsgate-core/src/model/mod.rs
// ============================================================================
// Module: OpsGate Core Types
// Description: Canonical identity, policy, operation, and audit structures.
// Purpose: Provide stable, serializable types for the OpsGate gateway.
// Dependencies: serde, serde_json, sha2
// ============================================================================

//! ## Overview
//! These types are the canonical source of truth for every OpsGate surface.
//! Permission strings are parsed into tagged grants once, when identities or
//! policies are constructed, so authorization never re-parses text.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod execution;
pub mod hashing;
pub mod identity;
pub mod operation;
pub mod permission;
pub mod policy;
pub mod time;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEvent;
pub use audit::AuditEventType;
pub use audit::AuditResult;
pub use execution::ExecutionResult;
pub use hashing::mask_secret;
pub use identity::Identity;
pub use identity::UNKNOWN_SUBJECT;
pub use operation::FieldSpec;
pub use operation::FieldType;
pub use operation::OperationDescriptor;
pub use operation::builtin_operations;
pub use permission::Entitlement;
pub use permission::MatchKind;
pub use permission::NamespacePattern;
pub use permission::Permission;
pub use permission::PermissionError;
pub use permission::PermissionGrant;
pub use policy::PolicyDocument;
pub use policy::PolicyError;
pub use policy::Role;
pub use policy::RoleDefinition;
pub use time::Timestamp;
pub use validation::FieldError;
pub use validation::ValidationResult;
