// crates/opsgate-core/tests/policy.rs
// ============================================================================
// Module: Role Policy Tests
// Description: Unit tests for policy compilation and operation descriptors.
// Purpose: Ensure malformed policies fail closed and the catalog is coherent.
// ============================================================================

//! Policy compilation and operation catalog tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use std::collections::BTreeSet;

use opsgate_core::PolicyDocument;
use opsgate_core::PolicyError;
use opsgate_core::RoleDefinition;
use opsgate_core::builtin_operations;

fn role(name: &str, permissions: &[&str], namespaces: &[&str]) -> RoleDefinition {
    RoleDefinition {
        name: name.to_string(),
        description: String::new(),
        permissions: permissions.iter().map(ToString::to_string).collect(),
        namespaces: namespaces.iter().map(ToString::to_string).collect(),
    }
}

#[test]
fn compile_preserves_order_and_scope() {
    let document = PolicyDocument {
        roles: vec![
            role("admin", &["infra:*"], &[]),
            role("developer", &["infra:pods:*"], &["dev-*", "staging"]),
        ],
    };
    let roles = document.compile().unwrap();
    assert_eq!(roles[0].name, "admin");
    assert!(!roles[0].is_namespace_scoped());
    assert!(roles[0].allows_namespace("production"));
    assert!(roles[1].allows_namespace("dev-team1"));
    assert!(roles[1].allows_namespace("staging"));
    assert!(!roles[1].allows_namespace("production"));
}

#[test]
fn compile_rejects_duplicate_roles() {
    let document = PolicyDocument {
        roles: vec![role("ops", &["infra:*"], &[]), role("ops", &["infra:pods:list"], &[])],
    };
    assert_eq!(document.compile(), Err(PolicyError::DuplicateRole("ops".to_string())));
}

#[test]
fn compile_rejects_malformed_patterns() {
    let document = PolicyDocument {
        roles: vec![role("broken", &["infra:*:scale"], &[])],
    };
    assert!(matches!(document.compile(), Err(PolicyError::InvalidPattern { .. })));
    let document = PolicyDocument {
        roles: vec![role("broken", &["infra:*"], &["de*v"])],
    };
    assert!(matches!(document.compile(), Err(PolicyError::InvalidPattern { .. })));
}

#[test]
fn policy_document_parses_from_json() {
    let document: PolicyDocument = serde_json::from_str(
        r#"{"roles":[{"name":"viewer","permissions":["infra:pods:list"],"namespaces":["*"]}]}"#,
    )
    .unwrap();
    assert_eq!(document.roles.len(), 1);
    assert_eq!(document.roles[0].namespaces, vec!["*".to_string()]);
}

#[test]
fn builtin_catalog_has_unique_names_and_valid_permissions() {
    let operations = builtin_operations();
    let names: BTreeSet<&str> = operations.iter().map(|op| op.name.as_str()).collect();
    assert_eq!(names.len(), operations.len());
    for operation in &operations {
        let permission = operation.required_permission("infra").unwrap();
        assert_eq!(permission.domain(), "infra");
        assert!(operation.field("confirm").is_none());
    }
}

#[test]
fn builtin_scale_requires_deployment_scale_permission() {
    let operations = builtin_operations();
    let scale = operations.iter().find(|op| op.name == "scaleDeployment").unwrap();
    assert!(scale.destructive);
    assert_eq!(scale.required_permission("infra").unwrap().as_str(), "infra:deployments:scale");
    let replicas = scale.field("replicas").unwrap();
    assert_eq!((replicas.minimum, replicas.maximum), (Some(0), Some(100)));
}
