// crates/opsgate-core/tests/permission.rs
// ============================================================================
// Module: Permission Parsing Tests
// Description: Unit tests for required permissions, grants, and namespace patterns.
// Purpose: Pin down wildcard classification and matching precedence.
// ============================================================================

//! Permission parsing and matching tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use opsgate_core::Entitlement;
use opsgate_core::MatchKind;
use opsgate_core::NamespacePattern;
use opsgate_core::Permission;
use opsgate_core::PermissionError;
use opsgate_core::PermissionGrant;

fn required(raw: &str) -> Permission {
    Permission::parse(raw).unwrap()
}

#[test]
fn required_permission_needs_three_segments() {
    assert!(Permission::parse("infra:deployments:scale").is_ok());
    assert!(matches!(Permission::parse("infra:deployments"), Err(PermissionError::Malformed(_))));
    assert!(matches!(Permission::parse("infra::scale"), Err(PermissionError::Malformed(_))));
    assert!(matches!(Permission::parse("a:b:c:d"), Err(PermissionError::Malformed(_))));
    assert!(matches!(Permission::parse("infra:*"), Err(PermissionError::MisplacedWildcard(_))));
    assert_eq!(Permission::parse(""), Err(PermissionError::Empty));
}

#[test]
fn required_permission_exposes_domain() {
    assert_eq!(required("infra:pods:list").domain(), "infra");
}

#[test]
fn grant_parsing_classifies_wildcards() {
    assert_eq!(
        PermissionGrant::parse("infra:*").unwrap(),
        PermissionGrant::DomainWildcard {
            domain: "infra".to_string()
        }
    );
    assert_eq!(
        PermissionGrant::parse("infra:deployments:*").unwrap(),
        PermissionGrant::PrefixWildcard {
            prefix: "infra:deployments:".to_string()
        }
    );
    assert_eq!(
        PermissionGrant::parse("*").unwrap(),
        PermissionGrant::PrefixWildcard {
            prefix: String::new()
        }
    );
    assert_eq!(
        PermissionGrant::parse("infra:pods:list").unwrap(),
        PermissionGrant::Exact("infra:pods:list".to_string())
    );
    assert!(matches!(
        PermissionGrant::parse("infra:*:list"),
        Err(PermissionError::MisplacedWildcard(_))
    ));
}

#[test]
fn grant_matching_reports_kind() {
    let scale = required("infra:deployments:scale");
    assert_eq!(
        PermissionGrant::parse("infra:deployments:scale").unwrap().matches(&scale),
        Some(MatchKind::Exact)
    );
    assert_eq!(
        PermissionGrant::parse("infra:*").unwrap().matches(&scale),
        Some(MatchKind::DomainWildcard)
    );
    assert_eq!(
        PermissionGrant::parse("infra:deployments:*").unwrap().matches(&scale),
        Some(MatchKind::PrefixWildcard)
    );
    assert_eq!(PermissionGrant::parse("*").unwrap().matches(&scale), Some(MatchKind::PrefixWildcard));
    assert_eq!(PermissionGrant::parse("infra:pods:*").unwrap().matches(&scale), None);
    assert_eq!(PermissionGrant::parse("other:*").unwrap().matches(&scale), None);
}

#[test]
fn grant_matching_is_case_sensitive() {
    let scale = required("infra:deployments:scale");
    assert_eq!(PermissionGrant::parse("INFRA:*").unwrap().matches(&scale), None);
    assert_eq!(PermissionGrant::parse("infra:Deployments:scale").unwrap().matches(&scale), None);
}

#[test]
fn domain_wildcard_does_not_match_longer_domain() {
    let other = required("infrastructure:pods:list");
    assert_eq!(PermissionGrant::parse("infra:*").unwrap().matches(&other), None);
}

#[test]
fn match_kind_orders_exact_first() {
    assert!(MatchKind::Exact < MatchKind::DomainWildcard);
    assert!(MatchKind::DomainWildcard < MatchKind::PrefixWildcard);
}

#[test]
fn entitlement_parsing_recognizes_role_references() {
    assert_eq!(Entitlement::parse("role:admin").unwrap(), Entitlement::Role("admin".to_string()));
    assert_eq!(Entitlement::parse("viewer").unwrap(), Entitlement::Role("viewer".to_string()));
    assert!(matches!(Entitlement::parse("infra:*").unwrap(), Entitlement::Grant(_)));
    assert!(matches!(Entitlement::parse("*").unwrap(), Entitlement::Grant(_)));
    assert_eq!(Entitlement::parse("role:"), Err(PermissionError::Empty));
}

#[test]
fn namespace_patterns_match_exact_prefix_and_any() {
    let exact = NamespacePattern::parse("production").unwrap();
    let prefix = NamespacePattern::parse("dev-*").unwrap();
    let any = NamespacePattern::parse("*").unwrap();
    assert!(exact.matches("production"));
    assert!(!exact.matches("production-eu"));
    assert!(prefix.matches("dev-team1"));
    assert!(!prefix.matches("production"));
    assert!(any.matches("kube-system"));
    assert!(NamespacePattern::parse("d*v").is_err());
}
