// crates/opsgate-core/tests/proptest_permission.rs
// ============================================================================
// Module: Permission Property-Based Tests
// Description: Property tests for wildcard grant matching.
// Purpose: Check matching invariants across generated permission strings.
// ============================================================================

//! Property-based tests for permission grant invariants.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use opsgate_core::Permission;
use opsgate_core::PermissionGrant;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

proptest! {
    #[test]
    fn domain_wildcard_covers_every_permission_in_domain(
        resource in segment(),
        verb in segment(),
    ) {
        let grant = PermissionGrant::parse("infra:*").unwrap();
        let required = Permission::from_parts("infra", &resource, &verb).unwrap();
        prop_assert!(grant.matches(&required).is_some());
    }

    #[test]
    fn exact_grant_matches_only_itself(
        a in (segment(), segment(), segment()),
        b in (segment(), segment(), segment()),
    ) {
        let left = Permission::from_parts(&a.0, &a.1, &a.2).unwrap();
        let right = Permission::from_parts(&b.0, &b.1, &b.2).unwrap();
        let grant = PermissionGrant::parse(left.as_str()).unwrap();
        prop_assert_eq!(grant.matches(&right).is_some(), left == right);
    }

    #[test]
    fn foreign_domain_wildcard_never_matches(
        domain in segment(),
        resource in segment(),
        verb in segment(),
    ) {
        prop_assume!(domain != "infra");
        let grant = PermissionGrant::parse("infra:*").unwrap();
        let required = Permission::from_parts(&domain, &resource, &verb).unwrap();
        prop_assert!(grant.matches(&required).is_none());
    }

    #[test]
    fn grant_parsing_never_panics(raw in ".{0,64}") {
        let _ = PermissionGrant::parse(&raw);
        let _ = Permission::parse(&raw);
    }
}
