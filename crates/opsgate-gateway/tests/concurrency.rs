// crates/opsgate-gateway/tests/concurrency.rs
// ============================================================================
// Module: Shared Store Concurrency Tests
// Description: Concurrent reads against policy and identity stores under writes.
// Purpose: Verify readers always observe a whole snapshot while writers swap it.
// Dependencies: opsgate-gateway, opsgate-core, tokio
// ============================================================================

//! Concurrency tests for the policy store and the identity store.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::use_debug,
    reason = "Test-only assertions use unwrap and debug output for clarity."
)]

mod common;

use std::sync::Arc;

use opsgate_core::Identity;
use opsgate_core::Permission;
use opsgate_core::PolicyDocument;
use opsgate_core::RoleDefinition;
use opsgate_gateway::AuthzDecision;
use opsgate_gateway::CredentialRecord;
use opsgate_gateway::IdentityStore;
use opsgate_gateway::PolicyStore;
use opsgate_gateway::RbacEnforcer;
use opsgate_gateway::rbac::AuthzDenial;

use crate::common::OPERATOR_KEY;
use crate::common::test_policy;
use crate::common::test_store;

const READERS: usize = 8;
const ROUNDS: usize = 200;

fn widened_policy() -> PolicyDocument {
    PolicyDocument {
        roles: vec![RoleDefinition {
            name: "developer".to_string(),
            description: String::new(),
            permissions: vec!["infra:pods:*".to_string(), "infra:deployments:*".to_string()],
            namespaces: Vec::new(),
        }],
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn policy_readers_see_whole_snapshots_during_replace() {
    let store = Arc::new(PolicyStore::from_document(&test_policy()).unwrap());
    let enforcer = Arc::new(RbacEnforcer::new(Arc::clone(&store)));
    let developer = Arc::new(Identity::new("apikey", "dev-bot", ["role:developer"]));
    let scale = Arc::new(Permission::parse("infra:deployments:scale").unwrap());

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for round in 0 .. ROUNDS {
                let document = if round % 2 == 0 { widened_policy() } else { test_policy() };
                store.replace(&document).unwrap();
                tokio::task::yield_now().await;
            }
        })
    };
    let readers: Vec<_> = (0 .. READERS)
        .map(|_| {
            let enforcer = Arc::clone(&enforcer);
            let developer = Arc::clone(&developer);
            let scale = Arc::clone(&scale);
            tokio::spawn(async move {
                for _ in 0 .. ROUNDS {
                    assert!(enforcer.authorize(&developer, &scale, "dev-team1").is_allowed());
                    match enforcer.authorize(&developer, &scale, "production") {
                        AuthzDecision::Allow(_) => {}
                        AuthzDecision::Deny(AuthzDenial::NamespaceOutOfScope {
                            role,
                        }) => assert_eq!(role, "developer"),
                        other => panic!("unexpected decision {other:?}"),
                    }
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert!(!enforcer.authorize(&developer, &scale, "production").is_allowed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn identity_lookups_proceed_while_keys_are_added_and_revoked() {
    let store = Arc::new(test_store());

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for round in 0 .. ROUNDS {
                let id = format!("rotating-{round}");
                let secret = format!("rot_live_{round:016}");
                store.insert(&secret, CredentialRecord::new(id.as_str(), "rotator", ["infra:pods:list"])).unwrap();
                store.revoke(&id).unwrap();
                tokio::task::yield_now().await;
            }
        })
    };
    let readers: Vec<_> = (0 .. READERS)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0 .. ROUNDS {
                    let record = store.lookup(OPERATOR_KEY).unwrap().unwrap();
                    assert_eq!(record.subject, "ops-bot");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert!(store.lookup("rot_live_0000000000000000").unwrap().is_none());
}
