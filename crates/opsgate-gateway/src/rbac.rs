// crates/opsgate-gateway/src/rbac.rs
// ============================================================================
// Module: RBAC Enforcer
// Description: Policy snapshots and permission/namespace authorization.
// Purpose: Decide whether an identity may perform an operation in a namespace.
// Dependencies: opsgate-core, tracing
// ============================================================================

//! ## Overview
//! The [`PolicyStore`] holds an immutable [`PolicySnapshot`] behind a
//! reader/writer lock. Readers clone the `Arc` and release the lock
//! immediately; [`PolicyStore::replace`] swaps in a freshly compiled snapshot.
//!
//! [`RbacEnforcer::authorize`] evaluates every entitlement of an identity:
//! direct grants are unscoped; `role:<name>` references contribute the role's
//! grants under the role's namespace scope. The strongest match wins
//! (exact before domain wildcard before prefix wildcard) and an exact match
//! ends evaluation.
//!
//! Security posture: an unreadable policy denies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;

use opsgate_core::Entitlement;
use opsgate_core::Identity;
use opsgate_core::MatchKind;
use opsgate_core::Permission;
use opsgate_core::PolicyDocument;
use opsgate_core::PolicyError;
use opsgate_core::Role;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Policy Store
// ============================================================================

/// Compiled roles keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PolicySnapshot {
    /// Roles by name.
    roles: BTreeMap<String, Role>,
}

impl PolicySnapshot {
    /// Builds a snapshot from compiled roles.
    #[must_use]
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles: roles.into_iter().map(|role| (role.name.clone(), role)).collect(),
        }
    }

    /// Looks up a role.
    #[must_use]
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Returns the number of roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns true when no roles are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Policy store errors.
#[derive(Debug, Error)]
pub enum PolicyStoreError {
    /// The snapshot lock was poisoned.
    #[error("policy store unavailable")]
    Unavailable,
    /// The replacement document did not compile.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Copy-on-write holder for the active policy.
#[derive(Debug, Default)]
pub struct PolicyStore {
    /// Active snapshot.
    snapshot: RwLock<Arc<PolicySnapshot>>,
}

impl PolicyStore {
    /// Builds a store over compiled roles.
    #[must_use]
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(PolicySnapshot::new(roles))),
        }
    }

    /// Compiles `document` into a new store.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyStoreError::Policy`] when the document is invalid.
    pub fn from_document(document: &PolicyDocument) -> Result<Self, PolicyStoreError> {
        Ok(Self::new(document.compile()?))
    }

    /// Compiles `document` and swaps it in. In-flight decisions keep the
    /// snapshot they started with.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyStoreError`] when the document is invalid or the lock
    /// is poisoned; the active snapshot is unchanged.
    pub fn replace(&self, document: &PolicyDocument) -> Result<(), PolicyStoreError> {
        let next = Arc::new(PolicySnapshot::new(document.compile()?));
        let mut guard = self.snapshot.write().map_err(|_| PolicyStoreError::Unavailable)?;
        *guard = next;
        Ok(())
    }

    /// Returns the active snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyStoreError::Unavailable`] when the lock is poisoned.
    pub fn snapshot(&self) -> Result<Arc<PolicySnapshot>, PolicyStoreError> {
        self.snapshot.read().map(|guard| Arc::clone(&guard)).map_err(|_| PolicyStoreError::Unavailable)
    }
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Details of an allow decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzGrant {
    /// How the winning grant matched.
    pub match_kind: MatchKind,
    /// Role that supplied the grant; `None` for direct grants.
    pub role: Option<String>,
}

/// Reasons for a deny decision. Never shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzDenial {
    /// No grant matched the required permission.
    #[error("permission absent")]
    PermissionAbsent,
    /// A role grant matched but the role does not cover the namespace.
    #[error("namespace out of scope for role {role}")]
    NamespaceOutOfScope {
        /// Role whose grant matched.
        role: String,
    },
    /// The policy snapshot could not be read.
    #[error("policy unavailable")]
    PolicyUnavailable,
}

impl AuthzDenial {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::PermissionAbsent => "permission_absent",
            Self::NamespaceOutOfScope {
                ..
            } => "namespace_out_of_scope",
            Self::PolicyUnavailable => "policy_unavailable",
        }
    }
}

/// Authorization outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzDecision {
    /// The call may proceed.
    Allow(AuthzGrant),
    /// The call is refused.
    Deny(AuthzDenial),
}

impl AuthzDecision {
    /// Returns true for [`AuthzDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

// ============================================================================
// SECTION: Enforcer
// ============================================================================

/// Evaluates identities against the active policy.
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    /// Shared policy.
    policy: Arc<PolicyStore>,
}

impl RbacEnforcer {
    /// Builds an enforcer over `policy`.
    #[must_use]
    pub const fn new(policy: Arc<PolicyStore>) -> Self {
        Self {
            policy,
        }
    }

    /// Returns the underlying policy store.
    #[must_use]
    pub fn policy(&self) -> &Arc<PolicyStore> {
        &self.policy
    }

    /// Decides whether `identity` holds `required` in `namespace`.
    #[must_use]
    pub fn authorize(
        &self,
        identity: &Identity,
        required: &Permission,
        namespace: &str,
    ) -> AuthzDecision {
        let Ok(snapshot) = self.policy.snapshot() else {
            return AuthzDecision::Deny(AuthzDenial::PolicyUnavailable);
        };
        let mut best: Option<AuthzGrant> = None;
        let mut out_of_scope: Option<String> = None;
        for entitlement in identity.entitlements() {
            let candidate = match entitlement {
                Entitlement::Grant(grant) => grant.matches(required).map(|match_kind| AuthzGrant {
                    match_kind,
                    role: None,
                }),
                Entitlement::Role(name) => {
                    let Some(role) = snapshot.role(name) else {
                        debug!(role = %name, subject = %identity.subject, "unknown role reference");
                        continue;
                    };
                    let Some(match_kind) =
                        role.grants.iter().filter_map(|grant| grant.matches(required)).min()
                    else {
                        continue;
                    };
                    if !role.allows_namespace(namespace) {
                        out_of_scope.get_or_insert_with(|| role.name.clone());
                        continue;
                    }
                    Some(AuthzGrant {
                        match_kind,
                        role: Some(role.name.clone()),
                    })
                }
            };
            let Some(candidate) = candidate else {
                continue;
            };
            if best.as_ref().is_none_or(|current| candidate.match_kind < current.match_kind) {
                best = Some(candidate);
            }
            if best.as_ref().is_some_and(|current| current.match_kind == MatchKind::Exact) {
                break;
            }
        }
        match (best, out_of_scope) {
            (Some(grant), _) => AuthzDecision::Allow(grant),
            (None, Some(role)) => AuthzDecision::Deny(AuthzDenial::NamespaceOutOfScope {
                role,
            }),
            (None, None) => AuthzDecision::Deny(AuthzDenial::PermissionAbsent),
        }
    }
}
