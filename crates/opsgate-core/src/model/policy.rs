// crates/opsgate-core/src/model/policy.rs
// ============================================================================
// Module: OpsGate Role Policy
// Description: Role definitions and their compiled form.
// Purpose: Turn role documents into parsed grants and namespace scopes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A policy document is an ordered list of roles. Each role carries a set of
//! permission patterns and optional namespace patterns; a role without
//! namespace patterns applies everywhere. Compilation parses every pattern
//! once and rejects duplicate role names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::permission::NamespacePattern;
use crate::model::permission::PermissionError;
use crate::model::permission::PermissionGrant;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when compiling a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Role name was empty.
    #[error("role name must be non-empty")]
    EmptyRoleName,
    /// Two roles share a name.
    #[error("duplicate role: {0}")]
    DuplicateRole(String),
    /// A role carried an unparseable permission or namespace pattern.
    #[error("role {role}: {source}")]
    InvalidPattern {
        /// Role name.
        role: String,
        /// Underlying parse error.
        source: PermissionError,
    },
}

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Role as written in a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDefinition {
    /// Role name, referenced by identities as `role:<name>`.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Permission patterns.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Namespace patterns; empty means all namespaces.
    #[serde(default)]
    pub namespaces: Vec<String>,
}

/// Ordered list of role definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Role definitions.
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}

impl PolicyDocument {
    /// Compiles every role, preserving document order.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] on duplicate names or malformed patterns.
    pub fn compile(&self) -> Result<Vec<Role>, PolicyError> {
        let mut seen = BTreeSet::new();
        let mut roles = Vec::with_capacity(self.roles.len());
        for definition in &self.roles {
            if !seen.insert(definition.name.as_str()) {
                return Err(PolicyError::DuplicateRole(definition.name.clone()));
            }
            roles.push(Role::compile(definition)?);
        }
        Ok(roles)
    }
}

// ============================================================================
// SECTION: Compiled Roles
// ============================================================================

/// Role with parsed grants and namespace scope.
///
/// # Invariants
/// - `name` is non-empty.
/// - An empty `namespaces` list means the role is cluster-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Parsed permission grants.
    pub grants: Vec<PermissionGrant>,
    /// Parsed namespace patterns.
    pub namespaces: Vec<NamespacePattern>,
}

impl Role {
    /// Compiles a single role definition.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the name is empty or a pattern is
    /// malformed.
    pub fn compile(definition: &RoleDefinition) -> Result<Self, PolicyError> {
        if definition.name.trim().is_empty() {
            return Err(PolicyError::EmptyRoleName);
        }
        let invalid = |source| PolicyError::InvalidPattern {
            role: definition.name.clone(),
            source,
        };
        let grants = definition
            .permissions
            .iter()
            .map(|raw| PermissionGrant::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let namespaces = definition
            .namespaces
            .iter()
            .map(|raw| NamespacePattern::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        Ok(Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            grants,
            namespaces,
        })
    }

    /// Returns true when the role restricts namespaces.
    #[must_use]
    pub fn is_namespace_scoped(&self) -> bool {
        !self.namespaces.is_empty()
    }

    /// Returns true when the role applies to `namespace`.
    #[must_use]
    pub fn allows_namespace(&self, namespace: &str) -> bool {
        !self.is_namespace_scoped()
            || self.namespaces.iter().any(|pattern| pattern.matches(namespace))
    }
}
