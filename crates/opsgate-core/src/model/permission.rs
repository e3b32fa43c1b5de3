// crates/opsgate-core/src/model/permission.rs
// ============================================================================
// Module: OpsGate Permissions
// Description: Required permissions, granted permission patterns, and namespace scopes.
// Purpose: Parse permission text once into tagged values for allocation-free matching.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Required permissions have the shape `domain:resource:verb`. Granted
//! permissions are either exact strings or wildcard patterns ending in `*`:
//! `infra:*` is a domain wildcard, any other trailing `*` (including a bare
//! `*`) is a prefix wildcard. Matching is case-sensitive and prefix-based.
//!
//! Identity permission entries may also reference roles (`role:developer`, or
//! a bare name without a colon); those are resolved against the policy store
//! at authorization time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Wildcard marker for permissions and namespace patterns.
pub const WILDCARD: char = '*';

/// Segment separator in permission strings.
pub const PERMISSION_SEPARATOR: char = ':';

/// Prefix marking a role reference in identity permissions.
pub const ROLE_REFERENCE_PREFIX: &str = "role:";

/// Maximum accepted length of a permission or pattern string.
pub const MAX_PERMISSION_LENGTH: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing permission text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Permission or pattern text was empty.
    #[error("permission must be non-empty")]
    Empty,
    /// Permission text exceeded the length limit.
    #[error("permission exceeds max length")]
    TooLong,
    /// Required permission did not have three non-empty segments.
    #[error("permission must have the form domain:resource:verb: {0}")]
    Malformed(String),
    /// Wildcard appeared anywhere but the final position.
    #[error("wildcard is only allowed as the final character: {0}")]
    MisplacedWildcard(String),
}

// ============================================================================
// SECTION: Required Permission
// ============================================================================

/// A concrete permission an operation requires.
///
/// # Invariants
/// - Exactly three non-empty, colon-separated segments.
/// - Contains no wildcard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    /// Full permission text.
    value: String,
    /// Byte offset of the first separator.
    domain_end: usize,
}

impl Permission {
    /// Parses a `domain:resource:verb` permission.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the text is empty, too long, contains
    /// a wildcard, or does not have three non-empty segments.
    pub fn parse(raw: &str) -> Result<Self, PermissionError> {
        check_length(raw)?;
        if raw.contains(WILDCARD) {
            return Err(PermissionError::MisplacedWildcard(raw.to_string()));
        }
        let segments: Vec<&str> = raw.split(PERMISSION_SEPARATOR).collect();
        if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(PermissionError::Malformed(raw.to_string()));
        }
        Ok(Self {
            value: raw.to_string(),
            domain_end: segments[0].len(),
        })
    }

    /// Builds a permission from its three segments.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when any segment is empty or malformed.
    pub fn from_parts(domain: &str, resource: &str, verb: &str) -> Result<Self, PermissionError> {
        Self::parse(&format!("{domain}:{resource}:{verb}"))
    }

    /// Returns the full permission text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the domain segment.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.value[.. self.domain_end]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.value
    }
}

// ============================================================================
// SECTION: Granted Permissions
// ============================================================================

/// How a granted permission satisfied a required one.
///
/// Ordered by precedence: exact beats domain wildcard beats prefix wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identical permission text.
    Exact,
    /// `domain:*` covering the required domain.
    DomainWildcard,
    /// Trailing-`*` pattern whose prefix strictly prefixes the requirement.
    PrefixWildcard,
}

impl MatchKind {
    /// Returns a stable label for logs and audit metadata.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::DomainWildcard => "domain_wildcard",
            Self::PrefixWildcard => "prefix_wildcard",
        }
    }
}

/// A granted permission, parsed once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionGrant {
    /// Exact permission text.
    Exact(String),
    /// `domain:*`.
    DomainWildcard {
        /// Domain covered by the wildcard.
        domain: String,
    },
    /// Any other pattern ending in `*`; the prefix excludes the `*`.
    PrefixWildcard {
        /// Text preceding the wildcard (empty for a bare `*`).
        prefix: String,
    },
}

impl PermissionGrant {
    /// Parses granted permission text.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the text is empty, too long, or has a
    /// wildcard before the final character.
    pub fn parse(raw: &str) -> Result<Self, PermissionError> {
        check_length(raw)?;
        let Some(prefix) = raw.strip_suffix(WILDCARD) else {
            if raw.contains(WILDCARD) {
                return Err(PermissionError::MisplacedWildcard(raw.to_string()));
            }
            return Ok(Self::Exact(raw.to_string()));
        };
        if prefix.contains(WILDCARD) {
            return Err(PermissionError::MisplacedWildcard(raw.to_string()));
        }
        if let Some(domain) = prefix.strip_suffix(PERMISSION_SEPARATOR) {
            if !domain.is_empty() && !domain.contains(PERMISSION_SEPARATOR) {
                return Ok(Self::DomainWildcard {
                    domain: domain.to_string(),
                });
            }
        }
        Ok(Self::PrefixWildcard {
            prefix: prefix.to_string(),
        })
    }

    /// Returns how this grant satisfies `required`, if it does.
    #[must_use]
    pub fn matches(&self, required: &Permission) -> Option<MatchKind> {
        match self {
            Self::Exact(value) => (value == required.as_str()).then_some(MatchKind::Exact),
            Self::DomainWildcard {
                domain,
            } => (domain == required.domain()).then_some(MatchKind::DomainWildcard),
            Self::PrefixWildcard {
                prefix,
            } => {
                let text = required.as_str();
                (text.len() > prefix.len() && text.starts_with(prefix.as_str()))
                    .then_some(MatchKind::PrefixWildcard)
            }
        }
    }
}

impl fmt::Display for PermissionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => f.write_str(value),
            Self::DomainWildcard {
                domain,
            } => write!(f, "{domain}:*"),
            Self::PrefixWildcard {
                prefix,
            } => write!(f, "{prefix}*"),
        }
    }
}

// ============================================================================
// SECTION: Identity Entitlements
// ============================================================================

/// One parsed entry from an identity's permission list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entitlement {
    /// A directly held permission, valid in every namespace.
    Grant(PermissionGrant),
    /// A reference to a named role in the policy store.
    Role(String),
}

impl Entitlement {
    /// Parses an identity permission entry.
    ///
    /// `role:<name>` and colon-free names (other than `*`) are role
    /// references; everything else is a permission grant.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when a grant is malformed or a role
    /// reference names nothing.
    pub fn parse(raw: &str) -> Result<Self, PermissionError> {
        check_length(raw)?;
        if let Some(role) = raw.strip_prefix(ROLE_REFERENCE_PREFIX) {
            if role.is_empty() {
                return Err(PermissionError::Empty);
            }
            return Ok(Self::Role(role.to_string()));
        }
        if !raw.contains(PERMISSION_SEPARATOR) && !raw.contains(WILDCARD) {
            return Ok(Self::Role(raw.to_string()));
        }
        PermissionGrant::parse(raw).map(Self::Grant)
    }
}

// ============================================================================
// SECTION: Namespace Patterns
// ============================================================================

/// Namespace pattern attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespacePattern {
    /// `*`: every namespace.
    Any,
    /// Exact namespace name.
    Exact(String),
    /// Trailing-wildcard pattern such as `feature-*`; stores the prefix.
    Prefix(String),
}

impl NamespacePattern {
    /// Parses a namespace pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the pattern is empty, too long, or
    /// has a wildcard before the final character.
    pub fn parse(raw: &str) -> Result<Self, PermissionError> {
        check_length(raw)?;
        match raw.strip_suffix(WILDCARD) {
            Some("") => Ok(Self::Any),
            Some(prefix) if prefix.contains(WILDCARD) => {
                Err(PermissionError::MisplacedWildcard(raw.to_string()))
            }
            Some(prefix) => Ok(Self::Prefix(prefix.to_string())),
            None if raw.contains(WILDCARD) => {
                Err(PermissionError::MisplacedWildcard(raw.to_string()))
            }
            None => Ok(Self::Exact(raw.to_string())),
        }
    }

    /// Returns true when `namespace` falls under this pattern.
    #[must_use]
    pub fn matches(&self, namespace: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(value) => value == namespace,
            Self::Prefix(prefix) => namespace.starts_with(prefix.as_str()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects empty or oversized permission text.
fn check_length(raw: &str) -> Result<(), PermissionError> {
    if raw.is_empty() {
        return Err(PermissionError::Empty);
    }
    if raw.len() > MAX_PERMISSION_LENGTH {
        return Err(PermissionError::TooLong);
    }
    Ok(())
}
