// crates/opsgate-gateway/src/catalog.rs
// ============================================================================
// Module: Operation Catalog
// Description: Compiled, immutable table of operation descriptors.
// Purpose: Resolve operation names to required permissions and field rules.
// Dependencies: opsgate-core, regex, thiserror
// ============================================================================

//! ## Overview
//! The catalog is built once at startup from the built-in operations or the
//! configured `[[operations]]` table. Required permissions are parsed and
//! field patterns compiled up front so request handling never fails on a
//! malformed descriptor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use opsgate_core::FieldSpec;
use opsgate_core::OperationDescriptor;
use opsgate_core::Permission;
use opsgate_core::PermissionError;
use opsgate_core::builtin_operations;
use regex::Regex;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource segment of the permission required for unknown operations.
const UNKNOWN_RESOURCE: &str = "unknown";

/// Verb segment of the permission required for unknown operations.
const UNKNOWN_VERB: &str = "invoke";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog construction errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two descriptors share a name.
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),
    /// A required permission did not parse.
    #[error("operation {operation}: {source}")]
    InvalidPermission {
        /// Operation name.
        operation: String,
        /// Parse failure.
        source: PermissionError,
    },
    /// A field pattern did not compile.
    #[error("operation {operation} field {field}: invalid pattern: {message}")]
    InvalidPattern {
        /// Operation name.
        operation: String,
        /// Field name.
        field: String,
        /// Compiler message.
        message: String,
    },
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Field declaration with its compiled pattern.
#[derive(Debug, Clone)]
pub struct CompiledField {
    /// Declaration.
    pub spec: FieldSpec,
    /// Compiled `spec.pattern`.
    pub pattern: Option<Regex>,
}

/// One resolved operation.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Source descriptor.
    pub descriptor: OperationDescriptor,
    /// Required permission.
    pub permission: Permission,
    /// Fields in declaration order.
    pub fields: Vec<CompiledField>,
}

/// Immutable operation lookup table.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    /// Entries by operation name.
    entries: BTreeMap<String, Arc<CatalogEntry>>,
    /// Permission domain.
    domain: String,
    /// Permission required when the operation is unknown.
    fallback: Permission,
}

impl OperationCatalog {
    /// Compiles `descriptors` for permission `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate names, malformed permissions, or
    /// invalid patterns.
    pub fn new(domain: &str, descriptors: Vec<OperationDescriptor>) -> Result<Self, CatalogError> {
        let fallback = Permission::from_parts(domain, UNKNOWN_RESOURCE, UNKNOWN_VERB).map_err(
            |source| CatalogError::InvalidPermission {
                operation: UNKNOWN_RESOURCE.to_string(),
                source,
            },
        )?;
        let mut entries = BTreeMap::new();
        for descriptor in descriptors {
            let entry = compile_entry(domain, descriptor)?;
            let name = entry.descriptor.name.clone();
            if entries.insert(name.clone(), Arc::new(entry)).is_some() {
                return Err(CatalogError::DuplicateOperation(name));
            }
        }
        Ok(Self {
            entries,
            domain: domain.to_string(),
            fallback,
        })
    }

    /// Compiles the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when `domain` is not a valid permission segment.
    pub fn builtin(domain: &str) -> Result<Self, CatalogError> {
        Self::new(domain, builtin_operations())
    }

    /// Looks up an operation.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(name)
    }

    /// Returns operation names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns the permission domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the permission required for `name`, falling back to
    /// `<domain>:unknown:invoke` for unknown operations.
    #[must_use]
    pub fn required_permission(&self, name: &str) -> &Permission {
        self.entries.get(name).map_or(&self.fallback, |entry| &entry.permission)
    }

    /// Returns the permission required for unknown operations.
    #[must_use]
    pub const fn fallback_permission(&self) -> &Permission {
        &self.fallback
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves one descriptor.
fn compile_entry(domain: &str, descriptor: OperationDescriptor) -> Result<CatalogEntry, CatalogError> {
    let permission = descriptor.required_permission(domain).map_err(|source| {
        CatalogError::InvalidPermission {
            operation: descriptor.name.clone(),
            source,
        }
    })?;
    let fields = descriptor
        .fields
        .iter()
        .map(|spec| {
            let pattern = spec
                .pattern
                .as_deref()
                .map(Regex::new)
                .transpose()
                .map_err(|err| CatalogError::InvalidPattern {
                    operation: descriptor.name.clone(),
                    field: spec.name.clone(),
                    message: err.to_string(),
                })?;
            Ok(CompiledField {
                spec: spec.clone(),
                pattern,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;
    Ok(CatalogEntry {
        descriptor,
        permission,
        fields,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use opsgate_core::FieldType;

    use super::*;

    #[test]
    fn builtin_catalog_derives_domain_permissions() {
        let catalog = OperationCatalog::builtin("infra").unwrap();
        assert_eq!(catalog.names().len(), 6);
        assert_eq!(catalog.required_permission("scaleDeployment").as_str(), "infra:deployments:scale");
        assert_eq!(catalog.required_permission("listPods").as_str(), "infra:pods:list");
        assert_eq!(catalog.required_permission("dropTables").as_str(), "infra:unknown:invoke");
    }

    #[test]
    fn duplicate_and_bad_pattern_are_rejected() {
        let mut ops = builtin_operations();
        ops.push(ops[0].clone());
        assert!(matches!(
            OperationCatalog::new("infra", ops),
            Err(CatalogError::DuplicateOperation(name)) if name == "scaleDeployment"
        ));

        let mut ops = builtin_operations();
        ops[0].fields.push(FieldSpec::new("bad", FieldType::String, false).with_pattern("("));
        assert!(matches!(
            OperationCatalog::new("infra", ops),
            Err(CatalogError::InvalidPattern { field, .. }) if field == "bad"
        ));
    }
}
