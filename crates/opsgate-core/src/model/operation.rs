// crates/opsgate-core/src/model/operation.rs
// ============================================================================
// Module: OpsGate Operation Descriptors
// Description: Declarative description of each infrastructure operation.
// Purpose: Drive validation, permission derivation, and dispatch from one table.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`OperationDescriptor`] names an operation, the permission it requires,
//! its input fields with their constraints, and whether it is destructive.
//! Descriptors are immutable once the gateway starts. The built-in catalog
//! covers the six supported cluster operations; configuration may replace it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::model::permission::Permission;
use crate::model::permission::PermissionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scale a deployment.
pub const OP_SCALE_DEPLOYMENT: &str = "scaleDeployment";
/// Rolling restart of a deployment.
pub const OP_RESTART_DEPLOYMENT: &str = "restartDeployment";
/// Fetch pod logs.
pub const OP_GET_POD_LOGS: &str = "getPodLogs";
/// Create a config map.
pub const OP_CREATE_CONFIG_MAP: &str = "createConfigMap";
/// Delete a pod.
pub const OP_DELETE_POD: &str = "deletePod";
/// List pods in a namespace.
pub const OP_LIST_PODS: &str = "listPods";

/// Argument carrying the target namespace.
pub const FIELD_NAMESPACE: &str = "namespace";
/// Argument carrying the target resource name.
pub const FIELD_NAME: &str = "name";
/// Argument carrying the destructive-operation confirmation.
pub const FIELD_CONFIRM: &str = "confirm";

/// DNS-1123 label pattern used for namespaces and resource names.
pub const RESOURCE_NAME_PATTERN: &str = "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// Label key pattern: optional `prefix/` followed by a name segment.
pub const LABEL_KEY_PATTERN: &str = "^([a-zA-Z0-9]([a-zA-Z0-9._-]*[a-zA-Z0-9])?/)?[a-zA-Z0-9]([a-zA-Z0-9._-]*[a-zA-Z0-9])?$";

/// Maximum namespace length.
pub const MAX_NAMESPACE_LENGTH: usize = 63;
/// Maximum resource name length.
pub const MAX_RESOURCE_NAME_LENGTH: usize = 253;
/// Maximum label key length.
pub const MAX_LABEL_KEY_LENGTH: usize = 63;

/// Default number of log lines returned by `getPodLogs`.
pub const DEFAULT_TAIL_LINES: i64 = 100;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Declared type of an operation input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Whole number; JSON floats with an integral value are accepted.
    Integer,
    /// Boolean.
    Boolean,
    /// Object whose values are all strings.
    StringMap,
}

impl FieldType {
    /// Returns the type label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::StringMap => "an object with string values",
        }
    }
}

/// Input field declaration.
///
/// Constraints that do not apply to the field type are ignored. For
/// [`FieldType::StringMap`], `pattern` and `max_length` apply to keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Argument name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the argument must be present.
    #[serde(default)]
    pub required: bool,
    /// Regex the string value (or map key) must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Maximum string (or map key) length in bytes.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Inclusive integer lower bound.
    #[serde(default)]
    pub minimum: Option<i64>,
    /// Inclusive integer upper bound.
    #[serde(default)]
    pub maximum: Option<i64>,
    /// Whether an empty map is acceptable.
    #[serde(default = "default_allow_empty")]
    pub allow_empty: bool,
}

impl FieldSpec {
    /// Builds a field with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            pattern: None,
            max_length: None,
            minimum: None,
            maximum: None,
            allow_empty: true,
        }
    }

    /// Returns a copy with a regex constraint.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Returns a copy with a maximum length.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Returns a copy with inclusive integer bounds.
    #[must_use]
    pub const fn with_range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Returns a copy that rejects empty maps.
    #[must_use]
    pub const fn non_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }
}

/// Declarative description of one operation.
///
/// # Invariants
/// - `name` is unique within a catalog.
/// - `confirm` is never declared as a field; destructive operations check it
///   separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationDescriptor {
    /// Operation name as sent by callers.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Resource label (`deployments`, `pods`, ...).
    pub resource: String,
    /// Action label (`scale`, `delete`, ...).
    pub action: String,
    /// Explicit required permission; derived from domain, resource, and
    /// action when absent.
    #[serde(default)]
    pub permission: Option<String>,
    /// Whether the operation requires `confirm=true`.
    #[serde(default)]
    pub destructive: bool,
    /// Whether the operation targets a named resource.
    #[serde(default = "default_targets_resource")]
    pub targets_resource: bool,
    /// Declared input fields.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl OperationDescriptor {
    /// Returns the permission this operation requires in `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the explicit or derived permission is
    /// malformed.
    pub fn required_permission(&self, domain: &str) -> Result<Permission, PermissionError> {
        match &self.permission {
            Some(explicit) => Permission::parse(explicit),
            None => Permission::from_parts(domain, &self.resource, &self.action),
        }
    }

    /// Looks up a declared field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

// ============================================================================
// SECTION: Built-in Catalog
// ============================================================================

/// Returns the built-in operation catalog.
#[must_use]
pub fn builtin_operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor {
            name: OP_SCALE_DEPLOYMENT.to_string(),
            description: "Scale a deployment to a target replica count".to_string(),
            resource: "deployments".to_string(),
            action: "scale".to_string(),
            permission: None,
            destructive: true,
            targets_resource: true,
            fields: vec![
                namespace_field(),
                name_field(),
                FieldSpec::new("replicas", FieldType::Integer, true).with_range(0, 100),
            ],
        },
        OperationDescriptor {
            name: OP_RESTART_DEPLOYMENT.to_string(),
            description: "Trigger a rolling restart of a deployment".to_string(),
            resource: "deployments".to_string(),
            action: "restart".to_string(),
            permission: None,
            destructive: true,
            targets_resource: true,
            fields: vec![namespace_field(), name_field()],
        },
        OperationDescriptor {
            name: OP_GET_POD_LOGS.to_string(),
            description: "Fetch recent log lines from a pod container".to_string(),
            resource: "pods".to_string(),
            action: "logs".to_string(),
            permission: None,
            destructive: false,
            targets_resource: true,
            fields: vec![
                namespace_field(),
                name_field(),
                FieldSpec::new("container", FieldType::String, false)
                    .with_pattern(RESOURCE_NAME_PATTERN)
                    .with_max_length(MAX_NAMESPACE_LENGTH),
                FieldSpec::new("tailLines", FieldType::Integer, false).with_range(1, 10_000),
                FieldSpec::new("sinceSeconds", FieldType::Integer, false).with_range(1, 86_400),
            ],
        },
        OperationDescriptor {
            name: OP_CREATE_CONFIG_MAP.to_string(),
            description: "Create a config map from string key/value data".to_string(),
            resource: "configmaps".to_string(),
            action: "create".to_string(),
            permission: None,
            destructive: false,
            targets_resource: true,
            fields: vec![
                namespace_field(),
                name_field(),
                FieldSpec::new("data", FieldType::StringMap, true).non_empty(),
                FieldSpec::new("labels", FieldType::StringMap, false)
                    .with_pattern(LABEL_KEY_PATTERN)
                    .with_max_length(MAX_LABEL_KEY_LENGTH),
            ],
        },
        OperationDescriptor {
            name: OP_DELETE_POD.to_string(),
            description: "Delete a pod".to_string(),
            resource: "pods".to_string(),
            action: "delete".to_string(),
            permission: None,
            destructive: true,
            targets_resource: true,
            fields: vec![
                namespace_field(),
                name_field(),
                FieldSpec::new("force", FieldType::Boolean, false),
            ],
        },
        OperationDescriptor {
            name: OP_LIST_PODS.to_string(),
            description: "List pods in a namespace".to_string(),
            resource: "pods".to_string(),
            action: "list".to_string(),
            permission: None,
            destructive: false,
            targets_resource: false,
            fields: vec![namespace_field()],
        },
    ]
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Namespace field shared by every built-in operation.
fn namespace_field() -> FieldSpec {
    FieldSpec::new(FIELD_NAMESPACE, FieldType::String, true)
        .with_pattern(RESOURCE_NAME_PATTERN)
        .with_max_length(MAX_NAMESPACE_LENGTH)
}

/// Resource name field shared by targeted operations.
fn name_field() -> FieldSpec {
    FieldSpec::new(FIELD_NAME, FieldType::String, true)
        .with_pattern(RESOURCE_NAME_PATTERN)
        .with_max_length(MAX_RESOURCE_NAME_LENGTH)
}

/// Serde default for [`FieldSpec::allow_empty`].
const fn default_allow_empty() -> bool {
    true
}

/// Serde default for [`OperationDescriptor::targets_resource`].
const fn default_targets_resource() -> bool {
    true
}
