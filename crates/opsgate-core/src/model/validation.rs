// crates/opsgate-core/src/model/validation.rs
// ============================================================================
// Module: OpsGate Validation Results
// Description: Field-level validation errors and their aggregate.
// Purpose: Report every input problem at once, never a partial verdict.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ValidationResult`] is valid exactly when it carries no field errors.
//! Errors keep the order in which the validator found them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Argument name (dotted for map entries, e.g. `data.key`).
    pub field: String,
    /// Offending value rendered as text; empty when the field was absent.
    pub value: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Builds a field error.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating one operation's arguments.
///
/// # Invariants
/// - `valid` is true if and only if `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the arguments passed every check.
    pub valid: bool,
    /// Ordered field errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Builds a result from accumulated errors.
    #[must_use]
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Builds a passing result.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Returns the first error reported for `field`.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Renders all errors as one line.
    #[must_use]
    pub fn summary(&self) -> String {
        let details: Vec<String> =
            self.errors.iter().map(|error| format!("{}: {}", error.field, error.message)).collect();
        format!("validation errors: {}", details.join("; "))
    }
}
