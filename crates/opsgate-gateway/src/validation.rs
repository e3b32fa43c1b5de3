// crates/opsgate-gateway/src/validation.rs
// ============================================================================
// Module: Input Validator
// Description: Schema and business-rule checks for operation arguments.
// Purpose: Reject malformed tool calls before anything reaches infrastructure.
// Dependencies: opsgate-core, serde_json
// ============================================================================

//! ## Overview
//! Validation is pure and total: every declared field is checked and every
//! failure is collected, so a caller sees all problems in one round trip.
//! Integers accept JSON integers and floats with an integral value alike.
//! Destructive operations additionally require `confirm == true`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use opsgate_core::FieldError;
use opsgate_core::FieldType;
use opsgate_core::ValidationResult;
use opsgate_core::operation::FIELD_CONFIRM;
use opsgate_core::operation::RESOURCE_NAME_PATTERN;
use serde_json::Map;
use serde_json::Value;

use crate::catalog::CompiledField;
use crate::catalog::OperationCatalog;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field reported when the operation itself is unknown.
pub const FIELD_OPERATION_NAME: &str = "operationName";

/// Remediation appended to every confirmation error.
const CONFIRM_REMEDIATION: &str = "set confirm=true to proceed";

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validates arguments against the operation catalog.
#[derive(Debug, Clone)]
pub struct InputValidator {
    /// Operation catalog.
    catalog: Arc<OperationCatalog>,
}

impl InputValidator {
    /// Builds a validator over `catalog`.
    #[must_use]
    pub const fn new(catalog: Arc<OperationCatalog>) -> Self {
        Self {
            catalog,
        }
    }

    /// Validates `arguments` for `operation`.
    #[must_use]
    pub fn validate(&self, operation: &str, arguments: &Map<String, Value>) -> ValidationResult {
        let Some(entry) = self.catalog.get(operation) else {
            return ValidationResult::from_errors(vec![FieldError::new(
                FIELD_OPERATION_NAME,
                operation,
                "unknown operation",
            )]);
        };
        let mut errors = Vec::new();
        for field in &entry.fields {
            check_field(field, arguments.get(&field.spec.name), &mut errors);
        }
        if entry.descriptor.destructive {
            check_confirmation(arguments.get(FIELD_CONFIRM), &mut errors);
        }
        ValidationResult::from_errors(errors)
    }
}

// ============================================================================
// SECTION: Field Checks
// ============================================================================

/// Checks one declared field.
fn check_field(field: &CompiledField, value: Option<&Value>, errors: &mut Vec<FieldError>) {
    let name = field.spec.name.as_str();
    let value = value.filter(|value| !value.is_null());
    let Some(value) = value else {
        if field.spec.required {
            errors.push(FieldError::new(name, "", format!("{name} is required")));
        }
        return;
    };
    match field.spec.field_type {
        FieldType::String => check_string(field, value, errors),
        FieldType::Integer => check_integer(field, value, errors),
        FieldType::Boolean => {
            if !value.is_boolean() {
                errors.push(type_error(name, field.spec.field_type, value));
            }
        }
        FieldType::StringMap => check_string_map(field, value, errors),
    }
}

/// Checks a string field's pattern and length.
fn check_string(field: &CompiledField, value: &Value, errors: &mut Vec<FieldError>) {
    let name = field.spec.name.as_str();
    let Some(text) = value.as_str() else {
        errors.push(type_error(name, field.spec.field_type, value));
        return;
    };
    if let Some(pattern) = &field.pattern
        && !pattern.is_match(text)
    {
        let message = if field.spec.pattern.as_deref() == Some(RESOURCE_NAME_PATTERN) {
            format!("{name} must follow naming conventions (lowercase alphanumeric and hyphens)")
        } else {
            format!("{name} has an invalid format")
        };
        errors.push(FieldError::new(name, text, message));
    }
    if let Some(max) = field.spec.max_length
        && text.len() > max
    {
        errors.push(FieldError::new(name, text, format!("{name} must be {max} characters or less")));
    }
}

/// Checks an integer field's type and range.
fn check_integer(field: &CompiledField, value: &Value, errors: &mut Vec<FieldError>) {
    let name = field.spec.name.as_str();
    let Some(number) = integral_value(value) else {
        errors.push(type_error(name, field.spec.field_type, value));
        return;
    };
    let below = field.spec.minimum.is_some_and(|min| number < min);
    let above = field.spec.maximum.is_some_and(|max| number > max);
    if !below && !above {
        return;
    }
    let message = match (field.spec.minimum, field.spec.maximum) {
        (Some(min), Some(max)) => format!("{name} must be between {min} and {max}"),
        (Some(min), None) => format!("{name} must be at least {min}"),
        (None, Some(max)) => format!("{name} must be at most {max}"),
        (None, None) => return,
    };
    errors.push(FieldError::new(name, number.to_string(), message));
}

/// Checks a string map's keys and values.
fn check_string_map(field: &CompiledField, value: &Value, errors: &mut Vec<FieldError>) {
    let name = field.spec.name.as_str();
    let Some(map) = value.as_object() else {
        errors.push(type_error(name, field.spec.field_type, value));
        return;
    };
    if map.is_empty() && !field.spec.allow_empty {
        errors.push(FieldError::new(name, "{}", format!("{name} cannot be empty")));
    }
    let key_field = format!("{name}.key");
    for (key, entry) in map {
        if key.is_empty() {
            errors.push(FieldError::new(&key_field, key, format!("{name} keys cannot be empty")));
        } else {
            let bad_pattern = field.pattern.as_ref().is_some_and(|pattern| !pattern.is_match(key));
            let too_long = field.spec.max_length.is_some_and(|max| key.len() > max);
            if bad_pattern || too_long {
                errors.push(FieldError::new(&key_field, key, format!("{name} key is invalid")));
            }
        }
        if !entry.is_string() {
            errors.push(FieldError::new(
                format!("{name}.{key}"),
                render_value(entry),
                format!("{name} values must be strings"),
            ));
        }
    }
}

/// Checks the confirmation flag of a destructive operation.
fn check_confirmation(value: Option<&Value>, errors: &mut Vec<FieldError>) {
    let error = match value {
        None | Some(Value::Null) => FieldError::new(
            FIELD_CONFIRM,
            "",
            format!("confirmation is required for this operation; {CONFIRM_REMEDIATION}"),
        ),
        Some(Value::Bool(true)) => return,
        Some(Value::Bool(false)) => {
            FieldError::new(FIELD_CONFIRM, "false", format!("you must {CONFIRM_REMEDIATION}"))
        }
        Some(other) => FieldError::new(
            FIELD_CONFIRM,
            render_value(other),
            format!("confirm must be a boolean; {CONFIRM_REMEDIATION}"),
        ),
    };
    errors.push(error);
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the integer held by `value`, accepting integral floats.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "Float is checked to be integral and within i64 range before the cast."
)]
pub(crate) fn integral_value(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.is_finite() && float.fract() == 0.0 && in_range).then_some(float as i64)
}

/// Builds a type mismatch error.
fn type_error(name: &str, field_type: FieldType, value: &Value) -> FieldError {
    FieldError::new(name, render_value(value), format!("{name} must be {}", field_type.label()))
}

/// Renders a value for error reports; strings without quotes.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
