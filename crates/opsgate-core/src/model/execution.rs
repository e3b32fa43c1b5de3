// crates/opsgate-core/src/model/execution.rs
// ============================================================================
// Module: OpsGate Execution Envelope
// Description: Uniform result envelope returned for every tool call.
// Purpose: Give callers one response shape for success and every failure stage.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every tool call, including calls rejected before execution, ends in an
//! [`ExecutionResult`]. Pre-execution failures produce a synthetic envelope
//! with `success = false`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::model::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result envelope for a tool call.
///
/// # Invariants
/// - `error` is set whenever `success` is false.
/// - Immutable once returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the operation completed.
    pub success: bool,
    /// Short human-readable summary.
    pub message: String,
    /// Operation-specific payload.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    /// Error text when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation time.
    pub timestamp: Timestamp,
}

impl ExecutionResult {
    /// Builds a successful result.
    #[must_use]
    pub fn succeeded(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Builds a failed result.
    #[must_use]
    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Map::new(),
            error: Some(error.into()),
            timestamp: Timestamp::now(),
        }
    }

    /// Returns a copy with a data entry set.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
