// crates/opsgate-core/src/model/audit.rs
// ============================================================================
// Module: OpsGate Audit Events
// Description: Append-only audit record for authn, authz, and execution outcomes.
// Purpose: Define the single audit payload every sink receives.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! One [`AuditEvent`] is emitted per authentication attempt, authorization
//! decision, and execution outcome. Events are append-only; sinks never
//! mutate them. Credential material never appears in an event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::model::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Per-process sequence used to disambiguate event identifiers.
static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Credential verification attempt.
    Authentication,
    /// Permission decision.
    Authorization,
    /// Operation outcome.
    Execution,
}

/// Audit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    /// Stage succeeded.
    Success,
    /// Stage rejected the request.
    Failure,
    /// Stage could not complete (collaborator error, cancellation).
    Error,
}

impl AuditEventType {
    /// Returns the serialized label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Execution => "execution",
        }
    }
}

impl AuditResult {
    /// Returns the serialized label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }
}

/// Structured audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier.
    pub event_id: String,
    /// Emission time.
    pub timestamp: Timestamp,
    /// Event category.
    pub event_type: AuditEventType,
    /// Caller subject, `unknown` when unauthenticated.
    pub subject: String,
    /// Action label (operation action or authentication scheme).
    pub action: String,
    /// Resource label.
    pub resource: String,
    /// Target namespace when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Outcome.
    pub result: AuditResult,
    /// Error or denial detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Execution duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Additional structured context.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl AuditEvent {
    /// Builds an event stamped with the current time and a fresh identifier.
    #[must_use]
    pub fn new(
        event_type: AuditEventType,
        subject: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
        result: AuditResult,
    ) -> Self {
        let timestamp = Timestamp::now();
        Self {
            event_id: next_event_id(timestamp),
            timestamp,
            event_type,
            subject: subject.into(),
            action: action.into(),
            resource: resource.into(),
            namespace: None,
            result,
            error_message: None,
            duration_ms: None,
            metadata: Map::new(),
        }
    }

    /// Returns a copy with the namespace set.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Returns a copy with the error message set.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Returns a copy with the duration set.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Returns a copy with a metadata entry set.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Produces `evt_<millis>_<sequence>`.
fn next_event_id(timestamp: Timestamp) -> String {
    let sequence = EVENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("evt_{}_{sequence}", timestamp.as_unix_millis())
}
