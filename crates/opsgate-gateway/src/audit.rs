// crates/opsgate-gateway/src/audit.rs
// ============================================================================
// Module: Audit Logger
// Description: Audit sinks and the non-failing audit logger.
// Purpose: Record authentication, authorization, and execution outcomes.
// Dependencies: opsgate-core, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! An [`AuditSink`] persists [`AuditEvent`] records. The [`AuditLogger`]
//! wraps a sink so that a failing sink never aborts a request: the failure
//! and the event payload are emitted on the tracing error channel instead.
//!
//! Sinks: stderr JSON lines, append-only JSON-lines file, tracing, in-memory
//! (tests), and no-op.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use opsgate_core::AuditEvent;
use opsgate_core::AuditEventType;
use opsgate_core::AuditResult;
use thiserror::Error;
use tracing::error;
use tracing::info;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tracing target for audit records.
pub const AUDIT_TARGET: &str = "opsgate::audit";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Audit sink failures.
#[derive(Debug, Error)]
pub enum AuditSinkError {
    /// Event could not be serialized.
    #[error("audit serialization failed: {0}")]
    Serialize(String),
    /// Event could not be written.
    #[error("audit write failed: {0}")]
    Write(String),
    /// Sink lock was poisoned.
    #[error("audit sink unavailable")]
    Unavailable,
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Writes one event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditSinkError`] when the event cannot be persisted.
    fn write(&self, event: &AuditEvent) -> Result<(), AuditSinkError>;
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Writes JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn write(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        let payload = encode(event)?;
        writeln!(io::stderr(), "{payload}").map_err(|err| AuditSinkError::Write(err.to_string()))
    }
}

/// Appends JSON lines to a file.
pub struct JsonFileAuditSink {
    /// Open append-mode handle.
    file: Mutex<File>,
}

impl JsonFileAuditSink {
    /// Opens (or creates) `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for JsonFileAuditSink {
    fn write(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        let payload = encode(event)?;
        let mut file = self.file.lock().map_err(|_| AuditSinkError::Unavailable)?;
        writeln!(file, "{payload}").map_err(|err| AuditSinkError::Write(err.to_string()))?;
        file.flush().map_err(|err| AuditSinkError::Write(err.to_string()))
    }
}

/// Emits events as structured tracing records.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn write(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        let payload = encode(event)?;
        info!(
            target: AUDIT_TARGET,
            event_id = %event.event_id,
            event_type = event.event_type.label(),
            subject = %event.subject,
            result = event.result.label(),
            payload = %payload,
            "audit"
        );
        Ok(())
    }
}

/// Keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in order.
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Builds an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns recorded events of one type.
    #[must_use]
    pub fn events_of(&self, event_type: AuditEventType) -> Vec<AuditEvent> {
        self.events().into_iter().filter(|event| event.event_type == event_type).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn write(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        self.events.lock().map_err(|_| AuditSinkError::Unavailable)?.push(event.clone());
        Ok(())
    }
}

/// Discards events.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn write(&self, _event: &AuditEvent) -> Result<(), AuditSinkError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Logger
// ============================================================================

/// Records events without ever failing the caller.
#[derive(Clone)]
pub struct AuditLogger {
    /// Destination sink.
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    /// Builds a logger over `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
        }
    }

    /// Records `event`; sink failures go to the tracing error channel.
    pub fn record(&self, event: &AuditEvent) {
        if let Err(err) = self.sink.write(event) {
            let payload = serde_json::to_string(event).unwrap_or_default();
            error!(target: AUDIT_TARGET, error = %err, payload = %payload, "audit sink failure");
        }
    }
}

// ============================================================================
// SECTION: Event Constructors
// ============================================================================

/// Builds an authentication event. `action` is the declared scheme.
#[must_use]
pub fn authentication_event(subject: &str, scheme: &str, result: AuditResult) -> AuditEvent {
    AuditEvent::new(AuditEventType::Authentication, subject, scheme, "credential", result)
}

/// Builds an authorization event.
#[must_use]
pub fn authorization_event(
    subject: &str,
    action: &str,
    resource: &str,
    namespace: &str,
    result: AuditResult,
) -> AuditEvent {
    AuditEvent::new(AuditEventType::Authorization, subject, action, resource, result)
        .with_namespace(namespace)
}

/// Builds an execution event.
#[must_use]
pub fn execution_event(
    subject: &str,
    action: &str,
    resource: &str,
    namespace: &str,
    result: AuditResult,
    duration_ms: u64,
) -> AuditEvent {
    AuditEvent::new(AuditEventType::Execution, subject, action, resource, result)
        .with_namespace(namespace)
        .with_duration_ms(duration_ms)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serializes an event as one JSON line.
fn encode(event: &AuditEvent) -> Result<String, AuditSinkError> {
    serde_json::to_string(event).map_err(|err| AuditSinkError::Serialize(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
