// crates/opsgate-gateway/src/executor.rs
// ============================================================================
// Module: Tool Executor
// Description: Handler registry and infrastructure collaborator interface.
// Purpose: Dispatch validated calls to handlers and normalize their results.
// Dependencies: async-trait, opsgate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each operation is served by an [`OperationHandler`] registered by name in
//! a [`HandlerRegistry`]. A handler converts validated JSON arguments into
//! [`TypedArguments`], makes one call to the [`InfraCollaborator`], and shapes
//! the response. The registry is populated at startup and read-only
//! afterwards; the executor keeps no state between calls.
//!
//! Every outcome becomes an [`ExecutionResult`]: missing handlers report
//! `unsupported operation`, conversion failures and collaborator errors
//! report `success=false` with the error text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use opsgate_core::ExecutionResult;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod handlers;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Namespace and optional resource name an operation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTarget {
    /// Target namespace.
    pub namespace: String,
    /// Target resource name; `None` for namespace-wide operations.
    pub name: Option<String>,
}

/// Arguments converted from JSON for the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedArguments {
    /// Scale a deployment.
    ScaleDeployment {
        /// Desired replica count.
        replicas: i64,
    },
    /// Rolling restart of a deployment.
    RestartDeployment,
    /// Fetch pod logs.
    PodLogs {
        /// Container; the collaborator picks the first container when absent.
        container: Option<String>,
        /// Number of trailing lines.
        tail_lines: i64,
        /// Only lines newer than this many seconds.
        since_seconds: Option<i64>,
    },
    /// Create or update a config map.
    CreateConfigMap {
        /// Config map data.
        data: BTreeMap<String, String>,
        /// Labels.
        labels: BTreeMap<String, String>,
    },
    /// Delete a pod.
    DeletePod {
        /// Skip graceful termination.
        force: bool,
    },
    /// List pods in a namespace.
    ListPods,
}

/// Handler success payload.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutput {
    /// Human-readable summary.
    pub message: String,
    /// Structured response data.
    pub data: Map<String, Value>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors reported by the infrastructure collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// The target resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The call failed.
    #[error("{0}")]
    Failed(String),
}

/// Execution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No handler is registered for the operation.
    #[error("unsupported operation")]
    UnsupportedOperation,
    /// Arguments could not be converted for the handler.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The collaborator call failed.
    #[error("operation {operation} failed: {source}")]
    Collaborator {
        /// Operation name.
        operation: String,
        /// Collaborator failure.
        source: CollaboratorError,
    },
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Interface to the infrastructure control plane.
#[async_trait]
pub trait InfraCollaborator: Send + Sync {
    /// Performs `operation` on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the control plane rejects or fails
    /// the call.
    async fn invoke(
        &self,
        operation: &str,
        target: &OperationTarget,
        arguments: &TypedArguments,
    ) -> Result<Map<String, Value>, CollaboratorError>;
}

/// Serves one operation.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    /// Executes the operation with validated `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when arguments cannot be converted or the
    /// collaborator fails.
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError>;
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Handlers keyed by operation name.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    /// Registered handlers.
    handlers: BTreeMap<String, Arc<dyn OperationHandler>>,
}

impl HandlerRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding the built-in handlers.
    #[must_use]
    pub fn with_builtin_handlers() -> Self {
        handlers::builtin()
            .into_iter()
            .fold(Self::new(), |registry, (name, handler)| registry.register(name, handler))
    }

    /// Returns a copy with `handler` registered under `operation`. Later
    /// registrations replace earlier ones.
    #[must_use]
    pub fn register(mut self, operation: &str, handler: Arc<dyn OperationHandler>) -> Self {
        self.handlers.insert(operation.to_string(), handler);
        self
    }

    /// Looks up a handler.
    #[must_use]
    pub fn get(&self, operation: &str) -> Option<&Arc<dyn OperationHandler>> {
        self.handlers.get(operation)
    }

    /// Returns registered operation names.
    #[must_use]
    pub fn operations(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Runs validated calls through registered handlers.
#[derive(Clone)]
pub struct ToolExecutor {
    /// Handler registry.
    registry: Arc<HandlerRegistry>,
    /// Control-plane client.
    collaborator: Arc<dyn InfraCollaborator>,
}

impl ToolExecutor {
    /// Builds an executor.
    #[must_use]
    pub fn new(registry: HandlerRegistry, collaborator: Arc<dyn InfraCollaborator>) -> Self {
        Self {
            registry: Arc::new(registry),
            collaborator,
        }
    }

    /// Executes `operation` and wraps the outcome in an [`ExecutionResult`].
    pub async fn execute(&self, operation: &str, arguments: &Map<String, Value>) -> ExecutionResult {
        let Some(handler) = self.registry.get(operation) else {
            return ExecutionResult::failed(
                "Unknown tool",
                ExecutionError::UnsupportedOperation.to_string(),
            );
        };
        match handler.handle(arguments, self.collaborator.as_ref()).await {
            Ok(output) => ExecutionResult::succeeded(output.message, output.data),
            Err(err) => {
                debug!(operation, error = %err, "operation failed");
                ExecutionResult::failed(format!("Failed to execute {operation}"), err.to_string())
            }
        }
    }
}
