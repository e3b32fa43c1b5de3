// crates/opsgate-gateway/src/executor/handlers.rs
// ============================================================================
// Module: Built-in Operation Handlers
// Description: One handler per built-in infrastructure operation.
// Purpose: Convert arguments, call the collaborator, and shape responses.
// Dependencies: async-trait, opsgate-core, serde_json
// ============================================================================

//! ## Overview
//! Handlers assume the input validator already ran but still convert
//! defensively: a missing or mistyped argument becomes
//! [`ExecutionError::InvalidArguments`], never a panic. Collaborator data is
//! merged first; handler-computed fields (`targetReplicas`, `podCount`, ...)
//! are written last.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use opsgate_core::operation::DEFAULT_TAIL_LINES;
use opsgate_core::operation::FIELD_NAME;
use opsgate_core::operation::FIELD_NAMESPACE;
use opsgate_core::operation::OP_CREATE_CONFIG_MAP;
use opsgate_core::operation::OP_DELETE_POD;
use opsgate_core::operation::OP_GET_POD_LOGS;
use opsgate_core::operation::OP_LIST_PODS;
use opsgate_core::operation::OP_RESTART_DEPLOYMENT;
use opsgate_core::operation::OP_SCALE_DEPLOYMENT;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::executor::ExecutionError;
use crate::executor::HandlerOutput;
use crate::executor::InfraCollaborator;
use crate::executor::OperationHandler;
use crate::executor::OperationTarget;
use crate::executor::TypedArguments;
use crate::validation::integral_value;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Returns the built-in handlers keyed by operation name.
#[must_use]
pub fn builtin() -> Vec<(&'static str, Arc<dyn OperationHandler>)> {
    let handlers: [(&'static str, Arc<dyn OperationHandler>); 6] = [
        (OP_SCALE_DEPLOYMENT, Arc::new(ScaleDeploymentHandler)),
        (OP_RESTART_DEPLOYMENT, Arc::new(RestartDeploymentHandler)),
        (OP_GET_POD_LOGS, Arc::new(PodLogsHandler)),
        (OP_CREATE_CONFIG_MAP, Arc::new(CreateConfigMapHandler)),
        (OP_DELETE_POD, Arc::new(DeletePodHandler)),
        (OP_LIST_PODS, Arc::new(ListPodsHandler)),
    ];
    Vec::from(handlers)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `scaleDeployment`.
pub struct ScaleDeploymentHandler;

#[async_trait]
impl OperationHandler for ScaleDeploymentHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = named_target(arguments)?;
        let replicas = required_integer(arguments, "replicas")?;
        let typed = TypedArguments::ScaleDeployment {
            replicas,
        };
        let mut data = invoke(collaborator, OP_SCALE_DEPLOYMENT, &target, &typed).await?;
        insert_target(&mut data, &target);
        data.insert("targetReplicas".to_string(), json!(replicas));
        Ok(HandlerOutput {
            message: format!(
                "Successfully scaled deployment {} to {replicas} replicas",
                display_target(&target)
            ),
            data,
        })
    }
}

/// `restartDeployment`.
pub struct RestartDeploymentHandler;

#[async_trait]
impl OperationHandler for RestartDeploymentHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = named_target(arguments)?;
        let mut data = invoke(
            collaborator,
            OP_RESTART_DEPLOYMENT,
            &target,
            &TypedArguments::RestartDeployment,
        )
        .await?;
        insert_target(&mut data, &target);
        Ok(HandlerOutput {
            message: format!("Successfully restarted deployment {}", display_target(&target)),
            data,
        })
    }
}

/// `getPodLogs`.
pub struct PodLogsHandler;

#[async_trait]
impl OperationHandler for PodLogsHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = named_target(arguments)?;
        let container = optional_string(arguments, "container")?;
        let tail_lines = optional_integer(arguments, "tailLines")?.unwrap_or(DEFAULT_TAIL_LINES);
        let since_seconds = optional_integer(arguments, "sinceSeconds")?;
        let typed = TypedArguments::PodLogs {
            container: container.clone(),
            tail_lines,
            since_seconds,
        };
        let mut data = invoke(collaborator, OP_GET_POD_LOGS, &target, &typed).await?;
        let log_length = data.get("logs").and_then(Value::as_str).map_or(0, str::len);
        let container = data
            .get("container")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(container)
            .unwrap_or_default();
        data.insert(FIELD_NAMESPACE.to_string(), json!(target.namespace));
        data.insert("pod".to_string(), json!(target.name));
        data.insert("container".to_string(), json!(container));
        data.insert("tailLines".to_string(), json!(tail_lines));
        data.insert("logLength".to_string(), json!(log_length));
        Ok(HandlerOutput {
            message: format!(
                "Successfully retrieved logs from pod {} (container: {container})",
                display_target(&target)
            ),
            data,
        })
    }
}

/// `createConfigMap`.
pub struct CreateConfigMapHandler;

#[async_trait]
impl OperationHandler for CreateConfigMapHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = named_target(arguments)?;
        let data_entries = string_map(arguments, "data")?
            .ok_or_else(|| ExecutionError::InvalidArguments("data is required".to_string()))?;
        let labels = string_map(arguments, "labels")?.unwrap_or_default();
        let typed = TypedArguments::CreateConfigMap {
            data: data_entries.clone(),
            labels: labels.clone(),
        };
        let mut data = invoke(collaborator, OP_CREATE_CONFIG_MAP, &target, &typed).await?;
        insert_target(&mut data, &target);
        data.insert("data".to_string(), json!(data_entries));
        data.insert("labels".to_string(), json!(labels));
        Ok(HandlerOutput {
            message: format!("Successfully created/updated ConfigMap {}", display_target(&target)),
            data,
        })
    }
}

/// `deletePod`.
pub struct DeletePodHandler;

#[async_trait]
impl OperationHandler for DeletePodHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = named_target(arguments)?;
        let force = match arguments.get("force") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(force)) => *force,
            Some(_) => {
                return Err(ExecutionError::InvalidArguments("force must be a boolean".to_string()));
            }
        };
        let typed = TypedArguments::DeletePod {
            force,
        };
        let mut data = invoke(collaborator, OP_DELETE_POD, &target, &typed).await?;
        insert_target(&mut data, &target);
        data.insert("force".to_string(), json!(force));
        let suffix = if force { " (forced)" } else { "" };
        Ok(HandlerOutput {
            message: format!("Successfully deleted pod {}{suffix}", display_target(&target)),
            data,
        })
    }
}

/// `listPods`.
pub struct ListPodsHandler;

#[async_trait]
impl OperationHandler for ListPodsHandler {
    async fn handle(
        &self,
        arguments: &Map<String, Value>,
        collaborator: &dyn InfraCollaborator,
    ) -> Result<HandlerOutput, ExecutionError> {
        let target = OperationTarget {
            namespace: required_string(arguments, FIELD_NAMESPACE)?,
            name: None,
        };
        let mut data =
            invoke(collaborator, OP_LIST_PODS, &target, &TypedArguments::ListPods).await?;
        let count = data.get("pods").and_then(Value::as_array).map_or(0, Vec::len);
        data.insert(FIELD_NAMESPACE.to_string(), json!(target.namespace));
        data.insert("podCount".to_string(), json!(count));
        Ok(HandlerOutput {
            message: format!("Successfully listed {count} pods in namespace {}", target.namespace),
            data,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Calls the collaborator, attaching operation context to failures.
async fn invoke(
    collaborator: &dyn InfraCollaborator,
    operation: &str,
    target: &OperationTarget,
    arguments: &TypedArguments,
) -> Result<Map<String, Value>, ExecutionError> {
    collaborator.invoke(operation, target, arguments).await.map_err(|source| {
        ExecutionError::Collaborator {
            operation: operation.to_string(),
            source,
        }
    })
}

/// Builds a namespace-plus-name target.
fn named_target(arguments: &Map<String, Value>) -> Result<OperationTarget, ExecutionError> {
    Ok(OperationTarget {
        namespace: required_string(arguments, FIELD_NAMESPACE)?,
        name: Some(required_string(arguments, FIELD_NAME)?),
    })
}

/// Writes `namespace` and `name` into response data.
fn insert_target(data: &mut Map<String, Value>, target: &OperationTarget) {
    data.insert(FIELD_NAMESPACE.to_string(), json!(target.namespace));
    if let Some(name) = &target.name {
        data.insert(FIELD_NAME.to_string(), json!(name));
    }
}

/// Renders `namespace/name`.
fn display_target(target: &OperationTarget) -> String {
    match &target.name {
        Some(name) => format!("{}/{name}", target.namespace),
        None => target.namespace.clone(),
    }
}

/// Reads a required string argument.
fn required_string(arguments: &Map<String, Value>, key: &str) -> Result<String, ExecutionError> {
    optional_string(arguments, key)?
        .ok_or_else(|| ExecutionError::InvalidArguments(format!("{key} is required")))
}

/// Reads an optional string argument.
fn optional_string(
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ExecutionError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ExecutionError::InvalidArguments(format!("{key} must be a string"))),
    }
}

/// Reads a required integer argument.
fn required_integer(arguments: &Map<String, Value>, key: &str) -> Result<i64, ExecutionError> {
    optional_integer(arguments, key)?
        .ok_or_else(|| ExecutionError::InvalidArguments(format!("{key} is required")))
}

/// Reads an optional integer argument.
fn optional_integer(
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, ExecutionError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => integral_value(value)
            .map(Some)
            .ok_or_else(|| ExecutionError::InvalidArguments(format!("{key} must be an integer"))),
    }
}

/// Reads an optional object whose values are all strings.
fn string_map(
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<BTreeMap<String, String>>, ExecutionError> {
    let Some(value) = arguments.get(key).filter(|value| !value.is_null()) else {
        return Ok(None);
    };
    let invalid = || ExecutionError::InvalidArguments(format!("{key} must map strings to strings"));
    let object = value.as_object().ok_or_else(invalid)?;
    object
        .iter()
        .map(|(entry_key, entry_value)| {
            entry_value.as_str().map(|text| (entry_key.clone(), text.to_string())).ok_or_else(invalid)
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}
