// crates/opsgate-cli/src/dry_run.rs
// ============================================================================
// Module: Dry-Run Collaborator
// Description: Infrastructure collaborator that echoes typed requests.
// Purpose: Exercise the full gateway pipeline without a control plane.
// Dependencies: async-trait, opsgate-gateway, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`DryRunCollaborator`] answers every call with a description of what
//! would have been sent: the operation, its target, and the converted
//! arguments. Nothing leaves the process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use opsgate_gateway::CollaboratorError;
use opsgate_gateway::InfraCollaborator;
use opsgate_gateway::OperationTarget;
use opsgate_gateway::TypedArguments;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tracing::info;

// ============================================================================
// SECTION: Collaborator
// ============================================================================

/// Collaborator that performs nothing and reports the request it received.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunCollaborator;

#[async_trait]
impl InfraCollaborator for DryRunCollaborator {
    async fn invoke(
        &self,
        operation: &str,
        target: &OperationTarget,
        arguments: &TypedArguments,
    ) -> Result<Map<String, Value>, CollaboratorError> {
        info!(operation, namespace = %target.namespace, "dry-run invocation");
        let mut data = Map::new();
        data.insert("dryRun".to_string(), Value::Bool(true));
        data.insert("operation".to_string(), Value::String(operation.to_string()));
        data.insert("target".to_string(), describe_target(target));
        data.insert("request".to_string(), describe_arguments(arguments));
        Ok(data)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a target as JSON.
fn describe_target(target: &OperationTarget) -> Value {
    json!({
        "namespace": target.namespace,
        "name": target.name,
    })
}

/// Renders converted arguments as JSON.
#[must_use]
pub fn describe_arguments(arguments: &TypedArguments) -> Value {
    match arguments {
        TypedArguments::ScaleDeployment {
            replicas,
        } => json!({"replicas": replicas}),
        TypedArguments::RestartDeployment | TypedArguments::ListPods => json!({}),
        TypedArguments::PodLogs {
            container,
            tail_lines,
            since_seconds,
        } => json!({
            "container": container,
            "tailLines": tail_lines,
            "sinceSeconds": since_seconds,
        }),
        TypedArguments::CreateConfigMap {
            data,
            labels,
        } => json!({"data": data, "labels": labels}),
        TypedArguments::DeletePod {
            force,
        } => json!({"force": force}),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
