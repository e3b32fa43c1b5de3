// crates/opsgate-cli/tests/dry_run_pipeline.rs
// ============================================================================
// Module: Dry-Run Pipeline Tests
// Description: Config file to gateway to dry-run collaborator, end to end.
// Purpose: Verify a loaded opsgate.toml drives the full pipeline and audit file.
// Dependencies: opsgate-cli, opsgate-config, opsgate-gateway, tempfile, tokio
// ============================================================================

//! End-to-end tests from a config file on disk through the dry-run collaborator.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use opsgate_cli::DryRunCollaborator;
use opsgate_config::GatewayConfig;
use opsgate_gateway::ToolCall;
use opsgate_gateway::build_gateway;
use serde_json::Value;
use serde_json::json;
use tokio_util::sync::CancellationToken;

const OPERATOR_KEY: &str = "sk_dry_run_operator_0001";

fn write_config(dir: &Path) -> GatewayConfig {
    let config = format!(
        r#"
[gateway]
permission_domain = "infra"
default_namespace = "default"

[[auth.api_keys]]
id = "operator"
subject = "ops-bot"
key = "{OPERATOR_KEY}"
permissions = ["role:operator"]

[auth.jwt]
secret = "dry-run-secret-0123456789abcdef-xyz"
issuer = "opsgate-dry-run"

[[policy.roles]]
name = "operator"
permissions = ["infra:deployments:*", "infra:pods:list"]
namespaces = ["default", "staging-*"]

[audit]
sink = "file"
path = "audit.jsonl"
"#
    );
    let path = dir.join("opsgate.toml");
    fs::write(&path, config).unwrap();
    GatewayConfig::load(Some(&path)).unwrap()
}

fn audit_lines(dir: &Path) -> Vec<Value> {
    fs::read_to_string(dir.join("audit.jsonl"))
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn scale_call_echoes_typed_request_and_audits_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let gateway = build_gateway(&config, Arc::new(DryRunCollaborator)).unwrap();
    let call = ToolCall::new(
        "apikey",
        OPERATOR_KEY,
        "scaleDeployment",
        json!({"namespace": "staging-eu", "name": "web", "replicas": 4, "confirm": true})
            .as_object()
            .cloned()
            .unwrap(),
    );
    let result = gateway.handle(&call, &CancellationToken::new()).await;
    assert!(result.success, "{}", result.error.unwrap_or_default());
    assert_eq!(result.data["dryRun"], json!(true));
    assert_eq!(result.data["request"], json!({"replicas": 4}));
    assert_eq!(result.data["targetReplicas"], json!(4));

    let events = audit_lines(dir.path());
    let kinds: Vec<&str> = events.iter().map(|event| event["event_type"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["authentication", "authorization", "execution"]);
    assert!(events.iter().all(|event| event["subject"] == json!("ops-bot")));
}

#[tokio::test]
async fn out_of_scope_namespace_is_denied_before_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let gateway = build_gateway(&config, Arc::new(DryRunCollaborator)).unwrap();
    let result = gateway
        .handle_header(
            &format!("ApiKey {OPERATOR_KEY}"),
            "listPods",
            json!({"namespace": "production"}).as_object().cloned().unwrap(),
            &CancellationToken::new(),
        )
        .await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("access denied"));
    assert!(result.data.get("dryRun").is_none());
    let events = audit_lines(dir.path());
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["result"], json!("failure"));
}

#[tokio::test]
async fn issued_token_authenticates_through_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let tokens =
        opsgate_gateway::bootstrap::build_token_authenticator(config.auth.jwt.as_ref().unwrap())
            .unwrap();
    let token = tokens.issue("u-9", "dana", &["infra:pods:list".to_string()], None).unwrap();
    let gateway = build_gateway(&config, Arc::new(DryRunCollaborator)).unwrap();
    let result = gateway
        .handle_header(
            &format!("Bearer {token}"),
            "listPods",
            json!({"namespace": "default"}).as_object().cloned().unwrap(),
            &CancellationToken::new(),
        )
        .await;
    assert!(result.success);
    assert_eq!(result.data["podCount"], json!(0));
}
