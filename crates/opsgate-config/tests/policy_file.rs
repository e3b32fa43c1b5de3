//! Policy file loading tests for opsgate-config.
// crates/opsgate-config/tests/policy_file.rs
// =============================================================================
// Module: Policy File Tests
// Description: Load YAML and TOML role documents from disk.
// Purpose: Ensure external policy files merge with inline roles and fail closed.
// =============================================================================

use std::fs;

use opsgate_config::GatewayConfig;
use opsgate_config::load_policy_file;

mod common;

type TestResult = Result<(), String>;

const YAML_POLICY: &str = r#"
roles:
  - name: admin
    description: Full access
    permissions: ["infra:*"]
  - name: developer
    permissions: ["infra:pods:*", "infra:deployments:restart"]
    namespaces: ["dev-*", "staging"]
"#;

#[test]
fn yaml_policy_file_loads() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("rbac.yaml");
    fs::write(&path, YAML_POLICY).map_err(|err| err.to_string())?;
    let document = load_policy_file(&path).map_err(|err| err.to_string())?;
    assert_eq!(document.roles.len(), 2);
    assert_eq!(document.roles[1].namespaces, vec!["dev-*".to_string(), "staging".to_string()]);
    Ok(())
}

#[test]
fn toml_policy_file_loads() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("rbac.toml");
    fs::write(&path, "[[roles]]\nname = \"viewer\"\npermissions = [\"infra:pods:list\"]\n")
        .map_err(|err| err.to_string())?;
    let document = load_policy_file(&path).map_err(|err| err.to_string())?;
    assert_eq!(document.roles[0].name, "viewer");
    Ok(())
}

#[test]
fn malformed_policy_file_fails_closed() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("rbac.yaml");
    fs::write(&path, "roles: [ {name: ").map_err(|err| err.to_string())?;
    common::assert_invalid(load_policy_file(&path), "parse error")
}

#[test]
fn config_load_resolves_policy_relative_to_config() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    fs::write(dir.path().join("rbac.yaml"), YAML_POLICY).map_err(|err| err.to_string())?;
    let config_path = dir.path().join("opsgate.toml");
    fs::write(
        &config_path,
        "[policy]\npath = \"rbac.yaml\"\n\n[[policy.roles]]\nname = \"auditor\"\npermissions = \
         [\"infra:pods:logs\"]\n",
    )
    .map_err(|err| err.to_string())?;
    let config = GatewayConfig::load(Some(&config_path)).map_err(|err| err.to_string())?;
    let document = config.policy_document().map_err(|err| err.to_string())?;
    let names: Vec<&str> = document.roles.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(names, vec!["auditor", "admin", "developer"]);
    Ok(())
}

#[test]
fn missing_policy_file_fails_validation() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let config_path = dir.path().join("opsgate.toml");
    fs::write(&config_path, "[policy]\npath = \"absent.yaml\"\n").map_err(|err| err.to_string())?;
    common::assert_invalid(GatewayConfig::load(Some(&config_path)), "config io error")
}

#[test]
fn oversized_config_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let config_path = dir.path().join("opsgate.toml");
    let padding = "#".repeat(1024 * 1024 + 1);
    fs::write(&config_path, padding).map_err(|err| err.to_string())?;
    common::assert_invalid(GatewayConfig::load(Some(&config_path)), "exceeds size limit")
}
