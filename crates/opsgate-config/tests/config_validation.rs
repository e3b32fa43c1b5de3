//! Config validation tests for opsgate-config.
// crates/opsgate-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate gateway, auth, audit, logging, and operation rules.
// Purpose: Ensure invalid configuration fails closed with a precise message.
// =============================================================================

use opsgate_config::AuditSinkKind;
use opsgate_config::GatewayConfig;
use opsgate_core::FieldSpec;
use opsgate_core::FieldType;
use opsgate_core::OperationDescriptor;
use opsgate_core::RoleDefinition;

mod common;

type TestResult = Result<(), String>;

const GOOD_KEY: &str = "ak_0123456789abcdef";
const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef";

fn operation(name: &str) -> OperationDescriptor {
    OperationDescriptor {
        name: name.to_string(),
        description: String::new(),
        resource: "services".to_string(),
        action: "describe".to_string(),
        permission: None,
        destructive: false,
        targets_resource: true,
        fields: vec![FieldSpec::new("namespace", FieldType::String, true)],
    }
}

#[test]
fn defaults_are_valid() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    assert_eq!(config.gateway.permission_domain, "infra");
    assert_eq!(config.gateway.default_namespace, "default");
    assert_eq!(config.audit.sink, AuditSinkKind::Tracing);
    assert_eq!(config.operation_catalog().len(), 6);
    Ok(())
}

#[test]
fn permission_domain_rejects_separators() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.gateway.permission_domain = "infra:ops".to_string();
    common::assert_invalid(config.validate(), "must not contain ':' or '*'")
}

#[test]
fn api_key_requires_exactly_one_source() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let mut key = common::api_key("ops", GOOD_KEY, &["infra:*"]);
    key.key_env = Some("OPS_KEY".to_string());
    config.auth.api_keys = vec![key];
    common::assert_invalid(config.validate(), "exactly one of key or key_env")
}

#[test]
fn api_key_rejects_short_material() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.auth.api_keys = vec![common::api_key("ops", "short", &["infra:*"])];
    common::assert_invalid(config.validate(), "key length must be between")
}

#[test]
fn api_key_ids_must_be_unique() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.auth.api_keys = vec![
        common::api_key("ops", GOOD_KEY, &["infra:*"]),
        common::api_key("ops", "ak_fedcba9876543210", &["infra:pods:list"]),
    ];
    common::assert_invalid(config.validate(), "duplicate auth.api_keys.id: ops")
}

#[test]
fn api_key_permissions_must_parse() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.auth.api_keys = vec![common::api_key("ops", GOOD_KEY, &["infra:*:scale"])];
    common::assert_invalid(config.validate(), "wildcard is only allowed")
}

#[test]
fn api_key_env_reference_fails_when_unset() -> TestResult {
    let mut key = common::api_key("ops", GOOD_KEY, &[]);
    key.key = None;
    key.key_env = Some("OPSGATE_TEST_KEY_THAT_IS_NEVER_SET".to_string());
    common::assert_invalid(key.resolve_key(), "is not set")
}

#[test]
fn jwt_secret_must_be_long_enough() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.auth.jwt = Some(common::jwt_config("too-short"));
    common::assert_invalid(config.validate(), "secret must be at least 32 bytes")
}

#[test]
fn jwt_leeway_is_bounded() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let mut jwt = common::jwt_config(GOOD_SECRET);
    jwt.leeway_secs = 3600;
    config.auth.jwt = Some(jwt);
    common::assert_invalid(config.validate(), "auth.jwt.leeway_secs")
}

#[test]
fn file_audit_sink_requires_path() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    common::assert_invalid(config.validate(), "audit.path is required")
}

#[test]
fn logging_level_is_checked() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.logging.level = "verbose".to_string();
    common::assert_invalid(config.validate(), "logging.level must be one of")
}

#[test]
fn duplicate_operations_are_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.operations = vec![operation("describeService"), operation("describeService")];
    common::assert_invalid(config.validate(), "duplicate operations.name: describeService")
}

#[test]
fn operations_may_not_declare_confirm() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let mut op = operation("describeService");
    op.fields.push(FieldSpec::new("confirm", FieldType::Boolean, true));
    config.operations = vec![op];
    common::assert_invalid(config.validate(), "invalid field name: confirm")
}

#[test]
fn operation_patterns_must_compile() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let mut op = operation("describeService");
    op.fields[0] = FieldSpec::new("namespace", FieldType::String, true).with_pattern("([a-z");
    config.operations = vec![op];
    common::assert_invalid(config.validate(), "invalid pattern")
}

#[test]
fn configured_operations_replace_builtin_catalog() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.operations = vec![operation("describeService")];
    config.validate().map_err(|err| err.to_string())?;
    let catalog = config.operation_catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].name, "describeService");
    Ok(())
}

#[test]
fn duplicate_inline_roles_are_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let role = RoleDefinition {
        name: "ops".to_string(),
        description: String::new(),
        permissions: vec!["infra:*".to_string()],
        namespaces: Vec::new(),
    };
    config.policy.roles = vec![role.clone(), role];
    common::assert_invalid(config.validate(), "duplicate role: ops")
}

#[test]
fn full_toml_document_parses() -> TestResult {
    let config = GatewayConfig::from_toml_str(&format!(
        r#"
[gateway]
default_namespace = "apps"

[[auth.api_keys]]
id = "ci"
subject = "ci-bot"
key = "{GOOD_KEY}"
permissions = ["role:developer"]
expires_at_ms = 4102444800000

[auth.jwt]
secret = "{GOOD_SECRET}"
issuer = "opsgate-test"

[[policy.roles]]
name = "developer"
permissions = ["infra:pods:*"]
namespaces = ["dev-*"]

[audit]
sink = "stderr"

[logging]
level = "debug"
format = "json"
"#
    ))
    .map_err(|err| err.to_string())?;
    assert_eq!(config.gateway.default_namespace, "apps");
    assert_eq!(config.auth.api_keys[0].expires_at_ms, Some(4_102_444_800_000));
    assert!(config.auth.api_keys[0].enabled);
    assert_eq!(config.auth.jwt.as_ref().map(|jwt| jwt.issuer.as_str()), Some("opsgate-test"));
    assert_eq!(config.policy.roles[0].namespaces, vec!["dev-*".to_string()]);
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    common::assert_invalid(GatewayConfig::from_toml_str("[gateway]\nbogus = 1\n"), "parse error")
}
