// crates/opsgate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for opsgate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use opsgate_config::ApiKeyConfig;
use opsgate_config::ConfigError;
use opsgate_config::GatewayConfig;
use opsgate_config::JwtConfig;

/// Parses a TOML string into a `GatewayConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<GatewayConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<GatewayConfig, toml::de::Error> {
    config_from_toml("")
}

/// Returns an inline API key entry.
pub fn api_key(id: &str, key: &str, permissions: &[&str]) -> ApiKeyConfig {
    ApiKeyConfig {
        id: id.to_string(),
        subject: format!("{id}-subject"),
        key: Some(key.to_string()),
        key_env: None,
        permissions: permissions.iter().map(ToString::to_string).collect(),
        enabled: true,
        expires_at_ms: None,
    }
}

/// Returns signed-token settings with an inline secret.
pub fn jwt_config(secret: &str) -> JwtConfig {
    JwtConfig {
        secret: Some(secret.to_string()),
        secret_env: None,
        issuer: "opsgate".to_string(),
        leeway_secs: 30,
        default_ttl_secs: 3600,
    }
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
