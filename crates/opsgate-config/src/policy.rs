// crates/opsgate-config/src/policy.rs
// ============================================================================
// Module: OpsGate Policy Files
// Description: Loader for standalone role policy documents.
// Purpose: Read YAML (or TOML) role documents with the config size limits.
// Dependencies: opsgate-core, serde_yaml, toml
// ============================================================================

//! ## Overview
//! Role policy may live in its own document so operators can edit roles
//! without touching the gateway config. Files ending in `.toml` are parsed as
//! TOML; everything else is parsed as YAML:
//!
//! ```yaml
//! roles:
//!   - name: developer
//!     permissions: ["infra:pods:*"]
//!     namespaces: ["dev-*"]
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use opsgate_core::PolicyDocument;

use crate::config::ConfigError;
use crate::config::MAX_CONFIG_FILE_SIZE;
use crate::config::validate_path;

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Loads a role policy document from disk.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds the size
/// limit, is not UTF-8, or does not parse.
pub fn load_policy_file(path: &Path) -> Result<PolicyDocument, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("policy file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("policy file must be utf-8".to_string()))?;
    let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    } else {
        serde_yaml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}
