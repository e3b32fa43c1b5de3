// crates/opsgate-config/src/config.rs
// ============================================================================
// Module: OpsGate Configuration
// Description: Configuration loading and validation for the OpsGate gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: opsgate-core, regex, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed. Secrets referenced through
//! `key_env` / `secret_env` are resolved when the gateway is built, not at
//! validation time, so configs can be checked without the secrets present.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use opsgate_core::Entitlement;
use opsgate_core::FieldType;
use opsgate_core::OperationDescriptor;
use opsgate_core::PolicyDocument;
use opsgate_core::RoleDefinition;
use opsgate_core::builtin_operations;
use opsgate_core::operation::FIELD_CONFIRM;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::policy::load_policy_file;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "opsgate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "OPSGATE_CONFIG";
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured API keys.
pub(crate) const MAX_API_KEYS: usize = 1024;
/// Minimum inline API key length.
pub(crate) const MIN_API_KEY_LENGTH: usize = 16;
/// Maximum inline API key length.
pub(crate) const MAX_API_KEY_LENGTH: usize = 512;
/// Minimum inline HMAC secret length in bytes.
pub(crate) const MIN_JWT_SECRET_LENGTH: usize = 32;
/// Maximum clock skew tolerated for token times.
pub(crate) const MAX_JWT_LEEWAY_SECS: u64 = 300;
/// Maximum token lifetime.
pub(crate) const MAX_JWT_TTL_SECS: u64 = 7 * 24 * 60 * 60;
/// Maximum accepted credential size.
pub(crate) const MAX_CREDENTIAL_BYTES: usize = 64 * 1024;
/// Maximum number of operations in the catalog.
pub(crate) const MAX_OPERATIONS: usize = 256;
/// Maximum number of fields per operation.
pub(crate) const MAX_OPERATION_FIELDS: usize = 64;
/// Maximum number of roles across inline and file policy.
pub(crate) const MAX_ROLES: usize = 512;
/// Accepted log levels.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level OpsGate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Core gateway settings.
    #[serde(default)]
    pub gateway: GatewaySettings,
    /// Credential configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Role policy configuration.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Operation catalog; the built-in catalog is used when empty.
    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
    /// Directory containing the loaded config file (not serialized).
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl GatewayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.auth.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        validate_operations(&self.operations, &self.gateway.permission_domain)?;
        let document = self.policy_document()?;
        if document.roles.len() > MAX_ROLES {
            return Err(ConfigError::Invalid("policy roles exceed limit".to_string()));
        }
        document.compile().map_err(|err| ConfigError::Invalid(format!("policy: {err}")))?;
        Ok(())
    }

    /// Returns the effective operation catalog.
    #[must_use]
    pub fn operation_catalog(&self) -> Vec<OperationDescriptor> {
        if self.operations.is_empty() { builtin_operations() } else { self.operations.clone() }
    }

    /// Returns the merged policy document: inline roles, then roles loaded
    /// from `policy.path` (resolved against the config directory).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the policy file cannot be read or parsed.
    pub fn policy_document(&self) -> Result<PolicyDocument, ConfigError> {
        let mut roles = self.policy.roles.clone();
        if let Some(path) = &self.policy.path {
            validate_path_string("policy.path", path)?;
            roles.extend(load_policy_file(&self.resolve_relative(path))?.roles);
        }
        Ok(PolicyDocument {
            roles,
        })
    }

    /// Resolves a configured path against the config file directory.
    #[must_use]
    pub fn resolve_relative(&self, raw: &str) -> PathBuf {
        let candidate = PathBuf::from(raw.trim());
        match &self.source_dir {
            Some(dir) if candidate.is_relative() => dir.join(candidate),
            _ => candidate,
        }
    }
}

// ============================================================================
// SECTION: Gateway Settings
// ============================================================================

/// Core gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySettings {
    /// Domain segment used when deriving operation permissions.
    #[serde(default = "default_permission_domain")]
    pub permission_domain: String,
    /// Namespace assumed when a call omits one.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Largest credential accepted before any strategy runs.
    #[serde(default = "default_max_credential_bytes")]
    pub max_credential_bytes: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            permission_domain: default_permission_domain(),
            default_namespace: default_namespace(),
            max_credential_bytes: default_max_credential_bytes(),
        }
    }
}

impl GatewaySettings {
    /// Validates gateway settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.permission_domain.trim();
        if domain.is_empty() || domain != self.permission_domain {
            return Err(ConfigError::Invalid(
                "gateway.permission_domain must be non-empty and trimmed".to_string(),
            ));
        }
        if domain.contains(':') || domain.contains('*') {
            return Err(ConfigError::Invalid(
                "gateway.permission_domain must not contain ':' or '*'".to_string(),
            ));
        }
        if self.default_namespace.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "gateway.default_namespace must be non-empty".to_string(),
            ));
        }
        if self.max_credential_bytes == 0 || self.max_credential_bytes > MAX_CREDENTIAL_BYTES {
            return Err(ConfigError::Invalid(format!(
                "gateway.max_credential_bytes must be between 1 and {MAX_CREDENTIAL_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Auth Config
// ============================================================================

/// Credential configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared-secret API keys.
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
    /// Signed-token settings; the `jwt` scheme is disabled when absent.
    #[serde(default)]
    pub jwt: Option<JwtConfig>,
}

impl AuthConfig {
    /// Validates credential configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.len() > MAX_API_KEYS {
            return Err(ConfigError::Invalid("auth.api_keys exceeds limit".to_string()));
        }
        let mut ids = BTreeSet::new();
        for key in &self.api_keys {
            key.validate()?;
            if !ids.insert(key.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate auth.api_keys.id: {}", key.id)));
            }
        }
        if let Some(jwt) = &self.jwt {
            jwt.validate()?;
        }
        Ok(())
    }
}

/// One API key credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKeyConfig {
    /// Stable key identifier (used for revocation and audit).
    pub id: String,
    /// Subject the key authenticates as.
    pub subject: String,
    /// Inline key material.
    #[serde(default)]
    pub key: Option<String>,
    /// Environment variable holding the key material.
    #[serde(default)]
    pub key_env: Option<String>,
    /// Permission entries (grants or role references).
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Whether the key may authenticate.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Expiry as unix milliseconds.
    #[serde(default)]
    pub expires_at_ms: Option<i64>,
}

impl ApiKeyConfig {
    /// Validates one API key entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.api_keys.id must be non-empty".to_string()));
        }
        if self.subject.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "auth.api_keys.subject must be non-empty for key {}",
                self.id
            )));
        }
        match (&self.key, &self.key_env) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ConfigError::Invalid(format!(
                    "auth.api_keys entry {} must set exactly one of key or key_env",
                    self.id
                )));
            }
            (Some(key), None) => validate_api_key(&self.id, key)?,
            (None, Some(var)) => validate_env_var_name("auth.api_keys.key_env", var)?,
        }
        for permission in &self.permissions {
            Entitlement::parse(permission).map_err(|err| {
                ConfigError::Invalid(format!("auth.api_keys entry {}: {err}", self.id))
            })?;
        }
        Ok(())
    }

    /// Resolves the key material from inline text or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or the
    /// resolved key violates length limits.
    pub fn resolve_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.key {
            return Ok(key.clone());
        }
        let var = self.key_env.as_deref().unwrap_or_default();
        let value = env::var(var).map_err(|_| {
            ConfigError::Invalid(format!("auth.api_keys entry {}: {var} is not set", self.id))
        })?;
        validate_api_key(&self.id, &value)?;
        Ok(value)
    }
}

/// Signed-token (HS256) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// Inline HMAC secret.
    #[serde(default)]
    pub secret: Option<String>,
    /// Environment variable holding the HMAC secret.
    #[serde(default)]
    pub secret_env: Option<String>,
    /// Required `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Clock skew tolerated for `exp` and `nbf`.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
    /// Lifetime of issued tokens.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl JwtConfig {
    /// Validates signed-token settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.secret, &self.secret_env) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ConfigError::Invalid(
                    "auth.jwt must set exactly one of secret or secret_env".to_string(),
                ));
            }
            (Some(secret), None) => validate_jwt_secret(secret)?,
            (None, Some(var)) => validate_env_var_name("auth.jwt.secret_env", var)?,
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt.issuer must be non-empty".to_string()));
        }
        if self.leeway_secs > MAX_JWT_LEEWAY_SECS {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt.leeway_secs must be at most {MAX_JWT_LEEWAY_SECS}"
            )));
        }
        if self.default_ttl_secs == 0 || self.default_ttl_secs > MAX_JWT_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt.default_ttl_secs must be between 1 and {MAX_JWT_TTL_SECS}"
            )));
        }
        Ok(())
    }

    /// Resolves the HMAC secret from inline text or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or the
    /// secret is too short.
    pub fn resolve_secret(&self) -> Result<String, ConfigError> {
        if let Some(secret) = &self.secret {
            return Ok(secret.clone());
        }
        let var = self.secret_env.as_deref().unwrap_or_default();
        let value = env::var(var)
            .map_err(|_| ConfigError::Invalid(format!("auth.jwt: {var} is not set")))?;
        validate_jwt_secret(&value)?;
        Ok(value)
    }
}

// ============================================================================
// SECTION: Policy Config
// ============================================================================

/// Role policy sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Inline role definitions.
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
    /// Optional YAML (or TOML) policy document path.
    #[serde(default)]
    pub path: Option<String>,
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Structured `tracing` events on the `audit` target.
    #[default]
    Tracing,
    /// JSON lines on stderr.
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Discard events.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// File path for the `file` sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid for the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Logging Config
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level filter.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or YAML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the operation catalog.
fn validate_operations(operations: &[OperationDescriptor], domain: &str) -> Result<(), ConfigError> {
    if operations.len() > MAX_OPERATIONS {
        return Err(ConfigError::Invalid("operations exceed limit".to_string()));
    }
    let mut names = BTreeSet::new();
    for operation in operations {
        if operation.name.trim().is_empty() {
            return Err(ConfigError::Invalid("operations.name must be non-empty".to_string()));
        }
        if !names.insert(operation.name.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate operations.name: {}", operation.name)));
        }
        operation.required_permission(domain).map_err(|err| {
            ConfigError::Invalid(format!("operation {}: {err}", operation.name))
        })?;
        if operation.fields.len() > MAX_OPERATION_FIELDS {
            return Err(ConfigError::Invalid(format!(
                "operation {} declares too many fields",
                operation.name
            )));
        }
        let mut fields = BTreeSet::new();
        for field in &operation.fields {
            if field.name.trim().is_empty() || field.name == FIELD_CONFIRM {
                return Err(ConfigError::Invalid(format!(
                    "operation {} has an invalid field name: {}",
                    operation.name, field.name
                )));
            }
            if !fields.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "operation {} declares field {} twice",
                    operation.name, field.name
                )));
            }
            if let (Some(min), Some(max)) = (field.minimum, field.maximum) {
                if min > max {
                    return Err(ConfigError::Invalid(format!(
                        "operation {} field {}: minimum exceeds maximum",
                        operation.name, field.name
                    )));
                }
            }
            if let Some(pattern) = &field.pattern {
                if !matches!(field.field_type, FieldType::String | FieldType::StringMap) {
                    return Err(ConfigError::Invalid(format!(
                        "operation {} field {}: pattern requires a string or string_map",
                        operation.name, field.name
                    )));
                }
                Regex::new(pattern).map_err(|err| {
                    ConfigError::Invalid(format!(
                        "operation {} field {}: invalid pattern: {err}",
                        operation.name, field.name
                    ))
                })?;
            }
        }
    }
    Ok(())
}

/// Validates inline API key material.
fn validate_api_key(id: &str, key: &str) -> Result<(), ConfigError> {
    if key.len() < MIN_API_KEY_LENGTH || key.len() > MAX_API_KEY_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "auth.api_keys entry {id}: key length must be between {MIN_API_KEY_LENGTH} and \
             {MAX_API_KEY_LENGTH}"
        )));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "auth.api_keys entry {id}: key must not contain whitespace"
        )));
    }
    Ok(())
}

/// Validates inline HMAC secret material.
fn validate_jwt_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "auth.jwt secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Validates an environment variable name reference.
fn validate_env_var_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let valid = !value.is_empty()
        && value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !value.starts_with(|ch: char| ch.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be a valid environment variable name")))
    }
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Serde default for the permission domain.
fn default_permission_domain() -> String {
    "infra".to_string()
}

/// Serde default for the namespace.
fn default_namespace() -> String {
    "default".to_string()
}

/// Serde default for the credential size limit.
const fn default_max_credential_bytes() -> usize {
    8 * 1024
}

/// Serde default for token issuer.
fn default_issuer() -> String {
    "opsgate".to_string()
}

/// Serde default for token leeway.
const fn default_leeway_secs() -> u64 {
    30
}

/// Serde default for token lifetime.
const fn default_ttl_secs() -> u64 {
    60 * 60
}

/// Serde default for the log level.
fn default_log_level() -> String {
    "info".to_string()
}

/// Serde default for boolean flags that start enabled.
const fn default_true() -> bool {
    true
}
