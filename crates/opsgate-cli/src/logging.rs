// crates/opsgate-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: tracing-subscriber installation for the opsgate binary.
// Purpose: Route gateway diagnostics to stderr in text or JSON form.
// Dependencies: opsgate-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! Diagnostics always go to stderr so stdout carries only command output.
//! The filter comes from `OPSGATE_LOG` when set, else from `logging.level`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use opsgate_config::LogFormat;
use opsgate_config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the configured log filter.
pub const LOG_ENV_VAR: &str = "OPSGATE_LOG";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Subscriber installation failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// A global subscriber is already installed.
    #[error("log subscriber already installed: {0}")]
    Install(String),
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Picks the filter directive: a non-blank override wins over the configured level.
#[must_use]
pub fn resolve_directive(env_override: Option<&str>, config: &LoggingConfig) -> String {
    match env_override.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => config.level.clone(),
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_override = std::env::var(LOG_ENV_VAR).ok();
    let directive = resolve_directive(env_override.as_deref(), config);
    let filter =
        EnvFilter::try_new(&directive).map_err(|err| LoggingError::Filter(err.to_string()))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match config.format {
        LogFormat::Text => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
