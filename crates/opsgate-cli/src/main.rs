// crates/opsgate-cli/src/main.rs
// ============================================================================
// Module: OpsGate CLI Entry Point
// Description: Command dispatcher for configuration checks, tokens, and calls.
// Purpose: Provide a local CLI that drives the gateway end to end.
// Dependencies: clap, opsgate-config, opsgate-gateway, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The `opsgate` binary loads `opsgate.toml`, installs logging, and runs one
//! of three commands: `check-config` builds the whole gateway and reports
//! what it found, `issue-token` signs a token with the configured secret,
//! and `call` pushes a single tool call through the pipeline against a
//! dry-run collaborator. Security posture: credentials arrive on the command
//! line or from the environment and are never echoed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use opsgate_cli::DryRunCollaborator;
use opsgate_cli::init_tracing;
use opsgate_cli::logging::LoggingError;
use opsgate_config::ConfigError;
use opsgate_config::GatewayConfig;
use opsgate_gateway::ToolCall;
use opsgate_gateway::auth::token::TokenIssueError;
use opsgate_gateway::bootstrap::BootstrapError;
use opsgate_gateway::bootstrap::build_token_authenticator;
use opsgate_gateway::build_gateway;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "opsgate", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to `OPSGATE_CONFIG` or ./opsgate.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load, validate, and build the gateway without running a call.
    CheckConfig,
    /// Sign an access token with the configured JWT secret.
    IssueToken(IssueTokenCommand),
    /// Run one tool call through the pipeline against a dry-run collaborator.
    Call(CallCommand),
}

/// Arguments for `issue-token`.
#[derive(Args, Debug)]
struct IssueTokenCommand {
    /// Stable user identifier (`sub`).
    #[arg(long, value_name = "ID")]
    user_id: String,
    /// Username (audit subject).
    #[arg(long, value_name = "NAME")]
    username: String,
    /// Permission entry; repeat for several.
    #[arg(long = "permission", value_name = "PERMISSION")]
    permissions: Vec<String>,
    /// Lifetime in seconds (defaults to `auth.jwt.default_ttl_secs`).
    #[arg(long, value_name = "SECS")]
    ttl_secs: Option<u64>,
}

/// Arguments for `call`.
#[derive(Args, Debug)]
struct CallCommand {
    /// Credential scheme (`apikey`, `jwt`).
    #[arg(long, requires = "credential", conflicts_with = "authorization")]
    scheme: Option<String>,
    /// Raw credential for `--scheme`.
    #[arg(long, env = "OPSGATE_CREDENTIAL", hide_env_values = true)]
    credential: Option<String>,
    /// Full `Authorization` header value (`Bearer <token>` or `ApiKey <key>`).
    #[arg(long, value_name = "HEADER", env = "OPSGATE_AUTHORIZATION", hide_env_values = true)]
    authorization: Option<String>,
    /// Operation name.
    #[arg(long, value_name = "NAME")]
    operation: String,
    /// Operation arguments as a JSON object.
    #[arg(long, value_name = "JSON", default_value = "{}")]
    args: String,
}

/// Credential source chosen on the command line.
enum CallCredentials {
    /// Raw `Authorization` header value.
    Header(String),
    /// Explicit scheme and credential.
    Scheme {
        /// Credential scheme.
        scheme: String,
        /// Raw credential.
        credential: String,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Gateway could not be built.
    #[error("gateway bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
    /// Logging could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),
    /// Token could not be issued.
    #[error(transparent)]
    Token(#[from] TokenIssueError),
    /// Command-line input was unusable.
    #[error("{0}")]
    Usage(String),
    /// Output could not be written.
    #[error("failed to write {stream}: {source}")]
    Output {
        /// Stream label.
        stream: &'static str,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, loads config, and dispatches.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = GatewayConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging)?;
    match cli.command {
        Commands::CheckConfig => command_check_config(&config),
        Commands::IssueToken(command) => command_issue_token(&config, command),
        Commands::Call(command) => command_call(&config, command).await,
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `check-config`.
fn command_check_config(config: &GatewayConfig) -> CliResult<ExitCode> {
    let gateway = build_gateway(config, Arc::new(DryRunCollaborator))?;
    let roles = config.policy_document()?.roles.len();
    let summary = json!({
        "valid": true,
        "permissionDomain": gateway.catalog().domain(),
        "defaultNamespace": config.gateway.default_namespace,
        "apiKeys": config.auth.api_keys.len(),
        "jwt": config.auth.jwt.is_some(),
        "roles": roles,
        "operations": gateway.catalog().names(),
    });
    write_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `issue-token`.
fn command_issue_token(config: &GatewayConfig, command: IssueTokenCommand) -> CliResult<ExitCode> {
    let Some(jwt) = &config.auth.jwt else {
        return Err(CliError::Usage("auth.jwt is not configured".to_string()));
    };
    let tokens = build_token_authenticator(jwt)?;
    let token = tokens.issue(
        &command.user_id,
        &command.username,
        &command.permissions,
        command.ttl_secs.map(Duration::from_secs),
    )?;
    write_stdout_line(&token)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `call`.
async fn command_call(config: &GatewayConfig, command: CallCommand) -> CliResult<ExitCode> {
    let arguments = parse_arguments(&command.args)?;
    let credentials = match (command.scheme, command.credential, command.authorization) {
        (_, _, Some(header)) => CallCredentials::Header(header),
        (Some(scheme), Some(credential), None) => CallCredentials::Scheme {
            scheme,
            credential,
        },
        _ => {
            return Err(CliError::Usage(
                "provide --authorization or both --scheme and --credential".to_string(),
            ));
        }
    };
    let gateway = build_gateway(config, Arc::new(DryRunCollaborator))?;
    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());
    let result = match credentials {
        CallCredentials::Header(header) => {
            gateway.handle_header(&header, &command.operation, arguments, &cancel).await
        }
        CallCredentials::Scheme {
            scheme,
            credential,
        } => {
            let call = ToolCall::new(scheme, credential, command.operation, arguments);
            gateway.handle(&call, &cancel).await
        }
    };
    watcher.abort();
    write_json(&serde_json::to_value(&result).map_err(|err| CliError::Usage(err.to_string()))?)?;
    Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses `--args` into a JSON object.
fn parse_arguments(raw: &str) -> CliResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::Usage("--args must be a JSON object".to_string())),
        Err(err) => Err(CliError::Usage(format!("--args is not valid JSON: {err}"))),
    }
}

/// Cancels `cancel` on Ctrl-C.
fn spawn_interrupt_watcher(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling call");
            cancel.cancel();
        }
    })
}

/// Writes pretty JSON to stdout.
fn write_json(value: &Value) -> CliResult<()> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Usage(err.to_string()))?;
    write_stdout_line(&rendered)
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|source| CliError::Output {
        stream: "stdout",
        source,
    })
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================
