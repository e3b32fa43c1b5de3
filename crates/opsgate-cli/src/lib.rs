// crates/opsgate-cli/src/lib.rs
// ============================================================================
// Module: OpsGate CLI Library
// Description: Support code shared by the opsgate binary and its tests.
// Purpose: Keep the entry point thin and the helpers testable.
// Dependencies: opsgate-gateway, tracing-subscriber
// ============================================================================

//! ## Overview
//! Helpers behind the `opsgate` binary: the dry-run collaborator used by
//! `opsgate call` and the logging setup shared by every subcommand.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dry_run;
pub mod logging;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dry_run::DryRunCollaborator;
pub use logging::init_tracing;
