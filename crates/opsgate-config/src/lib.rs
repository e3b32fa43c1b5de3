// crates/opsgate-config/src/lib.rs
// ============================================================================
// Module: OpsGate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for opsgate.toml semantics.
// Dependencies: opsgate-core, serde, toml, serde_yaml
// ============================================================================

//! ## Overview
//! `opsgate-config` defines the configuration model for the OpsGate gateway:
//! credentials, signing settings, role policy, audit sink, logging, and the
//! operation catalog. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted; secrets may be supplied by
//! environment variable instead of inline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use policy::load_policy_file;
