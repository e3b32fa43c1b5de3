// crates/opsgate-core/src/lib.rs
// ============================================================================
// Module: OpsGate Core Library
// Description: Public API surface for the OpsGate data model.
// Purpose: Expose identities, permissions, operations, and result envelopes.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! OpsGate core defines the data model shared by the gateway, configuration,
//! and CLI crates: caller identities, parsed permission grants, role
//! policies, operation descriptors, validation results, execution envelopes,
//! and audit events. It performs no I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use model::*;
