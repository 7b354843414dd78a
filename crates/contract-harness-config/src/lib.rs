// crates/contract-harness-config/src/lib.rs
// ============================================================================
// Module: Contract Harness Config Library
// Description: Canonical config model, validation, and report policy.
// Purpose: Single source of truth for contracts.toml semantics.
// Dependencies: contract-harness-core, serde, toml
// ============================================================================

//! ## Overview
//! `contract-harness-config` defines the configuration surface of a
//! resolution run: which contract declarations to skip, which packages the
//! coverage reports cover, and how each report section affects the run. It
//! provides strict, fail-closed validation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use policy::*;
