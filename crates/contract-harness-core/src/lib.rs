// crates/contract-harness-core/src/lib.rs
// ============================================================================
// Module: Contract Harness Core Library
// Description: Public API surface for the contract test resolution engine.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Contract harness core resolves, for one implementation under test, every
//! contract test suite that applies to the capabilities it transitively
//! satisfies, and assembles them into ordered runnable units. Malformed
//! suites become failing units instead of aborting the run. Discovery and
//! execution engines plug in through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::DiscoverySource;
pub use interfaces::DynamicSuite;
pub use interfaces::RunNotifier;
pub use interfaces::Runnable;
pub use interfaces::SuiteMember;
pub use interfaces::TestOutcome;
pub use runtime::Catalog;
pub use runtime::ContractInventory;
pub use runtime::ContractSuite;
pub use runtime::ContractUnit;
pub use runtime::DeclarationRegistry;
pub use runtime::DirectUnit;
pub use runtime::DynamicResolution;
pub use runtime::ErrorUnit;
pub use runtime::FailedTest;
pub use runtime::InterfaceEntry;
pub use runtime::InventoryError;
pub use runtime::InventoryReport;
pub use runtime::PlanResolver;
pub use runtime::RecordingNotifier;
pub use runtime::ResolutionContext;
pub use runtime::RunEvent;
pub use runtime::RunSummary;
pub use runtime::RunnableUnit;
pub use runtime::SkipList;
pub use runtime::SuiteAssembler;
pub use runtime::TestPlan;
pub use runtime::resolve_dynamic_set;
