// crates/contract-harness-core/src/runtime/mod.rs
// ============================================================================
// Module: Contract Harness Runtime
// Description: Registry, resolver, assembler, and execution adapter.
// Purpose: Turn discovered records into ordered runnable units.
// Dependencies: crate::{core, interfaces}, log, serde_json
// ============================================================================

//! ## Overview
//! The runtime is populated once per run ([`ResolutionContext::scan`]) and
//! read-only afterwards. Resolution ([`PlanResolver`]), assembly
//! ([`SuiteAssembler`]), and dynamic expansion ([`resolve_dynamic_set`]) are
//! synchronous and free of I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod assembler;
pub mod catalog;
pub mod dynamic;
pub mod inventory;
pub mod notifier;
pub mod registry;
pub mod resolver;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assembler::ContractUnit;
pub use assembler::DirectUnit;
pub use assembler::ErrorUnit;
pub use assembler::RunnableUnit;
pub use assembler::SuiteAssembler;
pub use catalog::Catalog;
pub use dynamic::DynamicResolution;
pub use dynamic::resolve_dynamic_set;
pub use inventory::ContractInventory;
pub use inventory::InterfaceEntry;
pub use inventory::InventoryError;
pub use inventory::InventoryReport;
pub use notifier::FailedTest;
pub use notifier::RecordingNotifier;
pub use notifier::RunEvent;
pub use notifier::RunSummary;
pub use registry::DeclarationRegistry;
pub use registry::SkipList;
pub use resolver::PlanResolver;
pub use resolver::TestPlan;
pub use suite::ContractSuite;
pub use suite::ResolutionContext;
