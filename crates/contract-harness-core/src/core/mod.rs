// crates/contract-harness-core/src/core/mod.rs
// ============================================================================
// Module: Contract Harness Core Types
// Description: Capabilities, declarations, producers, and entry points.
// Purpose: Provide the typed records the resolution engine operates on.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what discovery hands to the engine: the declared type
//! hierarchy, contract declarations with their validity errors, entry points
//! with their producers, and the structural errors resolution can report.
//! They are immutable once registered.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod declaration;
pub mod graph;
pub mod identifiers;
pub mod implementation;
pub mod producer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use declaration::ContractDeclaration;
pub use declaration::ContractDeclarationBuilder;
pub use declaration::DeclarationError;
pub use declaration::DeclarationStatus;
pub use declaration::Hook;
pub use declaration::InjectionPoint;
pub use declaration::TestCase;
pub use declaration::TestContext;
pub use declaration::TestFailure;
pub use declaration::TestFn;
pub use declaration::ensure;
pub use graph::CapabilityGraph;
pub use graph::GraphError;
pub use graph::TypeDescriptor;
pub use graph::TypeKind;
pub use identifiers::DeclarationKey;
pub use identifiers::TypeName;
pub use identifiers::TypeNameError;
pub use implementation::ContractImpl;
pub use implementation::EntryPoint;
pub use implementation::HostFactory;
pub use implementation::ImplementationDeclaration;
pub use implementation::ParentLink;
pub use implementation::ResolutionError;
pub use producer::FnProducer;
pub use producer::Instance;
pub use producer::InstanceError;
pub use producer::Producer;
pub use producer::ProducerError;
pub use producer::ProducerFactory;
pub use producer::ProducerHandle;
pub use producer::ProducerMap;
pub use producer::ProducerSource;
