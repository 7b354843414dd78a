// crates/contract-harness-core/src/runtime/catalog.rs
// ============================================================================
// Module: In-Memory Catalog
// Description: Discovery source backed by explicitly registered records.
// Purpose: Let hosts and tests supply types, suites, and entry points directly.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`Catalog`] is the simplest [`DiscoverySource`]: whatever was added is
//! what discovery reports, in insertion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ContractDeclaration;
use crate::core::EntryPoint;
use crate::core::TypeDescriptor;
use crate::interfaces::DiscoverySource;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// In-memory discovery source.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Declared types.
    types: Vec<TypeDescriptor>,
    /// Contract declarations.
    declarations: Vec<ContractDeclaration>,
    /// Implementation entry points.
    entry_points: Vec<EntryPoint>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type descriptor.
    #[must_use]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// Adds a contract declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: ContractDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds an implementation entry point.
    #[must_use]
    pub fn with_entry_point(mut self, entry: EntryPoint) -> Self {
        self.entry_points.push(entry);
        self
    }
}

impl DiscoverySource for Catalog {
    fn types(&self) -> Vec<TypeDescriptor> {
        self.types.clone()
    }

    fn declarations(&self) -> Vec<ContractDeclaration> {
        self.declarations.clone()
    }

    fn entry_points(&self) -> Vec<EntryPoint> {
        self.entry_points.clone()
    }
}
