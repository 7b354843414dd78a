// crates/contract-harness-core/src/runtime/resolver.rs
// ============================================================================
// Module: Test Plan Resolver
// Description: Intersects a capability closure with the declaration registry.
// Purpose: Produce the ordered, duplicate-free test plan of one implementation.
// Dependencies: crate::{core, runtime::registry}, log
// ============================================================================

//! ## Overview
//! Resolution walks the implementation's capability closure in lexical order.
//! Excluded capabilities are noted as skipped, capabilities without suites
//! are noted as untested, and every other capability contributes its
//! registered declarations. Declarations reached through several paths are
//! kept once, at their first position. The resulting [`TestPlan`] is a pure
//! value: resolving the same implementation against the same registry always
//! yields the same plan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use log::info;

use crate::core::CapabilityGraph;
use crate::core::ContractDeclaration;
use crate::core::DeclarationKey;
use crate::core::ImplementationDeclaration;
use crate::core::ResolutionError;
use crate::core::TypeName;
use crate::runtime::registry::DeclarationRegistry;

// ============================================================================
// SECTION: Test Plan
// ============================================================================

/// Resolved contract suites for one implementation.
///
/// # Invariants
/// - `declarations` is unique by [`DeclarationKey`] and ordered by first
///   reach over the lexically ordered closure.
/// - No declaration targets a skipped capability.
#[derive(Debug, Clone)]
pub struct TestPlan {
    /// Entry point the plan was resolved for.
    implementation: TypeName,
    /// Capability closure of the type under test.
    closure: BTreeSet<TypeName>,
    /// Applicable declarations, well-formed and malformed.
    declarations: Vec<Arc<ContractDeclaration>>,
    /// Capabilities with no registered suite.
    untested: BTreeSet<TypeName>,
    /// Capabilities excluded by the implementation.
    skipped: BTreeSet<TypeName>,
}

impl TestPlan {
    /// Returns the entry point the plan was resolved for.
    #[must_use]
    pub const fn implementation(&self) -> &TypeName {
        &self.implementation
    }

    /// Returns the capability closure the plan was resolved from.
    #[must_use]
    pub const fn closure(&self) -> &BTreeSet<TypeName> {
        &self.closure
    }

    /// Returns every applicable declaration in plan order.
    #[must_use]
    pub fn declarations(&self) -> &[Arc<ContractDeclaration>] {
        &self.declarations
    }

    /// Iterates the well-formed partition in plan order.
    pub fn ready(&self) -> impl Iterator<Item = &Arc<ContractDeclaration>> {
        self.declarations.iter().filter(|declaration| declaration.is_well_formed())
    }

    /// Iterates the malformed partition in plan order.
    pub fn malformed(&self) -> impl Iterator<Item = &Arc<ContractDeclaration>> {
        self.declarations.iter().filter(|declaration| !declaration.is_well_formed())
    }

    /// Returns true when at least one well-formed declaration applies.
    #[must_use]
    pub fn has_ready(&self) -> bool {
        self.ready().next().is_some()
    }

    /// Returns the capabilities with no registered suite.
    #[must_use]
    pub const fn untested(&self) -> &BTreeSet<TypeName> {
        &self.untested
    }

    /// Returns the capabilities excluded by the implementation.
    #[must_use]
    pub const fn skipped(&self) -> &BTreeSet<TypeName> {
        &self.skipped
    }

    /// Returns the declaration identities in plan order.
    #[must_use]
    pub fn keys(&self) -> Vec<DeclarationKey> {
        self.declarations.iter().map(|declaration| declaration.key().clone()).collect()
    }

    /// Returns true when the plan contains the declaration `key`.
    #[must_use]
    pub fn contains(&self, key: &DeclarationKey) -> bool {
        self.declarations.iter().any(|declaration| declaration.key() == key)
    }

    /// Returns the number of applicable declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true when no declaration applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves implementations against a populated registry.
#[derive(Debug, Clone, Copy)]
pub struct PlanResolver<'a> {
    /// Declared type hierarchy.
    graph: &'a CapabilityGraph,
    /// Populated declaration registry.
    registry: &'a DeclarationRegistry,
}

impl<'a> PlanResolver<'a> {
    /// Creates a resolver over a graph and a registry.
    #[must_use]
    pub const fn new(graph: &'a CapabilityGraph, registry: &'a DeclarationRegistry) -> Self {
        Self {
            graph,
            registry,
        }
    }

    /// Returns the registry resolution reads from.
    #[must_use]
    pub const fn registry(&self) -> &'a DeclarationRegistry {
        self.registry
    }

    /// Resolves the test plan of `implementation`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownImplementation`] when the type under
    /// test is missing from the capability graph.
    pub fn resolve(
        &self,
        implementation: &ImplementationDeclaration,
    ) -> Result<TestPlan, ResolutionError> {
        let entry = implementation.entry();
        let closure = self.graph.closure(implementation.target()).map_err(|source| {
            ResolutionError::UnknownImplementation {
                entry: entry.clone(),
                source,
            }
        })?;
        debug!("seeking contracts for {entry} across {} capabilities", closure.len());

        let mut seen = BTreeSet::new();
        let mut declarations = Vec::new();
        let mut untested = BTreeSet::new();
        let mut skipped = BTreeSet::new();
        for capability in &closure {
            if implementation.is_skipped(capability) {
                info!("Skipping {capability} for {entry}");
                skipped.insert(capability.clone());
                continue;
            }
            let found = self.registry.lookup_by_capability(capability);
            if found.is_empty() {
                info!("Checked {capability} found nothing");
                untested.insert(capability.clone());
                continue;
            }
            for declaration in found {
                if seen.insert(declaration.key().clone()) {
                    declarations.push(Arc::clone(declaration));
                }
            }
        }

        Ok(TestPlan {
            implementation: entry.clone(),
            closure,
            declarations,
            untested,
            skipped,
        })
    }
}
