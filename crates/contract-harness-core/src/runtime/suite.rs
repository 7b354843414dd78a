// crates/contract-harness-core/src/runtime/suite.rs
// ============================================================================
// Module: Contract Suites
// Description: Entry point to resolution, assembly, and execution.
// Purpose: Build the ordered runnable units of one static or dynamic entry.
// Dependencies: crate::{core, interfaces, runtime}, log
// ============================================================================

//! ## Overview
//! A [`ResolutionContext`] owns the capability graph and declaration
//! registry of one run. It is populated once from a [`DiscoverySource`] and
//! then only read, so it can be shared by reference across every suite built
//! in the run.
//!
//! [`ContractSuite::build`] resolves one entry point. Static entries either
//! yield their units or a [`ResolutionError`]; dynamic entries isolate member
//! errors as failing initialization units so siblings still run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use log::warn;

use crate::core::CapabilityGraph;
use crate::core::EntryPoint;
use crate::core::ImplementationDeclaration;
use crate::core::ResolutionError;
use crate::core::TypeName;
use crate::interfaces::DiscoverySource;
use crate::interfaces::RunNotifier;
use crate::interfaces::Runnable;
use crate::runtime::assembler::ErrorUnit;
use crate::runtime::assembler::RunnableUnit;
use crate::runtime::assembler::SuiteAssembler;
use crate::runtime::dynamic::DynamicResolution;
use crate::runtime::dynamic::resolve_dynamic_set;
use crate::runtime::registry::DeclarationRegistry;
use crate::runtime::registry::SkipList;
use crate::runtime::resolver::PlanResolver;

// ============================================================================
// SECTION: Resolution Context
// ============================================================================

/// Graph, registry, and entry points of one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Declared type hierarchy.
    graph: CapabilityGraph,
    /// Populated declaration registry.
    registry: DeclarationRegistry,
    /// Entry points found by discovery.
    entry_points: Vec<EntryPoint>,
}

impl ResolutionContext {
    /// Creates a context from an already built graph and registry.
    #[must_use]
    pub const fn new(graph: CapabilityGraph, registry: DeclarationRegistry) -> Self {
        Self {
            graph,
            registry,
            entry_points: Vec::new(),
        }
    }

    /// Populates a context from a discovery source.
    #[must_use]
    pub fn scan(source: &dyn DiscoverySource, skip: &SkipList) -> Self {
        let graph = source.types().into_iter().collect();
        let registry = DeclarationRegistry::scan(source, skip);
        Self {
            graph,
            registry,
            entry_points: source.entry_points(),
        }
    }

    /// Adds entry points for reporting.
    #[must_use]
    pub fn with_entry_points(mut self, entry_points: impl IntoIterator<Item = EntryPoint>) -> Self {
        self.entry_points.extend(entry_points);
        self
    }

    /// Returns the capability graph.
    #[must_use]
    pub const fn graph(&self) -> &CapabilityGraph {
        &self.graph
    }

    /// Returns the declaration registry.
    #[must_use]
    pub const fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Returns the entry points found by discovery.
    #[must_use]
    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    /// Returns the discovered entry point named `name`.
    #[must_use]
    pub fn entry_point(&self, name: &TypeName) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|entry| entry.name() == name)
    }

    /// Returns a resolver over this context.
    #[must_use]
    pub const fn resolver(&self) -> PlanResolver<'_> {
        PlanResolver::new(&self.graph, &self.registry)
    }

    /// Returns an assembler over this context.
    #[must_use]
    pub const fn assembler(&self) -> SuiteAssembler<'_> {
        SuiteAssembler::new(&self.registry)
    }
}

// ============================================================================
// SECTION: Contract Suite
// ============================================================================

/// Ordered runnable units of one entry point.
///
/// # Invariants
/// - Units run strictly in the order they were assembled.
#[derive(Debug, Clone)]
pub struct ContractSuite {
    /// Entry point the suite was built for.
    entry: TypeName,
    /// Assembled units.
    units: Vec<RunnableUnit>,
}

impl ContractSuite {
    /// Resolves and assembles `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when a static entry point cannot be
    /// resolved, or when a dynamic entry point is unmarked or empty.
    pub fn build(entry: &EntryPoint, context: &ResolutionContext) -> Result<Self, ResolutionError> {
        let units = if entry.is_dynamic() {
            Self::dynamic_units(entry, context)?
        } else {
            let implementation = ImplementationDeclaration::from_entry(entry)?;
            let plan = context.resolver().resolve(&implementation)?;
            context.assembler().assemble(&implementation, &plan)?
        };
        Ok(Self {
            entry: entry.name().clone(),
            units,
        })
    }

    /// Assembles every member of a dynamic entry point.
    fn dynamic_units(
        entry: &EntryPoint,
        context: &ResolutionContext,
    ) -> Result<Vec<RunnableUnit>, ResolutionError> {
        let assembler = context.assembler();
        let mut units = Vec::new();
        for resolution in resolve_dynamic_set(entry, &context.resolver())? {
            match resolution {
                DynamicResolution::Resolved {
                    implementation,
                    plan,
                } => match assembler.assemble(&implementation, &plan) {
                    Ok(assembled) => units.extend(assembled),
                    Err(error) => {
                        warn!(
                            "dynamic member {} of {} failed: {error}",
                            error.entry(),
                            entry.name()
                        );
                        units.push(RunnableUnit::Error(ErrorUnit::initialization(&error)));
                    }
                },
                DynamicResolution::Failed(error) => {
                    units.push(RunnableUnit::Error(ErrorUnit::initialization(&error)));
                }
                DynamicResolution::PassThrough(unit) => units.push(RunnableUnit::External(unit)),
            }
        }
        Ok(units)
    }

    /// Returns the entry point the suite was built for.
    #[must_use]
    pub const fn entry(&self) -> &TypeName {
        &self.entry
    }

    /// Returns the assembled units in run order.
    #[must_use]
    pub fn units(&self) -> &[RunnableUnit] {
        &self.units
    }

    /// Consumes the suite, returning its units.
    #[must_use]
    pub fn into_units(self) -> Vec<RunnableUnit> {
        self.units
    }

    /// Runs every unit in order.
    pub fn run(&self, notifier: &mut dyn RunNotifier) {
        for unit in &self.units {
            unit.run(notifier);
        }
    }
}
