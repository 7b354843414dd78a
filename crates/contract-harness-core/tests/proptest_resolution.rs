// crates/contract-harness-core/tests/proptest_resolution.rs
// ============================================================================
// Module: Resolution Property-Based Tests
// Description: Property tests for transitivity, exclusion, and determinism.
// Purpose: Check plan invariants across random capability hierarchies.
// ============================================================================

//! Property-based tests for test plan invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use contract_harness_core::CapabilityGraph;
use contract_harness_core::ContractDeclaration;
use contract_harness_core::ContractImpl;
use contract_harness_core::DeclarationRegistry;
use contract_harness_core::EntryPoint;
use contract_harness_core::ImplementationDeclaration;
use contract_harness_core::PlanResolver;
use contract_harness_core::ProducerMap;
use contract_harness_core::TypeDescriptor;
use contract_harness_core::TypeName;
use proptest::prelude::*;

/// Concrete class under test.
const CLASS: &str = "prop::Subject";

/// Randomly generated capability family, possibly cyclic.
#[derive(Debug, Clone)]
struct Hierarchy {
    /// Parent indices of each capability.
    parents: Vec<Vec<usize>>,
    /// Capabilities the class implements directly.
    implemented: Vec<usize>,
    /// Whether each capability has a suite.
    tested: Vec<bool>,
    /// Whether each capability is excluded.
    skipped: Vec<bool>,
}

/// Name of the capability at `index`.
fn capability(index: usize) -> TypeName {
    TypeName::new(format!("prop::C{index:02}"))
}

/// Name of the suite for the capability at `index`.
fn suite(index: usize) -> TypeName {
    TypeName::new(format!("prop::C{index:02}Test"))
}

/// Generates hierarchies of two to seven capabilities.
fn hierarchy_strategy() -> impl Strategy<Value = Hierarchy> {
    (2usize .. 8).prop_flat_map(|count| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), count), count),
            prop::collection::vec(any::<bool>(), count),
            prop::collection::vec(any::<bool>(), count),
            prop::collection::vec(any::<bool>(), count),
        )
            .prop_map(|(edges, implemented, tested, skipped)| Hierarchy {
                parents: edges
                    .iter()
                    .enumerate()
                    .map(|(child, row)| {
                        row.iter()
                            .enumerate()
                            .filter(|(parent, edge)| **edge && *parent != child)
                            .map(|(parent, _)| parent)
                            .collect()
                    })
                    .collect(),
                implemented: implemented
                    .iter()
                    .enumerate()
                    .filter(|(_, flag)| **flag)
                    .map(|(index, _)| index)
                    .collect(),
                tested,
                skipped,
            })
    })
}

impl Hierarchy {
    fn graph(&self) -> CapabilityGraph {
        let mut graph: CapabilityGraph = self
            .parents
            .iter()
            .enumerate()
            .map(|(index, parents)| {
                parents
                    .iter()
                    .fold(TypeDescriptor::capability(capability(index)), |descriptor, parent| {
                        descriptor.extends(capability(*parent))
                    })
            })
            .collect();
        let class = self.implemented.iter().fold(TypeDescriptor::class(CLASS), |descriptor, index| {
            descriptor.implements(capability(*index))
        });
        graph.insert(class);
        graph
    }

    fn declarations(&self) -> Vec<ContractDeclaration> {
        self.tested
            .iter()
            .enumerate()
            .filter(|(_, tested)| **tested)
            .map(|(index, _)| {
                ContractDeclaration::builder(suite(index), capability(index))
                    .producer_setter()
                    .build()
            })
            .collect()
    }

    fn implementation(&self) -> ImplementationDeclaration {
        let marker = self
            .skipped
            .iter()
            .enumerate()
            .filter(|(_, skipped)| **skipped)
            .fold(ContractImpl::new(CLASS), |marker, (index, _)| marker.skip(capability(index)));
        let entry =
            EntryPoint::with_source("prop::SubjectTest", ProducerMap::new()).contract_impl(marker);
        ImplementationDeclaration::from_entry(&entry).unwrap()
    }

    /// Naive fixed-point reachability from the implemented capabilities.
    fn reachable(&self) -> BTreeSet<usize> {
        let mut reached: BTreeSet<usize> = self.implemented.iter().copied().collect();
        loop {
            let next: BTreeSet<usize> = reached
                .iter()
                .flat_map(|index| self.parents[*index].iter().copied())
                .chain(reached.iter().copied())
                .collect();
            if next == reached {
                return reached;
            }
            reached = next;
        }
    }
}

/// Registry holding `declarations`.
fn registry(declarations: impl IntoIterator<Item = ContractDeclaration>) -> DeclarationRegistry {
    let mut registry = DeclarationRegistry::new();
    for declaration in declarations {
        registry.register(declaration);
    }
    registry
}

proptest! {
    #[test]
    fn every_reachable_tested_capability_is_resolved(hierarchy in hierarchy_strategy()) {
        let graph = hierarchy.graph();
        let registry = registry(hierarchy.declarations());
        let implementation = hierarchy.implementation();
        let plan = PlanResolver::new(&graph, &registry).resolve(&implementation).unwrap();
        for index in hierarchy.reachable() {
            let expected = hierarchy.tested[index] && !hierarchy.skipped[index];
            let resolved = plan
                .declarations()
                .iter()
                .any(|declaration| declaration.target() == &capability(index));
            prop_assert_eq!(resolved, expected, "capability {}", index);
        }
    }

    #[test]
    fn skipped_capabilities_never_contribute_suites(hierarchy in hierarchy_strategy()) {
        let graph = hierarchy.graph();
        let registry = registry(hierarchy.declarations());
        let implementation = hierarchy.implementation();
        let plan = PlanResolver::new(&graph, &registry).resolve(&implementation).unwrap();
        for declaration in plan.declarations() {
            prop_assert!(!implementation.is_skipped(declaration.target()));
        }
        prop_assert!(plan.untested().is_disjoint(plan.skipped()));
    }

    #[test]
    fn plans_are_deterministic_across_registration_order(hierarchy in hierarchy_strategy()) {
        let graph = hierarchy.graph();
        let forward = registry(hierarchy.declarations());
        let backward = registry(hierarchy.declarations().into_iter().rev());
        let implementation = hierarchy.implementation();
        let first = PlanResolver::new(&graph, &forward).resolve(&implementation).unwrap();
        let again = PlanResolver::new(&graph, &forward).resolve(&implementation).unwrap();
        let reordered = PlanResolver::new(&graph, &backward).resolve(&implementation).unwrap();
        prop_assert_eq!(first.keys(), again.keys());
        prop_assert_eq!(first.keys(), reordered.keys());
        prop_assert_eq!(first.untested(), reordered.untested());
    }
}
