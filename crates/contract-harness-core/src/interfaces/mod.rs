// crates/contract-harness-core/src/interfaces/mod.rs
// ============================================================================
// Module: Contract Harness Interfaces
// Description: Boundary contracts for discovery, execution, and dynamic suites.
// Purpose: Define the seams external collaborators plug into.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The resolution engine owns no classpath scanning and no test execution.
//! Discovery hands it typed records through [`DiscoverySource`]; execution
//! engines drive [`Runnable`] units and observe them through
//! [`RunNotifier`]. Dynamic entry points supply their members at run time
//! through [`DynamicSuite`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::core::ContractDeclaration;
use crate::core::EntryPoint;
use crate::core::TestFailure;
use crate::core::TypeDescriptor;

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Supplies every candidate type, declaration, and entry point of a run.
///
/// Implementations must be complete before the registry is built; the core
/// calls each method once per resolution run.
pub trait DiscoverySource {
    /// Returns every known type descriptor.
    fn types(&self) -> Vec<TypeDescriptor>;

    /// Returns every contract declaration found.
    fn declarations(&self) -> Vec<ContractDeclaration>;

    /// Returns every implementation entry point found.
    fn entry_points(&self) -> Vec<EntryPoint>;
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Outcome of one test method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The test passed.
    Passed,
    /// The test failed.
    Failed(TestFailure),
}

impl TestOutcome {
    /// Returns true for [`TestOutcome::Passed`].
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl From<Result<(), TestFailure>> for TestOutcome {
    fn from(result: Result<(), TestFailure>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// Observer of unit and test execution, owned by the execution engine.
pub trait RunNotifier {
    /// Called before the first test of a unit.
    fn unit_started(&mut self, _unit: &str) {}

    /// Called before each test.
    fn test_started(&mut self, _unit: &str, _test: &str) {}

    /// Called after each test with its outcome.
    fn test_finished(&mut self, unit: &str, test: &str, outcome: &TestOutcome);

    /// Called after the last test of a unit.
    fn unit_finished(&mut self, _unit: &str) {}
}

/// A unit the execution engine can run.
pub trait Runnable: Send + Sync {
    /// Returns the display name of the unit.
    fn name(&self) -> String;

    /// Returns the names of the tests the unit will run, in order.
    fn test_names(&self) -> Vec<String>;

    /// Runs every test, reporting each outcome to `notifier`.
    fn run(&self, notifier: &mut dyn RunNotifier);
}

// ============================================================================
// SECTION: Dynamic Suites
// ============================================================================

/// One member returned by a dynamic suite.
#[derive(Clone)]
pub enum SuiteMember {
    /// An entry point resolved through the contract engine.
    Contract(EntryPoint),
    /// An ordinary unit passed to the execution engine unchanged.
    Plain(Arc<dyn Runnable>),
}

impl fmt::Debug for SuiteMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract(entry) => f.debug_tuple("Contract").field(entry.name()).finish(),
            Self::Plain(unit) => f.debug_tuple("Plain").field(&unit.name()).finish(),
        }
    }
}

/// Entry point that supplies its implementations at run time.
pub trait DynamicSuite: Send + Sync {
    /// Returns the members to run, in order.
    fn suite_members(&self) -> Vec<SuiteMember>;
}
