// crates/contract-harness-core/src/runtime/assembler.rs
// ============================================================================
// Module: Suite Assembler
// Description: Turns a resolved test plan into runnable units.
// Purpose: Bind contract suites to producers and defer declaration errors.
// Dependencies: crate::{core, interfaces, runtime::{registry, resolver}}, log
// ============================================================================

//! ## Overview
//! The assembler maps every entry of a [`TestPlan`] to a [`RunnableUnit`]:
//! well-formed declarations become contract units bound to the
//! implementation's producer source, malformed ones become error units that
//! fail when executed. The implementation's own tests form a leading direct
//! unit when any remain after inherited contract tests are filtered out.
//!
//! Assembly fails fast only when the implementation as a whole cannot run:
//! no applicable tests, or a producer host that cannot be built.
//!
//! Every test invocation is guarded by `catch_unwind`, so after hooks and the
//! producer's cleanup run even when a body panics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use log::error;

use crate::core::ContractDeclaration;
use crate::core::Hook;
use crate::core::ImplementationDeclaration;
use crate::core::ProducerHandle;
use crate::core::ProducerSource;
use crate::core::ResolutionError;
use crate::core::TestCase;
use crate::core::TestContext;
use crate::core::TestFailure;
use crate::core::TypeName;
use crate::interfaces::RunNotifier;
use crate::interfaces::Runnable;
use crate::interfaces::TestOutcome;
use crate::runtime::registry::DeclarationRegistry;
use crate::runtime::resolver::TestPlan;

// ============================================================================
// SECTION: Runnable Units
// ============================================================================

/// One unit handed to the execution engine.
#[derive(Clone)]
pub enum RunnableUnit {
    /// A contract suite bound to an implementation.
    Contract(ContractUnit),
    /// The implementation's own tests.
    Direct(DirectUnit),
    /// A synthetic unit that reports recorded errors.
    Error(ErrorUnit),
    /// An ordinary unit passed through from a dynamic suite.
    External(Arc<dyn Runnable>),
}

impl RunnableUnit {
    /// Returns true for synthetic error units.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the bound contract declaration, for contract units.
    #[must_use]
    pub fn declaration(&self) -> Option<&ContractDeclaration> {
        match self {
            Self::Contract(unit) => Some(&unit.declaration),
            Self::Direct(_) | Self::Error(_) | Self::External(_) => None,
        }
    }

    /// Returns the unit as a trait object.
    fn as_runnable(&self) -> &dyn Runnable {
        match self {
            Self::Contract(unit) => unit,
            Self::Direct(unit) => unit,
            Self::Error(unit) => unit,
            Self::External(unit) => unit.as_ref(),
        }
    }
}

impl Runnable for RunnableUnit {
    fn name(&self) -> String {
        self.as_runnable().name()
    }

    fn test_names(&self) -> Vec<String> {
        self.as_runnable().test_names()
    }

    fn run(&self, notifier: &mut dyn RunNotifier) {
        self.as_runnable().run(notifier);
    }
}

impl fmt::Debug for RunnableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Contract(_) => "Contract",
            Self::Direct(_) => "Direct",
            Self::Error(_) => "Error",
            Self::External(_) => "External",
        };
        f.debug_tuple(kind).field(&self.name()).finish()
    }
}

// ============================================================================
// SECTION: Contract Units
// ============================================================================

/// Contract suite bound to the producer source of one implementation.
#[derive(Clone)]
pub struct ContractUnit {
    /// Entry point under test.
    implementation: TypeName,
    /// Well-formed declaration to run.
    declaration: Arc<ContractDeclaration>,
    /// Producer source of the implementation.
    source: Arc<dyn ProducerSource>,
}

impl ContractUnit {
    /// Returns the entry point under test.
    #[must_use]
    pub const fn implementation(&self) -> &TypeName {
        &self.implementation
    }
}

impl Runnable for ContractUnit {
    fn name(&self) -> String {
        format!("{} {}", self.implementation, self.declaration)
    }

    fn test_names(&self) -> Vec<String> {
        self.declaration.tests().iter().map(|case| case.name().to_string()).collect()
    }

    fn run(&self, notifier: &mut dyn RunNotifier) {
        let unit = self.name();
        let target = self.declaration.target();
        let mut handle = self
            .source
            .producer(target)
            .map(|producer| ProducerHandle::new(target.clone(), producer));
        notifier.unit_started(&unit);
        for case in self.declaration.tests() {
            notifier.test_started(&unit, case.name());
            let outcome = execute(
                self.declaration.declaring_type(),
                case,
                self.declaration.before_hooks(),
                self.declaration.after_hooks(),
                handle.as_mut(),
            );
            notifier.test_finished(&unit, case.name(), &outcome);
        }
        notifier.unit_finished(&unit);
    }
}

// ============================================================================
// SECTION: Direct Units
// ============================================================================

/// The implementation's own tests, excluding inherited contract tests.
#[derive(Clone)]
pub struct DirectUnit {
    /// Entry point the tests are declared on.
    entry: TypeName,
    /// Type under test; its producer is offered to the tests.
    target: TypeName,
    /// Tests to run.
    tests: Vec<TestCase>,
    /// Producer source of the implementation.
    source: Arc<dyn ProducerSource>,
}

impl Runnable for DirectUnit {
    fn name(&self) -> String {
        self.entry.to_string()
    }

    fn test_names(&self) -> Vec<String> {
        self.tests.iter().map(|case| case.name().to_string()).collect()
    }

    fn run(&self, notifier: &mut dyn RunNotifier) {
        let unit = self.name();
        let mut handle = self
            .source
            .producer(&self.target)
            .map(|producer| ProducerHandle::new(self.target.clone(), producer));
        notifier.unit_started(&unit);
        for case in &self.tests {
            notifier.test_started(&unit, case.name());
            let outcome = execute(&self.entry, case, &[], &[], handle.as_mut());
            notifier.test_finished(&unit, case.name(), &outcome);
        }
        notifier.unit_finished(&unit);
    }
}

// ============================================================================
// SECTION: Error Units
// ============================================================================

/// Synthetic unit with a single test that always fails.
#[derive(Debug, Clone)]
pub struct ErrorUnit {
    /// Unit name.
    name: String,
    /// Name of the failing test.
    test: String,
    /// Failure reported when the unit runs.
    failure: TestFailure,
}

impl ErrorUnit {
    /// Builds the error unit of a malformed declaration.
    #[must_use]
    pub fn declaration(declaration: &ContractDeclaration) -> Self {
        let suite = declaration.declaring_type().clone();
        Self {
            name: declaration.to_string(),
            test: format!("errors during parsing of suite {suite}"),
            failure: TestFailure::Declaration {
                messages: declaration.errors().iter().map(ToString::to_string).collect(),
                suite,
            },
        }
    }

    /// Builds the error unit of an implementation that could not be resolved.
    #[must_use]
    pub fn initialization(error: &ResolutionError) -> Self {
        Self {
            name: error.entry().to_string(),
            test: format!("initialization of {}", error.entry()),
            failure: TestFailure::Initialization(error.to_string()),
        }
    }

    /// Returns the failure the unit reports.
    #[must_use]
    pub const fn failure(&self) -> &TestFailure {
        &self.failure
    }
}

impl Runnable for ErrorUnit {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn test_names(&self) -> Vec<String> {
        vec![self.test.clone()]
    }

    fn run(&self, notifier: &mut dyn RunNotifier) {
        notifier.unit_started(&self.name);
        notifier.test_started(&self.name, &self.test);
        notifier.test_finished(&self.name, &self.test, &TestOutcome::Failed(self.failure.clone()));
        notifier.unit_finished(&self.name);
    }
}

// ============================================================================
// SECTION: Assembler
// ============================================================================

/// Materializes runnable units from resolved plans.
#[derive(Debug, Clone, Copy)]
pub struct SuiteAssembler<'a> {
    /// Registry used to recognise inherited contract tests.
    registry: &'a DeclarationRegistry,
}

impl<'a> SuiteAssembler<'a> {
    /// Creates an assembler over a populated registry.
    #[must_use]
    pub const fn new(registry: &'a DeclarationRegistry) -> Self {
        Self {
            registry,
        }
    }

    /// Returns the implementation's tests that were not inherited from a
    /// discovered contract declaration, skipped declarations included.
    #[must_use]
    pub fn direct_tests(&self, implementation: &ImplementationDeclaration) -> Vec<TestCase> {
        implementation
            .tests()
            .iter()
            .filter(|case| !self.registry.is_contract_type(case.declared_in()))
            .cloned()
            .collect()
    }

    /// Returns true when `plan` or the direct tests give the implementation
    /// something to run. Malformed declarations count, since each runs as an
    /// error unit.
    #[must_use]
    pub fn has_tests(&self, implementation: &ImplementationDeclaration, plan: &TestPlan) -> bool {
        !plan.is_empty() || !self.direct_tests(implementation).is_empty()
    }

    /// Assembles the units of one implementation.
    ///
    /// The direct unit comes first, followed by one unit per plan entry in
    /// plan order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NoTests`] when the plan is empty and no
    /// direct tests remain, and
    /// [`ResolutionError::Instantiation`] when the producer host fails.
    pub fn assemble(
        &self,
        implementation: &ImplementationDeclaration,
        plan: &TestPlan,
    ) -> Result<Vec<RunnableUnit>, ResolutionError> {
        let direct = self.direct_tests(implementation);
        if plan.is_empty() && direct.is_empty() {
            return Err(ResolutionError::NoTests {
                entry: implementation.entry().clone(),
            });
        }
        let source = implementation.instantiate()?;

        let mut units = Vec::with_capacity(plan.len() + 1);
        if !direct.is_empty() {
            units.push(RunnableUnit::Direct(DirectUnit {
                entry: implementation.entry().clone(),
                target: implementation.target().clone(),
                tests: direct,
                source: Arc::clone(&source),
            }));
        }
        for declaration in plan.declarations() {
            if declaration.is_well_formed() {
                units.push(RunnableUnit::Contract(ContractUnit {
                    implementation: implementation.entry().clone(),
                    declaration: Arc::clone(declaration),
                    source: Arc::clone(&source),
                }));
            } else {
                error!("Errors during parsing {}", declaration.declaring_type());
                for problem in declaration.errors() {
                    error!("{problem}");
                }
                units.push(RunnableUnit::Error(ErrorUnit::declaration(declaration)));
            }
        }
        Ok(units)
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs one test with its hooks, then cleans up the producer.
///
/// After hooks and cleanup always run; the first failure is reported.
fn execute(
    suite: &TypeName,
    case: &TestCase,
    before: &[Hook],
    after: &[Hook],
    producer: Option<&mut ProducerHandle>,
) -> TestOutcome {
    let mut context = TestContext::new(suite, case.name(), producer);
    let mut result = before.iter().try_for_each(|hook| guarded(|| hook.invoke(&mut context)));
    if result.is_ok() {
        result = guarded(|| case.invoke(&mut context));
    }
    for hook in after {
        let after_result = guarded(|| hook.invoke(&mut context));
        if result.is_ok() {
            result = after_result;
        }
    }
    if let Ok(producer) = context.producer() {
        producer.clean_up();
    }
    TestOutcome::from(result)
}

/// Converts a panic in `body` into [`TestFailure::Panicked`].
fn guarded(body: impl FnOnce() -> Result<(), TestFailure>) -> Result<(), TestFailure> {
    panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(TestFailure::Panicked(panic_message(payload.as_ref()))))
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
