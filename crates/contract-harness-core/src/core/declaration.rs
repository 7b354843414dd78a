// crates/contract-harness-core/src/core/declaration.rs
// ============================================================================
// Module: Contract Declarations
// Description: Reusable test suites that validate a single capability.
// Purpose: Carry test bodies, lifecycle hooks, and validity errors as data.
// Dependencies: crate::core::{identifiers, producer}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ContractDeclaration`] is the typed record of one contract test suite:
//! the capability it validates, its injection point, its test methods and
//! before/after hooks. Building a declaration never fails. Structural
//! problems are recorded as [`DeclarationError`]s and surface later as a
//! failing unit, so every malformed declaration in a run is visible at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::DeclarationKey;
use crate::core::identifiers::TypeName;
use crate::core::producer::InstanceError;
use crate::core::producer::ProducerHandle;

// ============================================================================
// SECTION: Test Failures
// ============================================================================

/// Reason a single test method failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestFailure {
    /// An assertion in the test body failed.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// The producer could not hand out the requested instance.
    #[error(transparent)]
    Instance(#[from] InstanceError),
    /// The implementation supplies no producer for the capability.
    #[error("no producer is bound for {0}")]
    ProducerUnavailable(TypeName),
    /// The suite was malformed and never ran.
    #[error("errors during parsing of suite {suite}: {}", .messages.join("; "))]
    Declaration {
        /// Declaring type of the malformed suite.
        suite: TypeName,
        /// Recorded diagnostics.
        messages: Vec<String>,
    },
    /// The test body panicked.
    #[error("test panicked: {0}")]
    Panicked(String),
    /// The implementation could not be resolved or instantiated.
    #[error("initialization failed: {0}")]
    Initialization(String),
}

/// Returns an assertion failure when `condition` is false.
///
/// # Errors
///
/// Returns [`TestFailure::Assertion`] carrying `message`.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), TestFailure> {
    if condition { Ok(()) } else { Err(TestFailure::Assertion(message.into())) }
}

// ============================================================================
// SECTION: Test Context
// ============================================================================

/// Per-test view handed to test bodies and hooks.
pub struct TestContext<'a> {
    /// Declaring type of the running suite.
    suite: &'a TypeName,
    /// Name of the running test.
    test: &'a str,
    /// Producer bound to the running unit, if any.
    producer: Option<&'a mut ProducerHandle>,
}

impl<'a> TestContext<'a> {
    /// Creates a context for one test invocation.
    #[must_use]
    pub fn new(
        suite: &'a TypeName,
        test: &'a str,
        producer: Option<&'a mut ProducerHandle>,
    ) -> Self {
        Self {
            suite,
            test,
            producer,
        }
    }

    /// Returns the declaring type of the running suite.
    #[must_use]
    pub const fn suite(&self) -> &TypeName {
        self.suite
    }

    /// Returns the running test name.
    #[must_use]
    pub const fn test_name(&self) -> &str {
        self.test
    }

    /// Returns the bound producer.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::ProducerUnavailable`] when no producer is bound.
    pub fn producer(&mut self) -> Result<&mut ProducerHandle, TestFailure> {
        let suite = self.suite;
        self.producer.as_deref_mut().ok_or_else(|| TestFailure::ProducerUnavailable(suite.clone()))
    }

    /// Produces a fresh instance of `T` from the bound producer.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure`] when no producer is bound or production fails.
    pub fn new_instance<T: Any>(&mut self) -> Result<T, TestFailure> {
        Ok(self.producer()?.new_instance::<T>()?)
    }
}

// ============================================================================
// SECTION: Test Cases
// ============================================================================

/// Shared test or hook body.
pub type TestFn = Arc<dyn Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync>;

/// One test method.
#[derive(Clone)]
pub struct TestCase {
    /// Method name.
    name: String,
    /// Type the method was declared in.
    declared_in: TypeName,
    /// Test body.
    body: TestFn,
}

impl TestCase {
    /// Creates a test case.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declared_in: impl Into<TypeName>,
        body: impl Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            declared_in: declared_in.into(),
            body: Arc::new(body),
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type the method was declared in.
    #[must_use]
    pub const fn declared_in(&self) -> &TypeName {
        &self.declared_in
    }

    /// Invokes the body.
    ///
    /// # Errors
    ///
    /// Returns the [`TestFailure`] produced by the body.
    pub fn invoke(&self, context: &mut TestContext<'_>) -> Result<(), TestFailure> {
        (self.body)(context)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("declared_in", &self.declared_in)
            .finish_non_exhaustive()
    }
}

/// Lifecycle hook run before or after every test of a suite.
#[derive(Clone)]
pub struct Hook {
    /// Hook name.
    name: String,
    /// Hook body.
    body: TestFn,
}

impl Hook {
    /// Creates a hook.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// Returns the hook name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the hook.
    ///
    /// # Errors
    ///
    /// Returns the [`TestFailure`] produced by the hook.
    pub fn invoke(&self, context: &mut TestContext<'_>) -> Result<(), TestFailure> {
        (self.body)(context)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Injection Points
// ============================================================================

/// Marked setter through which a contract suite receives its producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionPoint {
    /// Setter method name, conventionally `set_producer`.
    pub method: String,
    /// Type that declares the setter.
    pub declared_on: TypeName,
    /// True when the declaring type of the setter is abstract.
    pub declared_on_abstract: bool,
    /// Number of parameters the setter accepts.
    pub parameter_count: usize,
}

impl InjectionPoint {
    /// Conventional setter name.
    pub const DEFAULT_METHOD: &'static str = "set_producer";

    /// Describes a one-argument setter declared on a concrete type.
    #[must_use]
    pub fn setter(method: impl Into<String>, declared_on: impl Into<TypeName>) -> Self {
        Self {
            method: method.into(),
            declared_on: declared_on.into(),
            declared_on_abstract: false,
            parameter_count: 1,
        }
    }

    /// Marks the setter as declared on an abstract type.
    #[must_use]
    pub const fn on_abstract_type(mut self) -> Self {
        self.declared_on_abstract = true;
        self
    }

    /// Overrides the parameter count.
    #[must_use]
    pub const fn with_parameters(mut self, parameter_count: usize) -> Self {
        self.parameter_count = parameter_count;
        self
    }
}

// ============================================================================
// SECTION: Declaration Errors
// ============================================================================

/// Declaration-scoped validity errors. Recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationError {
    /// The declaring type is abstract.
    #[error("contract declaration {declaring_type} must not be abstract")]
    AbstractDeclaringType {
        /// Offending declaration.
        declaring_type: TypeName,
    },
    /// No injection setter was marked.
    #[error(
        "contract declaration {declaring_type} must include an injection marker on a \
         non-abstract declared setter"
    )]
    MissingInjectionPoint {
        /// Offending declaration.
        declaring_type: TypeName,
    },
    /// More than one injection setter was marked.
    #[error("contract declaration {declaring_type} marks {count} injection setters; exactly one is allowed")]
    AmbiguousInjectionPoint {
        /// Offending declaration.
        declaring_type: TypeName,
        /// Number of marked setters.
        count: usize,
    },
    /// The injection setter is declared on an abstract type.
    #[error("injection setter {method} of {declaring_type} must not be declared on an abstract type")]
    AbstractInjectionPoint {
        /// Offending declaration.
        declaring_type: TypeName,
        /// Setter name.
        method: String,
    },
    /// The injection setter does not take exactly one argument.
    #[error("injection setter {method} of {declaring_type} takes {parameters} arguments; expected 1")]
    MalformedInjectionPoint {
        /// Offending declaration.
        declaring_type: TypeName,
        /// Setter name.
        method: String,
        /// Declared parameter count.
        parameters: usize,
    },
}

// ============================================================================
// SECTION: Contract Declarations
// ============================================================================

/// Readiness of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationStatus<'a> {
    /// Well-formed and runnable.
    Ready,
    /// Malformed; the errors are reported when its unit executes.
    Malformed(&'a [DeclarationError]),
}

/// Reusable suite of tests validating exactly one capability.
///
/// # Invariants
/// - `errors` is empty exactly when the declaration is runnable.
/// - Immutable once built.
#[derive(Debug, Clone)]
pub struct ContractDeclaration {
    /// Declaring type plus target capability.
    key: DeclarationKey,
    /// True when the declaring type is abstract.
    is_abstract: bool,
    /// Every marked injection setter.
    injection_points: Vec<InjectionPoint>,
    /// Test methods in declaration order.
    tests: Vec<TestCase>,
    /// Hooks run before each test.
    before: Vec<Hook>,
    /// Hooks run after each test.
    after: Vec<Hook>,
    /// Validity errors found at build time.
    errors: Vec<DeclarationError>,
}

impl ContractDeclaration {
    /// Starts a declaration for `declaring_type` validating `target`.
    #[must_use]
    pub fn builder(
        declaring_type: impl Into<TypeName>,
        target: impl Into<TypeName>,
    ) -> ContractDeclarationBuilder {
        ContractDeclarationBuilder {
            key: DeclarationKey::new(declaring_type, target),
            is_abstract: false,
            injection_points: Vec::new(),
            tests: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Returns the declaration identity.
    #[must_use]
    pub const fn key(&self) -> &DeclarationKey {
        &self.key
    }

    /// Returns the declaring type.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeName {
        &self.key.declaring_type
    }

    /// Returns the capability under test.
    #[must_use]
    pub const fn target(&self) -> &TypeName {
        &self.key.target
    }

    /// Returns true when the declaring type is abstract.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Returns the injection point when exactly one valid setter exists.
    #[must_use]
    pub fn injection_point(&self) -> Option<&InjectionPoint> {
        match self.injection_points.as_slice() {
            [point] if self.errors.is_empty() => Some(point),
            _ => None,
        }
    }

    /// Returns the test methods.
    #[must_use]
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Returns the before hooks.
    #[must_use]
    pub fn before_hooks(&self) -> &[Hook] {
        &self.before
    }

    /// Returns the after hooks.
    #[must_use]
    pub fn after_hooks(&self) -> &[Hook] {
        &self.after
    }

    /// Returns the recorded validity errors.
    #[must_use]
    pub fn errors(&self) -> &[DeclarationError] {
        &self.errors
    }

    /// Returns the readiness of the declaration.
    #[must_use]
    pub fn status(&self) -> DeclarationStatus<'_> {
        if self.errors.is_empty() {
            DeclarationStatus::Ready
        } else {
            DeclarationStatus::Malformed(&self.errors)
        }
    }

    /// Returns true when the declaration can run.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ContractDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

/// Builder for [`ContractDeclaration`].
#[derive(Debug)]
pub struct ContractDeclarationBuilder {
    /// Declaring type plus target capability.
    key: DeclarationKey,
    /// True when the declaring type is abstract.
    is_abstract: bool,
    /// Marked injection setters.
    injection_points: Vec<InjectionPoint>,
    /// Test methods.
    tests: Vec<TestCase>,
    /// Before hooks.
    before: Vec<Hook>,
    /// After hooks.
    after: Vec<Hook>,
}

impl ContractDeclarationBuilder {
    /// Marks the declaring type as abstract.
    #[must_use]
    pub const fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Adds a marked injection setter.
    #[must_use]
    pub fn inject(mut self, point: InjectionPoint) -> Self {
        self.injection_points.push(point);
        self
    }

    /// Adds the conventional `set_producer` setter on the declaring type.
    #[must_use]
    pub fn producer_setter(self) -> Self {
        let point =
            InjectionPoint::setter(InjectionPoint::DEFAULT_METHOD, self.key.declaring_type.clone());
        self.inject(point)
    }

    /// Adds a test method declared on this suite.
    #[must_use]
    pub fn test(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync + 'static,
    ) -> Self {
        let case = TestCase::new(name, self.key.declaring_type.clone(), body);
        self.tests.push(case);
        self
    }

    /// Adds a before hook.
    #[must_use]
    pub fn before(mut self, hook: Hook) -> Self {
        self.before.push(hook);
        self
    }

    /// Adds an after hook.
    #[must_use]
    pub fn after(mut self, hook: Hook) -> Self {
        self.after.push(hook);
        self
    }

    /// Validates and builds the declaration. Never fails.
    #[must_use]
    pub fn build(self) -> ContractDeclaration {
        let errors = validate(&self.key.declaring_type, self.is_abstract, &self.injection_points);
        ContractDeclaration {
            key: self.key,
            is_abstract: self.is_abstract,
            injection_points: self.injection_points,
            tests: self.tests,
            before: self.before,
            after: self.after,
            errors,
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Collects every structural error of a declaration.
fn validate(
    declaring_type: &TypeName,
    is_abstract: bool,
    injection_points: &[InjectionPoint],
) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    if is_abstract {
        errors.push(DeclarationError::AbstractDeclaringType {
            declaring_type: declaring_type.clone(),
        });
    }
    match injection_points {
        [] => errors.push(DeclarationError::MissingInjectionPoint {
            declaring_type: declaring_type.clone(),
        }),
        [point] => {
            if point.declared_on_abstract {
                errors.push(DeclarationError::AbstractInjectionPoint {
                    declaring_type: declaring_type.clone(),
                    method: point.method.clone(),
                });
            }
            if point.parameter_count != 1 {
                errors.push(DeclarationError::MalformedInjectionPoint {
                    declaring_type: declaring_type.clone(),
                    method: point.method.clone(),
                    parameters: point.parameter_count,
                });
            }
        }
        points => errors.push(DeclarationError::AmbiguousInjectionPoint {
            declaring_type: declaring_type.clone(),
            count: points.len(),
        }),
    }
    errors
}
