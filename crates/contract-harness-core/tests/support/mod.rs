// crates/contract-harness-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and fixtures for resolution tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus a small
//! `Named`/`Aged` capability family with counting producers.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Each test binary uses a different subset of the fixtures.")]

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use contract_harness_core::ContractDeclaration;
use contract_harness_core::FnProducer;
use contract_harness_core::Producer;
use contract_harness_core::ProducerMap;
use contract_harness_core::TypeDescriptor;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across resolution integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Capability Fixtures
// ========================================================================

/// Capability with a non-empty name.
pub const NAMED: &str = "demo::Named";
/// Capability extending `Named` with an age.
pub const AGED: &str = "demo::Aged";
/// Concrete implementation of `Aged`.
pub const WIDGET: &str = "demo::Widget";
/// Entry point testing `Widget`.
pub const WIDGET_TEST: &str = "demo::WidgetTest";
/// Contract suite for `Named`.
pub const NAMED_TEST: &str = "demo::NamedTest";
/// Contract suite for `Aged`.
pub const AGED_TEST: &str = "demo::AgedTest";

/// Something with a name.
pub trait Named {
    /// Returns the name.
    fn name(&self) -> String;
}

/// Something with a name and an age.
pub trait Aged: Named {
    /// Returns the age.
    fn age(&self) -> u32;
}

/// Implementation under test.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Widget name.
    pub name: String,
    /// Widget age.
    pub age: u32,
}

impl Named for Widget {
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl Aged for Widget {
    fn age(&self) -> u32 {
        self.age
    }
}

/// Type descriptors for `Named`, `Aged: Named`, and `Widget: Aged`.
pub fn widget_types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::capability(NAMED),
        TypeDescriptor::capability(AGED).extends(NAMED),
        TypeDescriptor::class(WIDGET).implements(AGED),
    ]
}

/// Well-formed suite for `Named` asserting a non-empty name.
pub fn named_suite() -> ContractDeclaration {
    ContractDeclaration::builder(NAMED_TEST, NAMED)
        .producer_setter()
        .test("name_is_not_empty", |context| {
            let named = context.new_instance::<Box<dyn Named>>()?;
            contract_harness_core::ensure(!named.name().is_empty(), "name must not be empty")
        })
        .build()
}

/// Well-formed suite for `Aged` asserting a positive age.
pub fn aged_suite() -> ContractDeclaration {
    ContractDeclaration::builder(AGED_TEST, AGED)
        .producer_setter()
        .test("age_is_positive", |context| {
            let aged = context.new_instance::<Box<dyn Aged>>()?;
            contract_harness_core::ensure(aged.age() > 0, "age must be positive")
        })
        .build()
}

// ========================================================================
// Producer Fixtures
// ========================================================================

/// Counts producer calls across every producer built from one source.
#[derive(Debug, Default)]
pub struct Calls {
    /// Instances produced.
    produced: AtomicUsize,
    /// Cleanup calls made.
    cleaned: AtomicUsize,
}

impl Calls {
    /// Creates shared counters.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the number of instances produced.
    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }

    /// Returns the number of cleanup calls.
    pub fn cleaned(&self) -> usize {
        self.cleaned.load(Ordering::SeqCst)
    }
}

/// Builds a producer handing out `Box<dyn Named>` widgets.
pub fn named_producer(calls: &Arc<Calls>, name: &str) -> Box<dyn Producer> {
    let produced = Arc::clone(calls);
    let cleaned = Arc::clone(calls);
    let name = name.to_string();
    Box::new(
        FnProducer::new(move || {
            produced.produced.fetch_add(1, Ordering::SeqCst);
            let widget: Box<dyn Named> = Box::new(Widget {
                name: name.clone(),
                age: 3,
            });
            Ok(widget)
        })
        .on_clean_up(move || {
            cleaned.cleaned.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

/// Builds a producer handing out `Box<dyn Aged>` widgets.
pub fn aged_producer(calls: &Arc<Calls>, age: u32) -> Box<dyn Producer> {
    let produced = Arc::clone(calls);
    let cleaned = Arc::clone(calls);
    Box::new(
        FnProducer::new(move || {
            produced.produced.fetch_add(1, Ordering::SeqCst);
            let widget: Box<dyn Aged> = Box::new(Widget {
                name: "widget".to_string(),
                age,
            });
            Ok(widget)
        })
        .on_clean_up(move || {
            cleaned.cleaned.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

/// Producer source serving `Named` and `Aged` widgets.
pub fn widget_source(calls: &Arc<Calls>) -> ProducerMap {
    let named_calls = Arc::clone(calls);
    let aged_calls = Arc::clone(calls);
    ProducerMap::new()
        .with(NAMED, move || named_producer(&named_calls, "widget"))
        .with(AGED, move || aged_producer(&aged_calls, 3))
}
