// crates/contract-harness-core/tests/execution.rs
// ============================================================================
// Module: Suite Execution Tests
// Description: Tests for assembly, producer lifecycle, and error units.
// ============================================================================
//! ## Overview
//! Integration tests that build contract suites from a catalog and run them
//! through the recording notifier.

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

mod support;

use std::sync::Arc;
use std::sync::Mutex;

use contract_harness_core::Catalog;
use contract_harness_core::ContractDeclaration;
use contract_harness_core::ContractImpl;
use contract_harness_core::ContractSuite;
use contract_harness_core::EntryPoint;
use contract_harness_core::Hook;
use contract_harness_core::ProducerMap;
use contract_harness_core::RecordingNotifier;
use contract_harness_core::ResolutionContext;
use contract_harness_core::ResolutionError;
use contract_harness_core::Runnable;
use contract_harness_core::SkipList;
use contract_harness_core::TestFailure;
use contract_harness_core::TestOutcome;
use contract_harness_core::TypeName;
use support::Calls;
use support::NAMED;
use support::NAMED_TEST;
use support::TestResult;
use support::WIDGET;
use support::WIDGET_TEST;
use support::ensure;
use support::named_producer;
use support::named_suite;
use support::widget_source;
use support::widget_types;

/// Scans `catalog` without skip classes.
fn context(catalog: &Catalog) -> ResolutionContext {
    ResolutionContext::scan(catalog, &SkipList::new())
}

/// Catalog holding only the widget family types.
fn catalog_with_types() -> Catalog {
    widget_types().into_iter().fold(Catalog::new(), Catalog::with_type)
}

// ============================================================================
// SECTION: Contract Units
// ============================================================================

#[test]
fn named_suite_runs_once_against_widget() -> TestResult {
    let calls = Calls::shared();
    let entry = EntryPoint::with_source(WIDGET_TEST, widget_source(&calls))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite());
    let suite = ContractSuite::build(&entry, &context(&catalog))?;
    ensure(suite.units().len() == 1, "one contract unit")?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let summary = notifier.summary();
    ensure(summary.passed == 1 && summary.is_success(), "assertion passed")?;
    ensure(calls.produced() == 1, "producer invoked once")?;
    ensure(calls.cleaned() == 1, "clean_up called once")
}

#[test]
fn contract_unit_is_named_after_implementation_and_suite() -> TestResult {
    let calls = Calls::shared();
    let entry = EntryPoint::with_source(WIDGET_TEST, widget_source(&calls))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite());
    let suite = ContractSuite::build(&entry, &context(&catalog))?;
    let unit = suite.units().first().ok_or("missing unit")?;
    ensure(unit.name() == "demo::WidgetTest [NamedTest testing Named]", "unit name")?;
    ensure(unit.test_names() == ["name_is_not_empty"], "test names")
}

#[test]
fn failing_assertion_still_cleans_up() -> TestResult {
    let calls = Calls::shared();
    let nameless_calls = Arc::clone(&calls);
    let source = ProducerMap::new().with(NAMED, move || named_producer(&nameless_calls, ""));
    let entry =
        EntryPoint::with_source(WIDGET_TEST, source).contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite());
    let suite = ContractSuite::build(&entry, &context(&catalog))?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let summary = notifier.summary();
    ensure(summary.failures.len() == 1, "empty name fails the contract")?;
    ensure(
        summary.failures[0].failure == TestFailure::Assertion("name must not be empty".to_string()),
        "assertion message carried",
    )?;
    ensure(calls.cleaned() == 1, "clean_up runs after a failure")
}

#[test]
fn panicking_test_is_reported_and_cleaned_up() -> TestResult {
    let calls = Calls::shared();
    let declaration = ContractDeclaration::builder("demo::PanickyTest", NAMED)
        .producer_setter()
        .test("panics", |context| {
            let _named = context.new_instance::<Box<dyn support::Named>>()?;
            panic!("boom");
        })
        .build();
    let entry = EntryPoint::with_source(WIDGET_TEST, widget_source(&calls))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(declaration);
    let suite = ContractSuite::build(&entry, &context(&catalog))?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let outcome = notifier
        .outcome("demo::WidgetTest [PanickyTest testing Named]", "panics")
        .ok_or("panicking test must finish")?;
    ensure(
        *outcome == TestOutcome::Failed(TestFailure::Panicked("boom".to_string())),
        "panic converted to a failure",
    )?;
    ensure(calls.produced() == 1 && calls.cleaned() == 1, "producer pair completed")
}

#[test]
fn hooks_wrap_every_test_and_after_hooks_always_run() -> TestResult {
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let before_log = Arc::clone(&log);
    let body_log = Arc::clone(&log);
    let after_log = Arc::clone(&log);
    let declaration = ContractDeclaration::builder("demo::HookedTest", NAMED)
        .producer_setter()
        .before(Hook::new("open", move |context| {
            before_log.lock().unwrap().push(format!("before {}", context.test_name()));
            Ok(())
        }))
        .after(Hook::new("close", move |context| {
            after_log.lock().unwrap().push(format!("after {}", context.test_name()));
            Ok(())
        }))
        .test("first", move |_| {
            body_log.lock().unwrap().push("first".to_string());
            Err(TestFailure::Assertion("first fails".to_string()))
        })
        .test("second", |_| Ok(()))
        .build();
    let calls = Calls::shared();
    let entry = EntryPoint::with_source(WIDGET_TEST, widget_source(&calls))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(declaration);
    let suite = ContractSuite::build(&entry, &context(&catalog))?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let recorded = log.lock().unwrap().clone();
    ensure(
        recorded == ["before first", "first", "after first", "before second", "after second"],
        "hook order",
    )?;
    let summary = notifier.summary();
    ensure(summary.passed == 1 && summary.failures.len() == 1, "one pass, one failure")?;
    ensure(calls.cleaned() == 2, "clean_up after every test")
}

#[test]
fn missing_producer_fails_each_test() -> TestResult {
    let entry = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite());
    let suite = ContractSuite::build(&entry, &context(&catalog))?;
    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let summary = notifier.summary();
    ensure(summary.failures.len() == 1, "test fails without a producer")?;
    ensure(
        summary.failures[0].failure == TestFailure::ProducerUnavailable(TypeName::from(NAMED_TEST)),
        "failure names the suite",
    )
}

// ============================================================================
// SECTION: Error Units
// ============================================================================

#[test]
fn abstract_declaration_surfaces_as_one_failing_unit() -> TestResult {
    let calls = Calls::shared();
    let broken = ContractDeclaration::builder("demo::AbstractNamedTest", NAMED)
        .abstract_type()
        .producer_setter()
        .test("never_runs", |_| Ok(()))
        .build();
    let entry = EntryPoint::with_source(WIDGET_TEST, widget_source(&calls))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite()).with_declaration(broken);
    let suite = ContractSuite::build(&entry, &context(&catalog))?;
    let errors: Vec<_> = suite.units().iter().filter(|unit| unit.is_error()).collect();
    ensure(errors.len() == 1, "exactly one error unit")?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let summary = notifier.summary();
    ensure(summary.passed == 1, "well-formed suite still runs")?;
    ensure(summary.failures.len() == 1, "error unit fails")?;
    let failed = &summary.failures[0];
    ensure(
        failed.test == "errors during parsing of suite demo::AbstractNamedTest",
        "test name identifies the suite",
    )?;
    ensure(
        failed.failure.to_string().contains("demo::AbstractNamedTest must not be abstract"),
        "diagnostic carried",
    )
}

#[test]
fn malformed_only_plan_still_reports_its_error_unit() -> TestResult {
    let broken = ContractDeclaration::builder("demo::AbstractNamedTest", NAMED)
        .abstract_type()
        .producer_setter()
        .build();
    let entry = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(broken);
    let suite = ContractSuite::build(&entry, &context(&catalog))?;
    match suite.units() {
        [unit] => {
            ensure(unit.is_error(), "malformed suite becomes an error unit")?;
            ensure(
                unit.name() == "[AbstractNamedTest testing Named]",
                "error unit names the declaring type",
            )?;
        }
        units => return Err(format!("expected one unit, found {}", units.len()).into()),
    }

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    let summary = notifier.summary();
    ensure(summary.passed == 0 && summary.failures.len() == 1, "one failing test")?;
    ensure(
        summary.failures[0].failure.to_string().contains("demo::AbstractNamedTest"),
        "diagnostic names the declaring type",
    )
}

// ============================================================================
// SECTION: Structural Errors
// ============================================================================

#[test]
fn implementation_without_any_tests_is_a_hard_error() -> TestResult {
    let entry = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types();
    let error = ContractSuite::build(&entry, &context(&catalog)).err().ok_or("build must fail")?;
    ensure(error.to_string() == "no tests found for implementation demo::WidgetTest", "message")
}

#[test]
fn failing_host_fails_fast() -> TestResult {
    let entry = EntryPoint::new(WIDGET_TEST, || Err("constructor threw".to_string()))
        .contract_impl(ContractImpl::new(WIDGET));
    let catalog = catalog_with_types().with_declaration(named_suite());
    match ContractSuite::build(&entry, &context(&catalog)) {
        Err(ResolutionError::Instantiation {
            reason,
            ..
        }) => ensure(reason == "constructor threw", "host reason carried"),
        other => Err(format!("unexpected build result: {other:?}").into()),
    }
}

// ============================================================================
// SECTION: Direct Tests
// ============================================================================

#[test]
fn direct_tests_run_first_and_inherited_contract_tests_are_filtered() -> TestResult {
    let calls = Calls::shared();
    let widget_calls = Arc::clone(&calls);
    let source =
        widget_source(&calls).with(WIDGET, move || named_producer(&widget_calls, "widget"));
    let suite_declaration = named_suite();
    let inherited = suite_declaration.tests()[0].clone();
    let entry = EntryPoint::with_source(WIDGET_TEST, source)
        .contract_impl(ContractImpl::new(WIDGET))
        .test("widget_specific", |context| {
            let named = context.new_instance::<Box<dyn support::Named>>()?;
            contract_harness_core::ensure(named.name() == "widget", "widget name")
        })
        .inherited_test(inherited);
    let catalog = catalog_with_types().with_declaration(suite_declaration);
    let suite = ContractSuite::build(&entry, &context(&catalog))?;

    let names: Vec<String> = suite.units().iter().map(Runnable::name).collect();
    ensure(
        names == ["demo::WidgetTest", "demo::WidgetTest [NamedTest testing Named]"],
        "direct unit first, then contract units",
    )?;
    let direct = suite.units().first().ok_or("missing direct unit")?;
    ensure(direct.test_names() == ["widget_specific"], "inherited test filtered out")?;

    let mut notifier = RecordingNotifier::new();
    suite.run(&mut notifier);
    ensure(notifier.summary().passed == 2, "direct and contract tests pass")?;
    ensure(
        notifier.units() == ["demo::WidgetTest", "demo::WidgetTest [NamedTest testing Named]"],
        "units run in assembly order",
    )
}

#[test]
fn tests_inherited_from_skipped_suites_are_not_run_as_direct_tests() -> TestResult {
    let inherited = named_suite().tests()[0].clone();
    let entry = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET))
        .test("standalone", |_| Ok(()))
        .inherited_test(inherited.clone());
    let catalog = catalog_with_types().with_declaration(named_suite());
    let skip = SkipList::parse(NAMED_TEST)?;
    let context = ResolutionContext::scan(&catalog, &skip);
    let suite = ContractSuite::build(&entry, &context)?;
    match suite.units() {
        [unit] => ensure(unit.test_names() == ["standalone"], "skipped contract test filtered")?,
        units => return Err(format!("expected one unit, found {}", units.len()).into()),
    }

    let inherited_only = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET))
        .inherited_test(inherited);
    match ContractSuite::build(&inherited_only, &context) {
        Err(ResolutionError::NoTests {
            ..
        }) => Ok(()),
        other => Err(format!("unexpected build result: {other:?}").into()),
    }
}

#[test]
fn direct_tests_alone_satisfy_resolution() -> TestResult {
    let entry = EntryPoint::with_source(WIDGET_TEST, ProducerMap::new())
        .contract_impl(ContractImpl::new(WIDGET))
        .test("standalone", |_| Ok(()));
    let suite = ContractSuite::build(&entry, &context(&catalog_with_types()))?;
    ensure(suite.units().len() == 1, "only the direct unit")
}
