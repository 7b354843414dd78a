//! Report policy tests for contract-harness-config.
// crates/contract-harness-config/tests/report_policy.rs
// =============================================================================
// Module: Report Policy Tests
// Description: Validate section emission and failure aggregation.
// Purpose: Ensure report settings map inventory findings to a verdict.
// =============================================================================

use contract_harness_config::ReportConfig;
use contract_harness_config::ReportError;
use contract_harness_config::ReportKind;
use contract_harness_config::ReportPolicy;
use contract_harness_config::ReportsConfig;
use contract_harness_core::InterfaceEntry;
use contract_harness_core::InventoryReport;
use contract_harness_core::ResolutionError;
use contract_harness_core::TypeName;

/// Result type for policy tests.
type TestResult = Result<(), String>;

/// Section that reports and fails the run.
const FAIL: ReportConfig = ReportConfig {
    report: true,
    fail_on_error: true,
};

/// Section that neither reports nor fails.
const SILENT: ReportConfig = ReportConfig {
    report: false,
    fail_on_error: false,
};

/// Report with one finding in every section.
fn report_with_findings() -> InventoryReport {
    InventoryReport {
        packages: vec!["demo::".to_string()],
        interfaces: vec![InterfaceEntry {
            capability: TypeName::from("demo::Named"),
            tests: vec![TypeName::from("demo::NamedTest")],
            implementations: vec![TypeName::from("demo::Widget")],
        }],
        untested: vec![TypeName::from("demo::Sized")],
        unimplemented: vec![TypeName::from("demo::Colored")],
        untested_implementations: vec![TypeName::from("demo::BareTest")],
        errors: vec![
            ResolutionError::NoTests {
                entry: TypeName::from("demo::BareTest"),
            }
            .into(),
        ],
    }
}

/// Builds a policy from per-section settings.
fn policy(
    untested: ReportConfig,
    unimplemented: ReportConfig,
    errors: ReportConfig,
) -> ReportPolicy {
    ReportPolicy::new(&ReportsConfig {
        untested,
        unimplemented,
        errors,
    })
}

// ============================================================================
// SECTION: Section Emission
// ============================================================================

#[test]
fn default_policy_reports_every_section_without_failing() -> TestResult {
    let verdict = ReportPolicy::default().evaluate(&report_with_findings());
    if !verdict.is_success() {
        return Err("default policy must not fail".to_string());
    }
    let kinds: Vec<ReportKind> = verdict.sections.iter().map(|section| section.kind).collect();
    if kinds != [ReportKind::Untested, ReportKind::Unimplemented, ReportKind::Errors] {
        return Err("sections must follow untested, unimplemented, errors order".to_string());
    }
    if verdict.interfaces != ["Interface: demo::Named [demo::NamedTest]"] {
        return Err("interface lines must always be produced".to_string());
    }
    Ok(())
}

#[test]
fn disabled_section_is_not_emitted() -> TestResult {
    let verdict = policy(SILENT, ReportConfig::default(), ReportConfig::default())
        .evaluate(&report_with_findings());
    if verdict.section(ReportKind::Untested).is_some() {
        return Err("untested section must be suppressed".to_string());
    }
    let errors = verdict.section(ReportKind::Errors).ok_or("errors section missing")?;
    if errors.lines != ["no tests found for implementation demo::BareTest"] {
        return Err("error lines must render each error".to_string());
    }
    Ok(())
}

#[test]
fn empty_sections_never_emit_or_fail() -> TestResult {
    let verdict = policy(FAIL, FAIL, FAIL).evaluate(&InventoryReport::default());
    if !verdict.sections.is_empty() {
        return Err("empty report emits no sections".to_string());
    }
    verdict.into_result().map(|_| ()).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn failing_sections_are_joined_in_order() -> TestResult {
    let verdict = policy(FAIL, SILENT, FAIL).evaluate(&report_with_findings());
    let expected = "Untested Interfaces Exist\nContract Test Errors Exist";
    if verdict.failure_message().as_deref() != Some(expected) {
        return Err("failure message must join failing sections".to_string());
    }
    match verdict.into_result() {
        Err(ReportError::Failed(message)) if message == expected => Ok(()),
        Err(error) => Err(format!("unexpected failure message: {error}")),
        Ok(_) => Err("verdict with failures must convert to an error".to_string()),
    }
}

#[test]
fn fail_on_error_without_report_still_fails() -> TestResult {
    let silent_failure = ReportConfig {
        report: false,
        fail_on_error: true,
    };
    let verdict = policy(SILENT, silent_failure, SILENT).evaluate(&report_with_findings());
    if verdict.section(ReportKind::Unimplemented).is_some() {
        return Err("unimplemented section must not be emitted".to_string());
    }
    if verdict.failures != ["Unimplemented Tests Exist"] {
        return Err("unimplemented section must still fail the run".to_string());
    }
    Ok(())
}
