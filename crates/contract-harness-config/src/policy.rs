// crates/contract-harness-config/src/policy.rs
// ============================================================================
// Module: Report Policy
// Description: Evaluates an inventory report against report settings.
// Purpose: Decide which report sections to emit and whether the run fails.
// Dependencies: contract-harness-core, log, thiserror
// ============================================================================

//! ## Overview
//! [`ReportPolicy`] applies the `[reports.*]` settings to an
//! [`InventoryReport`]. Empty sections are never emitted and never fail.
//! A non-empty section is emitted when `report = true` and fails the run
//! when `fail_on_error = true`. The caller owns writing sections anywhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_harness_core::InventoryReport;
use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::config::ContractsConfig;
use crate::config::ReportConfig;
use crate::config::ReportsConfig;

// ============================================================================
// SECTION: Report Sections
// ============================================================================

/// Report section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Capabilities without any suite.
    Untested,
    /// Capabilities whose suites never run.
    Unimplemented,
    /// Declaration and resolution errors.
    Errors,
}

impl ReportKind {
    /// Returns the section name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Untested => "untested",
            Self::Unimplemented => "unimplemented",
            Self::Errors => "errors",
        }
    }

    /// Returns the failure message raised when the section fails the run.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Untested => "Untested Interfaces Exist",
            Self::Unimplemented => "Unimplemented Tests Exist",
            Self::Errors => "Contract Test Errors Exist",
        }
    }
}

/// One emitted report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Section kind.
    pub kind: ReportKind,
    /// Rendered lines.
    pub lines: Vec<String>,
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Report policy failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// At least one failing section was non-empty.
    #[error("{0}")]
    Failed(String),
}

/// Outcome of applying a policy to an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportVerdict {
    /// `Interface: ...` lines, always produced.
    pub interfaces: Vec<String>,
    /// Emitted sections, in untested, unimplemented, errors order.
    pub sections: Vec<ReportSection>,
    /// Failure messages, in the same order.
    pub failures: Vec<String>,
}

impl ReportVerdict {
    /// Returns true when no section failed the run.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the emitted section of `kind`.
    #[must_use]
    pub fn section(&self, kind: ReportKind) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Returns every failure message joined by newlines.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if self.failures.is_empty() { None } else { Some(self.failures.join("\n")) }
    }

    /// Converts the verdict into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Failed`] carrying every failure message.
    pub fn into_result(self) -> Result<Self, ReportError> {
        match self.failure_message() {
            Some(message) => Err(ReportError::Failed(message)),
            None => Ok(self),
        }
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Applies report settings to inventory reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPolicy {
    /// Untested section settings.
    untested: ReportConfig,
    /// Unimplemented section settings.
    unimplemented: ReportConfig,
    /// Error section settings.
    errors: ReportConfig,
}

impl ReportPolicy {
    /// Creates a policy from report settings.
    #[must_use]
    pub const fn new(reports: &ReportsConfig) -> Self {
        Self {
            untested: reports.untested,
            unimplemented: reports.unimplemented,
            errors: reports.errors,
        }
    }

    /// Creates a policy from a full configuration.
    #[must_use]
    pub const fn from_config(config: &ContractsConfig) -> Self {
        Self::new(&config.reports)
    }

    /// Evaluates `report`.
    #[must_use]
    pub fn evaluate(&self, report: &InventoryReport) -> ReportVerdict {
        let mut verdict = ReportVerdict {
            interfaces: report.interface_lines(),
            ..ReportVerdict::default()
        };
        let sections = [
            (ReportKind::Untested, self.untested, report.untested_lines()),
            (ReportKind::Unimplemented, self.unimplemented, report.unimplemented_lines()),
            (ReportKind::Errors, self.errors, report.error_lines()),
        ];
        for (kind, settings, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            if settings.fail_on_error {
                warn!("{}", kind.failure_message());
                verdict.failures.push(kind.failure_message().to_string());
            }
            if settings.report {
                verdict.sections.push(ReportSection {
                    kind,
                    lines,
                });
            }
        }
        verdict
    }
}
