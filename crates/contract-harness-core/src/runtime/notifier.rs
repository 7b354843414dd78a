// crates/contract-harness-core/src/runtime/notifier.rs
// ============================================================================
// Module: Recording Notifier
// Description: In-memory run notifier with a pass/fail summary.
// Purpose: Observe unit execution without an external test engine.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`RecordingNotifier`] keeps every execution event in arrival order and
//! derives a [`RunSummary`] on demand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::TestFailure;
use crate::interfaces::RunNotifier;
use crate::interfaces::TestOutcome;

// ============================================================================
// SECTION: Events
// ============================================================================

/// One recorded execution event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A unit started.
    UnitStarted {
        /// Unit name.
        unit: String,
    },
    /// A test started.
    TestStarted {
        /// Unit name.
        unit: String,
        /// Test name.
        test: String,
    },
    /// A test finished.
    TestFinished {
        /// Unit name.
        unit: String,
        /// Test name.
        test: String,
        /// Test outcome.
        outcome: TestOutcome,
    },
    /// A unit finished.
    UnitFinished {
        /// Unit name.
        unit: String,
    },
}

/// A failed test as reported in a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTest {
    /// Unit name.
    pub unit: String,
    /// Test name.
    pub test: String,
    /// Failure reason.
    pub failure: TestFailure,
}

/// Pass/fail totals of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of tests that passed.
    pub passed: usize,
    /// Every failed test, in run order.
    pub failures: Vec<FailedTest>,
}

impl RunSummary {
    /// Returns the number of finished tests.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    /// Returns true when no test failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Notifier
// ============================================================================

/// Notifier that records every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    /// Events in arrival order.
    events: Vec<RunEvent>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded event.
    #[must_use]
    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    /// Returns the names of started units, in order.
    #[must_use]
    pub fn units(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RunEvent::UnitStarted {
                    unit,
                } => Some(unit.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the outcome of `test` in `unit`, if it finished.
    #[must_use]
    pub fn outcome(&self, unit: &str, test: &str) -> Option<&TestOutcome> {
        self.events.iter().find_map(|event| match event {
            RunEvent::TestFinished {
                unit: finished_unit,
                test: finished_test,
                outcome,
            } if finished_unit == unit && finished_test == test => Some(outcome),
            _ => None,
        })
    }

    /// Summarises every finished test.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for event in &self.events {
            if let RunEvent::TestFinished {
                unit,
                test,
                outcome,
            } = event
            {
                match outcome {
                    TestOutcome::Passed => summary.passed += 1,
                    TestOutcome::Failed(failure) => summary.failures.push(FailedTest {
                        unit: unit.clone(),
                        test: test.clone(),
                        failure: failure.clone(),
                    }),
                }
            }
        }
        summary
    }
}

impl RunNotifier for RecordingNotifier {
    fn unit_started(&mut self, unit: &str) {
        self.events.push(RunEvent::UnitStarted {
            unit: unit.to_string(),
        });
    }

    fn test_started(&mut self, unit: &str, test: &str) {
        self.events.push(RunEvent::TestStarted {
            unit: unit.to_string(),
            test: test.to_string(),
        });
    }

    fn test_finished(&mut self, unit: &str, test: &str, outcome: &TestOutcome) {
        self.events.push(RunEvent::TestFinished {
            unit: unit.to_string(),
            test: test.to_string(),
            outcome: outcome.clone(),
        });
    }

    fn unit_finished(&mut self, unit: &str) {
        self.events.push(RunEvent::UnitFinished {
            unit: unit.to_string(),
        });
    }
}
