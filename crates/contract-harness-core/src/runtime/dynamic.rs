// crates/contract-harness-core/src/runtime/dynamic.rs
// ============================================================================
// Module: Dynamic Suite Resolution
// Description: Resolves implementations supplied by a dynamic entry point.
// Purpose: Run every member through the same resolver, in isolation.
// Dependencies: crate::{core, interfaces, runtime::resolver}, log
// ============================================================================

//! ## Overview
//! A dynamic entry point names the capability under test and the exclusions
//! once, then supplies its members at run time. Contract members inherit both
//! through a [`crate::core::ParentLink`] and are resolved independently: a
//! failure in one member is returned as [`DynamicResolution::Failed`] and
//! never stops its siblings. Plain members pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::core::EntryPoint;
use crate::core::ImplementationDeclaration;
use crate::core::ResolutionError;
use crate::interfaces::Runnable;
use crate::interfaces::SuiteMember;
use crate::runtime::resolver::PlanResolver;
use crate::runtime::resolver::TestPlan;

// ============================================================================
// SECTION: Resolution Results
// ============================================================================

/// Result of resolving one dynamic member.
#[derive(Clone)]
pub enum DynamicResolution {
    /// The member resolved to a plan.
    Resolved {
        /// Member declaration linked to its parent.
        implementation: ImplementationDeclaration,
        /// Resolved plan.
        plan: TestPlan,
    },
    /// The member could not be resolved.
    Failed(ResolutionError),
    /// The member is an ordinary unit.
    PassThrough(Arc<dyn Runnable>),
}

impl fmt::Debug for DynamicResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                implementation,
                plan,
            } => f
                .debug_struct("Resolved")
                .field("implementation", implementation.entry())
                .field("plan", &plan.keys())
                .finish(),
            Self::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
            Self::PassThrough(unit) => f.debug_tuple("PassThrough").field(&unit.name()).finish(),
        }
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves every member of a dynamic entry point, in member order.
///
/// # Errors
///
/// Returns [`ResolutionError::NotDynamic`] for a static entry point,
/// [`ResolutionError::MissingContractImpl`] when the dynamic entry point names
/// no capability, and [`ResolutionError::EmptyDynamicSuite`] when it supplies
/// no members. Member-level errors are returned in place instead.
pub fn resolve_dynamic_set(
    entry: &EntryPoint,
    resolver: &PlanResolver<'_>,
) -> Result<Vec<DynamicResolution>, ResolutionError> {
    let suite = entry.dynamic_suite().ok_or_else(|| ResolutionError::NotDynamic {
        entry: entry.name().clone(),
    })?;
    let parent = ImplementationDeclaration::from_entry(entry)?;
    let members = suite.suite_members();
    if members.is_empty() {
        return Err(ResolutionError::EmptyDynamicSuite {
            entry: entry.name().clone(),
        });
    }

    let resolutions = members
        .into_iter()
        .map(|member| match member {
            SuiteMember::Contract(member) => {
                let implementation = ImplementationDeclaration::for_member(&member, &parent);
                match resolver.resolve(&implementation) {
                    Ok(plan) => DynamicResolution::Resolved {
                        implementation,
                        plan,
                    },
                    Err(error) => {
                        warn!(
                            "dynamic member {} of {} failed: {error}",
                            member.name(),
                            entry.name()
                        );
                        DynamicResolution::Failed(error)
                    }
                }
            }
            SuiteMember::Plain(unit) => DynamicResolution::PassThrough(unit),
        })
        .collect();
    Ok(resolutions)
}
