// crates/contract-harness-core/src/runtime/inventory.rs
// ============================================================================
// Module: Contract Inventory
// Description: Coverage report of capabilities, suites, and implementations.
// Purpose: Feed external reporting without performing any I/O.
// Dependencies: crate::{core, runtime}, log, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ContractInventory::gather`] walks a populated [`ResolutionContext`] and
//! records, for every capability under the configured package prefixes, the
//! suites declared for it and the classes implementing it. From that it
//! derives the sections external reports are built from:
//! - untested capabilities: no suite is registered;
//! - unimplemented capabilities: suites exist but no entry point reaches them;
//! - implementations without tests;
//! - declaration and resolution errors.
//!
//! Gathering never instantiates producer hosts and never calls dynamic
//! suites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::core::DeclarationError;
use crate::core::ImplementationDeclaration;
use crate::core::ResolutionError;
use crate::core::TypeName;
use crate::runtime::suite::ResolutionContext;

// ============================================================================
// SECTION: Report Types
// ============================================================================

/// Suites and implementors of one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceEntry {
    /// Capability name.
    pub capability: TypeName,
    /// Declaring types of the suites validating the capability.
    pub tests: Vec<TypeName>,
    /// Concrete classes whose closure contains the capability.
    pub implementations: Vec<TypeName>,
}

/// One error carried by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryError {
    /// A malformed contract declaration.
    Declaration(DeclarationError),
    /// An entry point that could not be resolved.
    Resolution {
        /// Offending entry point.
        entry: TypeName,
        /// Rendered error.
        message: String,
    },
}

impl From<ResolutionError> for InventoryError {
    fn from(error: ResolutionError) -> Self {
        Self::Resolution {
            entry: error.entry().clone(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration(error) => fmt::Display::fmt(error, f),
            Self::Resolution {
                message,
                ..
            } => f.write_str(message),
        }
    }
}

/// Coverage report of one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    /// Package prefixes the report is scoped to; empty means everything.
    pub packages: Vec<String>,
    /// Per-capability entries in lexical order.
    pub interfaces: Vec<InterfaceEntry>,
    /// Capabilities without any registered suite.
    pub untested: Vec<TypeName>,
    /// Capabilities whose suites no entry point reaches.
    pub unimplemented: Vec<TypeName>,
    /// Entry points with neither contract nor direct tests.
    pub untested_implementations: Vec<TypeName>,
    /// Declaration and resolution errors.
    pub errors: Vec<InventoryError>,
}

impl InventoryReport {
    /// Returns true when every section is empty.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.untested.is_empty()
            && self.unimplemented.is_empty()
            && self.untested_implementations.is_empty()
            && self.errors.is_empty()
    }

    /// Renders one `Interface: <name> [<suites>]` line per capability.
    #[must_use]
    pub fn interface_lines(&self) -> Vec<String> {
        self.interfaces
            .iter()
            .map(|entry| {
                let tests =
                    entry.tests.iter().map(TypeName::as_str).collect::<Vec<_>>().join(", ");
                format!("Interface: {} [{tests}]", entry.capability)
            })
            .collect()
    }

    /// Renders the untested section, one name per line.
    #[must_use]
    pub fn untested_lines(&self) -> Vec<String> {
        self.untested.iter().map(ToString::to_string).collect()
    }

    /// Renders the unimplemented section, one name per line.
    #[must_use]
    pub fn unimplemented_lines(&self) -> Vec<String> {
        self.unimplemented.iter().map(ToString::to_string).collect()
    }

    /// Renders the error section, one error per line.
    #[must_use]
    pub fn error_lines(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// SECTION: Gathering
// ============================================================================

/// Builds [`InventoryReport`]s.
#[derive(Debug, Clone, Default)]
pub struct ContractInventory {
    /// Package prefixes to report on.
    packages: Vec<String>,
}

impl ContractInventory {
    /// Creates an inventory scoped to `packages`; empty means everything.
    #[must_use]
    pub fn new(packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when `name` falls under a configured package prefix.
    fn in_scope(&self, name: &TypeName) -> bool {
        self.packages.is_empty() || self.packages.iter().any(|prefix| name.is_within(prefix))
    }

    /// Gathers the report of `context`.
    #[must_use]
    pub fn gather(&self, context: &ResolutionContext) -> InventoryReport {
        for package in &self.packages {
            debug!("PKG: {package}");
        }
        let graph = context.graph();
        let registry = context.registry();
        let resolver = context.resolver();
        let assembler = context.assembler();

        let mut errors: Vec<InventoryError> =
            registry.errors().into_iter().map(InventoryError::Declaration).collect();
        let mut reached = BTreeSet::new();
        let mut untested_implementations = Vec::new();
        for entry in context.entry_points() {
            let resolved = ImplementationDeclaration::from_entry(entry).and_then(|implementation| {
                resolver.resolve(&implementation).map(|plan| (implementation, plan))
            });
            let (implementation, plan) = match resolved {
                Ok(resolved) => resolved,
                Err(error) => {
                    errors.push(error.into());
                    continue;
                }
            };
            reached.extend(plan.closure().iter().cloned());
            if !entry.is_dynamic() && !assembler.has_tests(&implementation, &plan) {
                untested_implementations.push(entry.name().clone());
                errors.push(
                    ResolutionError::NoTests {
                        entry: entry.name().clone(),
                    }
                    .into(),
                );
            }
        }

        let capabilities: BTreeSet<&TypeName> = graph
            .capabilities()
            .map(|descriptor| &descriptor.name)
            .chain(registry.capabilities())
            .filter(|name| self.in_scope(name))
            .collect();
        let interfaces: Vec<InterfaceEntry> = capabilities
            .into_iter()
            .map(|capability| InterfaceEntry {
                capability: capability.clone(),
                tests: registry
                    .lookup_by_capability(capability)
                    .iter()
                    .map(|declaration| declaration.declaring_type().clone())
                    .collect(),
                implementations: graph.implementors(capability).into_iter().collect(),
            })
            .collect();
        let untested = interfaces
            .iter()
            .filter(|entry| entry.tests.is_empty())
            .map(|entry| entry.capability.clone())
            .collect();
        let unimplemented = interfaces
            .iter()
            .filter(|entry| !entry.tests.is_empty() && !reached.contains(&entry.capability))
            .map(|entry| entry.capability.clone())
            .collect();

        InventoryReport {
            packages: self.packages.clone(),
            interfaces,
            untested,
            unimplemented,
            untested_implementations,
            errors,
        }
    }
}
