// crates/contract-harness-core/src/core/implementation.rs
// ============================================================================
// Module: Implementation Declarations
// Description: Entry points under test and their resolved declarations.
// Purpose: Capture target capability, exclusions, producers, and direct tests.
// Dependencies: crate::core::{declaration, graph, identifiers, producer}, crate::interfaces
// ============================================================================

//! ## Overview
//! An [`EntryPoint`] is what discovery finds: a named type that may carry a
//! [`ContractImpl`] marker (the type under test plus capabilities to skip),
//! a host factory that builds the producer source, its own test methods,
//! and optionally a [`DynamicSuite`]. Resolution turns a marked entry point
//! into an [`ImplementationDeclaration`]; dynamic members become
//! declarations linked to their enclosing entry through a [`ParentLink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::declaration::TestCase;
use crate::core::declaration::TestContext;
use crate::core::declaration::TestFailure;
use crate::core::graph::GraphError;
use crate::core::identifiers::TypeName;
use crate::core::producer::ProducerSource;
use crate::interfaces::DynamicSuite;

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// Structural errors that stop resolution of one implementation.
///
/// These never abort a whole run: each is reported against the entry point
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The entry point carries no [`ContractImpl`] marker.
    #[error("entry point {entry} must declare the implementation it tests")]
    MissingContractImpl {
        /// Offending entry point.
        entry: TypeName,
    },
    /// The type under test is not in the capability graph.
    #[error("implementation {entry} targets an unknown type: {source}")]
    UnknownImplementation {
        /// Offending entry point.
        entry: TypeName,
        /// Underlying graph error.
        source: GraphError,
    },
    /// The producer host could not be instantiated.
    #[error("entry point {entry} could not be instantiated: {reason}")]
    Instantiation {
        /// Offending entry point.
        entry: TypeName,
        /// Reason reported by the host factory.
        reason: String,
    },
    /// Neither contract tests nor direct tests apply.
    #[error("no tests found for implementation {entry}")]
    NoTests {
        /// Offending entry point.
        entry: TypeName,
    },
    /// A dynamic suite returned no members.
    #[error("dynamic suite {entry} returned no classes")]
    EmptyDynamicSuite {
        /// Offending entry point.
        entry: TypeName,
    },
    /// A dynamic resolution was requested for a static entry point.
    #[error("entry point {entry} is not a dynamic suite")]
    NotDynamic {
        /// Offending entry point.
        entry: TypeName,
    },
}

impl ResolutionError {
    /// Returns the entry point the error is reported against.
    #[must_use]
    pub const fn entry(&self) -> &TypeName {
        match self {
            Self::MissingContractImpl {
                entry,
            }
            | Self::UnknownImplementation {
                entry,
                ..
            }
            | Self::Instantiation {
                entry,
                ..
            }
            | Self::NoTests {
                entry,
            }
            | Self::EmptyDynamicSuite {
                entry,
            }
            | Self::NotDynamic {
                entry,
            } => entry,
        }
    }
}

// ============================================================================
// SECTION: Contract Impl Marker
// ============================================================================

/// Marker naming the type under test and the capabilities to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractImpl {
    /// Type whose capability closure is resolved.
    pub target: TypeName,
    /// Capabilities whose contract tests must not run.
    #[serde(default)]
    pub skip: Vec<TypeName>,
}

impl ContractImpl {
    /// Creates a marker for `target` with no exclusions.
    #[must_use]
    pub fn new(target: impl Into<TypeName>) -> Self {
        Self {
            target: target.into(),
            skip: Vec::new(),
        }
    }

    /// Excludes the contract tests of `capability`.
    #[must_use]
    pub fn skip(mut self, capability: impl Into<TypeName>) -> Self {
        self.skip.push(capability.into());
        self
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Builds the producer source of an entry point.
pub type HostFactory = Arc<dyn Fn() -> Result<Arc<dyn ProducerSource>, String> + Send + Sync>;

/// Implementation entry point as found by discovery.
#[derive(Clone)]
pub struct EntryPoint {
    /// Entry point type name.
    name: TypeName,
    /// Capability marker, if present.
    contract_impl: Option<ContractImpl>,
    /// Producer host factory.
    host: HostFactory,
    /// Test methods visible on the entry point, own and inherited.
    tests: Vec<TestCase>,
    /// Run-time member supplier, for dynamic entry points.
    dynamic: Option<Arc<dyn DynamicSuite>>,
}

impl EntryPoint {
    /// Creates an entry point whose host is built by `host`.
    #[must_use]
    pub fn new(
        name: impl Into<TypeName>,
        host: impl Fn() -> Result<Arc<dyn ProducerSource>, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            contract_impl: None,
            host: Arc::new(host),
            tests: Vec::new(),
            dynamic: None,
        }
    }

    /// Creates an entry point backed by an already built producer source.
    #[must_use]
    pub fn with_source(name: impl Into<TypeName>, source: impl ProducerSource + 'static) -> Self {
        let source: Arc<dyn ProducerSource> = Arc::new(source);
        Self::new(name, move || Ok(Arc::clone(&source)))
    }

    /// Attaches the capability marker.
    #[must_use]
    pub fn contract_impl(mut self, marker: ContractImpl) -> Self {
        self.contract_impl = Some(marker);
        self
    }

    /// Adds a test method declared on the entry point itself.
    #[must_use]
    pub fn test(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&mut TestContext<'_>) -> Result<(), TestFailure> + Send + Sync + 'static,
    ) -> Self {
        let case = TestCase::new(name, self.name.clone(), body);
        self.tests.push(case);
        self
    }

    /// Adds a test method declared elsewhere, for example inherited from a
    /// contract declaration.
    #[must_use]
    pub fn inherited_test(mut self, case: TestCase) -> Self {
        self.tests.push(case);
        self
    }

    /// Turns the entry point into a dynamic suite.
    #[must_use]
    pub fn dynamic(mut self, suite: impl DynamicSuite + 'static) -> Self {
        self.dynamic = Some(Arc::new(suite));
        self
    }

    /// Returns the entry point name.
    #[must_use]
    pub const fn name(&self) -> &TypeName {
        &self.name
    }

    /// Returns the capability marker, if present.
    #[must_use]
    pub const fn marker(&self) -> Option<&ContractImpl> {
        self.contract_impl.as_ref()
    }

    /// Returns every visible test method.
    #[must_use]
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Returns the dynamic member supplier, if any.
    #[must_use]
    pub fn dynamic_suite(&self) -> Option<&Arc<dyn DynamicSuite>> {
        self.dynamic.as_ref()
    }

    /// Returns true for dynamic entry points.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic.is_some()
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .field("contract_impl", &self.contract_impl)
            .field("tests", &self.tests)
            .field("dynamic", &self.dynamic.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Implementation Declarations
// ============================================================================

/// Link from a dynamic member to its enclosing dynamic entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Enclosing dynamic entry point.
    pub entry: TypeName,
    /// Type under test declared by the enclosing entry point.
    pub target: TypeName,
}

/// Resolved view of one implementation under test.
///
/// # Invariants
/// - `target` is always set; entry points without a marker never become
///   declarations.
#[derive(Clone)]
pub struct ImplementationDeclaration {
    /// Entry point type name.
    entry: TypeName,
    /// Type whose capability closure is resolved.
    target: TypeName,
    /// Capabilities whose contract tests are skipped.
    skip: BTreeSet<TypeName>,
    /// Producer host factory.
    host: HostFactory,
    /// Test methods visible on the entry point.
    tests: Vec<TestCase>,
    /// Enclosing dynamic entry point, for dynamic members.
    parent: Option<ParentLink>,
}

impl ImplementationDeclaration {
    /// Builds the declaration of a statically declared entry point.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::MissingContractImpl`] when the entry point
    /// carries no marker.
    pub fn from_entry(entry: &EntryPoint) -> Result<Self, ResolutionError> {
        let marker = entry.marker().ok_or_else(|| ResolutionError::MissingContractImpl {
            entry: entry.name.clone(),
        })?;
        Ok(Self {
            entry: entry.name.clone(),
            target: marker.target.clone(),
            skip: marker.skip.iter().cloned().collect(),
            host: Arc::clone(&entry.host),
            tests: entry.tests.clone(),
            parent: None,
        })
    }

    /// Builds the declaration of a dynamic member.
    ///
    /// The member inherits the parent's producer host and exclusion list. It
    /// tests its own marker target when it carries one, and the parent's
    /// target otherwise.
    #[must_use]
    pub fn for_member(member: &EntryPoint, parent: &Self) -> Self {
        let own = member.marker();
        let target = own.map_or_else(|| parent.target.clone(), |marker| marker.target.clone());
        let mut skip = parent.skip.clone();
        if let Some(marker) = own {
            skip.extend(marker.skip.iter().cloned());
        }
        Self {
            entry: member.name.clone(),
            target,
            skip,
            host: Arc::clone(&parent.host),
            tests: member.tests.clone(),
            parent: Some(ParentLink {
                entry: parent.entry.clone(),
                target: parent.target.clone(),
            }),
        }
    }

    /// Returns the entry point name.
    #[must_use]
    pub const fn entry(&self) -> &TypeName {
        &self.entry
    }

    /// Returns the type under test.
    #[must_use]
    pub const fn target(&self) -> &TypeName {
        &self.target
    }

    /// Returns the excluded capabilities.
    #[must_use]
    pub const fn skip(&self) -> &BTreeSet<TypeName> {
        &self.skip
    }

    /// Returns true when the contract tests of `capability` are excluded.
    #[must_use]
    pub fn is_skipped(&self, capability: &TypeName) -> bool {
        self.skip.contains(capability)
    }

    /// Returns every visible test method.
    #[must_use]
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Returns the enclosing dynamic entry point, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// Builds the producer source.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Instantiation`] when the host factory fails.
    pub fn instantiate(&self) -> Result<Arc<dyn ProducerSource>, ResolutionError> {
        (self.host)().map_err(|reason| ResolutionError::Instantiation {
            entry: self.entry.clone(),
            reason,
        })
    }
}

impl fmt::Debug for ImplementationDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationDeclaration")
            .field("entry", &self.entry)
            .field("target", &self.target)
            .field("skip", &self.skip)
            .field("tests", &self.tests)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
