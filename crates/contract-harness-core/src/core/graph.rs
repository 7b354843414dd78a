// crates/contract-harness-core/src/core/graph.rs
// ============================================================================
// Module: Capability Graph
// Description: Declared type hierarchy and transitive capability closure.
// Purpose: Answer "which capabilities does this type satisfy" without reflection.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! The graph stores one [`TypeDescriptor`] per known type. Capabilities carry
//! `extends` edges to parent capabilities; classes carry `implements` edges to
//! capabilities and an optional superclass edge. [`CapabilityGraph::closure`]
//! walks both edge kinds breadth-first and returns the reachable capabilities
//! in lexical order.
//!
//! Names referenced through an `implements`/`extends` edge but never
//! registered are treated as leaf capabilities: discovery may legitimately
//! skip types it cannot load, and a missing parent must not hide the child.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::TypeName;

// ============================================================================
// SECTION: Type Descriptors
// ============================================================================

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// An interface-level behavioral contract.
    Capability,
    /// A concrete or abstract implementation type.
    Class {
        /// True when the class cannot be instantiated directly.
        is_abstract: bool,
    },
}

/// Declared shape of one type in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully-qualified type name.
    pub name: TypeName,
    /// Capability or class.
    pub kind: TypeKind,
    /// Directly extended (capability) or implemented (class) capabilities.
    pub interfaces: Vec<TypeName>,
    /// Direct superclass, classes only.
    pub superclass: Option<TypeName>,
}

impl TypeDescriptor {
    /// Describes a capability with no parents.
    #[must_use]
    pub fn capability(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Capability,
            interfaces: Vec::new(),
            superclass: None,
        }
    }

    /// Describes a concrete class with no capabilities.
    #[must_use]
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class {
                is_abstract: false,
            },
            interfaces: Vec::new(),
            superclass: None,
        }
    }

    /// Adds a directly extended or implemented capability.
    #[must_use]
    pub fn extends(mut self, capability: impl Into<TypeName>) -> Self {
        self.interfaces.push(capability.into());
        self
    }

    /// Alias of [`TypeDescriptor::extends`] that reads better for classes.
    #[must_use]
    pub fn implements(self, capability: impl Into<TypeName>) -> Self {
        self.extends(capability)
    }

    /// Sets the direct superclass.
    #[must_use]
    pub fn inherits(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Marks a class as abstract. Has no effect on capabilities.
    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        if let TypeKind::Class {
            is_abstract,
        } = &mut self.kind
        {
            *is_abstract = true;
        }
        self
    }

    /// Returns true for capabilities.
    #[must_use]
    pub const fn is_capability(&self) -> bool {
        matches!(self.kind, TypeKind::Capability)
    }

    /// Returns true for classes that can be instantiated.
    #[must_use]
    pub const fn is_concrete_class(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Class {
                is_abstract: false
            }
        )
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by graph queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The queried type was never registered.
    #[error("unknown type: {0}")]
    UnknownType(TypeName),
}

// ============================================================================
// SECTION: Capability Graph
// ============================================================================

/// Registry of declared types, keyed by name.
///
/// # Invariants
/// - Populated during the scan phase, read-only afterwards.
/// - Iteration is in lexical name order.
#[derive(Debug, Clone, Default)]
pub struct CapabilityGraph {
    /// Type descriptors keyed by name.
    types: BTreeMap<TypeName, TypeDescriptor>,
}

impl CapabilityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor, returning the one it replaced.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        self.types.insert(descriptor.name.clone(), descriptor)
    }

    /// Returns the descriptor for a name.
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates every registered capability in lexical order.
    pub fn capabilities(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values().filter(|descriptor| descriptor.is_capability())
    }

    /// Iterates every registered concrete class in lexical order.
    pub fn concrete_classes(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values().filter(|descriptor| descriptor.is_concrete_class())
    }

    /// Computes every capability the type satisfies.
    ///
    /// For a capability the result contains the capability itself and all of
    /// its transitive parents. For a class the result contains every
    /// capability implemented by the class or any superclass, plus their
    /// parents. Cycles in the declared edges are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownType`] when `name` was never registered.
    pub fn closure(&self, name: &TypeName) -> Result<BTreeSet<TypeName>, GraphError> {
        let root = self.get(name).ok_or_else(|| GraphError::UnknownType(name.clone()))?;

        let mut capabilities = BTreeSet::new();
        let mut pending = VecDeque::new();
        if root.is_capability() {
            pending.push_back(root.name.clone());
        } else {
            let mut visited_classes = BTreeSet::new();
            let mut current = Some(root);
            while let Some(class) = current {
                if !visited_classes.insert(class.name.clone()) {
                    break;
                }
                pending.extend(class.interfaces.iter().cloned());
                current = class.superclass.as_ref().and_then(|parent| self.get(parent));
            }
        }

        while let Some(capability) = pending.pop_front() {
            if !capabilities.insert(capability.clone()) {
                continue;
            }
            if let Some(descriptor) = self.get(&capability) {
                pending.extend(
                    descriptor
                        .interfaces
                        .iter()
                        .filter(|parent| !capabilities.contains(*parent))
                        .cloned(),
                );
            }
        }
        Ok(capabilities)
    }

    /// Returns the concrete classes whose closure contains `capability`.
    #[must_use]
    pub fn implementors(&self, capability: &TypeName) -> BTreeSet<TypeName> {
        self.concrete_classes()
            .filter(|class| {
                self.closure(&class.name).is_ok_and(|closure| closure.contains(capability))
            })
            .map(|class| class.name.clone())
            .collect()
    }
}

impl FromIterator<TypeDescriptor> for CapabilityGraph {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut graph = Self::new();
        for descriptor in iter {
            graph.insert(descriptor);
        }
        graph
    }
}
