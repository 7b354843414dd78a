// crates/contract-harness-core/src/runtime/registry.rs
// ============================================================================
// Module: Declaration Registry
// Description: Dual index of contract declarations by capability and type.
// Purpose: Answer "which suites validate capability C" in stable order.
// Dependencies: crate::{core, interfaces}, log
// ============================================================================

//! ## Overview
//! The registry is built once per resolution run from a [`DiscoverySource`]
//! and is read-only afterwards, so it can be shared across parallel test
//! execution. Both indices are updated by the single [`DeclarationRegistry::register`]
//! operation:
//! - declaring type → declaration, last writer wins;
//! - capability → declarations, additive, in first-insertion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::core::ContractDeclaration;
use crate::core::DeclarationError;
use crate::core::TypeName;
use crate::core::TypeNameError;
use crate::interfaces::DiscoverySource;

// ============================================================================
// SECTION: Skip List
// ============================================================================

/// Declaration identities dropped during registry population.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    /// Skipped declaring types.
    names: BTreeSet<TypeName>,
}

impl SkipList {
    /// Creates an empty skip list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list of fully-qualified names.
    ///
    /// Empty segments are ignored, so `""` yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TypeNameError`] for the first malformed name.
    pub fn parse(raw: &str) -> Result<Self, TypeNameError> {
        let names = raw
            .split(',')
            .filter(|segment| !segment.trim().is_empty())
            .map(TypeName::parse)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            names,
        })
    }

    /// Adds a name.
    pub fn insert(&mut self, name: TypeName) -> bool {
        self.names.insert(name)
    }

    /// Returns true when `name` is skipped.
    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of skipped names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when nothing is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates skipped names in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeName> {
        self.names.iter()
    }
}

impl FromIterator<TypeName> for SkipList {
    fn from_iter<I: IntoIterator<Item = TypeName>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// SECTION: Declaration Registry
// ============================================================================

/// Bidirectional index of contract declarations.
///
/// # Invariants
/// - Every declaration reachable by type is reachable by its capability.
/// - Within one capability, declarations keep first-insertion order and are
///   unique by [`crate::core::DeclarationKey`].
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    /// Latest declaration per declaring type.
    by_type: BTreeMap<TypeName, Arc<ContractDeclaration>>,
    /// Declarations per target capability.
    by_capability: BTreeMap<TypeName, Vec<Arc<ContractDeclaration>>>,
    /// Every declaring type seen, skipped ones included.
    contract_types: BTreeSet<TypeName>,
}

impl DeclarationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every declaration `source` supplies, dropping
    /// declaring types on the skip list.
    #[must_use]
    pub fn scan(source: &dyn DiscoverySource, skip: &SkipList) -> Self {
        let mut registry = Self::new();
        for declaration in source.declarations() {
            let declaring_type = declaration.declaring_type();
            registry.contract_types.insert(declaring_type.clone());
            if skip.contains(declaring_type) {
                debug!("skipping contract declaration {declaring_type}");
                continue;
            }
            debug!("adding {declaring_type} {declaration}");
            registry.register(declaration);
        }
        registry
    }

    /// Registers a declaration in both indices.
    ///
    /// Malformed declarations are registered like any other so they surface
    /// as failing units later.
    pub fn register(&mut self, declaration: ContractDeclaration) -> Arc<ContractDeclaration> {
        let declaration = Arc::new(declaration);
        self.contract_types.insert(declaration.declaring_type().clone());
        self.by_type.insert(declaration.declaring_type().clone(), Arc::clone(&declaration));
        let entries = self.by_capability.entry(declaration.target().clone()).or_default();
        match entries.iter_mut().find(|existing| existing.key() == declaration.key()) {
            Some(existing) => *existing = Arc::clone(&declaration),
            None => entries.push(Arc::clone(&declaration)),
        }
        declaration
    }

    /// Returns the declarations validating `capability`; empty when none.
    #[must_use]
    pub fn lookup_by_capability(&self, capability: &TypeName) -> &[Arc<ContractDeclaration>] {
        self.by_capability.get(capability).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the latest declaration for `declaring_type`.
    #[must_use]
    pub fn lookup_by_declaring_type(
        &self,
        declaring_type: &TypeName,
    ) -> Option<&Arc<ContractDeclaration>> {
        self.by_type.get(declaring_type)
    }

    /// Returns true when `name` declares contract tests, including
    /// declaring types dropped by the skip list.
    #[must_use]
    pub fn is_contract_type(&self, name: &TypeName) -> bool {
        self.contract_types.contains(name)
    }

    /// Iterates the latest declaration per declaring type, in lexical order.
    pub fn declarations(&self) -> impl Iterator<Item = &Arc<ContractDeclaration>> {
        self.by_type.values()
    }

    /// Iterates every capability with at least one declaration.
    pub fn capabilities(&self) -> impl Iterator<Item = &TypeName> {
        self.by_capability.keys()
    }

    /// Returns every recorded declaration error, by capability then
    /// registration order.
    #[must_use]
    pub fn errors(&self) -> Vec<DeclarationError> {
        self.by_capability
            .values()
            .flatten()
            .flat_map(|declaration| declaration.errors().iter().cloned())
            .collect()
    }

    /// Returns the number of declaring types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
