// crates/contract-harness-core/src/core/identifiers.rs
// ============================================================================
// Module: Contract Harness Identifiers
// Description: Canonical type names and declaration identities.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every capability, contract declaration, and entry point is identified by a
//! fully-qualified, `::`-separated [`TypeName`]. Names are opaque; ordering is
//! lexical so every collection keyed by them iterates deterministically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between path segments of a fully-qualified name.
pub const PATH_SEPARATOR: &str = "::";

/// Maximum accepted length of a fully-qualified name.
pub const MAX_TYPE_NAME_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Type Names
// ============================================================================

/// Fully-qualified name of a capability, declaration, or implementation type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

/// Errors raised when parsing a type name from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeNameError {
    /// The name was empty after trimming.
    #[error("type name must not be empty")]
    Empty,
    /// The name contained whitespace.
    #[error("type name `{0}` must not contain whitespace")]
    Whitespace(String),
    /// The name exceeded [`MAX_TYPE_NAME_LENGTH`].
    #[error("type name exceeds maximum length")]
    TooLong,
}

impl TypeName {
    /// Creates a new type name without validation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses a type name from configuration or other untrusted input.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TypeNameError`] when the name is empty, too long, or
    /// contains interior whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypeNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeNameError::Empty);
        }
        if trimmed.len() > MAX_TYPE_NAME_LENGTH {
            return Err(TypeNameError::TooLong);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypeNameError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once(PATH_SEPARATOR).map_or(self.0.as_str(), |(_, simple)| simple)
    }

    /// Returns everything before the last path segment, or `""` for a bare name.
    #[must_use]
    pub fn module_path(&self) -> &str {
        self.0.rsplit_once(PATH_SEPARATOR).map_or("", |(path, _)| path)
    }

    /// Returns true when the name lives under the given module prefix.
    ///
    /// An empty prefix matches every name.
    #[must_use]
    pub fn is_within(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Declaration Identity
// ============================================================================

/// Identity of a contract declaration: its declaring type plus the
/// capability it validates.
///
/// # Invariants
/// - Two declarations with equal keys are the same declaration for
///   deduplication purposes, regardless of how they were reached.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeclarationKey {
    /// Type that declares the contract tests.
    pub declaring_type: TypeName,
    /// Capability the tests validate.
    pub target: TypeName,
}

impl DeclarationKey {
    /// Creates a declaration key.
    #[must_use]
    pub fn new(declaring_type: impl Into<TypeName>, target: impl Into<TypeName>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} testing {}]", self.declaring_type.simple_name(), self.target.simple_name())
    }
}
