// crates/contract-harness-core/src/core/producer.rs
// ============================================================================
// Module: Producers
// Description: Capability-scoped factories for implementation instances.
// Purpose: Give contract tests fresh instances with a paired cleanup call.
// Dependencies: crate::core::identifiers, thiserror
// ============================================================================

//! ## Overview
//! A [`Producer`] builds fresh implementation instances for one contract
//! suite execution and releases them through [`Producer::clean_up`]. A
//! [`ProducerSource`] is the implementation-side object that hands out one
//! producer per capability. Instances cross the boundary type-erased; test
//! code recovers the concrete view with [`ProducerHandle::new_instance`].
//!
//! Producers are never shared: every unit execution asks the source for a
//! new one and owns it exclusively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::identifiers::TypeName;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while producing an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProducerError {
    /// The producer could not build an instance.
    #[error("producer failed: {0}")]
    Failed(String),
}

// ============================================================================
// SECTION: Producer Traits
// ============================================================================

/// Type-erased instance handed to a contract test.
pub type Instance = Box<dyn Any>;

/// Factory for implementation instances under test.
pub trait Producer: Send {
    /// Builds a fresh instance.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError`] when the instance cannot be built.
    fn new_instance(&mut self) -> Result<Instance, ProducerError>;

    /// Releases resources held by the most recently produced instance.
    fn clean_up(&mut self);
}

/// Supplies producers for the capabilities an implementation satisfies.
pub trait ProducerSource: Send + Sync {
    /// Returns a new producer for `capability`, or `None` when the
    /// implementation does not produce instances for it.
    fn producer(&self, capability: &TypeName) -> Option<Box<dyn Producer>>;
}

// ============================================================================
// SECTION: Closure Producer
// ============================================================================

/// Boxed cleanup callback.
type CleanUpFn = Box<dyn FnMut() + Send>;

/// [`Producer`] backed by closures.
///
/// The factory returns the value handed to tests; contract tests usually
/// expect a boxed trait object such as `Box<dyn Named>`.
pub struct FnProducer<T, F> {
    /// Instance factory.
    make: F,
    /// Optional cleanup callback.
    clean_up: Option<CleanUpFn>,
    /// Ties the produced type to the producer.
    marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, F> FnProducer<T, F>
where
    T: Any,
    F: FnMut() -> Result<T, ProducerError> + Send,
{
    /// Creates a producer from an instance factory.
    #[must_use]
    pub fn new(make: F) -> Self {
        Self {
            make,
            clean_up: None,
            marker: std::marker::PhantomData,
        }
    }

    /// Attaches a cleanup callback.
    #[must_use]
    pub fn on_clean_up(mut self, clean_up: impl FnMut() + Send + 'static) -> Self {
        self.clean_up = Some(Box::new(clean_up));
        self
    }
}

impl<T, F> Producer for FnProducer<T, F>
where
    T: Any,
    F: FnMut() -> Result<T, ProducerError> + Send,
{
    fn new_instance(&mut self) -> Result<Instance, ProducerError> {
        let instance = (self.make)()?;
        Ok(Box::new(instance))
    }

    fn clean_up(&mut self) {
        if let Some(clean_up) = self.clean_up.as_mut() {
            clean_up();
        }
    }
}

// ============================================================================
// SECTION: Producer Map
// ============================================================================

/// Factory that builds a fresh producer on every request.
pub type ProducerFactory = Arc<dyn Fn() -> Box<dyn Producer> + Send + Sync>;

/// [`ProducerSource`] keyed by capability name.
#[derive(Clone, Default)]
pub struct ProducerMap {
    /// Producer factories keyed by capability.
    factories: BTreeMap<TypeName, ProducerFactory>,
}

impl ProducerMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory used for `capability`.
    #[must_use]
    pub fn with(
        mut self,
        capability: impl Into<TypeName>,
        factory: impl Fn() -> Box<dyn Producer> + Send + Sync + 'static,
    ) -> Self {
        self.factories.insert(capability.into(), Arc::new(factory));
        self
    }

    /// Returns the capabilities this map produces for.
    pub fn capabilities(&self) -> impl Iterator<Item = &TypeName> {
        self.factories.keys()
    }
}

impl fmt::Debug for ProducerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerMap").field("capabilities", &self.factories.keys()).finish()
    }
}

impl ProducerSource for ProducerMap {
    fn producer(&self, capability: &TypeName) -> Option<Box<dyn Producer>> {
        self.factories.get(capability).map(|factory| factory())
    }
}

// ============================================================================
// SECTION: Producer Handle
// ============================================================================

/// Errors raised when a test asks the handle for an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// The underlying producer failed.
    #[error(transparent)]
    Producer(#[from] ProducerError),
    /// The produced value was not of the requested type.
    #[error("produced instance is not a `{expected}`")]
    Downcast {
        /// Requested type name.
        expected: String,
    },
}

/// Exclusive handle around one producer, owned by one running unit.
pub struct ProducerHandle {
    /// Capability the producer serves.
    capability: TypeName,
    /// Wrapped producer.
    producer: Box<dyn Producer>,
    /// Number of instances handed out.
    produced: usize,
    /// Number of cleanup calls made.
    cleaned: usize,
}

impl ProducerHandle {
    /// Wraps a producer for `capability`.
    #[must_use]
    pub fn new(capability: TypeName, producer: Box<dyn Producer>) -> Self {
        Self {
            capability,
            producer,
            produced: 0,
            cleaned: 0,
        }
    }

    /// Returns the capability this handle serves.
    #[must_use]
    pub const fn capability(&self) -> &TypeName {
        &self.capability
    }

    /// Builds a fresh instance and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError`] when the producer fails or produces a value
    /// of another type.
    pub fn new_instance<T: Any>(&mut self) -> Result<T, InstanceError> {
        let instance = self.producer.new_instance()?;
        self.produced += 1;
        instance.downcast::<T>().map(|boxed| *boxed).map_err(|_| InstanceError::Downcast {
            expected: type_name::<T>().to_string(),
        })
    }

    /// Releases the most recently produced instance.
    pub fn clean_up(&mut self) {
        self.producer.clean_up();
        self.cleaned += 1;
    }

    /// Returns how many instances were handed out.
    #[must_use]
    pub const fn produced(&self) -> usize {
        self.produced
    }

    /// Returns how many cleanup calls were made.
    #[must_use]
    pub const fn cleaned(&self) -> usize {
        self.cleaned
    }
}

impl fmt::Debug for ProducerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerHandle")
            .field("capability", &self.capability)
            .field("produced", &self.produced)
            .field("cleaned", &self.cleaned)
            .finish_non_exhaustive()
    }
}
