//! How an abstract name maps to a construction strategy.

use crate::container::Container;
use crate::error::ResolveError;
use crate::instance::{InstancePtr, ParameterOverrides, ServicePtr};
use derivative::Derivative;

/// Factory callable invoked with the container and the caller's explicit
/// parameter overrides.
#[cfg(not(feature = "threadsafe"))]
pub trait FactoryFn: Fn(&mut Container, &ParameterOverrides) -> Result<InstancePtr, ResolveError> {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(&mut Container, &ParameterOverrides) -> Result<InstancePtr, ResolveError>> FactoryFn for F {}

#[cfg(feature = "threadsafe")]
pub trait FactoryFn:
    Fn(&mut Container, &ParameterOverrides) -> Result<InstancePtr, ResolveError> + Send + Sync
{
}
#[cfg(feature = "threadsafe")]
impl<F: Fn(&mut Container, &ParameterOverrides) -> Result<InstancePtr, ResolveError> + Send + Sync>
    FactoryFn for F
{
}

pub type FactoryPtr = ServicePtr<dyn FactoryFn>;

/// Construction strategy registered for an abstract name.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum Concrete {
    /// Introspect and construct the abstract name itself.
    SelfBuild,
    /// Delegate to another abstract name.
    Name(String),
    /// Invoke an explicit factory.
    Factory(#[derivative(Debug = "ignore")] FactoryPtr),
}

impl Concrete {
    /// Wraps a closure into a factory concrete.
    pub fn factory<F: FactoryFn + 'static>(factory: F) -> Self {
        Self::Factory(ServicePtr::new(factory) as FactoryPtr)
    }
}

impl From<&str> for Concrete {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Concrete {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// The registered (concrete, shared) pair for an abstract name.
#[derive(Clone, Debug)]
pub struct Binding {
    pub concrete: Concrete,
    pub shared: bool,
}

/// Implementation value stored for one (building concrete, needed abstract)
/// pair.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum ContextualImplementation {
    /// Resolve another abstract name; for a primitive target the name string
    /// itself is injected.
    Name(String),
    /// Inject this instance verbatim.
    Value(#[derivative(Debug = "ignore")] InstancePtr),
    /// Invoke a factory.
    Factory(#[derivative(Debug = "ignore")] FactoryPtr),
}

impl ContextualImplementation {
    /// Wraps a closure into a factory implementation.
    pub fn factory<F: FactoryFn + 'static>(factory: F) -> Self {
        Self::Factory(ServicePtr::new(factory) as FactoryPtr)
    }
}

impl From<&str> for ContextualImplementation {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ContextualImplementation {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<InstancePtr> for ContextualImplementation {
    fn from(instance: InstancePtr) -> Self {
        Self::Value(instance)
    }
}
