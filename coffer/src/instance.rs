//! Type-erased service instances shared between the container and its
//! callers.

use fxhash::FxHashMap;
use std::any::Any;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type ServicePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ServicePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type InstancePtr = ServicePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type InstancePtr = ServicePtr<dyn Any + Send + Sync + 'static>;

/// Implemented automatically on every type which can be stored in the
/// container. The `threadsafe` feature adds `Send + Sync` to the bound.
#[cfg(not(feature = "threadsafe"))]
pub trait Service: Any {}
#[cfg(not(feature = "threadsafe"))]
impl<T: ?Sized + Any> Service for T {}

#[cfg(feature = "threadsafe")]
pub trait Service: Any + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<T: ?Sized + Any + Send + Sync> Service for T {}

/// Explicit per-call constructor overrides, keyed by parameter name. Only the
/// frame belonging to the innermost in-flight resolution is consulted.
pub type ParameterOverrides = FxHashMap<String, InstancePtr>;

/// Wraps a value into a type-erased, reference-counted service instance.
pub fn service<T: Service>(value: T) -> InstancePtr {
    ServicePtr::new(value) as InstancePtr
}

/// Recovers the concrete type of a service instance.
pub fn downcast<T: Service>(instance: &InstancePtr) -> Option<ServicePtr<T>> {
    instance.clone().downcast::<T>().ok()
}
