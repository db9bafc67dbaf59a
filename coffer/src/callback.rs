//! Callables stored by the container for lifecycle notification and instance
//! decoration.
//!
//! Each callable is a trait with a blanket implementation, so the
//! `threadsafe` feature can add `Send + Sync` in one place while the
//! registration APIs accept plain closures.

use crate::container::Container;
use crate::instance::{InstancePtr, ParameterOverrides, ServicePtr};

/// Fired after an instance has been produced, with the instance and the
/// container.
#[cfg(not(feature = "threadsafe"))]
pub trait ResolvingFn: Fn(&InstancePtr, &mut Container) {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(&InstancePtr, &mut Container)> ResolvingFn for F {}

#[cfg(feature = "threadsafe")]
pub trait ResolvingFn: Fn(&InstancePtr, &mut Container) + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<F: Fn(&InstancePtr, &mut Container) + Send + Sync> ResolvingFn for F {}

pub type ResolvingCallbackPtr = ServicePtr<dyn ResolvingFn>;

/// Fired when resolution of an abstract starts, before the singleton cache
/// is consulted. Receives the canonical abstract name and the caller's
/// explicit overrides.
#[cfg(not(feature = "threadsafe"))]
pub trait BeforeResolvingFn: Fn(&str, &ParameterOverrides, &mut Container) {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(&str, &ParameterOverrides, &mut Container)> BeforeResolvingFn for F {}

#[cfg(feature = "threadsafe")]
pub trait BeforeResolvingFn: Fn(&str, &ParameterOverrides, &mut Container) + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<F: Fn(&str, &ParameterOverrides, &mut Container) + Send + Sync> BeforeResolvingFn for F {}

pub type BeforeResolvingCallbackPtr = ServicePtr<dyn BeforeResolvingFn>;

/// Fired with the fresh instance whenever a previously resolved abstract is
/// re-bound, extended, or replaced.
#[cfg(not(feature = "threadsafe"))]
pub trait ReboundFn: Fn(&mut Container, &InstancePtr) {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(&mut Container, &InstancePtr)> ReboundFn for F {}

#[cfg(feature = "threadsafe")]
pub trait ReboundFn: Fn(&mut Container, &InstancePtr) + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<F: Fn(&mut Container, &InstancePtr) + Send + Sync> ReboundFn for F {}

pub type ReboundCallbackPtr = ServicePtr<dyn ReboundFn>;

/// Decorator threading a produced instance into its replacement.
#[cfg(not(feature = "threadsafe"))]
pub trait ExtenderFn: Fn(InstancePtr, &mut Container) -> InstancePtr {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(InstancePtr, &mut Container) -> InstancePtr> ExtenderFn for F {}

#[cfg(feature = "threadsafe")]
pub trait ExtenderFn: Fn(InstancePtr, &mut Container) -> InstancePtr + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<F: Fn(InstancePtr, &mut Container) -> InstancePtr + Send + Sync> ExtenderFn for F {}

pub type ExtenderPtr = ServicePtr<dyn ExtenderFn>;
