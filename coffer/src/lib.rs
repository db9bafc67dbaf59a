//! Runtime service container: a registry mapping abstract names to
//! construction strategies, and a resolver which walks constructor
//! descriptors to satisfy transitive dependencies.
//!
//! Bindings associate an abstract name with a concrete strategy - building
//! the name itself through introspection, delegating to another name, or
//! invoking a factory. Resolution honors per-call parameter overrides,
//! caller-sensitive contextual bindings, singleton caching, registered
//! decorators, and lifecycle callbacks, and is fully re-entrant: building a
//! service recursively resolves its constructor dependencies.
//!
//! Constructor metadata comes from a [TypeIntrospector](crate::introspection::TypeIntrospector),
//! normally a hand-populated
//! [DescriptorRegistry](crate::introspection::DescriptorRegistry):
//!
//! ```
//! use coffer::container::ContainerBuilder;
//! use coffer::instance::{downcast, service, InstancePtr};
//! use coffer::introspection::{DescriptorRegistry, ParameterDescriptor, TypeDescriptor};
//!
//! struct Clock {
//!     period_ms: u64,
//! }
//!
//! struct Scheduler {
//!     clock: InstancePtr,
//! }
//!
//! let registry = DescriptorRegistry::default()
//!     .with(
//!         TypeDescriptor::of::<Clock>("Clock").with_constructor(
//!             Vec::new(),
//!             |_arguments: &[InstancePtr]| Ok(service(Clock { period_ms: 50 })),
//!         ),
//!     )
//!     .with(
//!         TypeDescriptor::of::<Scheduler>("Scheduler").with_constructor(
//!             vec![ParameterDescriptor::service("clock", "Clock")],
//!             |arguments: &[InstancePtr]| {
//!                 Ok(service(Scheduler {
//!                     clock: arguments[0].clone(),
//!                 }))
//!             },
//!         ),
//!     );
//!
//! let mut container = ContainerBuilder::new()
//!     .with_introspector(Box::new(registry))
//!     .build();
//!
//! // note: for the sake of simplicity, errors are unwrapped, rather than
//! // gracefully handled
//! container.singleton("Clock", "Clock").unwrap();
//!
//! let scheduler = container.make("Scheduler").unwrap();
//! let scheduler = downcast::<Scheduler>(&scheduler).unwrap();
//! assert_eq!(downcast::<Clock>(&scheduler.clock).unwrap().period_ms, 50);
//! ```

pub mod binding;
pub mod callback;
pub mod container;
pub mod error;
#[cfg(feature = "threadsafe")]
pub mod global;
pub mod instance;
pub mod introspection;
