//! Constructor discovery for named types. The resolver only consumes ordered
//! parameter descriptors through the [TypeIntrospector] trait, so the host
//! introspection mechanism can be swapped out or hand-built in tests.

use crate::error::ResolveError;
use crate::instance::{InstancePtr, Service, ServicePtr};
use derivative::Derivative;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;
use std::any::TypeId;

/// Constructor callable receiving the resolved arguments in declaration
/// order.
#[cfg(not(feature = "threadsafe"))]
pub trait ConstructFn: Fn(&[InstancePtr]) -> Result<InstancePtr, ResolveError> {}
#[cfg(not(feature = "threadsafe"))]
impl<F: Fn(&[InstancePtr]) -> Result<InstancePtr, ResolveError>> ConstructFn for F {}

#[cfg(feature = "threadsafe")]
pub trait ConstructFn: Fn(&[InstancePtr]) -> Result<InstancePtr, ResolveError> + Send + Sync {}
#[cfg(feature = "threadsafe")]
impl<F: Fn(&[InstancePtr]) -> Result<InstancePtr, ResolveError> + Send + Sync> ConstructFn for F {}

pub type ConstructorPtr = ServicePtr<dyn ConstructFn>;

/// One constructor parameter.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ParameterDescriptor {
    pub name: String,

    /// Service type required by this parameter; `None` marks a primitive.
    pub declared_type: Option<String>,

    #[derivative(Debug = "ignore")]
    pub default: Option<InstancePtr>,

    pub optional: bool,
}

impl ParameterDescriptor {
    /// A parameter requiring a service of the given type.
    pub fn service(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: Some(declared_type.to_string()),
            default: None,
            optional: false,
        }
    }

    /// A primitive parameter, resolvable only through overrides, contextual
    /// bindings, or a default.
    pub fn primitive(name: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: None,
            default: None,
            optional: false,
        }
    }

    pub fn with_default(mut self, value: InstancePtr) -> Self {
        self.default = Some(value);
        self.optional = true;
        self
    }
}

/// Ordered parameters plus the callable instantiating the type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ConstructorDescriptor {
    pub parameters: Vec<ParameterDescriptor>,

    #[derivative(Debug = "ignore")]
    pub construct: ConstructorPtr,
}

/// Introspection data for one concrete or interface type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct TypeDescriptor {
    pub name: String,

    /// Runtime type of instances this descriptor produces; interfaces have
    /// none.
    pub type_id: Option<TypeId>,

    /// Interface names instances of this type satisfy.
    pub capabilities: Vec<String>,

    /// `None` marks a non-instantiable type.
    pub constructor: Option<ConstructorDescriptor>,
}

impl TypeDescriptor {
    /// Describes a concrete type backed by the Rust type `T`.
    pub fn of<T: Service>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_id: Some(TypeId::of::<T>()),
            capabilities: Vec::new(),
            constructor: None,
        }
    }

    /// Describes a pure interface: known to the introspector, never
    /// instantiable.
    pub fn interface(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_id: None,
            capabilities: Vec::new(),
            constructor: None,
        }
    }

    pub fn with_capability(mut self, capability: &str) -> Self {
        self.capabilities.push(capability.to_string());
        self
    }

    pub fn with_constructor<F: ConstructFn + 'static>(
        mut self,
        parameters: Vec<ParameterDescriptor>,
        construct: F,
    ) -> Self {
        self.constructor = Some(ConstructorDescriptor {
            parameters,
            construct: ServicePtr::new(construct) as ConstructorPtr,
        });
        self
    }
}

#[cfg(not(feature = "threadsafe"))]
pub type IntrospectorPtr = Box<dyn TypeIntrospector>;
#[cfg(feature = "threadsafe")]
pub type IntrospectorPtr = Box<dyn TypeIntrospector + Send + Sync>;

/// Enumerates constructor metadata for named types.
#[cfg_attr(test, automock)]
pub trait TypeIntrospector {
    /// Returns the descriptor registered for a type name.
    fn describe(&self, type_name: &str) -> Option<TypeDescriptor>;

    /// Tests whether an instance is of the named type or satisfies it as a
    /// capability.
    fn instance_of(&self, instance: &InstancePtr, type_name: &str) -> bool;
}

/// Name-keyed [TypeIntrospector] populated by explicit registration.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct DescriptorRegistry {
    descriptors: FxHashMap<String, TypeDescriptor>,
    names_by_type_id: FxHashMap<TypeId, String>,
}

impl DescriptorRegistry {
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        if let Some(type_id) = descriptor.type_id {
            self.names_by_type_id.insert(type_id, descriptor.name.clone());
        }

        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    /// Registration in builder form, for assembling a registry inline.
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }
}

impl TypeIntrospector for DescriptorRegistry {
    fn describe(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.descriptors.get(type_name).cloned()
    }

    fn instance_of(&self, instance: &InstancePtr, type_name: &str) -> bool {
        self.names_by_type_id
            .get(&instance.as_ref().type_id())
            .and_then(|name| self.descriptors.get(name))
            .map(|descriptor| {
                descriptor.name == type_name
                    || descriptor.capabilities.iter().any(|capability| capability == type_name)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::instance::{service, InstancePtr};
    use crate::introspection::{
        DescriptorRegistry, ParameterDescriptor, TypeDescriptor, TypeIntrospector,
    };

    struct Widget;

    fn construct_widget(_arguments: &[InstancePtr]) -> Result<InstancePtr, crate::error::ResolveError> {
        Ok(service(Widget))
    }

    fn create_registry() -> DescriptorRegistry {
        DescriptorRegistry::default()
            .with(
                TypeDescriptor::of::<Widget>("Widget")
                    .with_capability("Renderable")
                    .with_constructor(Vec::new(), construct_widget),
            )
            .with(TypeDescriptor::interface("Renderable"))
    }

    #[test]
    fn should_describe_registered_types() {
        let registry = create_registry();

        let descriptor = registry.describe("Widget").unwrap();
        assert_eq!(descriptor.capabilities, vec!["Renderable".to_string()]);
        assert!(descriptor.constructor.is_some());

        assert!(registry.describe("Missing").is_none());
    }

    #[test]
    fn should_leave_interfaces_without_constructors() {
        let registry = create_registry();

        let descriptor = registry.describe("Renderable").unwrap();
        assert!(descriptor.type_id.is_none());
        assert!(descriptor.constructor.is_none());
    }

    #[test]
    fn should_match_instances_by_name_and_capability() {
        let registry = create_registry();
        let instance = service(Widget);

        assert!(registry.instance_of(&instance, "Widget"));
        assert!(registry.instance_of(&instance, "Renderable"));
        assert!(!registry.instance_of(&instance, "Serializable"));
        assert!(!registry.instance_of(&service(0_u8), "Widget"));
    }

    #[test]
    fn should_mark_defaulted_parameters_optional() {
        let parameter = ParameterDescriptor::primitive("retries").with_default(service(3_u32));

        assert!(parameter.optional);
        assert!(parameter.default.is_some());
    }
}
