//! The registry and resolver: binding storage, alias canonicalization,
//! contextual lookup, singleton lifecycle, extension, and rebind
//! notification.

pub mod contextual;

use crate::binding::{Binding, Concrete, ContextualImplementation, FactoryPtr};
use crate::callback::{
    BeforeResolvingCallbackPtr, BeforeResolvingFn, ExtenderFn, ExtenderPtr, ReboundCallbackPtr,
    ReboundFn, ResolvingCallbackPtr, ResolvingFn,
};
use crate::container::contextual::ContextualBindingBuilder;
use crate::error::{LookupError, ResolveError};
use crate::instance::{service, InstancePtr, ParameterOverrides, ServicePtr};
use crate::introspection::{DescriptorRegistry, IntrospectorPtr, ParameterDescriptor};
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use tracing::{debug, trace};

/// Builder for [Container] with sensible defaults.
pub struct ContainerBuilder {
    introspector: IntrospectorPtr,
}

impl ContainerBuilder {
    /// Creates a new builder backed by an empty
    /// [DescriptorRegistry](crate::introspection::DescriptorRegistry).
    pub fn new() -> Self {
        Self {
            introspector: Box::<DescriptorRegistry>::default(),
        }
    }

    /// Sets the introspector consulted for constructor metadata.
    pub fn with_introspector(mut self, introspector: IntrospectorPtr) -> Self {
        self.introspector = introspector;
        self
    }

    /// Builds the resulting [Container].
    pub fn build(self) -> Container {
        Container::new(self.introspector)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deferred-resolution handle returned by [Container::factory].
#[derive(Clone, Debug)]
pub struct FactoryHandle {
    abstract_name: String,
}

impl FactoryHandle {
    pub fn abstract_name(&self) -> &str {
        &self.abstract_name
    }

    /// Resolves the captured abstract against the given container.
    pub fn resolve(&self, container: &mut Container) -> Result<InstancePtr, ResolveError> {
        container.make(&self.abstract_name)
    }
}

/// A registry mapping abstract names to construction strategies, and a
/// resolver which walks constructor descriptors to satisfy transitive
/// dependencies.
///
/// The container assumes a single logical thread of control; the build and
/// override stacks are call-scoped and model re-entrant nested resolution,
/// not concurrency.
pub struct Container {
    introspector: IntrospectorPtr,
    bindings: FxHashMap<String, Binding>,
    instances: FxHashMap<String, InstancePtr>,
    aliases: FxHashMap<String, String>,
    /// Reverse alias index: canonical name to the aliases pointing at it.
    abstract_aliases: FxHashMap<String, Vec<String>>,
    /// Contextual bindings keyed by building concrete, then needed abstract.
    contextual: FxHashMap<String, FxHashMap<String, ContextualImplementation>>,
    extenders: FxHashMap<String, Vec<ExtenderPtr>>,
    tags: FxHashMap<String, Vec<String>>,
    resolved: FxHashSet<String>,
    global_before_resolving_callbacks: Vec<BeforeResolvingCallbackPtr>,
    before_resolving_callbacks: FxHashMap<String, Vec<BeforeResolvingCallbackPtr>>,
    global_resolving_callbacks: Vec<ResolvingCallbackPtr>,
    resolving_callbacks: FxHashMap<String, Vec<ResolvingCallbackPtr>>,
    global_after_resolving_callbacks: Vec<ResolvingCallbackPtr>,
    after_resolving_callbacks: FxHashMap<String, Vec<ResolvingCallbackPtr>>,
    rebound_callbacks: FxHashMap<String, Vec<ReboundCallbackPtr>>,
    /// Concretes currently under construction; the top scopes contextual
    /// binding lookup.
    build_stack: Vec<String>,
    /// One override frame per in-flight resolution; only the top is active.
    override_stack: Vec<ParameterOverrides>,
}

impl Container {
    pub fn new(introspector: IntrospectorPtr) -> Self {
        Self {
            introspector,
            bindings: Default::default(),
            instances: Default::default(),
            aliases: Default::default(),
            abstract_aliases: Default::default(),
            contextual: Default::default(),
            extenders: Default::default(),
            tags: Default::default(),
            resolved: Default::default(),
            global_before_resolving_callbacks: Default::default(),
            before_resolving_callbacks: Default::default(),
            global_resolving_callbacks: Default::default(),
            resolving_callbacks: Default::default(),
            global_after_resolving_callbacks: Default::default(),
            after_resolving_callbacks: Default::default(),
            rebound_callbacks: Default::default(),
            build_stack: Default::default(),
            override_stack: Default::default(),
        }
    }

    /// Registers a construction strategy for an abstract name, replacing any
    /// previous binding. Re-binding an already resolved abstract notifies its
    /// rebound callbacks with a fresh instance.
    pub fn bind(
        &mut self,
        abstract_name: &str,
        concrete: impl Into<Concrete>,
        shared: bool,
    ) -> Result<(), ResolveError> {
        self.drop_stale_instances(abstract_name);

        let concrete = match concrete.into() {
            Concrete::Name(name) if name == abstract_name => Concrete::SelfBuild,
            other => other,
        };

        debug!("Registering binding for [{}].", abstract_name);
        self.bindings
            .insert(abstract_name.to_string(), Binding { concrete, shared });

        if self.resolved(abstract_name) {
            self.rebound(abstract_name)?;
        }

        Ok(())
    }

    /// Registers a binding unless the abstract is already bound.
    pub fn bind_if(
        &mut self,
        abstract_name: &str,
        concrete: impl Into<Concrete>,
        shared: bool,
    ) -> Result<(), ResolveError> {
        if !self.bound(abstract_name) {
            self.bind(abstract_name, concrete, shared)?;
        }

        Ok(())
    }

    /// Registers a shared binding: the first resolution is cached and reused.
    pub fn singleton(
        &mut self,
        abstract_name: &str,
        concrete: impl Into<Concrete>,
    ) -> Result<(), ResolveError> {
        self.bind(abstract_name, concrete, true)
    }

    /// Registers a shared binding unless the abstract is already bound.
    pub fn singleton_if(
        &mut self,
        abstract_name: &str,
        concrete: impl Into<Concrete>,
    ) -> Result<(), ResolveError> {
        if !self.bound(abstract_name) {
            self.singleton(abstract_name, concrete)?;
        }

        Ok(())
    }

    /// Stores an existing instance as the shared singleton for an abstract
    /// name and returns it. Replacing a bound name notifies its rebound
    /// callbacks.
    pub fn instance(
        &mut self,
        abstract_name: &str,
        instance: InstancePtr,
    ) -> Result<InstancePtr, ResolveError> {
        self.remove_abstract_alias(abstract_name);

        let was_bound = self.bound(abstract_name);
        self.aliases.remove(abstract_name);
        self.instances
            .insert(abstract_name.to_string(), instance.clone());

        if was_bound {
            self.rebound(abstract_name)?;
        }

        Ok(instance)
    }

    /// Registers a decorator for an abstract name. An already cached
    /// singleton is decorated in place and its rebound callbacks fire
    /// immediately; otherwise the decorator is queued for future
    /// resolutions.
    pub fn extend(
        &mut self,
        abstract_name: &str,
        extender: impl ExtenderFn + 'static,
    ) -> Result<(), ResolveError> {
        let abstract_name = self.get_alias(abstract_name);

        if let Some(existing) = self.instances.get(&abstract_name).cloned() {
            let extended = extender(existing, self);
            self.instances.insert(abstract_name.clone(), extended);
            self.rebound(&abstract_name)?;
        } else {
            self.extenders
                .entry(abstract_name.clone())
                .or_default()
                .push(ServicePtr::new(extender) as ExtenderPtr);

            if self.resolved(&abstract_name) {
                self.rebound(&abstract_name)?;
            }
        }

        Ok(())
    }

    pub fn forget_extenders(&mut self, abstract_name: &str) {
        let abstract_name = self.get_alias(abstract_name);
        self.extenders.remove(&abstract_name);
    }

    /// Records `alias` as an alternative name for `abstract_name`.
    ///
    /// # Panics
    ///
    /// Aliasing a name to itself is a configuration bug and panics.
    pub fn alias(&mut self, abstract_name: &str, alias: &str) {
        if alias == abstract_name {
            panic!("[{abstract_name}] is aliased to itself.");
        }

        self.aliases
            .insert(alias.to_string(), abstract_name.to_string());
        self.abstract_aliases
            .entry(abstract_name.to_string())
            .or_default()
            .push(alias.to_string());
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Follows the alias chain until a non-aliased name.
    ///
    /// # Panics
    ///
    /// Panics on alias cycles; see [alias](Container::alias).
    pub fn get_alias(&self, abstract_name: &str) -> String {
        let mut seen = FxHashSet::default();
        let mut current = abstract_name;

        while let Some(target) = self.aliases.get(current) {
            if !seen.insert(current.to_string()) {
                panic!("[{current}] is aliased to itself.");
            }

            current = target;
        }

        current.to_string()
    }

    /// Starts a contextual binding: "when building `concrete`...".
    pub fn when(&mut self, concrete: &str) -> ContextualBindingBuilder<'_> {
        let concretes = vec![self.get_alias(concrete)];
        ContextualBindingBuilder::new(self, concretes)
    }

    /// Starts a contextual binding targeting several concretes at once.
    pub fn when_any<I, S>(&mut self, concretes: I) -> ContextualBindingBuilder<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let concretes = concretes
            .into_iter()
            .map(|concrete| self.get_alias(concrete.as_ref()))
            .collect();
        ContextualBindingBuilder::new(self, concretes)
    }

    /// Stores one contextual entry: while building `concrete`, satisfy
    /// `abstract_name` with `implementation`.
    pub fn add_contextual_binding(
        &mut self,
        concrete: &str,
        abstract_name: &str,
        implementation: impl Into<ContextualImplementation>,
    ) {
        let abstract_name = self.get_alias(abstract_name);
        self.contextual
            .entry(concrete.to_string())
            .or_default()
            .insert(abstract_name, implementation.into());
    }

    /// Groups abstract names under each of the given tags.
    pub fn tag<I, S>(&mut self, abstracts: I, tags: &[&str])
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abstracts: Vec<String> = abstracts
            .into_iter()
            .map(|abstract_name| abstract_name.as_ref().to_string())
            .collect();

        for tag in tags {
            self.tags
                .entry(tag.to_string())
                .or_default()
                .extend(abstracts.iter().cloned());
        }
    }

    /// Resolves every abstract grouped under a tag, fresh on each call, in
    /// registration order.
    pub fn tagged(&mut self, tag: &str) -> Result<Vec<InstancePtr>, ResolveError> {
        let abstracts = self.tags.get(tag).cloned().unwrap_or_default();

        abstracts
            .iter()
            .map(|abstract_name| self.make(abstract_name))
            .try_collect()
    }

    pub fn bound(&self, abstract_name: &str) -> bool {
        self.bindings.contains_key(abstract_name)
            || self.instances.contains_key(abstract_name)
            || self.is_alias(abstract_name)
    }

    pub fn has(&self, id: &str) -> bool {
        self.bound(id)
    }

    pub fn resolved(&self, abstract_name: &str) -> bool {
        let abstract_name = if self.is_alias(abstract_name) {
            self.get_alias(abstract_name)
        } else {
            abstract_name.to_string()
        };

        self.resolved.contains(&abstract_name) || self.instances.contains_key(&abstract_name)
    }

    pub fn is_shared(&self, abstract_name: &str) -> bool {
        self.instances.contains_key(abstract_name)
            || self
                .bindings
                .get(abstract_name)
                .map(|binding| binding.shared)
                .unwrap_or(false)
    }

    /// Read-only view of the registered bindings.
    pub fn bindings(&self) -> &FxHashMap<String, Binding> {
        &self.bindings
    }

    /// Read-only view of the tag table.
    pub fn tags(&self) -> &FxHashMap<String, Vec<String>> {
        &self.tags
    }

    /// Resolves an abstract name into an instance.
    pub fn make(&mut self, abstract_name: &str) -> Result<InstancePtr, ResolveError> {
        self.resolve(abstract_name, ParameterOverrides::default())
    }

    /// Resolves an abstract name with explicit constructor overrides. A
    /// non-empty override set always bypasses the singleton cache.
    pub fn make_with(
        &mut self,
        abstract_name: &str,
        overrides: ParameterOverrides,
    ) -> Result<InstancePtr, ResolveError> {
        self.resolve(abstract_name, overrides)
    }

    /// Generic lookup: distinguishes an id which is not registered at all
    /// from a registered one whose construction failed.
    pub fn get(&mut self, id: &str) -> Result<InstancePtr, LookupError> {
        match self.make(id) {
            Ok(instance) => Ok(instance),
            Err(error) if self.has(id) => Err(error.into()),
            Err(_) => Err(LookupError::EntryNotFound(id.to_string())),
        }
    }

    /// Returns a handle resolving `abstract_name` on demand.
    pub fn factory(&self, abstract_name: &str) -> FactoryHandle {
        FactoryHandle {
            abstract_name: abstract_name.to_string(),
        }
    }

    fn resolve(
        &mut self,
        abstract_name: &str,
        overrides: ParameterOverrides,
    ) -> Result<InstancePtr, ResolveError> {
        let abstract_name = self.get_alias(abstract_name);
        trace!("Resolving [{}].", abstract_name);

        self.fire_before_resolving_callbacks(&abstract_name, &overrides);

        let needs_contextual_build =
            !overrides.is_empty() || self.contextual_concrete(&abstract_name).is_some();

        if !needs_contextual_build {
            if let Some(cached) = self.instances.get(&abstract_name) {
                return Ok(cached.clone());
            }
        }

        self.override_stack.push(overrides);
        let result = self.resolve_uncached(&abstract_name, needs_contextual_build);
        // the override frame is released on every exit path
        self.override_stack.pop();
        result
    }

    fn resolve_uncached(
        &mut self,
        abstract_name: &str,
        needs_contextual_build: bool,
    ) -> Result<InstancePtr, ResolveError> {
        let mut object = match self.contextual_concrete(abstract_name) {
            Some(ContextualImplementation::Value(value)) => value,
            Some(ContextualImplementation::Factory(factory)) => self.call_factory(&factory)?,
            Some(ContextualImplementation::Name(name)) => {
                if name == abstract_name {
                    self.build(abstract_name)?
                } else {
                    self.make_delegated(&name)?
                }
            }
            None => {
                let concrete = self
                    .bindings
                    .get(abstract_name)
                    .map(|binding| binding.concrete.clone());

                match concrete {
                    Some(Concrete::Factory(factory)) => self.call_factory(&factory)?,
                    Some(Concrete::Name(name)) => self.make_delegated(&name)?,
                    Some(Concrete::SelfBuild) | None => self.build(abstract_name)?,
                }
            }
        };

        for extender in self.extenders.get(abstract_name).cloned().unwrap_or_default() {
            object = extender.as_ref()(object, self);
        }

        if self.is_shared(abstract_name) && !needs_contextual_build {
            self.instances
                .insert(abstract_name.to_string(), object.clone());
        }

        self.fire_resolving_callbacks(abstract_name, &object);
        self.resolved.insert(abstract_name.to_string());

        Ok(object)
    }

    /// A named concrete keeps the caller's explicit overrides in force for
    /// the delegated resolution.
    fn make_delegated(&mut self, concrete: &str) -> Result<InstancePtr, ResolveError> {
        let overrides = self.override_stack.last().cloned().unwrap_or_default();
        self.make_with(concrete, overrides)
    }

    fn call_factory(&mut self, factory: &FactoryPtr) -> Result<InstancePtr, ResolveError> {
        let overrides = self.override_stack.last().cloned().unwrap_or_default();
        factory.as_ref()(self, &overrides)
    }

    /// Constructs a concrete type through introspection, bypassing binding
    /// lookup.
    pub fn build(&mut self, concrete: &str) -> Result<InstancePtr, ResolveError> {
        let descriptor = self
            .introspector
            .describe(concrete)
            .ok_or_else(|| ResolveError::UnknownType(concrete.to_string()))?;

        let constructor = match descriptor.constructor {
            Some(constructor) => constructor,
            None => return Err(self.not_instantiable(concrete)),
        };

        trace!("Building [{}].", concrete);
        self.build_stack.push(concrete.to_string());
        let arguments = self.resolve_dependencies(&constructor.parameters, concrete);
        self.build_stack.pop();

        let arguments = arguments?;
        constructor.construct.as_ref()(&arguments)
    }

    fn not_instantiable(&self, concrete: &str) -> ResolveError {
        ResolveError::NotInstantiable {
            concrete: concrete.to_string(),
            build_stack: self.build_stack.clone(),
        }
    }

    fn resolve_dependencies(
        &mut self,
        parameters: &[ParameterDescriptor],
        declared_in: &str,
    ) -> Result<Vec<InstancePtr>, ResolveError> {
        let mut arguments = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            if let Some(override_value) = self.parameter_override(&parameter.name) {
                arguments.push(override_value);
                continue;
            }

            let argument = match &parameter.declared_type {
                Some(declared_type) => self.resolve_service(parameter, declared_type)?,
                None => self.resolve_primitive(parameter, declared_in)?,
            };

            arguments.push(argument);
        }

        Ok(arguments)
    }

    fn parameter_override(&self, name: &str) -> Option<InstancePtr> {
        self.override_stack
            .last()
            .and_then(|frame| frame.get(name))
            .cloned()
    }

    fn resolve_primitive(
        &mut self,
        parameter: &ParameterDescriptor,
        declared_in: &str,
    ) -> Result<InstancePtr, ResolveError> {
        if let Some(implementation) = self.contextual_concrete(&format!("${}", parameter.name)) {
            return match implementation {
                ContextualImplementation::Value(value) => Ok(value),
                ContextualImplementation::Name(name) => Ok(service(name)),
                ContextualImplementation::Factory(factory) => self.call_factory(&factory),
            };
        }

        if let Some(default) = &parameter.default {
            return Ok(default.clone());
        }

        Err(ResolveError::UnresolvablePrimitive {
            parameter: parameter.name.clone(),
            declared_in: declared_in.to_string(),
        })
    }

    fn resolve_service(
        &mut self,
        parameter: &ParameterDescriptor,
        declared_type: &str,
    ) -> Result<InstancePtr, ResolveError> {
        match self.make(declared_type) {
            Ok(instance) => Ok(instance),
            Err(error) => {
                if parameter.optional {
                    if let Some(default) = &parameter.default {
                        return Ok(default.clone());
                    }
                }

                Err(error)
            }
        }
    }

    fn contextual_concrete(&self, abstract_name: &str) -> Option<ContextualImplementation> {
        if let Some(implementation) = self.find_in_contextual_bindings(abstract_name) {
            return Some(implementation);
        }

        // stale entries may remain here after drop_stale_instances; they are
        // still consulted for the fallback lookup
        let aliases = self.abstract_aliases.get(abstract_name)?;
        aliases
            .iter()
            .find_map(|alias| self.find_in_contextual_bindings(alias))
    }

    fn find_in_contextual_bindings(&self, abstract_name: &str) -> Option<ContextualImplementation> {
        let building = self.build_stack.last()?;
        self.contextual.get(building)?.get(abstract_name).cloned()
    }

    /// Registers a callback fired when resolution of `abstract_name` starts,
    /// including on singleton cache hits.
    pub fn before_resolving(
        &mut self,
        abstract_name: &str,
        callback: impl BeforeResolvingFn + 'static,
    ) {
        let abstract_name = self.get_alias(abstract_name);
        self.before_resolving_callbacks
            .entry(abstract_name)
            .or_default()
            .push(ServicePtr::new(callback) as BeforeResolvingCallbackPtr);
    }

    /// Registers a callback fired when any resolution starts.
    pub fn before_resolving_any(&mut self, callback: impl BeforeResolvingFn + 'static) {
        self.global_before_resolving_callbacks
            .push(ServicePtr::new(callback) as BeforeResolvingCallbackPtr);
    }

    /// Registers a callback fired after instances matching `abstract_name`
    /// (by exact name or satisfied capability) are produced.
    pub fn resolving(&mut self, abstract_name: &str, callback: impl ResolvingFn + 'static) {
        let abstract_name = self.get_alias(abstract_name);
        self.resolving_callbacks
            .entry(abstract_name)
            .or_default()
            .push(ServicePtr::new(callback) as ResolvingCallbackPtr);
    }

    /// Registers a callback fired after any instance is produced.
    pub fn resolving_any(&mut self, callback: impl ResolvingFn + 'static) {
        self.global_resolving_callbacks
            .push(ServicePtr::new(callback) as ResolvingCallbackPtr);
    }

    /// Registers a callback fired after all resolving callbacks for matching
    /// instances have run.
    pub fn after_resolving(&mut self, abstract_name: &str, callback: impl ResolvingFn + 'static) {
        let abstract_name = self.get_alias(abstract_name);
        self.after_resolving_callbacks
            .entry(abstract_name)
            .or_default()
            .push(ServicePtr::new(callback) as ResolvingCallbackPtr);
    }

    /// Registers a callback fired after any instance is produced, once the
    /// resolving callbacks have run.
    pub fn after_resolving_any(&mut self, callback: impl ResolvingFn + 'static) {
        self.global_after_resolving_callbacks
            .push(ServicePtr::new(callback) as ResolvingCallbackPtr);
    }

    fn fire_before_resolving_callbacks(
        &mut self,
        abstract_name: &str,
        overrides: &ParameterOverrides,
    ) {
        for callback in self.global_before_resolving_callbacks.clone() {
            callback.as_ref()(abstract_name, overrides, self);
        }

        let mut matched = Vec::new();
        for (type_key, callbacks) in &self.before_resolving_callbacks {
            if type_key == abstract_name || self.subtype_of(abstract_name, type_key) {
                matched.extend(callbacks.iter().cloned());
            }
        }

        for callback in matched {
            callback.as_ref()(abstract_name, overrides, self);
        }
    }

    fn subtype_of(&self, type_name: &str, capability: &str) -> bool {
        self.introspector
            .describe(type_name)
            .map(|descriptor| {
                descriptor
                    .capabilities
                    .iter()
                    .any(|declared| declared == capability)
            })
            .unwrap_or(false)
    }

    fn fire_resolving_callbacks(&mut self, abstract_name: &str, object: &InstancePtr) {
        for callback in self.global_resolving_callbacks.clone() {
            callback.as_ref()(object, self);
        }

        for callback in self.matching_callbacks(abstract_name, object, &self.resolving_callbacks) {
            callback.as_ref()(object, self);
        }

        self.fire_after_resolving_callbacks(abstract_name, object);
    }

    fn fire_after_resolving_callbacks(&mut self, abstract_name: &str, object: &InstancePtr) {
        for callback in self.global_after_resolving_callbacks.clone() {
            callback.as_ref()(object, self);
        }

        for callback in
            self.matching_callbacks(abstract_name, object, &self.after_resolving_callbacks)
        {
            callback.as_ref()(object, self);
        }
    }

    /// Every registered type key is tested, matching on exact name or on the
    /// instance satisfying the key as a capability.
    fn matching_callbacks(
        &self,
        abstract_name: &str,
        object: &InstancePtr,
        callbacks: &FxHashMap<String, Vec<ResolvingCallbackPtr>>,
    ) -> Vec<ResolvingCallbackPtr> {
        let mut matched = Vec::new();

        for (type_key, entries) in callbacks {
            if type_key == abstract_name || self.introspector.instance_of(object, type_key) {
                matched.extend(entries.iter().cloned());
            }
        }

        matched
    }

    /// Registers interest in future rebinds of an abstract. If the abstract
    /// is already bound it is resolved immediately and the current instance
    /// returned, so the caller can prime itself.
    pub fn rebinding(
        &mut self,
        abstract_name: &str,
        callback: impl ReboundFn + 'static,
    ) -> Result<Option<InstancePtr>, ResolveError> {
        let abstract_name = self.get_alias(abstract_name);
        self.rebound_callbacks
            .entry(abstract_name.clone())
            .or_default()
            .push(ServicePtr::new(callback) as ReboundCallbackPtr);

        if self.bound(&abstract_name) {
            return self.make(&abstract_name).map(Some);
        }

        Ok(None)
    }

    fn rebound(&mut self, abstract_name: &str) -> Result<(), ResolveError> {
        let instance = self.make(abstract_name)?;
        let callbacks = self
            .rebound_callbacks
            .get(abstract_name)
            .cloned()
            .unwrap_or_default();

        if !callbacks.is_empty() {
            debug!(
                "Firing {} rebound callbacks for [{}].",
                callbacks.len(),
                abstract_name
            );
        }

        for callback in callbacks {
            callback.as_ref()(self, &instance);
        }

        Ok(())
    }

    fn drop_stale_instances(&mut self, abstract_name: &str) {
        // abstract_aliases is left untouched; contextual fallback lookup may
        // still see entries for this name
        self.instances.remove(abstract_name);
        self.aliases.remove(abstract_name);
    }

    fn remove_abstract_alias(&mut self, searched: &str) {
        if !self.aliases.contains_key(searched) {
            return;
        }

        for aliases in self.abstract_aliases.values_mut() {
            aliases.retain(|alias| alias != searched);
        }
    }

    pub fn forget_instance(&mut self, abstract_name: &str) {
        self.instances.remove(abstract_name);
    }

    pub fn forget_instances(&mut self) {
        self.instances.clear();
    }

    /// Clears bindings, cached instances, aliases, and resolved flags.
    /// Extenders, tags, contextual bindings, and callbacks survive a flush.
    pub fn flush(&mut self) {
        debug!("Flushing container state.");
        self.aliases.clear();
        self.abstract_aliases.clear();
        self.resolved.clear();
        self.bindings.clear();
        self.instances.clear();
    }
}

impl Default for Container {
    fn default() -> Self {
        ContainerBuilder::new().build()
    }
}
