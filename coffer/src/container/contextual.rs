//! Fluent builder recording contextual bindings: "while building X, when it
//! needs Y, give Z".

use crate::binding::{ContextualImplementation, FactoryFn};
use crate::container::Container;
use crate::instance::{service, ParameterOverrides};

/// First stage: holds the concrete names being configured.
pub struct ContextualBindingBuilder<'c> {
    container: &'c mut Container,
    concretes: Vec<String>,
}

impl<'c> ContextualBindingBuilder<'c> {
    pub(crate) fn new(container: &'c mut Container, concretes: Vec<String>) -> Self {
        Self {
            container,
            concretes,
        }
    }

    /// Declares the dependency being targeted. Primitive constructor
    /// parameters are addressed with a `$` prefix, e.g. `"$retries"`.
    pub fn needs(self, abstract_name: &str) -> PendingContextualBinding<'c> {
        PendingContextualBinding {
            container: self.container,
            concretes: self.concretes,
            needs: abstract_name.to_string(),
        }
    }
}

/// Second stage: commits one entry per configured concrete.
pub struct PendingContextualBinding<'c> {
    container: &'c mut Container,
    concretes: Vec<String>,
    needs: String,
}

impl PendingContextualBinding<'_> {
    /// Registers the implementation for every configured concrete. Repeated
    /// calls rewrite the entries.
    pub fn give(&mut self, implementation: impl Into<ContextualImplementation>) {
        let implementation = implementation.into();

        for concrete in &self.concretes {
            self.container
                .add_contextual_binding(concrete, &self.needs, implementation.clone());
        }
    }

    /// Registers a factory implementation.
    pub fn give_factory(&mut self, factory: impl FactoryFn + 'static) {
        self.give(ContextualImplementation::factory(factory));
    }

    /// Registers an implementation resolving every abstract under `tag` and
    /// injecting the collected `Vec<InstancePtr>` as one value.
    pub fn give_tagged(&mut self, tag: &str) {
        let tag = tag.to_string();
        self.give_factory(
            move |container: &mut Container, _overrides: &ParameterOverrides| {
                container.tagged(&tag).map(service)
            },
        );
    }
}
