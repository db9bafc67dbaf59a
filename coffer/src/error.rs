use thiserror::Error;

fn while_building(build_stack: &[String]) -> String {
    if build_stack.is_empty() {
        String::new()
    } else {
        format!(" while building [{}]", build_stack.join(", "))
    }
}

/// Errors raised while resolving a dependency graph.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ResolveError {
    #[error("target [{concrete}] is not instantiable{}", while_building(.build_stack))]
    NotInstantiable {
        concrete: String,
        /// Concretes under construction when the failure occurred, outermost
        /// first.
        build_stack: Vec<String>,
    },
    #[error("target type [{0}] is not known to the introspector")]
    UnknownType(String),
    #[error("unresolvable dependency [${parameter}] in [{declared_in}]")]
    UnresolvablePrimitive {
        parameter: String,
        declared_in: String,
    },
    #[error("resolved instance for [{0}] has an incompatible type")]
    Incompatible(String),
}

/// Errors raised by the generic lookup entry point
/// [get](crate::container::Container::get).
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum LookupError {
    /// Nothing is bound or known for the requested id, as opposed to a
    /// registered entry whose construction failed.
    #[error("no entry was found for [{0}]")]
    EntryNotFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
