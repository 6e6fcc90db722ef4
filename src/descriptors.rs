//! Binding descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::provider::ProviderKind;

/// Description of one binding in a [`ContextConfig`](crate::ContextConfig).
///
/// Descriptors are plain data computed from the registry, in binding order.
/// They are meant for diagnostics and startup checks, e.g. asserting that a
/// component is bound to the expected implementation.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Constructor, ContextConfig, Injectable, ProviderKind, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Server { config: Arc<Config> }
///
/// impl Injectable for Server {
///     fn describe() -> TypeDescriptor<Self> {
///         TypeDescriptor::new()
///             .constructor(Constructor::with::<Config, _>(|config| Server { config }).inject())
///     }
/// }
///
/// let mut config = ContextConfig::new();
/// config.bind_instance(Arc::new(Config)).unwrap();
/// config.bind::<Server, Server>().unwrap();
///
/// let descriptors = config.descriptors();
/// assert_eq!(descriptors[0].kind, ProviderKind::Instance);
/// assert_eq!(descriptors[1].kind, ProviderKind::Injection);
/// assert_eq!(descriptors[1].dependencies.len(), 1);
/// assert!(descriptors[1].type_name().ends_with("Server"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// The component type the binding is registered under
    pub key: Key,
    pub kind: ProviderKind,
    /// The implementation type, or the instance type for instance bindings
    pub implementation: &'static str,
    /// Declared dependencies in injection order, duplicates included
    pub dependencies: Vec<Key>,
}

impl BindingDescriptor {
    /// Full type name of the component type.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn is_instance(&self) -> bool {
        self.kind == ProviderKind::Instance
    }

    pub fn depends_on(&self, key: &Key) -> bool {
        self.dependencies.contains(key)
    }
}
