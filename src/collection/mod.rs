//! The binding registry users configure before resolving anything.

use std::sync::Arc;

use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::introspect::{Injectable, TypeDescriptor};
use crate::key::Key;
use crate::observer::{DiObserver, Observers};
use crate::options::{ContextOptions, RebindPolicy};
use crate::provider::{ComponentProvider, Context, InjectedComponent, InjectionProvider, InstanceProvider};
use crate::registration::Registry;
use crate::traits::Implements;
use crate::validation::DependencyGraph;

/// Registry of component bindings.
///
/// Each component type (a concrete type or a trait object) is bound either to
/// a fixed instance or to an implementation type that is built through its
/// injection points. Binding an implementation type checks its descriptor
/// right away, but its dependencies are only checked when
/// [`get_context`](ContextConfig::get_context) validates the whole graph.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{implements, Constructor, ContextConfig, Injectable, Resolver, TypeDescriptor};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock(u64);
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { self.0 }
/// }
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct TimedGreeter { clock: Arc<dyn Clock> }
/// impl Greeter for TimedGreeter {
///     fn greet(&self) -> String { format!("hello at {}", self.clock.now()) }
/// }
///
/// impl Injectable for TimedGreeter {
///     fn describe() -> TypeDescriptor<Self> {
///         TypeDescriptor::new().constructor(
///             Constructor::with::<dyn Clock, _>(|clock| TimedGreeter { clock }).inject(),
///         )
///     }
/// }
/// implements!(TimedGreeter => dyn Greeter);
///
/// let mut config = ContextConfig::new();
/// config
///     .bind_instance::<dyn Clock>(Arc::new(FixedClock(42)))?
///     .bind::<dyn Greeter, TimedGreeter>()?;
///
/// let context = config.get_context()?;
/// let greeter = context.get_required::<dyn Greeter>()?;
/// assert_eq!(greeter.greet(), "hello at 42");
/// # Ok::<(), ferrous_inject::DiError>(())
/// ```
#[derive(Default)]
pub struct ContextConfig {
    registry: Registry,
    observers: Observers,
    options: ContextOptions,
}

impl ContextConfig {
    /// Creates an empty configuration with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty configuration with the given options.
    ///
    /// ```rust
    /// use ferrous_inject::{ContextConfig, ContextOptions, DiError, RebindPolicy};
    /// use std::sync::Arc;
    ///
    /// let mut config = ContextConfig::with_options(ContextOptions::new().with_rebind(RebindPolicy::Reject));
    /// config.bind_instance(Arc::new(1_u8)).unwrap();
    /// assert!(matches!(config.bind_instance(Arc::new(2_u8)), Err(DiError::AlreadyBound(_))));
    /// ```
    pub fn with_options(options: ContextOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options this configuration was created with.
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    // ----- Bindings -----

    /// Binds `I` to a fixed instance.
    ///
    /// Every lookup of `I` returns this same `Arc`.
    pub fn bind_instance<I>(&mut self, instance: Arc<I>) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of::<I>();
        self.check_rebind(&key)?;
        self.insert(key, Arc::new(InstanceProvider::new(instance)));
        Ok(self)
    }

    /// Binds `I` to the implementation type `T`, described by
    /// [`Injectable::describe`].
    ///
    /// Fails with [`DiError::IllegalComponent`] if the descriptor cannot be
    /// used for injection. The configuration is left unchanged on failure.
    pub fn bind<I, T>(&mut self) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
        T: Injectable + Implements<I>,
    {
        self.bind_descriptor::<I, T>(T::describe())
    }

    /// Binds `I` to the implementation type `T` with an explicit descriptor.
    pub fn bind_descriptor<I, T>(&mut self, descriptor: TypeDescriptor<T>) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
        T: Implements<I>,
    {
        let key = Key::of::<I>();
        self.check_rebind(&key)?;
        let provider = InjectionProvider::from_descriptor(descriptor)?;
        self.insert(key, Arc::new(InjectedComponent::<I, T>::new(provider)));
        Ok(self)
    }

    fn check_rebind(&self, key: &Key) -> DiResult<()> {
        if self.options.rebind == RebindPolicy::Reject && self.registry.contains_key(key) {
            tracing::debug!(key = %key, "rejected rebinding");
            return Err(DiError::AlreadyBound(*key));
        }
        Ok(())
    }

    fn insert(&mut self, key: Key, provider: Arc<dyn ComponentProvider>) {
        let implementation = provider.implementation_name();
        let dependencies = provider.dependencies().len();
        if self.registry.insert(key, provider).is_some() {
            tracing::debug!(key = %key, implementation, dependencies, "rebound component");
        } else {
            tracing::trace!(key = %key, implementation, dependencies, "bound component");
        }
    }

    /// Registers an observer carried into every context built from now on.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Validation -----

    /// Validates every binding and returns a context over them.
    ///
    /// Fails with [`DiError::DependencyNotFound`] or
    /// [`DiError::CyclicDependency`], reporting the first violation found. No
    /// component is built. The configuration stays usable either way, so it
    /// can be fixed and validated again.
    pub fn get_context(&self) -> DiResult<Context> {
        let graph = self.dependency_graph();
        match graph.validate() {
            Ok(()) => {
                tracing::debug!(
                    bindings = graph.len(),
                    edges = graph.edge_count(),
                    "dependency graph validated"
                );
                Ok(Context::new(self.registry.clone(), self.observers.clone()))
            }
            Err(e) => {
                tracing::debug!(error = %e, "dependency graph rejected");
                Err(e)
            }
        }
    }

    /// The current bindings as a dependency graph.
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_registry(&self.registry)
    }

    // ----- Inspection -----

    /// Returns true if a binding exists for `I`.
    pub fn contains<I: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&Key::of::<I>())
    }

    /// Same as [`contains`](ContextConfig::contains) for an erased key.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Number of bound component types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Declared dependencies of the binding for `key`, or `None` if unbound.
    pub fn dependencies_of(&self, key: &Key) -> Option<&[Key]> {
        self.registry.get(key).map(|p| p.dependencies())
    }

    /// One descriptor per binding, in binding order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry
            .iter()
            .map(|binding| BindingDescriptor {
                key: binding.key,
                kind: binding.provider.kind(),
                implementation: binding.provider.implementation_name(),
                dependencies: binding.provider.dependencies().to_vec(),
            })
            .collect()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Context Config Debug ===\n");
        for descriptor in self.descriptors() {
            s.push_str(&format!(
                "  {} => {} ({:?})\n",
                descriptor.key.short_name(),
                descriptor.implementation,
                descriptor.kind
            ));
            for dependency in &descriptor.dependencies {
                let marker = if self.contains_key(dependency) { "" } else { " [unbound]" };
                s.push_str(&format!("    -> {}{}\n", dependency.short_name(), marker));
            }
        }
        s
    }
}

impl std::fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextConfig")
            .field("bindings", &self.registry.len())
            .field("observers", &self.observers.len())
            .field("options", &self.options)
            .finish()
    }
}
