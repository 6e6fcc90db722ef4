//! Component providers.
//!
//! A provider knows how to produce one component and which component types it
//! needs to do so. The registry holds two kinds: [`InstanceProvider`] for fixed
//! instances and injection providers that build a fresh implementation
//! instance per resolution.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::{erase, AnyArc};
use crate::traits::{Implements, ResolverCore};

pub mod context;
pub mod injection;
pub use context::Context;
pub use injection::InjectionProvider;

/// How a binding produces its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "graph-export", derive(serde::Serialize, serde::Deserialize))]
pub enum ProviderKind {
    /// A pre-built instance, returned as-is on every resolution
    Instance,
    /// An implementation type built through its injection points
    Injection,
}

/// Produces a component and reports the component types it depends on.
pub trait ComponentProvider: Send + Sync {
    /// Produces the component, resolving dependencies through `resolver`.
    ///
    /// The returned value is an `Arc<I>` erased into an [`AnyArc`], where `I`
    /// is the component type of the binding.
    fn get(&self, resolver: &dyn ResolverCore) -> DiResult<AnyArc>;

    /// The complete, static list of component types this provider needs.
    fn dependencies(&self) -> &[Key];

    fn kind(&self) -> ProviderKind;

    /// Name of the type that backs this provider.
    fn implementation_name(&self) -> &'static str;
}

/// Provider holding a fixed instance.
///
/// Every resolution returns the same `Arc`, so identity is preserved.
pub struct InstanceProvider {
    value: AnyArc,
    name: &'static str,
}

impl InstanceProvider {
    pub fn new<I>(value: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            value: erase(value),
            name: std::any::type_name::<I>(),
        }
    }
}

impl ComponentProvider for InstanceProvider {
    fn get(&self, _: &dyn ResolverCore) -> DiResult<AnyArc> {
        Ok(self.value.clone())
    }

    fn dependencies(&self) -> &[Key] {
        &[]
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Instance
    }

    fn implementation_name(&self) -> &'static str {
        self.name
    }
}

/// Injection provider for `T` exposed under the component type `I`.
pub(crate) struct InjectedComponent<I: ?Sized, T> {
    provider: InjectionProvider<T>,
    _component: PhantomData<fn() -> Arc<I>>,
}

impl<I: ?Sized, T> InjectedComponent<I, T> {
    pub(crate) fn new(provider: InjectionProvider<T>) -> Self {
        Self {
            provider,
            _component: PhantomData,
        }
    }
}

impl<I, T> ComponentProvider for InjectedComponent<I, T>
where
    I: ?Sized + Send + Sync + 'static,
    T: Implements<I>,
{
    fn get(&self, resolver: &dyn ResolverCore) -> DiResult<AnyArc> {
        let instance = self.provider.instantiate(resolver)?;
        Ok(erase(<T as Implements<I>>::upcast(Arc::new(instance))))
    }

    fn dependencies(&self) -> &[Key] {
        self.provider.dependencies()
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Injection
    }

    fn implementation_name(&self) -> &'static str {
        self.provider.name()
    }
}
