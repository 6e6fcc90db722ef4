//! Resolver traits for component resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

/// Core resolver trait for object-safe component resolution.
///
/// Providers receive a `&dyn ResolverCore` when they build an instance, so
/// nested dependencies route back through the same resolver. Most users should
/// use the [`Resolver`] trait instead, which provides typed generic methods on
/// top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves the component bound under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(AnyArc))` - The built component, an `Arc<I>` wrapped in `Arc<dyn Any>`
    /// * `Ok(None)` - Nothing is bound under `key`
    /// * `Err(DiError)` - The bound provider failed to build the component
    fn resolve_any(&self, key: &Key) -> DiResult<Option<AnyArc>>;
}

/// High-level resolver interface with generic methods for type-safe resolution.
///
/// Implemented for every [`ResolverCore`], including `dyn ResolverCore`.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ContextConfig, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// let mut config = ContextConfig::new();
/// config.bind_instance::<dyn Greeter>(Arc::new(English)).unwrap();
///
/// let context = config.get_context().unwrap();
/// let greeter = context.get::<dyn Greeter>().unwrap().unwrap();
/// assert_eq!(greeter.greet(), "hello");
///
/// // Unbound types are simply absent
/// assert!(context.get::<String>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the component bound under the key of `I`.
    ///
    /// Returns `Ok(None)` when `I` was never bound. A fresh instance is built
    /// on every call unless a fixed instance was bound.
    fn get<I>(&self) -> DiResult<Option<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of::<I>();
        match self.resolve_any(&key)? {
            None => Ok(None),
            Some(any) => any
                .downcast_ref::<Arc<I>>()
                .cloned()
                .map(Some)
                .ok_or(DiError::TypeMismatch(key.display_name())),
        }
    }

    /// Resolves `I`, treating an unbound type as an error.
    fn get_required<I>(&self) -> DiResult<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.get::<I>()?.ok_or(DiError::NotBound(Key::of::<I>()))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
