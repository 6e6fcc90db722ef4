//! The validated, read-only view of a configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::DiResult;
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, Registry};
use crate::traits::ResolverCore;

/// Resolver over a snapshot of validated bindings.
///
/// A `Context` is only produced by
/// [`ContextConfig::get_context`](crate::ContextConfig::get_context) after the
/// whole dependency graph was checked, so every bound component can be built.
/// Later changes to the configuration do not affect an existing context.
///
/// Nothing is cached: components bound as instances are returned as the same
/// `Arc` every time, components bound to implementation types are rebuilt on
/// every lookup. Cloning is cheap and clones share the snapshot.
///
/// Resolution goes through the [`Resolver`](crate::Resolver) methods.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    registry: Registry,
    observers: Observers,
}

impl Context {
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                registry,
                observers,
            }),
        }
    }

    /// Returns true if a binding exists for `I`.
    pub fn contains<I: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.contains_key(&Key::of::<I>())
    }

    /// Number of bound components.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Keys of all bound components, in binding order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.inner.registry.iter().map(|b| b.key)
    }
}

impl ResolverCore for Context {
    fn resolve_any(&self, key: &Key) -> DiResult<Option<AnyArc>> {
        let Some(provider) = self.inner.registry.get(key) else {
            return Ok(None);
        };

        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return provider.get(self).map(Some);
        }

        observers.resolving(key);
        let start = Instant::now();
        match provider.get(self) {
            Ok(value) => {
                observers.resolved(key, start.elapsed());
                Ok(Some(value))
            }
            Err(e) => {
                observers.failed(key, &e);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.inner.registry.len())
            .field("observers", &self.inner.observers.len())
            .finish()
    }
}
