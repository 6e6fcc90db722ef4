//! Binding storage.

use std::any::Any;
use std::sync::Arc;

use crate::key::Key;
use crate::provider::ComponentProvider;

#[cfg(feature = "ahash")]
type IndexMap = ahash::AHashMap<Key, usize>;
#[cfg(not(feature = "ahash"))]
type IndexMap = std::collections::HashMap<Key, usize>;

/// Type-erased component value.
///
/// A value bound under the key of `I` is always stored as an `Arc<I>` inside
/// the `Any`, so trait objects and sized types share one representation.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Erases a component value into an [`AnyArc`].
pub fn erase<I>(value: Arc<I>) -> AnyArc
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// A key bound to its provider
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) provider: Arc<dyn ComponentProvider>,
}

/// Binding registry
///
/// Keeps bindings in insertion order so validation and diagnostics are
/// deterministic, with a hash index for lookup. Rebinding a key replaces the
/// provider in place.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    bindings: Vec<Binding>,
    index: IndexMap,
}

impl Registry {
    /// Inserts a binding, returning the provider it replaced.
    pub(crate) fn insert(
        &mut self,
        key: Key,
        provider: Arc<dyn ComponentProvider>,
    ) -> Option<Arc<dyn ComponentProvider>> {
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.bindings[pos].provider, provider)),
            None => {
                self.index.insert(key, self.bindings.len());
                self.bindings.push(Binding { key, provider });
                None
            }
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Arc<dyn ComponentProvider>> {
        self.index.get(key).map(|&pos| &self.bindings[pos].provider)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn position(&self, key: &Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterator over all bindings in insertion order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }
}
