//! Diagnostic observers for resolution events.
//!
//! Observers are registered on a [`ContextConfig`](crate::ContextConfig) and
//! carried into every [`Context`](crate::Context) it produces. Each lookup of a
//! bound component, including nested lookups made while injecting
//! dependencies, reports `resolving` followed by either `resolved` or
//! `failed`.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer for resolution events.
///
/// Calls are made synchronously on the resolving thread, so implementations
/// should stay cheap.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ContextConfig, DiError, DiObserver, Key, Resolver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl DiObserver for Counter {
///     fn resolving(&self, _key: &Key) {}
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
///     fn failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// let counter = Arc::new(Counter::default());
/// let mut config = ContextConfig::new();
/// config.bind_instance(Arc::new(7_u32)).unwrap();
/// config.add_observer(counter.clone());
///
/// let context = config.get_context().unwrap();
/// context.get::<u32>().unwrap();
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before the bound provider runs.
    fn resolving(&self, key: &Key);

    /// Called after the provider produced the component.
    ///
    /// `duration` covers the provider call, nested resolutions included.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when the provider failed. The error is still returned to the caller.
    fn failed(&self, key: &Key, error: &DiError);
}

#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Successful events are emitted at `DEBUG`, failures at `WARN`. Every event
/// carries the component key and the configured prefix.
///
/// ```
/// use ferrous_inject::{ContextConfig, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut config = ContextConfig::new();
/// config.add_observer(Arc::new(LoggingObserver::with_prefix("billing")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-inject".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(prefix = %self.prefix, key = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, key = %key, ?duration, "resolved");
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, key = %key, %error, "resolution failed");
    }
}
