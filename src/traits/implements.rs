//! Upcasting implementation types to the component types they are bound under.

use std::sync::Arc;

/// Declares that `Self` can be handed out as the component type `I`.
///
/// Every type implements `Implements<Self>`. Binding an implementation to a
/// trait object needs an explicit implementation, usually written with the
/// [`implements!`](crate::implements) macro.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Store: Send + Sync {
///     fn name(&self) -> &str;
/// }
///
/// struct MemoryStore;
/// impl Store for MemoryStore {
///     fn name(&self) -> &str { "memory" }
/// }
///
/// implements!(MemoryStore => dyn Store);
///
/// let store: Arc<dyn Store> = Implements::<dyn Store>::upcast(Arc::new(MemoryStore));
/// assert_eq!(store.name(), "memory");
/// ```
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    #[inline(always)]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implements [`Implements`] for one or more component types.
///
/// ```rust
/// use ferrous_inject::implements;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($component:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$component> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$component> {
                    self
                }
            }
        )+
    };
}
