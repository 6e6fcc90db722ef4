//! Resolved dependency values handed to constructor and method bodies.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

/// Cursor over the resolved dependencies of one constructor or method call.
///
/// Values come in the order the parameters were declared. Each call to
/// [`next`](Arguments::next) takes the following value and downcasts it to the
/// requested component type.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Constructor, Key};
/// use std::sync::Arc;
///
/// struct Endpoint { host: Arc<String>, port: Arc<u16> }
///
/// let constructor = Constructor::with_params(
///     [Key::of::<String>(), Key::of::<u16>()],
///     |args| Ok(Endpoint { host: args.next::<String>()?, port: args.next::<u16>()? }),
/// )
/// .inject();
/// assert_eq!(constructor.params().len(), 2);
/// ```
pub struct Arguments {
    owner: &'static str,
    values: std::vec::IntoIter<(Key, AnyArc)>,
}

impl Arguments {
    pub(crate) fn new(owner: &'static str, values: Vec<(Key, AnyArc)>) -> Self {
        Self {
            owner,
            values: values.into_iter(),
        }
    }

    /// Takes the next resolved value as an `Arc<D>`.
    pub fn next<D>(&mut self) -> DiResult<Arc<D>>
    where
        D: ?Sized + Send + Sync + 'static,
    {
        let expected = Key::of::<D>();
        let (key, value) = self
            .values
            .next()
            .ok_or(DiError::Unresolvable(expected))?;
        if key != expected {
            return Err(DiError::TypeMismatch(expected.display_name()));
        }
        value
            .downcast_ref::<Arc<D>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(expected.display_name()))
    }

    /// Number of values not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Name of the type whose constructor or method receives these values.
    pub fn owner(&self) -> &'static str {
        self.owner
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments")
            .field("owner", &self.owner)
            .field("remaining", &self.values.len())
            .finish()
    }
}
