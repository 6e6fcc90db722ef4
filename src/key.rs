//! Component key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;

/// Key identifying a component type.
///
/// A key is the binding key of the registry and the unit of the dependency
/// graph. It works the same way for concrete types and trait objects, since
/// `TypeId` is available for both. The type name is only kept for diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Key;
///
/// trait Logger: Send + Sync {}
///
/// let string_key = Key::of::<String>();
/// let logger_key = Key::of::<dyn Logger>();
///
/// assert_eq!(string_key.display_name(), "alloc::string::String");
/// assert!(logger_key.display_name().contains("Logger"));
/// assert_ne!(string_key, logger_key);
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates the key for `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` backing this key.
    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    ///
    /// Returns the `std::any::type_name` of the component type, used in error
    /// messages and diagnostics.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The type name with module paths stripped, e.g. `dyn Logger` or
    /// `Vec<String>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            match ch {
                ':' => segment.clear(),
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                    out.push_str(&segment);
                    segment.clear();
                    out.push(ch);
                }
                _ => segment.push(ch),
            }
        }
        out.push_str(&segment);
        out
    }
}

// Identity is the TypeId alone, the name is diagnostic only
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper function for creating component keys.
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
