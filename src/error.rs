//! Error types for the dependency injection container.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::key::Key;

/// Boxed error returned by fallible constructor and method bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why an implementation type cannot be used as a component.
///
/// Reported by [`DiError::IllegalComponent`] when an injection provider is
/// created, i.e. at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalComponentReason {
    /// The descriptor is marked abstract and cannot be instantiated
    Abstract,
    /// More than one constructor is marked for injection
    MultipleInjectConstructors(usize),
    /// No constructor is marked for injection and there is no no-argument constructor
    NoUsableConstructor,
    /// A field marked for injection cannot be assigned after construction
    ImmutableField(&'static str),
    /// A method marked for injection declares its own type parameters
    GenericMethod(&'static str),
}

impl fmt::Display for IllegalComponentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalComponentReason::Abstract => f.write_str("type is abstract"),
            IllegalComponentReason::MultipleInjectConstructors(count) => {
                write!(f, "{} constructors are marked for injection", count)
            }
            IllegalComponentReason::NoUsableConstructor => {
                f.write_str("no injectable constructor and no default constructor")
            }
            IllegalComponentReason::ImmutableField(name) => {
                write!(f, "injected field '{}' is immutable", name)
            }
            IllegalComponentReason::GenericMethod(name) => {
                write!(f, "injected method '{}' declares type parameters", name)
            }
        }
    }
}

/// Dependency injection errors
///
/// Represents the error conditions of the container, grouped by when they
/// surface:
///
/// - bind time: [`IllegalComponent`](DiError::IllegalComponent),
///   [`AlreadyBound`](DiError::AlreadyBound)
/// - context creation: [`DependencyNotFound`](DiError::DependencyNotFound),
///   [`CyclicDependency`](DiError::CyclicDependency)
/// - resolution: [`Construction`](DiError::Construction) and the kinds it wraps
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiError, Key};
///
/// struct ServiceA;
/// struct ServiceB;
///
/// let missing = DiError::DependencyNotFound {
///     component: Key::of::<ServiceA>(),
///     dependency: Key::of::<ServiceB>(),
/// };
/// assert!(missing.to_string().contains("depends on unbound"));
///
/// let cycle = DiError::CyclicDependency(vec![Key::of::<ServiceA>(), Key::of::<ServiceB>()]);
/// assert_eq!(cycle.cycle_set().map(|set| set.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Implementation type rejected while building its injection provider
    IllegalComponent {
        component: &'static str,
        reason: IllegalComponentReason,
    },
    /// A binding declares a dependency on a type with no binding
    DependencyNotFound { component: Key, dependency: Key },
    /// A dependency chain returns to a type already on the path (the cycle members)
    CyclicDependency(Vec<Key>),
    /// Building an instance failed
    Construction {
        component: &'static str,
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// A dependency could not be supplied while building an instance
    Unresolvable(Key),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Required lookup of a type that was never bound
    NotBound(Key),
    /// Rebinding rejected by the configured rebind policy
    AlreadyBound(Key),
}

impl DiError {
    /// Wraps any error as a construction failure of `component`.
    pub fn construction<E>(component: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source: BoxError = source.into();
        DiError::Construction {
            component,
            source: Arc::from(source),
        }
    }

    /// The members of a reported cycle, if this is a cycle error.
    pub fn cycle_set(&self) -> Option<HashSet<Key>> {
        match self {
            DiError::CyclicDependency(keys) => Some(keys.iter().copied().collect()),
            _ => None,
        }
    }

    /// True for the kinds raised by graph validation.
    pub fn is_graph_error(&self) -> bool {
        matches!(
            self,
            DiError::DependencyNotFound { .. } | DiError::CyclicDependency(_)
        )
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::IllegalComponent { component, reason } => {
                write!(f, "Illegal component {}: {}", component, reason)
            }
            DiError::DependencyNotFound { component, dependency } => {
                write!(f, "Component {} depends on unbound {}", component, dependency)
            }
            DiError::CyclicDependency(keys) => {
                let names: Vec<_> = keys.iter().map(|k| k.display_name()).collect();
                write!(f, "Cyclic dependency: {}", names.join(" -> "))
            }
            DiError::Construction { component, source } => {
                write!(f, "Failed to construct {}: {}", component, source)
            }
            DiError::Unresolvable(key) => write!(f, "Dependency unavailable: {}", key),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::NotBound(key) => write!(f, "Component not bound: {}", key),
            DiError::AlreadyBound(key) => write!(f, "Component already bound: {}", key),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Construction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
