//! Type introspection for injectable components.
//!
//! Components describe themselves through a [`TypeDescriptor`]: their
//! constructors, the fields and methods declared on the type and on every
//! ancestor it embeds, and whether the type is abstract. The container reads
//! this metadata once, when a component is bound, to select injection points
//! and compute its dependency list.
//!
//! Inheritance is expressed by composition. A type that embeds a "base" value
//! inherits the base's class levels through [`TypeDescriptor::inherit`], which
//! lifts every ancestor field and method through a projection to the embedded
//! value.

mod arguments;
mod members;

pub use arguments::Arguments;
pub use members::{Class, Constructor, Field, InjectionPoint, Method, Signature};
pub(crate) use members::ProjectFn;

use std::sync::Arc;

/// A type that can be built by an injection provider.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Injectable, TypeDescriptor, Constructor, Field};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct Scheduler {
///     clock: Option<Arc<dyn Clock>>,
/// }
///
/// impl Injectable for Scheduler {
///     fn describe() -> TypeDescriptor<Self> {
///         TypeDescriptor::new()
///             .constructor(Constructor::no_args(|| Scheduler { clock: None }))
///             .field(Field::inject::<dyn Clock, _>("clock", |s: &mut Scheduler, c| s.clock = Some(c)))
///     }
/// }
///
/// let descriptor = Scheduler::describe();
/// assert_eq!(descriptor.classes().len(), 1);
/// assert_eq!(descriptor.classes()[0].fields().len(), 1);
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Describes the constructors and members of this type.
    fn describe() -> TypeDescriptor<Self>;
}

/// Everything the container needs to know about an implementation type.
///
/// `classes()[0]` holds the members declared on the type itself; the following
/// entries are its ancestors, most-derived first.
pub struct TypeDescriptor<T> {
    name: &'static str,
    is_abstract: bool,
    constructors: Vec<members::Constructor<T>>,
    classes: Vec<members::Class<T>>,
}

impl<T: 'static> TypeDescriptor<T> {
    /// A descriptor named after `T`.
    pub fn new() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// A descriptor with an explicit type name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            is_abstract: false,
            constructors: Vec::new(),
            classes: vec![Class::new(name)],
        }
    }

    /// Marks the described type as abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declares a constructor. Mark it with [`Constructor::inject`] to select it.
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declares a field on the type itself.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.own_class_mut().push_field(field);
        self
    }

    /// Declares a method on the type itself.
    pub fn method(mut self, method: Method<T>) -> Self {
        self.own_class_mut().push_method(method);
        self
    }

    /// Appends an ancestor level that was already expressed for `T`.
    pub fn extends(mut self, ancestor: Class<T>) -> Self {
        self.classes.push(ancestor);
        self
    }

    /// Inherits every class level of `ancestor`, reached through `project`.
    ///
    /// The ancestor's constructors are not inherited.
    pub fn inherit<B, P>(mut self, ancestor: TypeDescriptor<B>, project: P) -> Self
    where
        B: 'static,
        P: for<'a> Fn(&'a mut T) -> &'a mut B + Send + Sync + 'static,
    {
        let project: ProjectFn<T, B> = Arc::new(project);
        self.classes.extend(
            ancestor
                .classes
                .into_iter()
                .map(|class| class.lift_shared(project.clone())),
        );
        self
    }

    fn own_class_mut(&mut self) -> &mut Class<T> {
        if self.classes.is_empty() {
            self.classes.push(Class::new(self.name));
        }
        &mut self.classes[0]
    }
}

impl<T> TypeDescriptor<T> {
    /// The implementation type name reported in errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if marked with [`abstract_type`](TypeDescriptor::abstract_type).
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Declared constructors, marked or not.
    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// Class levels, most-derived first.
    pub fn classes(&self) -> &[Class<T>] {
        &self.classes
    }
}

impl<T: 'static> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            is_abstract: self.is_abstract,
            constructors: self.constructors.clone(),
            classes: self.classes.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("is_abstract", &self.is_abstract)
            .field("constructors", &self.constructors)
            .field("classes", &self.classes)
            .finish()
    }
}
