//! Constructors, fields and methods of a component type.

use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult, IllegalComponentReason};
use crate::introspect::Arguments;
use crate::key::Key;
use crate::registration::AnyArc;

pub(crate) type ConstructFn<T> = Arc<dyn Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync>;
pub(crate) type AssignFn<T> = Arc<dyn Fn(&mut T, AnyArc) -> DiResult<()> + Send + Sync>;
pub(crate) type InvokeFn<T> = Arc<dyn Fn(&mut T, &mut Arguments) -> Result<(), BoxError> + Send + Sync>;
pub(crate) type ProjectFn<U, T> = Arc<dyn for<'a> Fn(&'a mut U) -> &'a mut T + Send + Sync>;

/// A declared constructor of a component type.
///
/// Only constructors marked with [`inject`](Constructor::inject) take part in
/// injection; an unmarked constructor without parameters is the fallback
/// default constructor.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Constructor;
/// use std::sync::Arc;
///
/// struct Repository { url: Arc<String> }
///
/// let default_ctor = Constructor::no_args(|| Repository { url: Arc::new(String::new()) });
/// assert!(!default_ctor.is_injected());
///
/// let inject_ctor = Constructor::with::<String, _>(|url| Repository { url }).inject();
/// assert!(inject_ctor.is_injected());
/// assert_eq!(inject_ctor.params().len(), 1);
/// ```
pub struct Constructor<T> {
    injected: bool,
    params: Vec<Key>,
    build: ConstructFn<T>,
}

impl<T: 'static> Constructor<T> {
    /// A constructor without parameters.
    pub fn no_args<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_params(Vec::new(), move |_| Ok(f()))
    }

    /// A constructor taking a single dependency.
    pub fn with<D, F>(f: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<D>) -> T + Send + Sync + 'static,
    {
        Self::with_params([Key::of::<D>()], move |args| Ok(f(args.next::<D>()?)))
    }

    /// A constructor taking two dependencies.
    pub fn with2<D1, D2, F>(f: F) -> Self
    where
        D1: ?Sized + Send + Sync + 'static,
        D2: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<D1>, Arc<D2>) -> T + Send + Sync + 'static,
    {
        Self::with_params([Key::of::<D1>(), Key::of::<D2>()], move |args| {
            let first = args.next::<D1>()?;
            let second = args.next::<D2>()?;
            Ok(f(first, second))
        })
    }

    /// A constructor with an arbitrary parameter list and a fallible body.
    ///
    /// The body receives the resolved values in `params` order.
    pub fn with_params<P, F>(params: P, f: F) -> Self
    where
        P: IntoIterator<Item = Key>,
        F: Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            injected: false,
            params: params.into_iter().collect(),
            build: Arc::new(f),
        }
    }
}

impl<T> Constructor<T> {
    /// Marks this constructor for injection.
    pub fn inject(mut self) -> Self {
        self.injected = true;
        self
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Parameter types, in declaration order.
    pub fn params(&self) -> &[Key] {
        &self.params
    }

    pub(crate) fn invoke(&self, args: &mut Arguments) -> Result<T, BoxError> {
        (self.build)(args)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            injected: self.injected,
            params: self.params.clone(),
            build: self.build.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("injected", &self.injected)
            .field("params", &self.params)
            .finish()
    }
}

/// A declared field of a component type.
///
/// A field is assignable when it was declared with a setter; fields declared
/// with [`immutable`](Field::immutable) cannot receive a value after
/// construction and are rejected when marked for injection.
pub struct Field<T> {
    name: &'static str,
    dependency: Key,
    injected: bool,
    assign: Option<AssignFn<T>>,
}

impl<T: 'static> Field<T> {
    /// An assignable field of type `Arc<D>`.
    pub fn new<D, F>(name: &'static str, setter: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        let assign = move |target: &mut T, value: AnyArc| -> DiResult<()> {
            let value = value
                .downcast_ref::<Arc<D>>()
                .cloned()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<D>()))?;
            setter(target, value);
            Ok(())
        };
        Self {
            name,
            dependency: Key::of::<D>(),
            injected: false,
            assign: Some(Arc::new(assign)),
        }
    }

    /// An assignable field marked for injection.
    pub fn inject<D, F>(name: &'static str, setter: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self::new::<D, F>(name, setter).injected()
    }

    /// A field that is fixed once the instance exists.
    pub fn immutable<D>(name: &'static str) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        Self {
            name,
            dependency: Key::of::<D>(),
            injected: false,
            assign: None,
        }
    }

    fn lift<U: 'static>(self, project: ProjectFn<U, T>) -> Field<U> {
        let assign = self.assign.map(|inner| {
            let lifted: AssignFn<U> = Arc::new(move |target: &mut U, value: AnyArc| {
                inner(project(target), value)
            });
            lifted
        });
        Field {
            name: self.name,
            dependency: self.dependency,
            injected: self.injected,
            assign,
        }
    }
}

impl<T> Field<T> {
    /// Marks this field for injection.
    pub fn injected(mut self) -> Self {
        self.injected = true;
        self
    }

    /// Field name, used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The component type assigned to this field.
    pub fn dependency(&self) -> Key {
        self.dependency
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// True when the field was declared with a setter.
    pub fn is_mutable(&self) -> bool {
        self.assign.is_some()
    }

    pub(crate) fn assign(&self, target: &mut T, value: AnyArc) -> DiResult<()> {
        match &self.assign {
            Some(assign) => assign(target, value),
            None => Err(DiError::IllegalComponent {
                component: std::any::type_name::<T>(),
                reason: IllegalComponentReason::ImmutableField(self.name),
            }),
        }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            dependency: self.dependency,
            injected: self.injected,
            assign: self.assign.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("dependency", &self.dependency)
            .field("injected", &self.injected)
            .field("mutable", &self.assign.is_some())
            .finish()
    }
}

/// Name and parameter types of a method, used to detect overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: &'static str,
    pub params: Vec<Key>,
}

/// A declared method of a component type.
///
/// Marked methods run after construction and field injection. A method on a
/// more-derived class with the same [`Signature`] overrides an ancestor's
/// method, whether or not the override is itself marked.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Method;
///
/// #[derive(Default)]
/// struct Cache { warmed: bool }
///
/// let warm_up = Method::new("warm_up", |cache: &mut Cache| cache.warmed = true).inject();
/// assert!(warm_up.is_injected());
/// assert_eq!(warm_up.signature().name, "warm_up");
/// ```
pub struct Method<T> {
    signature: Signature,
    type_params: usize,
    injected: bool,
    invoke: InvokeFn<T>,
}

impl<T: 'static> Method<T> {
    /// A method without parameters.
    pub fn new<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::with_params(name, Vec::new(), move |target, _| {
            body(target);
            Ok(())
        })
    }

    /// A method taking a single dependency.
    pub fn with<D, F>(name: &'static str, body: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self::with_params(name, [Key::of::<D>()], move |target, args| {
            body(target, args.next::<D>()?);
            Ok(())
        })
    }

    /// A method with an arbitrary parameter list and a fallible body.
    pub fn with_params<P, F>(name: &'static str, params: P, body: F) -> Self
    where
        P: IntoIterator<Item = Key>,
        F: Fn(&mut T, &mut Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            signature: Signature {
                name,
                params: params.into_iter().collect(),
            },
            type_params: 0,
            injected: false,
            invoke: Arc::new(body),
        }
    }

    fn lift<U: 'static>(self, project: ProjectFn<U, T>) -> Method<U> {
        let inner = self.invoke;
        Method {
            signature: self.signature,
            type_params: self.type_params,
            injected: self.injected,
            invoke: Arc::new(move |target: &mut U, args: &mut Arguments| {
                inner(project(target), args)
            }),
        }
    }
}

impl<T> Method<T> {
    /// Marks this method for injection.
    pub fn inject(mut self) -> Self {
        self.injected = true;
        self
    }

    /// Declares how many type parameters of its own the method has.
    pub fn type_params(mut self, count: usize) -> Self {
        self.type_params = count;
        self
    }

    pub fn name(&self) -> &'static str {
        self.signature.name
    }

    pub fn params(&self) -> &[Key] {
        &self.signature.params
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn type_param_count(&self) -> usize {
        self.type_params
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub(crate) fn invoke(&self, target: &mut T, args: &mut Arguments) -> Result<(), BoxError> {
        (self.invoke)(target, args)
    }
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            type_params: self.type_params,
            injected: self.injected,
            invoke: self.invoke.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("signature", &self.signature)
            .field("type_params", &self.type_params)
            .field("injected", &self.injected)
            .finish()
    }
}

/// One level of a type hierarchy: the fields and methods declared directly on
/// a type or on one of its ancestors.
pub struct Class<T> {
    name: &'static str,
    fields: Vec<Field<T>>,
    methods: Vec<Method<T>>,
}

impl<T: 'static> Class<T> {
    /// An empty class level named `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Declares a field on this level.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares a method on this level.
    pub fn method(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    /// Re-expresses this class for a type that embeds it, reached through
    /// `project`.
    pub fn lift<U, P>(self, project: P) -> Class<U>
    where
        U: 'static,
        P: for<'a> Fn(&'a mut U) -> &'a mut T + Send + Sync + 'static,
    {
        self.lift_shared(Arc::new(project))
    }

    pub(crate) fn lift_shared<U: 'static>(self, project: ProjectFn<U, T>) -> Class<U> {
        Class {
            name: self.name,
            fields: self
                .fields
                .into_iter()
                .map(|f| f.lift(project.clone()))
                .collect(),
            methods: self
                .methods
                .into_iter()
                .map(|m| m.lift(project.clone()))
                .collect(),
        }
    }
}

impl<T> Class<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method<T>] {
        &self.methods
    }

    pub(crate) fn push_field(&mut self, field: Field<T>) {
        self.fields.push(field);
    }

    pub(crate) fn push_method(&mut self, method: Method<T>) {
        self.methods.push(method);
    }
}

impl<T> Clone for Class<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            fields: self.fields.clone(),
            methods: self.methods.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Class<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

/// A selected injection point of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionPoint {
    Constructor { params: Vec<Key> },
    Field { name: &'static str, dependency: Key },
    Method { signature: Signature },
}

impl InjectionPoint {
    /// The component types this injection point needs.
    pub fn dependencies(&self) -> &[Key] {
        match self {
            InjectionPoint::Constructor { params } => params,
            InjectionPoint::Field { dependency, .. } => std::slice::from_ref(dependency),
            InjectionPoint::Method { signature } => &signature.params,
        }
    }
}
