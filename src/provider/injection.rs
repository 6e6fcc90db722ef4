//! Constructor, field and method injection.

use std::collections::HashSet;

use crate::error::{DiError, DiResult, IllegalComponentReason};
use crate::introspect::{
    Arguments, Constructor, Field, InjectionPoint, Injectable, Method, Signature, TypeDescriptor,
};
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Builds instances of `T` through its injection points.
///
/// All selection and validation happens once, in
/// [`from_descriptor`](InjectionProvider::from_descriptor):
///
/// - the type must not be abstract;
/// - exactly one constructor is selected: the single one marked for injection,
///   otherwise the declared no-argument constructor;
/// - marked fields are taken from the type and all its ancestors and must be
///   assignable;
/// - marked methods are taken ancestor-first, skipping any method that a
///   more-derived class redeclares with the same signature, and must not
///   declare type parameters of their own.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Constructor, InjectionProvider, Injectable, Key, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Mailer { host: Arc<String> }
///
/// impl Injectable for Mailer {
///     fn describe() -> TypeDescriptor<Self> {
///         TypeDescriptor::new().constructor(Constructor::with::<String, _>(|host| Mailer { host }).inject())
///     }
/// }
///
/// let provider = InjectionProvider::<Mailer>::new().unwrap();
/// assert_eq!(provider.dependencies(), &[Key::of::<String>()]);
/// ```
pub struct InjectionProvider<T> {
    name: &'static str,
    constructor: Constructor<T>,
    fields: Vec<Field<T>>,
    methods: Vec<Method<T>>,
    dependencies: Vec<Key>,
}

impl<T: Injectable> InjectionProvider<T> {
    /// Creates a provider from `T`'s own descriptor.
    pub fn new() -> DiResult<Self> {
        Self::from_descriptor(T::describe())
    }
}

impl<T: Send + Sync + 'static> InjectionProvider<T> {
    /// Creates a provider from an explicit descriptor.
    pub fn from_descriptor(descriptor: TypeDescriptor<T>) -> DiResult<Self> {
        let name = descriptor.name();
        let illegal = |reason| DiError::IllegalComponent {
            component: name,
            reason,
        };

        if descriptor.is_abstract() {
            return Err(illegal(IllegalComponentReason::Abstract));
        }

        let constructor = select_constructor(&descriptor).map_err(illegal)?;

        let fields = inject_fields(&descriptor);
        if let Some(field) = fields.iter().find(|f| !f.is_mutable()) {
            return Err(illegal(IllegalComponentReason::ImmutableField(field.name())));
        }

        let methods = inject_methods(&descriptor);
        if let Some(method) = methods.iter().find(|m| m.type_param_count() != 0) {
            return Err(illegal(IllegalComponentReason::GenericMethod(method.name())));
        }

        let dependencies: Vec<Key> = constructor
            .params()
            .iter()
            .copied()
            .chain(fields.iter().map(|f| f.dependency()))
            .chain(methods.iter().flat_map(|m| m.params().iter().copied()))
            .collect();

        tracing::trace!(
            component = name,
            fields = fields.len(),
            methods = methods.len(),
            dependencies = dependencies.len(),
            "injection provider created"
        );

        Ok(Self {
            name,
            constructor,
            fields,
            methods,
            dependencies,
        })
    }

    /// Builds a fully injected instance.
    ///
    /// Runs the selected constructor, then assigns fields in collected order,
    /// then invokes methods in collected order. Any failure is reported as
    /// [`DiError::Construction`] naming this implementation.
    pub fn instantiate(&self, resolver: &dyn ResolverCore) -> DiResult<T> {
        let mut args = self.resolve_all(resolver, self.constructor.params())?;
        let mut instance = self
            .constructor
            .invoke(&mut args)
            .map_err(|e| DiError::construction(self.name, e))?;

        for field in &self.fields {
            let value = self.resolve(resolver, field.dependency())?;
            field
                .assign(&mut instance, value)
                .map_err(|e| DiError::construction(self.name, e))?;
        }

        for method in &self.methods {
            let mut args = self.resolve_all(resolver, method.params())?;
            method
                .invoke(&mut instance, &mut args)
                .map_err(|e| DiError::construction(self.name, e))?;
        }

        Ok(instance)
    }

    fn resolve(&self, resolver: &dyn ResolverCore, key: Key) -> DiResult<AnyArc> {
        match resolver.resolve_any(&key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(DiError::construction(self.name, DiError::Unresolvable(key))),
            Err(e) => Err(DiError::construction(self.name, e)),
        }
    }

    fn resolve_all(&self, resolver: &dyn ResolverCore, params: &[Key]) -> DiResult<Arguments> {
        let values = params
            .iter()
            .map(|&key| self.resolve(resolver, key).map(|value| (key, value)))
            .collect::<DiResult<Vec<_>>>()?;
        Ok(Arguments::new(self.name, values))
    }
}

impl<T> InjectionProvider<T> {
    /// Constructor parameter types, then field types, then method parameter types.
    pub fn dependencies(&self) -> &[Key] {
        &self.dependencies
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The selected injection points in the order they are applied.
    pub fn injection_points(&self) -> Vec<InjectionPoint> {
        std::iter::once(InjectionPoint::Constructor {
            params: self.constructor.params().to_vec(),
        })
        .chain(self.fields.iter().map(|f| InjectionPoint::Field {
            name: f.name(),
            dependency: f.dependency(),
        }))
        .chain(self.methods.iter().map(|m| InjectionPoint::Method {
            signature: m.signature().clone(),
        }))
        .collect()
    }

    /// Signatures of the injected methods, in invocation order.
    pub fn method_signatures(&self) -> Vec<&Signature> {
        self.methods.iter().map(|m| m.signature()).collect()
    }
}

impl<T> std::fmt::Debug for InjectionProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionProvider")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

fn select_constructor<T>(
    descriptor: &TypeDescriptor<T>,
) -> Result<Constructor<T>, IllegalComponentReason> {
    let injected: Vec<_> = descriptor
        .constructors()
        .iter()
        .filter(|c| c.is_injected())
        .collect();
    match injected.as_slice() {
        [] => descriptor
            .constructors()
            .iter()
            .find(|c| c.params().is_empty())
            .cloned()
            .ok_or(IllegalComponentReason::NoUsableConstructor),
        [only] => Ok((*only).clone()),
        many => Err(IllegalComponentReason::MultipleInjectConstructors(many.len())),
    }
}

fn inject_fields<T>(descriptor: &TypeDescriptor<T>) -> Vec<Field<T>> {
    descriptor
        .classes()
        .iter()
        .flat_map(|class| class.fields())
        .filter(|f| f.is_injected())
        .cloned()
        .collect()
}

fn inject_methods<T>(descriptor: &TypeDescriptor<T>) -> Vec<Method<T>> {
    let mut declared_below: HashSet<&Signature> = HashSet::new();
    let mut levels = Vec::with_capacity(descriptor.classes().len());

    // Most-derived first, so every level sees what its subclasses redeclare
    for class in descriptor.classes() {
        let selected: Vec<Method<T>> = class
            .methods()
            .iter()
            .filter(|m| m.is_injected() && !declared_below.contains(m.signature()))
            .cloned()
            .collect();
        declared_below.extend(class.methods().iter().map(|m| m.signature()));
        levels.push(selected);
    }

    levels.into_iter().rev().flatten().collect()
}
