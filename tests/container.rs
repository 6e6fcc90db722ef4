/// Container tests: binding, validation and resolution through `ContextConfig`
/// and `Context`.
use ferrous_inject::{
    implements, Constructor, ContextConfig, ContextOptions, DiError, DiObserver, Field,
    IllegalComponentReason, Injectable, Key, Method, RebindPolicy, Resolver, TypeDescriptor,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

trait Component: Send + Sync {
    fn name(&self) -> &'static str;

    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        None
    }
}

trait Dependency: Send + Sync {
    fn value(&self) -> Option<&str> {
        None
    }
}

trait AnotherDependency: Send + Sync {}

struct PlainDependency;
impl Dependency for PlainDependency {}

fn addr<T: ?Sized>(value: &Arc<T>) -> *const () {
    Arc::as_ptr(value) as *const ()
}

// ----- Components -----

struct ComponentWithDefaultConstructor;

impl Component for ComponentWithDefaultConstructor {
    fn name(&self) -> &'static str {
        "default"
    }
}

impl Injectable for ComponentWithDefaultConstructor {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new().constructor(Constructor::no_args(|| ComponentWithDefaultConstructor))
    }
}

struct ComponentWithInjectConstructor {
    dependency: Arc<dyn Dependency>,
}

impl Component for ComponentWithInjectConstructor {
    fn name(&self) -> &'static str {
        "inject"
    }

    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        Some(self.dependency.clone())
    }
}

impl Injectable for ComponentWithInjectConstructor {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new().constructor(
            Constructor::with::<dyn Dependency, _>(|dependency| ComponentWithInjectConstructor {
                dependency,
            })
            .inject(),
        )
    }
}

struct DependencyWithInjectConstructor {
    dependency: Arc<String>,
}

impl Dependency for DependencyWithInjectConstructor {
    fn value(&self) -> Option<&str> {
        Some(&self.dependency)
    }
}

impl Injectable for DependencyWithInjectConstructor {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new().constructor(
            Constructor::with::<String, _>(|dependency| DependencyWithInjectConstructor {
                dependency,
            })
            .inject(),
        )
    }
}

struct ComponentWithMultipleInjectConstructors;

impl Component for ComponentWithMultipleInjectConstructors {
    fn name(&self) -> &'static str {
        "multiple"
    }
}

impl Injectable for ComponentWithMultipleInjectConstructors {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new()
            .constructor(Constructor::no_args(|| ComponentWithMultipleInjectConstructors).inject())
            .constructor(
                Constructor::with::<String, _>(|_| ComponentWithMultipleInjectConstructors).inject(),
            )
    }
}

struct ComponentWithoutInjectOrDefaultConstructor;

impl Component for ComponentWithoutInjectOrDefaultConstructor {
    fn name(&self) -> &'static str {
        "none"
    }
}

impl Injectable for ComponentWithoutInjectOrDefaultConstructor {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new().constructor(Constructor::with::<String, _>(|_| {
            ComponentWithoutInjectOrDefaultConstructor
        }))
    }
}

implements!(ComponentWithDefaultConstructor => dyn Component);
implements!(ComponentWithInjectConstructor => dyn Component);
implements!(ComponentWithMultipleInjectConstructors => dyn Component);
implements!(ComponentWithoutInjectOrDefaultConstructor => dyn Component);
implements!(DependencyWithInjectConstructor => dyn Dependency);

// ----- Component construction -----

#[test]
fn binds_type_to_a_specific_instance() {
    let instance: Arc<dyn Component> = Arc::new(ComponentWithDefaultConstructor);
    let mut config = ContextConfig::new();
    config.bind_instance::<dyn Component>(instance.clone()).unwrap();

    let context = config.get_context().unwrap();
    for _ in 0..3 {
        let resolved = context.get::<dyn Component>().unwrap().unwrap();
        assert_eq!(addr(&resolved), addr(&instance));
    }
}

#[test]
fn returns_empty_if_component_not_defined() {
    let context = ContextConfig::new().get_context().unwrap();
    assert!(context.get::<dyn Component>().unwrap().is_none());
    assert!(matches!(
        context.get_required::<dyn Component>(),
        Err(DiError::NotBound(key)) if key == Key::of::<dyn Component>()
    ));
}

#[test]
fn binds_type_to_a_class_with_default_constructor() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithDefaultConstructor>()
        .unwrap();

    let instance = config.get_context().unwrap().get_required::<dyn Component>().unwrap();
    assert_eq!(instance.name(), "default");
}

#[test]
fn binds_type_to_a_class_with_inject_constructor() {
    let dependency: Arc<dyn Dependency> = Arc::new(PlainDependency);
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap()
        .bind_instance::<dyn Dependency>(dependency.clone())
        .unwrap();

    let instance = config.get_context().unwrap().get_required::<dyn Component>().unwrap();
    assert_eq!(instance.name(), "inject");
    assert_eq!(addr(&instance.dependency().unwrap()), addr(&dependency));
}

#[test]
fn binds_type_to_a_class_with_transitive_dependencies() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap()
        .bind::<dyn Dependency, DependencyWithInjectConstructor>()
        .unwrap()
        .bind_instance(Arc::new("indirect dependency".to_string()))
        .unwrap();

    let instance = config.get_context().unwrap().get_required::<dyn Component>().unwrap();
    let dependency = instance.dependency().unwrap();
    assert_eq!(dependency.value(), Some("indirect dependency"));
}

#[test]
fn rejects_more_than_one_inject_constructor_at_bind_time() {
    let mut config = ContextConfig::new();
    let err = config
        .bind::<dyn Component, ComponentWithMultipleInjectConstructors>()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        DiError::IllegalComponent {
            reason: IllegalComponentReason::MultipleInjectConstructors(2),
            ..
        }
    ));

    // Binding the dependency does not make the component legal
    config.bind_instance(Arc::new("dependency".to_string())).unwrap();
    assert!(config
        .bind::<dyn Component, ComponentWithMultipleInjectConstructors>()
        .is_err());
}

#[test]
fn rejects_component_without_inject_or_default_constructor() {
    let mut config = ContextConfig::new();
    let err = config
        .bind::<dyn Component, ComponentWithoutInjectOrDefaultConstructor>()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        DiError::IllegalComponent {
            reason: IllegalComponentReason::NoUsableConstructor,
            ..
        }
    ));
}

#[test]
fn illegal_component_leaves_registry_unchanged() {
    let instance: Arc<dyn Component> = Arc::new(ComponentWithDefaultConstructor);
    let mut config = ContextConfig::new();
    config.bind_instance::<dyn Component>(instance.clone()).unwrap();

    assert!(config
        .bind::<dyn Component, ComponentWithoutInjectOrDefaultConstructor>()
        .is_err());
    assert_eq!(config.len(), 1);

    let resolved = config.get_context().unwrap().get_required::<dyn Component>().unwrap();
    assert_eq!(addr(&resolved), addr(&instance));
}

#[test]
fn reports_missing_dependency() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap();

    match config.get_context() {
        Err(DiError::DependencyNotFound {
            component,
            dependency,
        }) => {
            assert_eq!(component, Key::of::<dyn Component>());
            assert_eq!(dependency, Key::of::<dyn Dependency>());
        }
        other => panic!("expected missing dependency, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn revalidates_after_missing_dependency_is_bound() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap()
        .bind::<dyn Dependency, DependencyWithInjectConstructor>()
        .unwrap();
    assert!(config.get_context().is_err());

    config.bind_instance(Arc::new("late".to_string())).unwrap();
    let context = config.get_context().unwrap();
    let component = context.get_required::<dyn Component>().unwrap();
    assert_eq!(component.dependency().unwrap().value(), Some("late"));
}

#[test]
fn builds_fresh_instance_per_lookup() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithDefaultConstructor>()
        .unwrap();
    let context = config.get_context().unwrap();

    let first = context.get_required::<dyn Component>().unwrap();
    let second = context.get_required::<dyn Component>().unwrap();
    assert_ne!(addr(&first), addr(&second));
}

#[test]
fn context_is_a_snapshot() {
    let mut config = ContextConfig::new();
    config.bind_instance(Arc::new(1_u8)).unwrap();
    let context = config.get_context().unwrap();

    config.bind_instance(Arc::new(2_u8)).unwrap();
    config.bind_instance(Arc::new(3_u16)).unwrap();

    assert_eq!(*context.get_required::<u8>().unwrap(), 1);
    assert!(!context.contains::<u16>());
    assert_eq!(context.len(), 1);
}

#[test]
fn context_keys_follow_binding_order() {
    let mut config = ContextConfig::new();
    config
        .bind_instance(Arc::new(3_u16))
        .unwrap()
        .bind_instance(Arc::new(1_u8))
        .unwrap()
        .bind_instance(Arc::new(2_u16))
        .unwrap();

    let context = config.get_context().unwrap();
    let keys: Vec<Key> = context.keys().collect();
    assert_eq!(keys, vec![Key::of::<u16>(), Key::of::<u8>()]);
    assert_eq!(*context.get_required::<u16>().unwrap(), 2);
}

// ----- Rebinding -----

#[test]
fn last_bind_wins_by_default() {
    let mut config = ContextConfig::new();
    config
        .bind_instance(Arc::new("first".to_string()))
        .unwrap()
        .bind_instance(Arc::new("second".to_string()))
        .unwrap();

    assert_eq!(config.len(), 1);
    let context = config.get_context().unwrap();
    assert_eq!(*context.get_required::<String>().unwrap(), "second");
}

#[test]
fn reject_policy_refuses_rebinding() {
    let mut config =
        ContextConfig::with_options(ContextOptions::new().with_rebind(RebindPolicy::Reject));
    config.bind_instance(Arc::new("first".to_string())).unwrap();

    let err = config
        .bind_instance(Arc::new("second".to_string()))
        .err()
        .unwrap();
    assert!(matches!(err, DiError::AlreadyBound(key) if key == Key::of::<String>()));
    let descriptor = TypeDescriptor::<String>::new().constructor(Constructor::no_args(String::new));
    assert!(config.bind_descriptor::<String, String>(descriptor).is_err());

    let context = config.get_context().unwrap();
    assert_eq!(*context.get_required::<String>().unwrap(), "first");
}

// ----- Cycles through every kind of injection point -----

#[derive(Debug, Clone, Copy)]
enum Via {
    Constructor,
    Field,
    Method,
}

const VIAS: [Via; 3] = [Via::Constructor, Via::Field, Via::Method];

/// A descriptor for `T` that needs `D` through the given injection point.
fn needs<T, D>(via: Via, set: fn(&mut T, Arc<D>)) -> TypeDescriptor<T>
where
    T: Default + Send + Sync + 'static,
    D: ?Sized + Send + Sync + 'static,
{
    let descriptor = TypeDescriptor::new();
    match via {
        Via::Constructor => descriptor.constructor(
            Constructor::with::<D, _>(move |dependency| {
                let mut instance = T::default();
                set(&mut instance, dependency);
                instance
            })
            .inject(),
        ),
        Via::Field => descriptor
            .constructor(Constructor::no_args(T::default))
            .field(Field::inject::<D, _>("dependency", set)),
        Via::Method => descriptor
            .constructor(Constructor::no_args(T::default))
            .method(Method::with::<D, _>("install", set).inject()),
    }
}

#[derive(Default)]
struct CyclicComponent {
    _dependency: Option<Arc<dyn Dependency>>,
}

impl Component for CyclicComponent {
    fn name(&self) -> &'static str {
        "cyclic"
    }
}

#[derive(Default)]
struct DependencyOnComponent {
    _component: Option<Arc<dyn Component>>,
}

impl Dependency for DependencyOnComponent {}

#[derive(Default)]
struct DependencyOnAnotherDependency {
    _another: Option<Arc<dyn AnotherDependency>>,
}

impl Dependency for DependencyOnAnotherDependency {}

#[derive(Default)]
struct AnotherDependencyOnComponent {
    _component: Option<Arc<dyn Component>>,
}

impl AnotherDependency for AnotherDependencyOnComponent {}

implements!(CyclicComponent => dyn Component);
implements!(DependencyOnComponent => dyn Dependency);
implements!(DependencyOnAnotherDependency => dyn Dependency);
implements!(AnotherDependencyOnComponent => dyn AnotherDependency);

fn component(via: Via) -> TypeDescriptor<CyclicComponent> {
    needs::<CyclicComponent, dyn Dependency>(via, |c, d| c._dependency = Some(d))
}

fn cycle_of(err: DiError) -> Vec<Key> {
    match err {
        DiError::CyclicDependency(keys) => keys,
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn reports_two_node_cycle() {
    for a in VIAS {
        for b in VIAS {
            let mut config = ContextConfig::new();
            config
                .bind_descriptor::<dyn Component, _>(component(a))
                .unwrap()
                .bind_descriptor::<dyn Dependency, _>(needs::<DependencyOnComponent, dyn Component>(
                    b,
                    |d, c| d._component = Some(c),
                ))
                .unwrap();

            let err = config.get_context().err().unwrap();
            let expected: HashSet<Key> = [Key::of::<dyn Component>(), Key::of::<dyn Dependency>()]
                .into_iter()
                .collect();
            assert_eq!(err.cycle_set(), Some(expected), "{a:?} / {b:?}");
        }
    }
}

#[test]
fn reports_transitive_cycle_through_any_mix_of_injection_points() {
    for a in VIAS {
        for b in VIAS {
            for c in VIAS {
                let mut config = ContextConfig::new();
                config
                    .bind_descriptor::<dyn Component, _>(component(a))
                    .unwrap()
                    .bind_descriptor::<dyn Dependency, _>(needs::<
                        DependencyOnAnotherDependency,
                        dyn AnotherDependency,
                    >(b, |d, x| {
                        d._another = Some(x)
                    }))
                    .unwrap()
                    .bind_descriptor::<dyn AnotherDependency, _>(needs::<
                        AnotherDependencyOnComponent,
                        dyn Component,
                    >(c, |x, c| {
                        x._component = Some(c)
                    }))
                    .unwrap();

                let cycle = cycle_of(config.get_context().err().unwrap());
                assert_eq!(
                    cycle,
                    vec![
                        Key::of::<dyn Component>(),
                        Key::of::<dyn Dependency>(),
                        Key::of::<dyn AnotherDependency>(),
                    ],
                    "{a:?} / {b:?} / {c:?}"
                );
            }
        }
    }
}

#[test]
fn cycle_report_excludes_the_path_leading_into_it() {
    #[derive(Default)]
    struct Entry {
        _component: Option<Arc<dyn Component>>,
    }

    let mut config = ContextConfig::new();
    config
        .bind_descriptor::<Entry, _>(needs::<Entry, dyn Component>(Via::Field, |e, c| {
            e._component = Some(c)
        }))
        .unwrap()
        .bind_descriptor::<dyn Component, _>(component(Via::Constructor))
        .unwrap()
        .bind_descriptor::<dyn Dependency, _>(needs::<DependencyOnComponent, dyn Component>(
            Via::Method,
            |d, c| d._component = Some(c),
        ))
        .unwrap();

    let cycle = cycle_of(config.get_context().err().unwrap());
    assert_eq!(
        cycle,
        vec![Key::of::<dyn Component>(), Key::of::<dyn Dependency>()]
    );
}

#[test]
fn self_dependency_is_a_cycle() {
    #[derive(Default)]
    struct Recursive;

    let mut config = ContextConfig::new();
    config
        .bind_descriptor::<Recursive, _>(needs::<Recursive, Recursive>(Via::Field, |_, _| {}))
        .unwrap();
    assert_eq!(
        cycle_of(config.get_context().err().unwrap()),
        vec![Key::of::<Recursive>()]
    );
}

// ----- Inherited members through the container -----

#[derive(Default)]
struct BaseService {
    dependency: Option<Arc<dyn Dependency>>,
    installed: u32,
}

impl Injectable for BaseService {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new()
            .constructor(Constructor::no_args(BaseService::default))
            .field(Field::inject::<dyn Dependency, _>(
                "dependency",
                |s: &mut BaseService, d| s.dependency = Some(d),
            ))
            .method(Method::new("install", |s: &mut BaseService| s.installed += 1).inject())
    }
}

#[derive(Default)]
struct DerivedService {
    base: BaseService,
    order: Vec<u32>,
}

impl Component for DerivedService {
    fn name(&self) -> &'static str {
        "derived"
    }

    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        self.base.dependency.clone()
    }
}

impl Injectable for DerivedService {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new()
            .constructor(Constructor::no_args(DerivedService::default))
            .method(
                Method::new("start", |s: &mut DerivedService| s.order.push(s.base.installed)).inject(),
            )
            .inherit(BaseService::describe(), |s| &mut s.base)
    }
}

implements!(DerivedService => dyn Component);

#[test]
fn inherited_members_are_validated_and_injected() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, DerivedService>()
        .unwrap();
    assert!(matches!(
        config.get_context(),
        Err(DiError::DependencyNotFound { dependency, .. }) if dependency == Key::of::<dyn Dependency>()
    ));

    let dependency: Arc<dyn Dependency> = Arc::new(PlainDependency);
    config.bind_instance::<dyn Dependency>(dependency.clone()).unwrap();
    let component = config.get_context().unwrap().get_required::<dyn Component>().unwrap();
    assert_eq!(component.name(), "derived");
    assert_eq!(addr(&component.dependency().unwrap()), addr(&dependency));
}

#[test]
fn inherited_method_runs_before_own_method() {
    let mut config = ContextConfig::new();
    config
        .bind_instance::<dyn Dependency>(Arc::new(PlainDependency))
        .unwrap()
        .bind::<DerivedService, DerivedService>()
        .unwrap();

    let service = config.get_context().unwrap().get_required::<DerivedService>().unwrap();
    assert_eq!(service.base.installed, 1);
    assert_eq!(service.order, vec![1]);
}

// ----- Inspection and observers -----

#[test]
fn exposes_declared_dependencies() {
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap()
        .bind_instance(Arc::new(5_u64))
        .unwrap();

    assert!(config.contains::<dyn Component>());
    assert!(!config.contains::<dyn Dependency>());
    assert_eq!(
        config.dependencies_of(&Key::of::<dyn Component>()),
        Some(&[Key::of::<dyn Dependency>()][..])
    );
    assert_eq!(config.dependencies_of(&Key::of::<u64>()), Some(&[][..]));
    assert_eq!(config.dependencies_of(&Key::of::<dyn Dependency>()), None);

    let descriptors = config.descriptors();
    assert_eq!(descriptors.len(), 2);
    assert!(descriptors[0].depends_on(&Key::of::<dyn Dependency>()));
    assert!(descriptors[1].is_instance());
}

#[derive(Default)]
struct CountingObserver {
    resolving: AtomicUsize,
    resolved: AtomicUsize,
    failed: AtomicUsize,
}

impl DiObserver for CountingObserver {
    fn resolving(&self, _key: &Key) {
        self.resolving.fetch_add(1, Ordering::SeqCst);
    }

    fn resolved(&self, _key: &Key, _duration: Duration) {
        self.resolved.fetch_add(1, Ordering::SeqCst);
    }

    fn failed(&self, _key: &Key, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn observers_see_nested_resolutions() {
    let observer = Arc::new(CountingObserver::default());
    let mut config = ContextConfig::new();
    config
        .bind::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap()
        .bind::<dyn Dependency, DependencyWithInjectConstructor>()
        .unwrap()
        .bind_instance(Arc::new("value".to_string()))
        .unwrap()
        .add_observer(observer.clone());

    let context = config.get_context().unwrap();
    context.get_required::<dyn Component>().unwrap();
    assert_eq!(observer.resolving.load(Ordering::SeqCst), 3);
    assert_eq!(observer.resolved.load(Ordering::SeqCst), 3);

    // Unbound lookups are not resolutions
    assert!(context.get::<u8>().unwrap().is_none());
    assert_eq!(observer.resolving.load(Ordering::SeqCst), 3);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 0);
}

struct Flaky;

#[test]
fn observers_see_construction_failures() {
    let observer = Arc::new(CountingObserver::default());
    let mut config = ContextConfig::new();
    config
        .bind_descriptor::<Flaky, Flaky>(
            TypeDescriptor::<Flaky>::named("Flaky")
                .constructor(Constructor::with_params(Vec::new(), |_| Err("not today".into()))),
        )
        .unwrap()
        .add_observer(observer.clone());

    let err = config.get_context().unwrap().get::<Flaky>().err().unwrap();
    assert_eq!(err.to_string(), "Failed to construct Flaky: not today");
    assert_eq!(observer.resolving.load(Ordering::SeqCst), 1);
    assert_eq!(observer.resolved.load(Ordering::SeqCst), 0);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}
