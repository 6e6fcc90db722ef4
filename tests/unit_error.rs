/// Unit tests for DiError and DiResult types

use ferrous_inject::{DiError, DiResult, IllegalComponentReason, Key};
use std::collections::HashSet;
use std::error::Error;

struct ServiceA;
struct ServiceB;
struct ServiceC;

#[test]
fn test_error_display_illegal_component() {
    let error = DiError::IllegalComponent {
        component: "app::Mailer",
        reason: IllegalComponentReason::MultipleInjectConstructors(3),
    };
    assert_eq!(
        error.to_string(),
        "Illegal component app::Mailer: 3 constructors are marked for injection"
    );

    let error = DiError::IllegalComponent {
        component: "app::Mailer",
        reason: IllegalComponentReason::ImmutableField("transport"),
    };
    assert!(error.to_string().ends_with("injected field 'transport' is immutable"));
}

#[test]
fn test_illegal_component_reasons_display() {
    assert_eq!(IllegalComponentReason::Abstract.to_string(), "type is abstract");
    assert_eq!(
        IllegalComponentReason::NoUsableConstructor.to_string(),
        "no injectable constructor and no default constructor"
    );
    assert_eq!(
        IllegalComponentReason::GenericMethod("install").to_string(),
        "injected method 'install' declares type parameters"
    );
}

#[test]
fn test_error_display_dependency_not_found() {
    let error = DiError::DependencyNotFound {
        component: Key::of::<u8>(),
        dependency: Key::of::<u16>(),
    };
    assert_eq!(error.to_string(), "Component u8 depends on unbound u16");
}

#[test]
fn test_error_display_cycle() {
    let error = DiError::CyclicDependency(vec![Key::of::<u8>(), Key::of::<u16>(), Key::of::<u32>()]);
    assert_eq!(error.to_string(), "Cyclic dependency: u8 -> u16 -> u32");
}

#[test]
fn test_error_display_supporting_kinds() {
    assert_eq!(
        DiError::Unresolvable(Key::of::<bool>()).to_string(),
        "Dependency unavailable: bool"
    );
    assert_eq!(
        DiError::TypeMismatch("alloc::string::String").to_string(),
        "Type mismatch for: alloc::string::String"
    );
    assert_eq!(
        DiError::NotBound(Key::of::<char>()).to_string(),
        "Component not bound: char"
    );
    assert_eq!(
        DiError::AlreadyBound(Key::of::<char>()).to_string(),
        "Component already bound: char"
    );
}

#[test]
fn test_cycle_set() {
    let error = DiError::CyclicDependency(vec![
        Key::of::<ServiceA>(),
        Key::of::<ServiceB>(),
        Key::of::<ServiceC>(),
    ]);
    let expected: HashSet<Key> = [Key::of::<ServiceC>(), Key::of::<ServiceA>(), Key::of::<ServiceB>()]
        .into_iter()
        .collect();
    assert_eq!(error.cycle_set(), Some(expected));
    assert_eq!(DiError::NotBound(Key::of::<ServiceA>()).cycle_set(), None);
}

#[test]
fn test_is_graph_error() {
    assert!(DiError::CyclicDependency(vec![Key::of::<ServiceA>()]).is_graph_error());
    assert!(DiError::DependencyNotFound {
        component: Key::of::<ServiceA>(),
        dependency: Key::of::<ServiceB>(),
    }
    .is_graph_error());
    assert!(!DiError::Unresolvable(Key::of::<ServiceA>()).is_graph_error());
    assert!(!DiError::construction("ServiceA", "boom").is_graph_error());
}

#[test]
fn test_construction_error_source_chain() {
    let inner = DiError::construction("app::Repository", DiError::Unresolvable(Key::of::<u8>()));
    let outer = DiError::construction("app::Service", inner);

    assert_eq!(
        outer.to_string(),
        "Failed to construct app::Service: Failed to construct app::Repository: Dependency unavailable: u8"
    );

    let first = outer.source().unwrap().downcast_ref::<DiError>().unwrap();
    assert!(matches!(first, DiError::Construction { component: "app::Repository", .. }));
    let second = first.source().unwrap().downcast_ref::<DiError>().unwrap();
    assert!(matches!(second, DiError::Unresolvable(_)));
    assert!(second.source().is_none());
}

#[test]
fn test_error_clone_shares_source() {
    let error = DiError::construction("app::Service", "disk full");
    let cloned = error.clone();
    assert_eq!(error.to_string(), cloned.to_string());
    assert_eq!(cloned.source().unwrap().to_string(), "disk full");
}

#[test]
fn test_di_result_alias() {
    fn lookup(found: bool) -> DiResult<u8> {
        if found {
            Ok(7)
        } else {
            Err(DiError::NotBound(Key::of::<u8>()))
        }
    }
    assert_eq!(lookup(true).unwrap(), 7);
    assert!(lookup(false).is_err());
}
