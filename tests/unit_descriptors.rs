/// Binding descriptors, dependency graph and graph export

use ferrous_inject::{
    Constructor, ContextConfig, Edge, Field, GraphExport, Injectable, Key, ProviderKind,
    TypeDescriptor,
};
use std::sync::Arc;

struct Settings;
struct Cache;
struct Metrics;

#[derive(Default)]
struct Api {
    cache: Option<Arc<Cache>>,
    metrics: Option<Arc<Metrics>>,
}

impl Injectable for Api {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::new()
            .constructor(Constructor::with::<Settings, _>(|_| Api::default()).inject())
            .field(Field::inject::<Cache, _>("cache", |a: &mut Api, c| a.cache = Some(c)))
            .field(Field::inject::<Metrics, _>("metrics", |a: &mut Api, m| a.metrics = Some(m)))
    }
}

fn config() -> ContextConfig {
    let mut config = ContextConfig::new();
    config
        .bind_instance(Arc::new(Settings))
        .unwrap()
        .bind::<Api, Api>()
        .unwrap()
        .bind_instance(Arc::new(Cache))
        .unwrap();
    config
}

#[test]
fn descriptors_follow_binding_order() {
    let descriptors = config().descriptors();
    let keys: Vec<Key> = descriptors.iter().map(|d| d.key).collect();
    assert_eq!(
        keys,
        vec![Key::of::<Settings>(), Key::of::<Api>(), Key::of::<Cache>()]
    );

    let api = &descriptors[1];
    assert_eq!(api.kind, ProviderKind::Injection);
    assert!(api.implementation.ends_with("Api"));
    assert_eq!(
        api.dependencies,
        vec![Key::of::<Settings>(), Key::of::<Cache>(), Key::of::<Metrics>()]
    );
    assert!(!api.is_instance());
    assert!(descriptors[0].is_instance());
}

#[test]
fn graph_marks_unbound_dependencies() {
    let graph = config().dependency_graph();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.edge_count(), 3);

    let api = graph.node(1).unwrap();
    assert_eq!(
        api.edges,
        vec![
            Edge::Bound(0),
            Edge::Bound(2),
            Edge::Missing(Key::of::<Metrics>())
        ]
    );
    assert!(graph.validate().is_err());
}

#[test]
fn export_has_one_node_per_binding_and_one_edge_per_dependency() {
    let export = GraphExport::from_graph(&config().dependency_graph());

    assert_eq!(export.nodes.len(), 3);
    assert_eq!(export.edges.len(), 3);
    assert_eq!(export.metadata.binding_count, 3);
    assert_eq!(export.metadata.instance_count, 2);
    assert_eq!(export.metadata.injection_count, 1);
    assert_eq!(export.metadata.missing_count, 1);
    assert!(export
        .metadata
        .violation
        .as_deref()
        .unwrap()
        .contains("depends on unbound"));

    let labels: Vec<_> = export.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["Settings", "Api", "Cache"]);
}

#[test]
fn valid_graph_has_no_violation() {
    let mut config = config();
    config.bind_instance(Arc::new(Metrics)).unwrap();
    let export = GraphExport::from_graph(&config.dependency_graph());
    assert_eq!(export.metadata.violation, None);
    assert_eq!(export.metadata.missing_count, 0);
}

#[test]
fn dot_output_lists_nodes_and_edges() {
    let dot = GraphExport::from_graph(&config().dependency_graph()).to_dot();
    let api = Key::of::<Api>().display_name();
    let metrics = Key::of::<Metrics>().display_name();

    assert!(dot.starts_with("digraph dependencies {"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains(&format!("\"{}\" [label=\"Api\", shape=box];", api)));
    assert!(dot.contains(&format!("\"{}\" [style=dashed, color=red];", metrics)));
    assert!(dot.contains(&format!("\"{}\" -> \"{}\";", api, metrics)));
    assert_eq!(dot.matches(" -> ").count(), 3);
}

#[cfg(feature = "graph-export")]
#[test]
fn json_output_round_trips() {
    let export = GraphExport::from_graph(&config().dependency_graph());
    let json = export.to_json().unwrap();
    let parsed: GraphExport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, export);
}

#[cfg(feature = "diagnostics")]
#[test]
fn debug_string_flags_unbound_dependencies() {
    let dump = config().to_debug_string();
    assert!(dump.contains("Api => "));
    assert!(dump.contains("-> Metrics [unbound]"));
    assert!(dump.contains("-> Cache\n"));
}
