//! Exporting the dependency graph for visualization.
//!
//! [`GraphExport`] is a serializable copy of a
//! [`DependencyGraph`](crate::DependencyGraph) keyed by type names. It renders
//! to Graphviz DOT without extra dependencies and to JSON with the
//! `graph-export` feature.

use std::fmt::Write as _;

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;
use crate::validation::{DependencyGraph, Edge};

/// A bound component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Full type name of the component type, unique within an export
    pub id: String,
    /// Type name with module paths stripped
    pub label: String,
    pub implementation: String,
    pub kind: ProviderKind,
}

/// A declared dependency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    /// Id of the component that declares the dependency
    pub from: String,
    /// Full type name of the dependency
    pub to: String,
    /// True when nothing is bound under `to`
    pub missing: bool,
}

/// Summary of the exported graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphMetadata {
    pub binding_count: usize,
    pub instance_count: usize,
    pub injection_count: usize,
    pub missing_count: usize,
    /// Message of the first violation validation would report, if any
    pub violation: Option<String>,
    pub version: String,
}

/// Serializable dependency graph: one node per binding, one edge per declared
/// dependency.
///
/// ```rust
/// use ferrous_inject::{ContextConfig, GraphExport};
/// use std::sync::Arc;
///
/// let mut config = ContextConfig::new();
/// config.bind_instance(Arc::new(8080_u16)).unwrap();
///
/// let export = GraphExport::from_graph(&config.dependency_graph());
/// assert_eq!(export.nodes.len(), 1);
/// assert!(export.to_dot().starts_with("digraph"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl GraphExport {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let nodes: Vec<GraphNode> = graph
            .nodes()
            .iter()
            .map(|node| GraphNode {
                id: node.key.display_name().to_string(),
                label: node.key.short_name(),
                implementation: node.implementation.to_string(),
                kind: node.kind,
            })
            .collect();

        let edges: Vec<GraphEdge> = graph
            .nodes()
            .iter()
            .flat_map(|node| {
                node.edges.iter().map(move |edge| {
                    let (to, missing) = match *edge {
                        Edge::Bound(i) => (graph.nodes()[i].key.display_name(), false),
                        Edge::Missing(key) => (key.display_name(), true),
                    };
                    GraphEdge {
                        from: node.key.display_name().to_string(),
                        to: to.to_string(),
                        missing,
                    }
                })
            })
            .collect();

        let instance_count = nodes
            .iter()
            .filter(|n| n.kind == ProviderKind::Instance)
            .count();
        let metadata = GraphMetadata {
            binding_count: nodes.len(),
            instance_count,
            injection_count: nodes.len() - instance_count,
            missing_count: edges.iter().filter(|e| e.missing).count(),
            violation: graph.validate().err().map(|e| e.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Self {
            nodes,
            edges,
            metadata,
        }
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Instance bindings are drawn as ellipses, injection bindings as boxes.
    /// Unbound dependencies get a dashed red node.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dependencies {\n  rankdir=LR;\n");
        for node in &self.nodes {
            let shape = match node.kind {
                ProviderKind::Instance => "ellipse",
                ProviderKind::Injection => "box",
            };
            let _ = writeln!(
                out,
                "  \"{}\" [label=\"{}\", shape={}];",
                escape(&node.id),
                escape(&node.label),
                shape
            );
        }

        let mut missing: Vec<&str> = self
            .edges
            .iter()
            .filter(|e| e.missing)
            .map(|e| e.to.as_str())
            .collect();
        missing.sort_unstable();
        missing.dedup();
        for id in missing {
            let _ = writeln!(
                out,
                "  \"{}\" [style=dashed, color=red];",
                escape(id)
            );
        }

        for edge in &self.edges {
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(&edge.from), escape(&edge.to));
        }
        out.push_str("}\n");
        out
    }

    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
