//! Eager validation of the dependency graph.
//!
//! The registry is turned into an arena graph where every binding is a node
//! and every declared dependency is an edge, either to the node bound under
//! that key or to a key nothing is bound under. Validation walks the graph
//! depth-first from every node in binding order and stops at the first
//! violation.

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::provider::ProviderKind;
use crate::registration::Registry;

/// Target of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Index of the node bound under the dependency key
    Bound(usize),
    /// Nothing is bound under this key
    Missing(Key),
}

impl Edge {
    pub fn is_missing(&self) -> bool {
        matches!(self, Edge::Missing(_))
    }
}

/// One binding in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: Key,
    pub kind: ProviderKind,
    /// Name of the implementation type (or instance type) behind the binding
    pub implementation: &'static str,
    /// One edge per declared dependency, in declaration order
    pub edges: Vec<Edge>,
}

/// Snapshot of the bindings and their dependency edges.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

impl DependencyGraph {
    pub(crate) fn from_registry(registry: &Registry) -> Self {
        let nodes = registry
            .iter()
            .map(|binding| Node {
                key: binding.key,
                kind: binding.provider.kind(),
                implementation: binding.provider.implementation_name(),
                edges: binding
                    .provider
                    .dependencies()
                    .iter()
                    .map(|dep| match registry.position(dep) {
                        Some(pos) => Edge::Bound(pos),
                        None => Edge::Missing(*dep),
                    })
                    .collect(),
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of dependency edges, missing ones included.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Checks the graph for unbound dependencies and cycles.
    ///
    /// Roots are visited in binding order and edges in declaration order. The
    /// first unbound dependency yields [`DiError::DependencyNotFound`]. The
    /// first edge back onto the current path yields
    /// [`DiError::CyclicDependency`] listing the path from that dependency down
    /// to the component that closed the cycle.
    pub fn validate(&self) -> DiResult<()> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut path = Vec::new();
        for root in 0..self.nodes.len() {
            if marks[root] == Mark::Unvisited {
                self.visit(root, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(&self, index: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> DiResult<()> {
        marks[index] = Mark::OnPath;
        path.push(index);

        let node = &self.nodes[index];
        for edge in &node.edges {
            match *edge {
                Edge::Missing(dependency) => {
                    return Err(DiError::DependencyNotFound {
                        component: node.key,
                        dependency,
                    });
                }
                Edge::Bound(dep) => match marks[dep] {
                    Mark::OnPath => {
                        let start = path.iter().position(|&i| i == dep).unwrap_or(0);
                        let cycle = path[start..].iter().map(|&i| self.nodes[i].key).collect();
                        return Err(DiError::CyclicDependency(cycle));
                    }
                    Mark::Unvisited => self.visit(dep, marks, path)?,
                    Mark::Done => {}
                },
            }
        }

        path.pop();
        marks[index] = Mark::Done;
        Ok(())
    }
}
