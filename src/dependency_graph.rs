//! File-to-file include dependency graph
//!
//! A directed multigraph keyed by file path. Each node keeps its outgoing
//! edges in insertion order, and a parallel reverse index records every source
//! that points at it. Duplicate edges are kept on purpose: the PCH heuristics
//! count them as inclusion frequency.
//!
//! Queries on unknown nodes return empty results instead of failing.
//! Serialization writes edges in the order they were added, so a decoded
//! graph has the same reverse index as the original.
//!
//! # Example
//!
//! ```
//! use buildlens::dependency_graph::{DependencyGraph, EdgeType};
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge("main.cpp", "widget.h", EdgeType::DirectInclude);
//! graph.add_edge("widget.h", "vector", EdgeType::Transitive);
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(graph.get_reverse_dependencies("widget.h"), ["main.cpp"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kind of include relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    #[default]
    DirectInclude,
    Transitive,
    PchReference,
}

/// Outgoing edge of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub target: String,
    #[serde(rename = "type", default)]
    pub edge_type: EdgeType,
    #[serde(default)]
    pub line_number: u32,
    #[serde(default)]
    pub is_system_header: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl DependencyEdge {
    pub fn new(target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            target: target.into(),
            edge_type,
            line_number: 0,
            is_system_header: false,
            weight: default_weight(),
        }
    }
}

/// Include graph over file paths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct DependencyGraph {
    /// Forward adjacency: node → outgoing edges (insertion order)
    adjacency: BTreeMap<String, Vec<DependencyEdge>>,

    /// Reverse index: node → sources pointing at it (insertion order)
    reverse: BTreeMap<String, Vec<String>>,

    /// Source of every edge, in global insertion order
    edge_log: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if it does not exist yet
    pub fn add_node(&mut self, node: impl Into<String>) {
        let node = node.into();
        self.reverse.entry(node.clone()).or_default();
        self.adjacency.entry(node).or_default();
    }

    /// Add an edge from its components, creating missing endpoints
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: EdgeType) {
        self.add_dependency_edge(source, DependencyEdge::new(target, edge_type));
    }

    /// Add a fully specified edge, creating missing endpoints
    pub fn add_dependency_edge(&mut self, source: &str, edge: DependencyEdge) {
        self.add_node(source);
        self.add_node(edge.target.as_str());

        self.reverse
            .entry(edge.target.clone())
            .or_default()
            .push(source.to_string());
        self.edge_log.push(source.to_string());
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .push(edge);
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.get_edges(source).iter().any(|e| e.target == target)
    }

    /// Targets of the node's outgoing edges, in insertion order
    pub fn get_dependencies(&self, node: &str) -> Vec<&str> {
        self.get_edges(node)
            .iter()
            .map(|e| e.target.as_str())
            .collect()
    }

    /// Sources of every edge pointing at the node, in insertion order
    pub fn get_reverse_dependencies(&self, node: &str) -> &[String] {
        self.reverse.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_edges(&self, node: &str) -> &[DependencyEdge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// All nodes in lexicographic order
    pub fn get_all_nodes(&self) -> Vec<&str> {
        self.adjacency.keys().map(String::as_str).collect()
    }

    /// Targets of edges the trace flagged as system includes
    pub fn flagged_system_headers(&self) -> BTreeSet<&str> {
        self.adjacency
            .values()
            .flatten()
            .filter(|e| e.is_system_header)
            .map(|e| e.target.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.reverse.clear();
        self.edge_log.clear();
    }
}

/// Flat serialized form; deserialization replays every edge through
/// `add_dependency_edge` so the reverse index cannot drift.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphRecord {
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecord {
    source: String,
    #[serde(flatten)]
    edge: DependencyEdge,
}

impl From<GraphRecord> for DependencyGraph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = DependencyGraph::new();
        for node in record.nodes {
            graph.add_node(node);
        }
        for EdgeRecord { source, edge } in record.edges {
            graph.add_dependency_edge(&source, edge);
        }
        graph
    }
}

impl From<DependencyGraph> for GraphRecord {
    fn from(graph: DependencyGraph) -> Self {
        let nodes = graph.adjacency.keys().cloned().collect();

        // Replaying the log source by source restores global edge order
        let mut cursors: BTreeMap<&str, usize> = BTreeMap::new();
        let edges = graph
            .edge_log
            .iter()
            .filter_map(|source| {
                let cursor = cursors.entry(source.as_str()).or_insert(0);
                let edge = graph.adjacency.get(source)?.get(*cursor)?.clone();
                *cursor += 1;
                Some(EdgeRecord {
                    source: source.clone(),
                    edge,
                })
            })
            .collect();
        GraphRecord { nodes, edges }
    }
}
