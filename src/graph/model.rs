//! Materialized call graph handed over by the graph-text parser.
//!
//! Nodes and edges live in flat vectors and refer to each other by index,
//! so the flattener can keep per-node state in a plain `Vec`.

use crate::utils::error::GraphError;
use serde::Deserialize;
use std::collections::HashMap;

/// Dense handle of a node inside one [`CallGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A function in the call graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Graph-level name, e.g. `N12`
    pub name: String,

    /// Raw tooltip text; may still carry `\n` escapes and quotes
    pub label: Option<String>,
}

impl Node {
    /// Label shown in the folded output, before normalization
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A call from `src` to `dst`
///
/// `weight` is absent when the call was too rare for the profiler to
/// record one; it counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
    pub weight: Option<i64>,
}

impl Edge {
    pub fn weight_or_zero(&self) -> i64 {
        self.weight.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    edges: Vec<Edge>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or attach a label to an existing one
    pub fn add_node(&mut self, name: &str, label: Option<String>) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            if label.is_some() {
                self.nodes[id.0].label = label;
            }
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            label,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Add an edge, creating unlabeled endpoints that do not exist yet
    pub fn add_edge(&mut self, src: &str, dst: &str, weight: Option<i64>) {
        let src = self.add_node(src, None);
        let dst = self.add_node(dst, None);
        self.edges.push(Edge { src, dst, weight });
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub name: String,

    #[serde(default, alias = "label")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDescription {
    pub src: String,
    pub dst: String,

    #[serde(default)]
    pub weight: Option<i64>,
}

/// Serialized form of a call graph
///
/// ```json
/// {
///   "nodes": [{ "name": "N1", "tooltip": "main.main" }],
///   "edges": [{ "src": "N1", "dst": "N2", "weight": 30 }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,

    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
}

impl GraphDescription {
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the graph, rejecting edges to undeclared nodes
    pub fn into_graph(self) -> Result<CallGraph, GraphError> {
        let mut graph = CallGraph::new();
        for node in self.nodes {
            graph.add_node(&node.name, node.tooltip);
        }
        for edge in self.edges {
            for end in [&edge.src, &edge.dst] {
                if graph.node_id(end).is_none() {
                    return Err(GraphError::UnknownNode(end.clone()));
                }
            }
            graph.add_edge(&edge.src, &edge.dst, edge.weight);
        }
        Ok(graph)
    }
}
