//! Flatten a call graph into root-to-leaf folded paths.
//!
//! Every in-degree-zero node is a root. From each root a depth-first
//! search walks the out-edges; each time it reaches a node without
//! out-edges, the edge path taken so far becomes one folded line whose
//! weight is the sum of the path's edge weights.
//!
//! Nodes are colored during the search. A node is `InProgress` while it is
//! on the current search path and `Done` once all of its out-edges have been
//! explored. Reaching an `InProgress` node means a back edge, i.e. a cycle:
//! that branch is reported to the diagnostic sink and produces no output.

use super::diagnostics::{CycleWarning, DiagnosticSink};
use super::model::{CallGraph, Node, NodeId};
use crate::flamegraph::folded::normalize_label;
use crate::utils::config::NODE_NAME_PREFIX;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// One root-to-leaf path, ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedPath {
    /// Normalized node labels in traversal order
    pub frames: Vec<String>,

    /// Sum of the path's edge weights
    pub weight: i64,
}

impl FoldedPath {
    pub fn new(frames: Vec<String>, weight: i64) -> Self {
        Self { frames, weight }
    }
}

/// Result of flattening a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenOutcome {
    /// Paths found, possibly none if every branch was a cycle
    Paths(Vec<FoldedPath>),

    /// The graph has no edges at all; the profiled program did nothing
    NoActivity,
}

/// Call-graph flattener
///
/// Holds configuration only; every call to [`Flattener::flatten`] builds
/// its own traversal state.
#[derive(Debug, Clone)]
pub struct Flattener {
    node_prefix: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Self {
            node_prefix: NODE_NAME_PREFIX.to_string(),
        }
    }
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.node_prefix = prefix.into();
        self
    }

    /// Enumerate every root-to-leaf path of `graph`
    ///
    /// **Public** - main entry point for graph flattening
    ///
    /// Cycle warnings go to `sink`; the cyclic branch is dropped and the
    /// search carries on with the remaining branches.
    pub fn flatten(&self, graph: &CallGraph, sink: &mut dyn DiagnosticSink) -> FlattenOutcome {
        if graph.edges().is_empty() {
            debug!("Call graph has no edges");
            return FlattenOutcome::NoActivity;
        }

        let out_edges = self.out_edges(graph);
        let roots = self.roots(graph);
        debug!(
            "Flattening call graph: {} nodes, {} edges, {} roots",
            graph.nodes().len(),
            graph.edges().len(),
            roots.len()
        );

        let mut search = Search {
            graph,
            out_edges: &out_edges,
            states: vec![VisitState::Unvisited; graph.nodes().len()],
            path: Vec::new(),
            paths: Vec::new(),
            sink,
        };
        for root in roots {
            search.visit(root);
        }

        debug!("Emitted {} folded paths", search.paths.len());
        FlattenOutcome::Paths(search.paths)
    }

    /// Out-edge index: position `i` lists the edges leaving `NodeId(i)`
    ///
    /// Edges touching artifact nodes are left out.
    pub fn out_edges(&self, graph: &CallGraph) -> Vec<Vec<usize>> {
        let mut out_edges = vec![Vec::new(); graph.nodes().len()];
        for (index, edge) in graph.edges().iter().enumerate() {
            if self.is_call_node(graph.node(edge.src)) && self.is_call_node(graph.node(edge.dst)) {
                out_edges[edge.src.0].push(index);
            }
        }
        out_edges
    }

    /// Nodes no edge points to, in insertion order
    pub fn roots(&self, graph: &CallGraph) -> Vec<NodeId> {
        let mut in_degree = vec![0usize; graph.nodes().len()];
        for edge in graph.edges() {
            if self.is_call_node(graph.node(edge.src)) {
                in_degree[edge.dst.0] += 1;
            }
        }

        graph
            .node_ids()
            .filter(|id| in_degree[id.0] == 0 && self.is_call_node(graph.node(*id)))
            .collect()
    }

    // The DOT analyser also yields cluster containers (e.g. "L") as nodes
    fn is_call_node(&self, node: &Node) -> bool {
        node.name.starts_with(&self.node_prefix)
    }
}

/// Traversal state for one `flatten` call
struct Search<'a> {
    graph: &'a CallGraph,
    out_edges: &'a [Vec<usize>],
    states: Vec<VisitState>,
    /// Edge indexes from the current root
    path: Vec<usize>,
    paths: Vec<FoldedPath>,
    sink: &'a mut dyn DiagnosticSink,
}

impl Search<'_> {
    /// Depth-first walk from `root` with an explicit frame stack
    ///
    /// Each frame is a node on the current path and the position of its
    /// next unexplored out-edge. `path` always holds the edges leading to
    /// the top frame.
    fn visit(&mut self, root: NodeId) {
        if !self.enter(root) {
            return;
        }

        let out_edges = self.out_edges;
        let mut frames: Vec<(NodeId, usize)> = vec![(root, 0)];
        while let Some(frame) = frames.last_mut() {
            let (node, cursor) = *frame;
            match out_edges[node.0].get(cursor) {
                Some(&edge) => {
                    frame.1 += 1;
                    let dst = self.graph.edges()[edge].dst;
                    self.path.push(edge);
                    if self.enter(dst) {
                        frames.push((dst, 0));
                    } else {
                        self.path.pop();
                    }
                }
                None => {
                    self.states[node.0] = VisitState::Done;
                    frames.pop();
                    self.path.pop();
                }
            }
        }
    }

    /// Arrive at `node` over the current path
    ///
    /// Returns true when `node` was marked `InProgress` and its out-edges
    /// still need exploring.
    fn enter(&mut self, node: NodeId) -> bool {
        if self.states[node.0] == VisitState::InProgress {
            let (frames, _) = self.path_frames();
            self.sink.cycle_detected(CycleWarning { path: frames });
            return false;
        }

        if self.out_edges[node.0].is_empty() {
            // A root without calls has no path to print
            if !self.path.is_empty() {
                let (frames, weight) = self.path_frames();
                self.paths.push(FoldedPath::new(frames, weight));
            }
            self.states[node.0] = VisitState::Done;
            return false;
        }

        self.states[node.0] = VisitState::InProgress;
        true
    }

    /// Labels and summed weight of the current edge path
    ///
    /// The weight saturates at the `i64` bounds.
    fn path_frames(&self) -> (Vec<String>, i64) {
        let edges = self.graph.edges();
        let mut frames = Vec::with_capacity(self.path.len() + 1);
        let mut weight: i64 = 0;

        for &index in &self.path {
            let edge = &edges[index];
            frames.push(normalize_label(self.graph.node(edge.src).display_label()));
            weight = weight.saturating_add(edge.weight_or_zero());
        }
        if let Some(&last) = self.path.last() {
            frames.push(normalize_label(self.graph.node(edges[last].dst).display_label()));
        }

        (frames, weight)
    }
}
