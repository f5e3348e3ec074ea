//! Call-graph flattening.
//!
//! This module turns an already materialized directed call graph into
//! root-to-leaf paths:
//! - Arena graph model (`CallGraph`, `Node`, `Edge`)
//! - Cycle-safe depth-first path enumeration
//! - Diagnostics for dropped cyclic branches

pub mod diagnostics;
pub mod flattener;
pub mod model;

// Re-export main types
pub use diagnostics::{CycleWarning, DiagnosticSink, LogSink};
pub use flattener::{FlattenOutcome, Flattener, FoldedPath};
pub use model::{CallGraph, Edge, GraphDescription, Node, NodeId};
