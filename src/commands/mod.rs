//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod fold;
pub mod models;

// Re-export main command functions
pub use fold::{execute_fold, fold_graph, fold_raw};
pub use models::{FoldArgs, InputFormat};
