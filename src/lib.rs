//! Stackfold
//!
//! Converts sampling-profiler output into folded stacks, the
//! `frame;frame;frame weight` lines flame graph renderers consume.
//!
//! Two producers share one output format:
//! - `parser` + `aggregator`: raw text dump to a `Profile` of unique paths
//! - `graph`: an already materialized call graph, flattened by DFS
//!
//! ```ignore
//! let profile = stackfold::parser::parse_raw(&dump)?;
//! let folded = stackfold::flamegraph::profile_to_folded(&profile, 0)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod graph;
pub mod parser;
pub mod utils;
