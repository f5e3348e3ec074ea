//! Folded-stack serialization.
//!
//! This module converts aggregated profiles and flattened call graphs into
//! the line format flame graph renderers consume. It never renders images.

pub mod folded;

// Re-export main types
pub use folded::{
    normalize_label,
    paths_to_folded,
    profile_to_folded,
    write_line,
    CounterView,
    FoldedStacks,
};
