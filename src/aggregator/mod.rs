//! Aggregation of raw stack records into profiles.
//!
//! This module transforms parsed dump sections into:
//! - A canonical `Profile` of unique call paths with summed counts
//! - A counter choice for the folded output

pub mod counters;
pub mod profile;
pub mod stack_builder;

// Re-export main types and functions
pub use counters::select_counter;
pub use profile::{Profile, Sample};
pub use stack_builder::aggregate;
