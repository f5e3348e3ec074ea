//! Raw profile dump parsing.
//!
//! This module handles:
//! - Walking the `Samples` / `Locations` / `Mappings` regions of a dump
//! - Turning sample lines into leaf-first stack records
//! - Collecting the function id to name table

pub mod raw;
pub mod schema;

// Re-export main types
pub use raw::{parse_raw, parse_raw_profiles, parse_raw_sections, RawParser};
pub use schema::{FuncId, RawProfile, RawRecord, ReadState};
