//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::schema::ReadState;
use std::num::ParseIntError;
use thiserror::Error;

/// Broad classification of a failed parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Grammar violation in a single line
    MalformedInput,
    /// Counter names or counter arity do not line up
    SemanticMismatch,
    /// Input ended before the location region
    Incomplete,
}

/// Errors that can occur while parsing a raw profile dump
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("profile is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed sample line: {0}")]
    MalformedSample(String),

    #[error("malformed location line: {0}")]
    MalformedLocation(String),

    #[error("failed to parse integer {input:?}: {source}")]
    InvalidInteger {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("parser ended before processing locations, state: {0}")]
    Incomplete(ReadState),

    #[error(transparent)]
    Semantic(#[from] ProfileError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidUtf8(_)
            | ParseError::MalformedSample(_)
            | ParseError::MalformedLocation(_)
            | ParseError::InvalidInteger { .. } => ErrorKind::MalformedInput,
            ParseError::Incomplete(_) => ErrorKind::Incomplete,
            ParseError::Semantic(_) => ErrorKind::SemanticMismatch,
        }
    }
}

/// Errors that can occur while building a profile from stack records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("cannot create a profile with no sample names")]
    NoSampleNames,

    #[error("cannot have empty sample names in profile")]
    EmptySampleNames,

    #[error("different sample count ({got}) than sample names ({expected})")]
    ArityMismatch { got: usize, expected: usize },

    #[error("count overflow while merging samples of {0}")]
    CountOverflow(String),
}

/// Errors that can occur while loading a materialized call graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to deserialize call graph: {0}")]
    Json(#[from] serde_json::Error),

    #[error("edge references undeclared node: {0}")]
    UnknownNode(String),
}

/// Errors that can occur while writing folded stacks
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("counter index {index} out of range for {len} counters")]
    CounterOutOfRange { index: usize, len: usize },
}
