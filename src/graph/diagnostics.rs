//! Recoverable problems found while flattening a call graph.

use crate::utils::config::FRAME_SEPARATOR;
use log::warn;
use std::fmt;

/// A branch dropped because it re-entered a node already on the path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleWarning {
    /// Labels from the root up to and including the re-entered node
    pub path: Vec<String>,
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The input call graph contains a cycle. This can't be represented in a \
             flame graph, so this path will be ignored: {}",
            self.path.join(FRAME_SEPARATOR)
        )
    }
}

/// Receiver for flattener diagnostics
pub trait DiagnosticSink {
    fn cycle_detected(&mut self, warning: CycleWarning);
}

/// Collects warnings as data
impl DiagnosticSink for Vec<CycleWarning> {
    fn cycle_detected(&mut self, warning: CycleWarning) {
        self.push(warning);
    }
}

/// Forwards warnings to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn cycle_detected(&mut self, warning: CycleWarning) {
        warn!("{}", warning);
    }
}
