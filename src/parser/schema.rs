//! Raw profile data as it comes out of the dump parser.
//!
//! These types live only for the duration of one parse call; the
//! aggregator turns them into a [`Profile`](crate::aggregator::Profile).

use crate::utils::config::MISSING_FUNCTION_PREFIX;
use std::collections::HashMap;
use std::fmt;

/// Region of the raw dump the parser is currently reading
///
/// Ordered: a dump is complete once the parser reaches `Locations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadState {
    /// Before the `Samples` marker
    Ignore,
    /// The counter-name line right after `Samples`
    SamplesHeader,
    /// Stack sample lines
    Samples,
    /// Function id to name lines
    Locations,
    /// Binary mappings, skipped to the end of the section
    Mappings,
}

impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReadState::Ignore => "ignore",
            ReadState::SamplesHeader => "samplesHeader",
            ReadState::Samples => "samples",
            ReadState::Locations => "locations",
            ReadState::Mappings => "mappings",
        };
        f.write_str(name)
    }
}

/// Integer handle the dump uses instead of repeating function names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(pub u64);

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sample line: leaf-first function ids plus one count per counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub stack: Vec<FuncId>,
    pub counts: Vec<i64>,
}

impl RawRecord {
    pub fn new(stack: Vec<FuncId>, counts: Vec<i64>) -> Self {
        Self { stack, counts }
    }

    /// Resolve the stack to names, parent first
    ///
    /// Ids without a location entry become `missing-function-<id>`.
    pub fn func_names(&self, names: &HashMap<FuncId, String>) -> Vec<String> {
        self.stack
            .iter()
            .rev()
            .map(|id| function_name(names, *id))
            .collect()
    }
}

/// Look up a function name, falling back to the missing-function placeholder
pub fn function_name(names: &HashMap<FuncId, String>, id: FuncId) -> String {
    match names.get(&id) {
        Some(name) => name.clone(),
        None => format!("{}{}", MISSING_FUNCTION_PREFIX, id),
    }
}

/// Everything one `Samples` section of a dump yields
#[derive(Debug, Clone, Default)]
pub struct RawProfile {
    /// Counter names declared by the header line
    pub sample_names: Vec<String>,

    /// Function id to display name; may have gaps
    pub func_names: HashMap<FuncId, String>,

    /// Stack records in input order
    pub records: Vec<RawRecord>,
}

impl RawProfile {
    pub fn new(sample_names: Vec<String>) -> Self {
        Self {
            sample_names,
            ..Self::default()
        }
    }
}
