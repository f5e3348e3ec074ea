use std::path::PathBuf;

/// Path that means "read from stdin"
pub const STDIN_PATH: &str = "-";

/// Which producer the input is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Raw profiler text dump
    Raw,
    /// Materialized call graph as JSON
    Graph,
}

/// Arguments for the fold command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct FoldArgs {
    /// Input file, or `-` for stdin
    pub input: PathBuf,

    /// How to interpret the input
    pub format: InputFormat,

    /// Explicit counter index (raw input only)
    pub sample_index: Option<usize>,

    /// Profiler arguments used to pick a counter when no index is given
    pub pprof_args: Vec<String>,

    /// Output path for folded stacks (stdout if omitted)
    pub output: Option<PathBuf>,
}

impl Default for FoldArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(STDIN_PATH),
            format: InputFormat::Raw,
            sample_index: None,
            pprof_args: Vec::new(),
            output: None,
        }
    }
}
