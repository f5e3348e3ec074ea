//! Folded-stack output, the input format of flame graph renderers.
//!
//! Format: "parent;child;grandchild weight\n"
//!
//! Example: "main.main;main.fib;runtime.morestack 12"
//! Both producers (aggregated profiles and flattened call graphs) go
//! through the same line writer, so their output is byte-identical in
//! syntax: no header, no trailing metadata.

use crate::aggregator::Profile;
use crate::graph::FoldedPath;
use crate::utils::config::FRAME_SEPARATOR;
use crate::utils::error::OutputError;
use std::io::Write;

/// Anything that can be rendered as folded stacks
pub trait FoldedStacks {
    /// Write one line per stack
    fn write_folded(&self, out: &mut dyn Write) -> Result<(), OutputError>;

    /// Render into an owned string
    fn to_folded_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_folded(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// A profile seen through one of its counters
#[derive(Debug, Clone, Copy)]
pub struct CounterView<'a> {
    profile: &'a Profile,
    index: usize,
}

impl<'a> CounterView<'a> {
    /// # Errors
    /// * `OutputError::CounterOutOfRange` - `index` names no counter
    pub fn new(profile: &'a Profile, index: usize) -> Result<Self, OutputError> {
        let len = profile.sample_names().len();
        if index >= len {
            return Err(OutputError::CounterOutOfRange { index, len });
        }
        Ok(Self { profile, index })
    }

    pub fn counter_name(&self) -> &str {
        &self.profile.sample_names()[self.index]
    }
}

impl FoldedStacks for CounterView<'_> {
    fn write_folded(&self, out: &mut dyn Write) -> Result<(), OutputError> {
        for sample in self.profile.samples() {
            write_line(out, &sample.funcs, sample.counts[self.index])?;
        }
        Ok(())
    }
}

impl FoldedStacks for [FoldedPath] {
    fn write_folded(&self, out: &mut dyn Write) -> Result<(), OutputError> {
        for path in self {
            write_line(out, &path.frames, path.weight)?;
        }
        Ok(())
    }
}

/// Write a single `frame;frame;... weight` line
pub fn write_line<S: AsRef<str>>(
    out: &mut dyn Write,
    frames: &[S],
    weight: i64,
) -> Result<(), OutputError> {
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            out.write_all(FRAME_SEPARATOR.as_bytes())?;
        }
        out.write_all(frame.as_ref().as_bytes())?;
    }
    writeln!(out, " {}", weight)?;
    Ok(())
}

/// Render a profile's selected counter as folded stacks
///
/// **Public** - main entry point for profile output
pub fn profile_to_folded(profile: &Profile, counter: usize) -> Result<String, OutputError> {
    CounterView::new(profile, counter)?.to_folded_string()
}

/// Render flattened graph paths as folded stacks
pub fn paths_to_folded(paths: &[FoldedPath]) -> Result<String, OutputError> {
    paths.to_folded_string()
}

/// Clean a raw node label for output
///
/// Graph attributes carry literal `\n` escapes and quote characters;
/// escapes become spaces and quotes are dropped.
pub fn normalize_label(label: &str) -> String {
    label.replace("\\n", " ").replace('"', "")
}
