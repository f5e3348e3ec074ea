//! Fold command implementation.
//!
//! The fold command:
//! 1. Reads the input (file or stdin)
//! 2. Parses and aggregates a raw dump, or flattens a call graph
//! 3. Writes folded stacks to stdout or a file

use super::models::{FoldArgs, InputFormat, STDIN_PATH};
use crate::aggregator::select_counter;
use crate::flamegraph::{CounterView, FoldedStacks};
use crate::graph::{FlattenOutcome, Flattener, GraphDescription, LogSink};
use crate::parser::parse_raw;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

/// Execute the fold command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable input or unwritable output
/// * Raw dump parse errors
/// * Call graphs without any edges
pub fn execute_fold(args: FoldArgs) -> Result<()> {
    let start_time = Instant::now();

    let input = read_input(&args.input)?;
    debug!("Read {} bytes from {}", input.len(), args.input.display());

    let folded = match args.format {
        InputFormat::Raw => fold_raw(&input, args.sample_index, &args.pprof_args)?,
        InputFormat::Graph => fold_graph(&input)?,
    };

    match &args.output {
        Some(path) => write_output(&folded, path)?,
        None => io::stdout()
            .lock()
            .write_all(folded.as_bytes())
            .context("Failed to write folded stacks to stdout")?,
    }

    info!("Folded {} stacks in {:.2?}", folded.lines().count(), start_time.elapsed());
    Ok(())
}

/// Parse a raw dump and render the chosen counter
///
/// An explicit `sample_index` wins over counter flags in `pprof_args`.
pub fn fold_raw(input: &[u8], sample_index: Option<usize>, pprof_args: &[String]) -> Result<String> {
    let profile = parse_raw(input).context("Failed to parse raw profile")?;

    let index = sample_index.unwrap_or_else(|| select_counter(pprof_args, profile.sample_names()));
    let view = CounterView::new(&profile, index)?;
    info!(
        "Folding {} unique stacks by {}",
        profile.len(),
        view.counter_name()
    );

    Ok(view.to_folded_string()?)
}

/// Flatten a JSON call graph
///
/// Cycle warnings are logged and the affected branches dropped.
pub fn fold_graph(input: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(input).context("Call graph is not valid UTF-8")?;
    let graph = GraphDescription::from_json(text)?
        .into_graph()
        .context("Failed to load call graph")?;

    match Flattener::new().flatten(&graph, &mut LogSink) {
        FlattenOutcome::Paths(paths) => Ok(paths.to_folded_string()?),
        FlattenOutcome::NoActivity => {
            info!("The profiled program is not doing anything right now, try again later");
            bail!("no activity recorded in call graph")
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == STDIN_PATH {
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Failed to read stdin")?;
    } else {
        buffer = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(buffer)
}

fn write_output(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Folded stacks written to {}", path.display());
    Ok(())
}
