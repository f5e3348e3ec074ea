//! Stackfold CLI
//!
//! Folds raw profiler dumps and call graphs into flame graph input.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use stackfold::commands::{execute_fold, FoldArgs, InputFormat};

/// Stackfold - flame graph input from profiler output
#[derive(Parser, Debug)]
#[command(name = "stackfold")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fold a raw profiler text dump
    Raw {
        /// Dump file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Counter to fold by position (defaults to pprof flags, then 0)
        #[arg(long)]
        sample_index: Option<usize>,

        /// Output path for folded stacks (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Profiler arguments, e.g. -- -inuse_space
        #[arg(last = true)]
        pprof_args: Vec<String>,
    },

    /// Fold a call graph given as JSON nodes and edges
    Graph {
        /// Graph file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Output path for folded stacks (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = match cli.command {
        Commands::Raw {
            input,
            sample_index,
            output,
            pprof_args,
        } => FoldArgs {
            input,
            format: InputFormat::Raw,
            sample_index,
            pprof_args,
            output,
        },

        Commands::Graph { input, output } => FoldArgs {
            input,
            format: InputFormat::Graph,
            output,
            ..FoldArgs::default()
        },
    };

    execute_fold(args)
}
