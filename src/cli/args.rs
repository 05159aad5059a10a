// src/cli/args.rs
//! Clap derive surface, in the same shape as the teacher's own
//! `cli/args.rs`: a top-level `Cli` with one subcommand enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "treediff", version, about = "Semantic AST-level diffing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute an edit script between a before/after AST pair.
    Diff(DiffArgs),
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Locate `<prefix>_before_*`/`<prefix>_after_*` fixture files under
    /// `--dir` (default `.`) instead of parsing real source files.
    #[arg(long)]
    pub sequence: Option<String>,

    /// Directory to search for `--sequence` fixtures.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Before-side source file (mutually exclusive with `--sequence`).
    #[arg(long)]
    pub before: Option<PathBuf>,

    /// After-side source file (mutually exclusive with `--sequence`).
    #[arg(long)]
    pub after: Option<PathBuf>,

    /// Destination for the serialized edit script.
    #[arg(long)]
    pub output: PathBuf,

    /// Number of independent hashing rounds (`S` in the distance model).
    #[arg(long)]
    pub hash_rounds: Option<usize>,

    /// Log excluded (FILE-role, positionless) nodes to stderr.
    #[arg(long, short)]
    pub verbose: bool,
}
