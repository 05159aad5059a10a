// src/bin/treediff.rs
//! Binary entry point. Kept thin: parse args, dispatch, translate the
//! result into a process exit code — the same three-layer split
//! (`main` / `run` / `dispatch`) as the teacher's own `bin/slopchop.rs`.

use clap::Parser;
use colored::Colorize;
use treediff_core::cli::{dispatch, Cli};
use treediff_core::exit::TreeDiffExit;

fn main() -> TreeDiffExit {
    run()
}

fn run() -> TreeDiffExit {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(()) => TreeDiffExit::Success,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            classify_failure(&err)
        }
    }
}

fn classify_failure(err: &anyhow::Error) -> TreeDiffExit {
    use treediff_core::error::TreeDiffError;

    match err.downcast_ref::<TreeDiffError>() {
        Some(TreeDiffError::InputNotFound(_) | TreeDiffError::InputUnreadable(..))
        | Some(TreeDiffError::SequenceMissing { .. } | TreeDiffError::SequenceAmbiguous { .. }) => {
            TreeDiffExit::InputError
        }
        Some(TreeDiffError::AstDecode(..)) => TreeDiffExit::DecodeError,
        Some(TreeDiffError::UnsupportedLanguage(_)) | None => TreeDiffExit::Error,
    }
}
