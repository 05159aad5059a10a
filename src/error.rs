// src/error.rs
//! Typed errors for the recoverable conditions spec.md §7 calls out by
//! name, plus the `anyhow` re-export the CLI boundary uses for everything
//! else. Mirrors the teacher's own `error.rs`: one place, minimal ceremony.

use std::path::PathBuf;
use thiserror::Error;

pub use anyhow::{anyhow, bail, Context, Result as AnyResult};

/// Errors the core or the file locator can raise. Everything *not* listed
/// here (empty whitelist, positionless nodes, balance-pass failure) is
/// normal control flow per spec.md §7, not an `Err`.
#[derive(Debug, Error)]
pub enum TreeDiffError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("input file unreadable: {0}")]
    InputUnreadable(PathBuf, #[source] std::io::Error),

    #[error("failed to decode AST blob {0}: {1}")]
    AstDecode(PathBuf, serde_json::Error),

    #[error("no file matched pattern {pattern} under {dir}")]
    SequenceMissing { dir: PathBuf, pattern: String },

    #[error("ambiguous sequence match: {pattern} under {dir} matched {count} files, expected exactly one")]
    SequenceAmbiguous { dir: PathBuf, pattern: String, count: usize },

    #[error("unrecognized source extension: {0}")]
    UnsupportedLanguage(String),
}

pub type Result<T> = std::result::Result<T, TreeDiffError>;
