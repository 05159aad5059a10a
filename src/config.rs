// src/config.rs
//! The two recognized options from spec.md §6 (`hash_rounds`,
//! `output_path`), the `sequence_prefix` locator convention, and an
//! optional project-level `treediff.toml` — following the teacher's own
//! `slopchop.toml` pattern (serde struct with `#[serde(default = ...)]`
//! per field, loaded if present and otherwise defaulted).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `S` in spec.md — the number of independent hashing rounds.
pub const DEFAULT_HASH_ROUNDS: usize = 10;

/// Fixed fingerprint size in bytes (spec.md §3, `HASH_SIZE`).
pub const HASH_SIZE: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDiffToml {
    #[serde(default = "default_hash_rounds")]
    pub hash_rounds: usize,
}

impl Default for TreeDiffToml {
    fn default() -> Self {
        Self { hash_rounds: default_hash_rounds() }
    }
}

const fn default_hash_rounds() -> usize {
    DEFAULT_HASH_ROUNDS
}

/// Resolved runtime configuration: CLI flags layered over an optional
/// `treediff.toml`, matching the teacher's "CLI overrides file defaults"
/// convention in `Config::load_local_config`.
#[derive(Debug, Clone)]
pub struct Config {
    pub hash_rounds: usize,
    pub output_path: PathBuf,
    pub verbose: bool,
}

impl Config {
    #[must_use]
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            hash_rounds: DEFAULT_HASH_ROUNDS,
            output_path,
            verbose: false,
        }
    }

    /// Loads `treediff.toml` from the current directory, if present, and
    /// applies it as the base before CLI overrides.
    #[must_use]
    pub fn load_project_defaults(mut self) -> Self {
        if let Ok(content) = fs::read_to_string("treediff.toml") {
            if let Ok(parsed) = toml::from_str::<TreeDiffToml>(&content) {
                self.hash_rounds = parsed.hash_rounds;
            }
        }
        self
    }
}

/// Locates the four `sequence_prefix` files (`<prefix>_before_*.pb`,
/// `<prefix>_after_*.pb`, `<prefix>_before_*.src`, `<prefix>_after_*.src`)
/// in `dir`, each required to match exactly once (spec.md §6).
pub struct SequenceFiles {
    pub before_ast: PathBuf,
    pub after_ast: PathBuf,
    pub before_src: PathBuf,
    pub after_src: PathBuf,
}

pub fn locate_sequence(dir: &Path, prefix: &str) -> crate::error::Result<SequenceFiles> {
    Ok(SequenceFiles {
        before_ast: locate_one(dir, prefix, "before", "pb")?,
        after_ast: locate_one(dir, prefix, "after", "pb")?,
        before_src: locate_one(dir, prefix, "before", "src")?,
        after_src: locate_one(dir, prefix, "after", "src")?,
    })
}

fn locate_one(dir: &Path, prefix: &str, side: &str, ext: &str) -> crate::error::Result<PathBuf> {
    use crate::error::TreeDiffError;

    let marker = format!("{prefix}_{side}_");
    let suffix = format!(".{ext}");
    let mut matches = Vec::new();

    for entry in walkdir::WalkDir::new(dir).max_depth(1).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(&marker) && name.ends_with(&suffix) {
            matches.push(entry.path().to_path_buf());
        }
    }

    let pattern = format!("{marker}*{suffix}");
    match matches.len() {
        0 => Err(TreeDiffError::SequenceMissing { dir: dir.to_path_buf(), pattern }),
        1 => Ok(matches.remove(0)),
        count => Err(TreeDiffError::SequenceAmbiguous { dir: dir.to_path_buf(), pattern, count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hash_rounds_is_ten() {
        assert_eq!(TreeDiffToml::default().hash_rounds, 10);
    }

    #[test]
    fn locate_sequence_requires_exactly_one_match() {
        let dir = tempfile::tempdir().unwrap();
        let result = locate_sequence(dir.path(), "seq");
        assert!(result.is_err());

        for name in ["seq_before_1.pb", "seq_after_1.pb", "seq_before_1.src", "seq_after_1.src"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        assert!(locate_sequence(dir.path(), "seq").is_ok());

        fs::write(dir.path().join("seq_before_2.pb"), b"").unwrap();
        assert!(locate_sequence(dir.path(), "seq").is_err());
    }
}
