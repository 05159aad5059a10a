// src/cli/dispatch.rs
//! Turns parsed CLI args into a runnable diff, the way the teacher's own
//! `bin/slopchop.rs` separates `main()` (exit-code plumbing) from
//! `dispatch()` (the actual subcommand logic).

use crate::cli::args::{Commands, DiffArgs};
use crate::config::Config;
use crate::error::{anyhow, AnyResult, TreeDiffError};
use crate::frontend::{self, Lang};
use crate::node::Ast;
use crate::{config, diff, sink};
use std::fs;
use std::path::Path;

pub fn dispatch(command: Commands) -> AnyResult<()> {
    match command {
        Commands::Diff(args) => run_diff(args),
    }
}

fn run_diff(args: DiffArgs) -> AnyResult<()> {
    let mut cfg = Config::new(args.output.clone()).load_project_defaults();
    if let Some(rounds) = args.hash_rounds {
        cfg.hash_rounds = rounds;
    }
    cfg.verbose = args.verbose;

    let (before_src, after_src, before_ast, after_ast) = match &args.sequence {
        Some(prefix) => load_sequence(&args.dir, prefix)?,
        None => {
            let before = args.before.as_deref().ok_or_else(|| anyhow!("--before or --sequence is required"))?;
            let after = args.after.as_deref().ok_or_else(|| anyhow!("--after or --sequence is required"))?;
            load_source_pair(before, after)?
        }
    };

    let ops = diff::diff(&before_src, &after_src, &before_ast, &after_ast, cfg.hash_rounds);
    sink::write_script(&cfg.output_path, &before_src, &after_src, &before_ast, &after_ast, &ops)?;

    if cfg.verbose {
        eprintln!("wrote {} operations to {}", ops.len(), cfg.output_path.display());
    }
    Ok(())
}

fn load_sequence(dir: &Path, prefix: &str) -> AnyResult<(String, String, Ast, Ast)> {
    let files = config::locate_sequence(dir, prefix)?;

    let before_src = read_required(&files.before_src)?;
    let after_src = read_required(&files.after_src)?;
    let before_blob = read_required(&files.before_ast)?;
    let after_blob = read_required(&files.after_ast)?;

    let before_ast: Ast = serde_json::from_str(&before_blob)
        .map_err(|e| TreeDiffError::AstDecode(files.before_ast.clone(), e))?;
    let after_ast: Ast = serde_json::from_str(&after_blob)
        .map_err(|e| TreeDiffError::AstDecode(files.after_ast.clone(), e))?;

    Ok((before_src, after_src, before_ast, after_ast))
}

fn load_source_pair(before: &Path, after: &Path) -> AnyResult<(String, String, Ast, Ast)> {
    let before_src = read_required(before)?;
    let after_src = read_required(after)?;

    let before_lang = lang_of(before)?;
    let after_lang = lang_of(after)?;

    let before_ast = frontend::parse(&before_src, before_lang)?;
    let after_ast = frontend::parse(&after_src, after_lang)?;

    Ok((before_src, after_src, before_ast, after_ast))
}

fn lang_of(path: &Path) -> AnyResult<Lang> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Lang::from_ext(ext).ok_or_else(|| TreeDiffError::UnsupportedLanguage(ext.to_string()).into())
}

fn read_required(path: &Path) -> AnyResult<String> {
    if !path.exists() {
        return Err(TreeDiffError::InputNotFound(path.to_path_buf()).into());
    }
    fs::read_to_string(path).map_err(|e| TreeDiffError::InputUnreadable(path.to_path_buf(), e).into())
}
