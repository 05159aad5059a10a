// src/diff.rs
//! Top-level orchestration: wires LineIndex → TextDiffAdjuster →
//! Restrictor → DistanceBuilder → Assigner → ScriptCompiler into one
//! pure function from two sources/trees to an edit script.

use crate::distance;
use crate::line_index::LineIndex;
use crate::node::{Ast, NodeId};
use crate::restrict::{self, ShortCircuit};
use crate::script::{self, Op};
use crate::text_diff::{adjust_seqdiff, line_diff};

/// Computes the edit script turning `before_ast` into `after_ast`, using
/// `before_src`/`after_src` to derive the line-level restriction and
/// `hash_rounds` independent sketch rounds for the distance matrix.
#[must_use]
pub fn diff(before_src: &str, after_src: &str, before_ast: &Ast, after_ast: &Ast, hash_rounds: usize) -> Vec<Op> {
    let before_lines: Vec<&str> = before_src.lines().collect();
    let after_lines: Vec<&str> = after_src.lines().collect();

    let before_index = LineIndex::build(before_ast);
    let after_index = LineIndex::build(after_ast);

    let line_entries = line_diff(&before_lines, &after_lines);
    let intervals = adjust_seqdiff(&line_entries, &after_lines, &after_index);

    let before_whitelist = restrict::whitelist_before(&intervals, &before_index);
    let after_whitelist = restrict::whitelist_after(&intervals, &after_index);

    match restrict::short_circuit(&before_whitelist, &after_whitelist) {
        ShortCircuit::AddAll => sorted(&after_whitelist).into_iter().map(Op::Add).collect(),
        ShortCircuit::DeleteAll => sorted(&before_whitelist).into_iter().map(Op::Delete).collect(),
        ShortCircuit::None => {
            let matrix = distance::build(before_ast, after_ast, &before_whitelist, &after_whitelist, hash_rounds);
            let row_ind = crate::assign::solve(&matrix);
            let threshold = script::default_threshold(hash_rounds);
            script::compile(&matrix, &row_ind, threshold)
        }
    }
}

fn sorted(set: &std::collections::HashSet<NodeId>) -> Vec<NodeId> {
    let mut v: Vec<NodeId> = set.iter().copied().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{parse, Lang};

    #[test]
    fn identical_sources_yield_empty_script() {
        let src = "fn main() {\n    let x = 1;\n}\n";
        let before = parse(src, Lang::Rust).unwrap();
        let after = parse(src, Lang::Rust).unwrap();
        let ops = diff(src, src, &before, &after, 10);
        assert!(ops.is_empty());
    }

    #[test]
    fn empty_sources_yield_empty_script() {
        let before = parse("", Lang::Rust).unwrap();
        let after = parse("", Lang::Rust).unwrap();
        let ops = diff("", "", &before, &after, 10);
        assert!(ops.is_empty());
    }
}
