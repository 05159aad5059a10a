// src/script.rs
//! Edit-script classification (spec.md §4.7): turns the assignment
//! permutation into delete/add/modify operations, with exact matches
//! (identical supersketches) silently dropped.

use crate::config::HASH_SIZE;
use crate::distance::DistanceMatrix;
use crate::node::NodeId;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Delete(NodeId),
    Add(NodeId),
    Modify(NodeId, NodeId),
}

/// The default per-round distance threshold above which a pair counts as
/// a deletion rather than a fuzzy match (spec.md §4.7: `HASH_SIZE / 2`,
/// scaled by the number of rounds baked into `distance`).
#[must_use]
pub fn default_threshold(rounds: usize) -> i64 {
    (HASH_SIZE / 2 * rounds) as i64
}

/// Classifies every before-node (deleted, exact, or modify) and every
/// after-node left unclaimed by a non-deleted before-node (added).
/// `threshold` is compared against the raw per-round-scaled distance
/// cell, not re-derived here, so callers can probe monotonicity
/// directly against a fixed [`DistanceMatrix`].
#[must_use]
pub fn compile(distance: &DistanceMatrix, row_ind: &[usize], threshold: i64) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for i in 0..distance.n1 {
        let j = row_ind[i];
        let before_node = distance.seq1[i];

        if j < distance.n1 {
            ops.push(Op::Delete(before_node));
            continue;
        }

        let after_idx = j - distance.n1;
        if distance.cells[i][j] > threshold {
            ops.push(Op::Delete(before_node));
            continue;
        }

        claimed.insert(after_idx);
        if distance.supersketch1[i] == distance.supersketch2[after_idx] {
            continue; // exact match: no operation
        }
        ops.push(Op::Modify(before_node, distance.seq2[after_idx]));
    }

    for k in 0..distance.n2 {
        if !claimed.contains(&k) {
            ops.push(Op::Add(distance.seq2[k]));
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Ast, AstNode, Position};
    use std::collections::HashSet as Set;

    fn leaf(token: &str, line: u32) -> AstNode {
        AstNode {
            token: token.as_bytes().to_vec(),
            roles: vec![],
            start: Position { line, col: 0, offset: 0 },
            end: Position { line, col: token.len() as u32, offset: token.len() as u32 },
            children: vec![],
        }
    }

    #[test]
    fn identical_sides_produce_no_operations() {
        let before = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let after = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let w1: Set<NodeId> = [NodeId(0)].into_iter().collect();
        let w2: Set<NodeId> = [NodeId(0)].into_iter().collect();

        let dm = crate::distance::build(&before, &after, &w1, &w2, 10);
        let row_ind = crate::assign::solve(&dm);
        let ops = compile(&dm, &row_ind, default_threshold(10));
        assert!(ops.is_empty());
    }

    #[test]
    fn empty_before_whitelist_yields_pure_additions() {
        let before = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let after = Ast::new(vec![leaf("y", 1)], NodeId(0));
        let w1: Set<NodeId> = Set::new();
        let w2: Set<NodeId> = [NodeId(0)].into_iter().collect();

        let dm = crate::distance::build(&before, &after, &w1, &w2, 10);
        let row_ind = crate::assign::solve(&dm);
        let ops = compile(&dm, &row_ind, default_threshold(10));
        assert_eq!(ops, vec![Op::Add(NodeId(0))]);
    }
}
