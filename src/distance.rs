// src/distance.rs
//! Multi-seed accumulation of pairwise distances (spec.md §4.5). Builds
//! the dense `(n1+n2) x (n1+n2)` cost matrix the assignment stage
//! consumes: real before/after nodes on the diagonal-adjacent blocks,
//! dummy rows/columns padding the matrix square for deletions/additions.

use crate::config::HASH_SIZE;
use crate::node::{Ast, NodeId};
use crate::sketch::{sketch, Fingerprint, FingerprintMap};
use rayon::prelude::*;
use std::collections::HashSet;

pub struct DistanceMatrix {
    pub cells: Vec<Vec<i64>>,
    pub n1: usize,
    pub n2: usize,
    /// Stable node order for the before/after sides, index-aligned with
    /// the matrix's real rows/columns.
    pub seq1: Vec<NodeId>,
    pub seq2: Vec<NodeId>,
    /// Concatenation of every round's fingerprint, per node — used by the
    /// script compiler's exact-match test.
    pub supersketch1: Vec<Fingerprint>,
    pub supersketch2: Vec<Fingerprint>,
}

/// Runs `rounds` independent sketch passes (seeded `0..rounds`) over both
/// sides and accumulates the byte-overlap distance matrix.
#[must_use]
pub fn build(
    before: &Ast,
    after: &Ast,
    before_whitelist: &HashSet<NodeId>,
    after_whitelist: &HashSet<NodeId>,
    rounds: usize,
) -> DistanceMatrix {
    let mut seq1: Vec<NodeId> = before_whitelist.iter().copied().collect();
    seq1.sort();
    let mut seq2: Vec<NodeId> = after_whitelist.iter().copied().collect();
    seq2.sort();

    let n1 = seq1.len();
    let n2 = seq2.len();
    let size = n1 + n2;

    let dummy_cost = (2 * HASH_SIZE * rounds) as i64;
    let real_cost = (HASH_SIZE * rounds) as i64;

    let mut cells = vec![vec![dummy_cost; size]; size];
    for row in cells.iter_mut().take(n1) {
        for cell in row.iter_mut().skip(n1) {
            *cell = real_cost;
        }
    }
    for row in cells.iter_mut().skip(n1).take(n2) {
        for cell in row.iter_mut().take(n1) {
            *cell = real_cost;
        }
    }

    let mut supersketch1 = vec![Vec::new(); n1];
    let mut supersketch2 = vec![Vec::new(); n2];

    // Each round's pair of sketches is independent of every other round,
    // so the rounds run across the rayon pool; only the accumulation into
    // `cells`/the supersketches below is sequential, which is what keeps
    // the per-round byte-overlap counts and the supersketch byte order
    // reproducible regardless of how the pool schedules the work.
    let round_maps: Vec<(FingerprintMap, FingerprintMap)> = (0..rounds)
        .into_par_iter()
        .map(|round| {
            let seed = round as u64;
            (sketch(before, seed, before_whitelist), sketch(after, seed, after_whitelist))
        })
        .collect();

    for (map1, map2) in &round_maps {
        for (i, id) in seq1.iter().enumerate() {
            if let Some(bytes) = map1.get(id) {
                supersketch1[i].extend_from_slice(bytes);
            }
        }
        for (j, id) in seq2.iter().enumerate() {
            if let Some(bytes) = map2.get(id) {
                supersketch2[j].extend_from_slice(bytes);
            }
        }

        // byte_matches_after[b]: after-indices whose fingerprint contains
        // byte b at all (set semantics — duplicates within one
        // fingerprint don't matter on this side).
        let mut byte_matches_after: Vec<Vec<usize>> = vec![Vec::new(); 256];
        for (j, id) in seq2.iter().enumerate() {
            if let Some(bytes) = map2.get(id) {
                let mut seen = [false; 256];
                for &b in bytes {
                    if !seen[b as usize] {
                        seen[b as usize] = true;
                        byte_matches_after[b as usize].push(j);
                    }
                }
            }
        }

        for (i, id) in seq1.iter().enumerate() {
            let Some(bytes) = map1.get(id) else { continue };
            // With multiplicity: every occurrence of a matching byte
            // contributes a separate decrement (spec.md §4.5).
            for &b in bytes {
                for &j in &byte_matches_after[b as usize] {
                    cells[i][n1 + j] -= 1;
                    cells[n1 + j][i] -= 1;
                }
            }
        }
    }

    DistanceMatrix { cells, n1, n2, seq1, seq2, supersketch1, supersketch2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AstNode, Position};

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
    fn identical_single_node_sides_converge_to_minimal_real_cost() {
        let before = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let after = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let w1: HashSet<NodeId> = [NodeId(0)].into_iter().collect();
        let w2: HashSet<NodeId> = [NodeId(0)].into_iter().collect();

        let dm = build(&before, &after, &w1, &w2, 10);
        assert_eq!(dm.n1, 1);
        assert_eq!(dm.n2, 1);
        // Identical token/roles/seed means identical fingerprints every
        // round, so every byte matches: distance collapses to 0.
        assert_eq!(dm.cells[0][1], 0);
        assert_eq!(dm.cells[1][0], 0);
    }

    #[test]
    fn dummy_blocks_stay_at_initial_cost() {
        let before = Ast::new(vec![leaf("x", 1)], NodeId(0));
        let after = Ast::new(vec![leaf("y", 1)], NodeId(0));
        let w1: HashSet<NodeId> = [NodeId(0)].into_iter().collect();
        let w2: HashSet<NodeId> = [NodeId(0)].into_iter().collect();

        let dm = build(&before, &after, &w1, &w2, 4);
        assert_eq!(dm.cells[0][0], (2 * HASH_SIZE * 4) as i64);
    }
}
