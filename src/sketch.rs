// src/sketch.rs
//! Locality-sensitive tree hashing (spec.md §4.1).
//!
//! Each whitelisted node gets a fixed `HASH_SIZE`-byte fingerprint built by
//! sampling bytes from its children's fingerprints proportionally to
//! subtree size, plus its own seeded token hash — a MinHash-style scheme
//! where subtrees sharing bytes share samples in expectation. This mirrors
//! the teacher's `audit/fingerprint.rs` in spirit (a structural hash
//! invariant to identifier spelling) but follows spec.md's proportional
//! sampling scheme rather than a single rolling `DefaultHasher`.

use crate::config::HASH_SIZE;
use crate::node::{Ast, NodeId};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::hash::Hasher;
use twox_hash::XxHash64;

pub type Fingerprint = Vec<u8>;
pub type FingerprintMap = IndexMap<NodeId, Fingerprint>;

/// One sketch pass over the whole tree at a fixed `seed`. Returns a map
/// from whitelisted `NodeId` to its fingerprint, in a stable iteration
/// order (insertion order, which recursion reproduces identically across
/// rounds since the tree and whitelist never change).
#[must_use]
pub fn sketch(ast: &Ast, seed: u64, whitelist: &HashSet<NodeId>) -> FingerprintMap {
    let mut map = FingerprintMap::new();
    visit(ast, ast.root, seed, whitelist, &mut map);
    map
}

/// (weight, bytes) — weight is the subtree's sample budget contribution,
/// bytes is what gets sampled from.
type Entry = (usize, Vec<u8>);

fn visit(ast: &Ast, id: NodeId, seed: u64, whitelist: &HashSet<NodeId>, map: &mut FingerprintMap) -> Entry {
    let node = ast.get(id);

    if node.children.is_empty() {
        let own = own_sketch(ast, id, whitelist);
        if own.0 > 0 {
            map.insert(id, own.1.clone());
        }
        return own;
    }

    let mut entries: Vec<Entry> = node
        .children
        .iter()
        .map(|&child| visit(ast, child, seed, whitelist, map))
        .collect();
    entries.push(own_sketch(ast, id, whitelist));

    if !whitelist.contains(&id) {
        return (0, Vec::new());
    }

    let total: usize = entries.iter().filter(|(w, _)| *w > 0).map(|(w, _)| w).sum();
    if total == 0 {
        // spec.md §9: treat "all weights zero" as an up-front check, not a
        // fallthrough into the balance pass.
        return (0, Vec::new());
    }

    let sizes = allocate(&entries, total, seed);
    let fingerprint = draw_samples(&entries, &sizes, seed);
    map.insert(id, fingerprint.clone());
    (total, fingerprint)
}

/// A node's own contribution: a 16-byte seeded hash of its token, weight 1,
/// if it has a position and is whitelisted; otherwise `(0, ∅)`.
fn own_sketch(ast: &Ast, id: NodeId, whitelist: &HashSet<NodeId>) -> Entry {
    let node = ast.get(id);
    if !node.start.has_position() || !whitelist.contains(&id) {
        return (0, Vec::new());
    }

    let (seed1, seed2) = seeds_from_roles(&node.roles);
    let h1 = hash_with_seed(seed1, &node.token);
    let h2 = hash_with_seed(seed2, &node.token);

    let mut bytes = Vec::with_capacity(HASH_SIZE);
    bytes.extend_from_slice(&h1.to_le_bytes());
    bytes.extend_from_slice(&h2.to_le_bytes());
    (1, bytes)
}

fn hash_with_seed(seed: u64, data: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    hasher.write(data);
    hasher.finish()
}

/// Roles are packed little-endian, one byte per role, into two 64-bit
/// seeds: `roles[0..4]` into `seed1`, `roles[4..8]` into `seed2`
/// (spec.md §9, "Role packing"). Roles beyond the first 8 are dropped.
fn seeds_from_roles(roles: &[u32]) -> (u64, u64) {
    let mut seed1: u64 = 0;
    for (i, &role) in roles.iter().take(4).enumerate() {
        seed1 |= u64::from(role as u8) << (i * 8);
    }
    let mut seed2: u64 = 0;
    for (i, &role) in roles.iter().skip(4).take(4).enumerate() {
        seed2 |= u64::from(role as u8) << (i * 8);
    }
    (seed1, seed2)
}

/// Allocates `HASH_SIZE` sample slots proportionally across `entries`,
/// then balances the rounding error to land on exactly `HASH_SIZE` total
/// (spec.md §4.1 steps 3–4), falling back to [`emergency_allocate`] if a
/// full balancing pass makes no progress.
fn allocate(entries: &[Entry], total: usize, seed: u64) -> Vec<usize> {
    let n = entries.len();
    let mut sizes = vec![0usize; n];
    for (i, (w, _)) in entries.iter().enumerate() {
        if *w > 0 {
            sizes[i] = (w * HASH_SIZE / total).max(1);
        }
    }

    let mut delta = HASH_SIZE as i64 - sizes.iter().sum::<usize>() as i64;
    if delta == 0 {
        return sizes;
    }

    let sign: i64 = if delta > 0 { 1 } else { -1 };
    // Decreasing order of initial size, ties broken by original order
    // (spec.md §4.1 step 4). Restricted to entries with w > 0 — a
    // zero-weight entry never receives or loses a slot, matching the
    // original's `sample_sizes`/`ss2` arrays, which are built only from
    // positive-weight entries.
    let mut order: Vec<usize> = (0..n).filter(|&i| entries[i].0 > 0).collect();
    order.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));

    loop {
        if delta == 0 {
            break;
        }
        let mut changed = false;
        for &i in &order {
            if delta == 0 {
                break;
            }
            if sign < 0 && sizes[i] < 2 {
                continue;
            }
            sizes[i] = (sizes[i] as i64 + sign) as usize;
            delta -= sign;
            changed = true;
        }
        if !changed {
            return emergency_allocate(n, seed);
        }
    }
    sizes
}

/// Balancing failed to converge: zero everything, pick 15 distinct child
/// entries uniformly at random (seeded by the round), plus the own-sketch
/// entry (always the last one), each getting one sample slot.
fn emergency_allocate(n: usize, seed: u64) -> Vec<usize> {
    let mut sizes = vec![0usize; n];
    let child_count = n - 1;
    if child_count > 0 {
        let mut rng = StdRng::seed_from_u64(seed);
        let k = 15.min(child_count);
        let chosen = rand::seq::index::sample(&mut rng, child_count, k);
        for i in chosen.iter() {
            sizes[i] = 1;
        }
    }
    sizes[n - 1] = 1;
    sizes
}

/// Draws, for each entry with a nonzero allocation and nonzero weight,
/// `sizes[i]` bytes without replacement from that entry's sorted byte
/// multiset, concatenated in entry order (spec.md §4.1 step 6). The PRNG
/// is re-seeded with `seed` before every entry's draw, per spec.md §9's
/// reproducibility discipline.
fn draw_samples(entries: &[Entry], sizes: &[usize], seed: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(HASH_SIZE);
    for (i, (weight, bytes)) in entries.iter().enumerate() {
        let want = sizes[i];
        if want == 0 || *weight == 0 || bytes.is_empty() {
            continue;
        }
        let mut sorted = bytes.clone();
        sorted.sort_unstable();

        let mut rng = StdRng::seed_from_u64(seed);
        let take = want.min(sorted.len());
        let picked = rand::seq::index::sample(&mut rng, sorted.len(), take);
        for idx in picked.iter() {
            out.push(sorted[idx]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AstNode, Position};

    fn leaf(token: &str, roles: Vec<u32>, line: u32) -> AstNode {
        AstNode {
            token: token.as_bytes().to_vec(),
            roles,
            start: Position { line, col: 0, offset: 0 },
            end: Position { line, col: token.len() as u32, offset: token.len() as u32 },
            children: vec![],
        }
    }

    #[test]
    fn identical_subtrees_produce_identical_fingerprints() {
        let child = leaf("x", vec![], 1);
        let ast = Ast::new(vec![child], NodeId(0));
        let whitelist: HashSet<NodeId> = [NodeId(0)].into_iter().collect();

        let a = sketch(&ast, 0, &whitelist);
        let b = sketch(&ast, 0, &whitelist);
        assert_eq!(a.get(&NodeId(0)), b.get(&NodeId(0)));
        assert_eq!(a.get(&NodeId(0)).unwrap().len(), HASH_SIZE);
    }

    #[test]
    fn positionless_node_is_never_recorded() {
        let mut node = leaf("x", vec![], 1);
        node.start = Position::NONE;
        let ast = Ast::new(vec![node], NodeId(0));
        let whitelist: HashSet<NodeId> = [NodeId(0)].into_iter().collect();

        let map = sketch(&ast, 0, &whitelist);
        assert!(map.is_empty());
    }

    #[test]
    fn node_outside_whitelist_is_never_recorded() {
        let ast = Ast::new(vec![leaf("x", vec![], 1)], NodeId(0));
        let whitelist: HashSet<NodeId> = HashSet::new();

        let map = sketch(&ast, 0, &whitelist);
        assert!(map.is_empty());
    }

    #[test]
    fn internal_node_fingerprint_is_full_length() {
        let a = leaf("a", vec![], 1);
        let b = leaf("b", vec![], 2);
        let parent = AstNode {
            token: vec![],
            roles: vec![],
            start: Position { line: 1, col: 0, offset: 0 },
            end: Position { line: 2, col: 1, offset: 3 },
            children: vec![NodeId(1), NodeId(2)],
        };
        let ast = Ast::new(vec![parent, a, b], NodeId(0));
        let whitelist: HashSet<NodeId> = [NodeId(0), NodeId(1), NodeId(2)].into_iter().collect();

        let map = sketch(&ast, 3, &whitelist);
        assert_eq!(map.get(&NodeId(0)).unwrap().len(), HASH_SIZE);
        assert_eq!(map.get(&NodeId(1)).unwrap().len(), HASH_SIZE);
        assert_eq!(map.get(&NodeId(2)).unwrap().len(), HASH_SIZE);
    }
}
