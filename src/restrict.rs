// src/restrict.rs
//! Restriction stage (spec.md §4.4): collapses the adjusted line
//! intervals on each side into the set of nodes eligible for matching.

use crate::line_index::LineIndex;
use crate::node::NodeId;
use crate::text_diff::Interval;
use std::collections::HashSet;

/// The union of `nodes_in_open_interval(start, end)` over every interval,
/// for one side of the diff.
#[must_use]
pub fn whitelist_before(intervals: &[Interval], before_index: &LineIndex) -> HashSet<NodeId> {
    let mut set = HashSet::new();
    for interval in intervals {
        set.extend(before_index.nodes_in_open_interval(interval.start_before, interval.end_before));
    }
    set
}

#[must_use]
pub fn whitelist_after(intervals: &[Interval], after_index: &LineIndex) -> HashSet<NodeId> {
    let mut set = HashSet::new();
    for interval in intervals {
        set.extend(after_index.nodes_in_open_interval(interval.start_after, interval.end_after));
    }
    set
}

/// If either whitelist is empty, the assignment stage is skipped entirely
/// and the script is a pure add-all or delete-all (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuit {
    /// Both sides have candidate nodes; run the full pipeline.
    None,
    /// Before-whitelist empty: every after-node is an addition.
    AddAll,
    /// After-whitelist empty: every before-node is a deletion.
    DeleteAll,
}

#[must_use]
pub fn short_circuit(before: &HashSet<NodeId>, after: &HashSet<NodeId>) -> ShortCircuit {
    match (before.is_empty(), after.is_empty()) {
        (true, false) => ShortCircuit::AddAll,
        (false, true) => ShortCircuit::DeleteAll,
        _ => ShortCircuit::None,
    }
}
