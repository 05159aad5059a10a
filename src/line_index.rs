// src/line_index.rs
//! Line coverage index (spec.md §4.2). Maps each source line to the nodes
//! whose span covers it, then derives the "interior of a changed region"
//! query the restriction stage needs.

use crate::node::{Ast, NodeId};
use std::collections::{HashMap, HashSet};

pub struct LineIndex {
    by_line: HashMap<u32, HashSet<NodeId>>,
}

impl LineIndex {
    /// Builds the index from every node reachable in `ast` with a real
    /// position. A node spanning `[start.line, end.line]` is recorded on
    /// every line in that inclusive range.
    #[must_use]
    pub fn build(ast: &Ast) -> Self {
        let mut by_line: HashMap<u32, HashSet<NodeId>> = HashMap::new();
        for id in ast.preorder() {
            let node = ast.get(id);
            if !node.start.has_position() {
                continue;
            }
            for line in node.start.line..=node.end.line.max(node.start.line) {
                by_line.entry(line).or_default().insert(id);
            }
        }
        Self { by_line }
    }

    /// Every node whose span contains `line`.
    #[must_use]
    pub fn nodes_on(&self, line: u32) -> HashSet<NodeId> {
        self.by_line.get(&line).cloned().unwrap_or_default()
    }

    /// Nodes touching lines strictly inside the half-open interval
    /// `[start, end)`, excluding nodes that also cover the immediately
    /// surrounding lines `start - 1` and `end` (spec.md §4.2): start from
    /// `nodes_on(start)`, drop anything also on `start - 1`, union in every
    /// interior line `(start, end)`, then drop anything also on `end`.
    #[must_use]
    pub fn nodes_in_open_interval(&self, start: u32, end: u32) -> HashSet<NodeId> {
        let mut result = self.nodes_on(start);

        if start > 0 {
            let before = self.nodes_on(start - 1);
            result.retain(|id| !before.contains(id));
        }

        for line in (start + 1)..end {
            result.extend(self.nodes_on(line));
        }

        let after = self.nodes_on(end);
        result.retain(|id| !after.contains(id));

        result
    }
}
