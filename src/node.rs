// src/node.rs
//! The external AST contract the core consumes.
//!
//! Everything downstream of this module treats a parsed tree as immutable:
//! a `token`, an ordered `roles` list, a source position range, and ordered
//! `children`. Identity is not structural equality — two nodes with the
//! same token and children are still distinct nodes, which is why callers
//! must go through [`Ast`]'s pre-order [`NodeId`] assignment rather than
//! comparing `AstNode` values directly.

use serde::{Deserialize, Serialize};

/// A small integer tag describing a node's syntactic role (identifier,
/// function, file, ...). Only the role named `FILE` is meaningful to the
/// core; everything else is opaque.
pub const ROLE_FILE: u32 = 0;

/// A source position. `line` is 1-based; `line == 0` means "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
    pub offset: u32,
}

impl Position {
    pub const NONE: Position = Position { line: 0, col: 0, offset: 0 };

    #[must_use]
    pub fn has_position(&self) -> bool {
        self.line > 0
    }
}

/// Stable integer identity for a node within one [`Ast`], assigned once by
/// a pre-order walk (spec §9: "Node identity across rounds").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// One node's own data, independent of its position in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstNode {
    pub token: Vec<u8>,
    pub roles: Vec<u32>,
    pub start: Position,
    pub end: Position,
    pub children: Vec<NodeId>,
}

impl AstNode {
    #[must_use]
    pub fn has_role(&self, role: u32) -> bool {
        self.roles.contains(&role)
    }
}

/// An immutable arena-backed AST. `nodes[id.0]` is always valid for every
/// `NodeId` reachable from `root` — the arena is built once (by
/// [`Ast::from_preorder`] or the tree-sitter frontend) and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<AstNode>,
    pub root: NodeId,
}

impl Ast {
    #[must_use]
    pub fn new(nodes: Vec<AstNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn token_str(&self, id: NodeId) -> &str {
        std::str::from_utf8(&self.get(id).token).unwrap_or("")
    }

    /// Pre-order iterator over every `NodeId` reachable from `root`.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.get(id);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
            Some(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(token: &str) -> AstNode {
        AstNode {
            token: token.as_bytes().to_vec(),
            roles: vec![],
            start: Position { line: 1, col: 0, offset: 0 },
            end: Position { line: 1, col: token.len() as u32, offset: token.len() as u32 },
            children: vec![],
        }
    }

    #[test]
    fn preorder_visits_parent_before_children() {
        let child = leaf("x");
        let parent = AstNode {
            token: vec![],
            roles: vec![],
            start: Position::NONE,
            end: Position::NONE,
            children: vec![NodeId(1)],
        };
        let ast = Ast::new(vec![parent, child], NodeId(0));
        let order: Vec<_> = ast.preorder().collect();
        assert_eq!(order, vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn position_none_has_no_position() {
        assert!(!Position::NONE.has_position());
        assert!(Position { line: 1, col: 0, offset: 0 }.has_position());
    }
}
