// src/frontend.rs
//! Turns real source files into the [`Ast`] the core consumes, using
//! tree-sitter grammars. This is ambient convenience for the CLI
//! (`treediff diff --before --after`) — the core algorithm never imports
//! this module and is equally happy fed an `Ast` built any other way
//! (e.g. deserialized from a `sequence_prefix` fixture). Mirrors the
//! teacher's own `Lang` enum in `lang.rs`.

use crate::error::{Result, TreeDiffError};
use crate::node::{Ast, AstNode, NodeId, Position, ROLE_FILE};
use tree_sitter::{Language, Node as TsNode, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Rust,
    Python,
    TypeScript,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "ts" | "tsx" | "js" | "jsx" => Some(Self::TypeScript),
            _ => None,
        }
    }

    #[must_use]
    pub fn grammar(self) -> Language {
        match self {
            Self::Rust => tree_sitter_rust::language(),
            Self::Python => tree_sitter_python::language(),
            Self::TypeScript => tree_sitter_typescript::language_typescript(),
        }
    }
}

/// Parses `source` as `lang` and lowers the tree-sitter tree into an
/// [`Ast`]. The root node is tagged with [`ROLE_FILE`] so the sink can
/// exclude it per spec.md §6.
pub fn parse(source: &str, lang: Lang) -> Result<Ast> {
    let mut parser = Parser::new();
    parser
        .set_language(lang.grammar())
        .map_err(|_| TreeDiffError::UnsupportedLanguage(format!("{lang:?}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TreeDiffError::UnsupportedLanguage(format!("{lang:?}")))?;

    let mut nodes = Vec::new();
    let root = lower(tree.root_node(), source.as_bytes(), &mut nodes, true);
    Ok(Ast::new(nodes, root))
}

fn lower(ts_node: TsNode, source: &[u8], nodes: &mut Vec<AstNode>, is_root: bool) -> NodeId {
    let token = if ts_node.child_count() == 0 {
        ts_node.utf8_text(source).unwrap_or("").as_bytes().to_vec()
    } else {
        Vec::new()
    };

    let roles = if is_root { vec![ROLE_FILE] } else { Vec::new() };

    let placeholder = AstNode {
        token,
        roles,
        start: position_of(ts_node.start_position(), ts_node.start_byte()),
        end: position_of(ts_node.end_position(), ts_node.end_byte()),
        children: Vec::new(),
    };
    let id = NodeId(nodes.len() as u32);
    nodes.push(placeholder);

    let mut cursor = ts_node.walk();
    let children: Vec<NodeId> = ts_node
        .children(&mut cursor)
        .map(|child| lower(child, source, nodes, false))
        .collect();
    nodes[id.0 as usize].children = children;

    id
}

fn position_of(point: tree_sitter::Point, byte: usize) -> Position {
    Position {
        line: point.row as u32 + 1,
        col: point.column as u32,
        offset: byte as u32,
    }
}
