// src/sink.rs
//! Serializes the classified edit script to the JSON record spec.md §6
//! describes: `src_before`, `src_after`, and an ordered `script` array.
//! FILE-role nodes are silently dropped; positionless nodes are dropped
//! with an unconditional warning, following the teacher's plain
//! `eprintln!`-based diagnostics rather than a logging framework.

use crate::error::AnyResult;
use crate::node::{Ast, NodeId, Position, ROLE_FILE};
use crate::script::Op;
use anyhow::Context;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn position_json(pos: &Position) -> Value {
    json!({ "line": pos.line, "col": pos.col, "offset": pos.offset })
}

/// `None` if the node should be excluded (FILE role, or no position —
/// the latter always logged as a warning).
fn node_span(ast: &Ast, id: NodeId) -> Option<(Value, Value)> {
    let node = ast.get(id);
    if node.has_role(ROLE_FILE) {
        return None;
    }
    if !node.start.has_position() {
        eprintln!("warning: node {} has no position, excluded from script", id.0);
        return None;
    }
    Some((position_json(&node.start), position_json(&node.end)))
}

/// Writes the final record to `output_path`.
pub fn write_script(
    output_path: &Path,
    src_before: &str,
    src_after: &str,
    before_ast: &Ast,
    after_ast: &Ast,
    ops: &[Op],
) -> AnyResult<()> {
    let mut script = Vec::with_capacity(ops.len());

    for op in ops {
        match op {
            Op::Delete(id) => {
                if let Some((start, end)) = node_span(before_ast, *id) {
                    script.push(json!(["delete", start, end]));
                }
            }
            Op::Add(id) => {
                if let Some((start, end)) = node_span(after_ast, *id) {
                    script.push(json!(["add", start, end]));
                }
            }
            Op::Modify(before_id, after_id) => {
                let before_span = node_span(before_ast, *before_id);
                let after_span = node_span(after_ast, *after_id);
                if let (Some((bs, be)), Some((as_, ae))) = (before_span, after_span) {
                    script.push(json!(["modify", { "before": [bs, be], "after": [as_, ae] }]));
                }
            }
        }
    }

    let record = json!({
        "src_before": src_before,
        "src_after": src_after,
        "script": script,
    });

    let rendered = serde_json::to_string_pretty(&record).context("serializing diff record")?;
    fs::write(output_path, rendered)
        .with_context(|| format!("writing output to {}", output_path.display()))?;
    Ok(())
}
