//! Selection of the import statements eligible for sorting.
//!
//! Only top-level imports are selected. Imports nested in an ambient module
//! declaration (`declare module "x" { import ... }`) belong to that module's
//! namespace and are left alone by both sorting and reassembly.

use crate::ast::{Comment, Node, Program, Statement};
use crate::text::safe_offset;

/// Leading comment that turns sorting off for a file.
pub const IGNORE_DIRECTIVE: &str = "sort-imports-ignore";

/// Top-level import statements in document order.
pub fn select_import_statements(program: &Program) -> impl Iterator<Item = &Statement> + '_ {
    program.body.iter().filter_map(|node| match node {
        Node::Import(stmt) => Some(stmt),
        Node::Module(_) | Node::Other(_) => None,
    })
}

/// Offset where the sorted import block is spliced in.
///
/// The first leading comment of the first node if its offset is usable,
/// otherwise the node's own start, otherwise 0.
pub fn inject_offset(program: &Program) -> usize {
    let Some(first) = program.body.first() else {
        return 0;
    };
    first
        .leading_comments()
        .first()
        .and_then(|c| safe_offset(c.start))
        .or_else(|| first.start())
        .unwrap_or(0)
}

pub fn is_ignore_comment(comment: &Comment) -> bool {
    comment.value.trim_start().starts_with(IGNORE_DIRECTIVE)
}

/// True when the first node or any selected import carries the ignore directive.
pub fn has_ignore_directive(program: &Program) -> bool {
    let first = program
        .body
        .first()
        .map(|node| node.leading_comments())
        .unwrap_or_default();
    first.iter().any(is_ignore_comment)
        || select_import_statements(program)
            .flat_map(|stmt| stmt.leading_comments.iter())
            .any(is_ignore_comment)
}
