//! Arranging selected imports into the final block layout.
//!
//! Imports are split into chunks, bucketed into the configured groups, and
//! each group is sorted. The result is a flat list of imports and blank-line
//! separators that [`crate::render`] turns into text.
//!
//! ## Chunks
//!
//! With `side_effects` enabled every import is sortable and there is a single
//! chunk. Otherwise each side-effect import (`import "./polyfill"`) is a
//! barrier: it stays in place and the imports between barriers are sorted on
//! their own, so nothing moves across a side-effect import.

use crate::ast::Statement;
use crate::group::sort_group;
use crate::options::CompiledOptions;
use crate::specifiers::sort_specifiers;

/// An import in its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedImport {
    pub statement: Statement,
    /// The specifier order differs from the source text.
    pub reordered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Import(OrderedImport),
    /// Blank line between groups.
    Separator,
}

impl Entry {
    pub fn as_import(&self) -> Option<&OrderedImport> {
        match self {
            Entry::Import(import) => Some(import),
            Entry::Separator => None,
        }
    }
}

/// Split `statements` at side-effect barriers.
///
/// Returns `(barrier, run)` pairs in document order where `barrier` marks a
/// single side-effect import that must stay in place.
fn chunks(statements: Vec<Statement>, side_effects: bool) -> Vec<(bool, Vec<Statement>)> {
    if side_effects {
        return vec![(false, statements)];
    }
    let mut out: Vec<(bool, Vec<Statement>)> = Vec::new();
    for stmt in statements {
        if stmt.is_side_effect() {
            out.push((true, vec![stmt]));
            continue;
        }
        match out.last_mut() {
            Some((false, run)) => run.push(stmt),
            _ => out.push((false, vec![stmt])),
        }
    }
    out
}

/// Bucket one sortable chunk into groups and sort each group.
fn sorted_groups(chunk: Vec<Statement>, options: &CompiledOptions) -> Vec<Vec<OrderedImport>> {
    let mut buckets: Vec<Vec<Statement>> = vec![Vec::new(); options.groups().len()];
    for stmt in chunk {
        let index = options.group_index(&stmt.source);
        buckets[index].push(stmt);
    }

    let order = options.config.natural_order();
    buckets
        .into_iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|mut bucket| {
            sort_group(&mut bucket, &options.config);
            bucket
                .into_iter()
                .map(|mut statement| {
                    let reordered = options.sort_specifiers
                        && !statement.inner_comments
                        && sort_specifiers(&mut statement, order);
                    OrderedImport {
                        statement,
                        reordered,
                    }
                })
                .collect()
        })
        .collect()
}

/// Lay out `statements` (document order) per `options`.
pub fn order_imports(statements: Vec<Statement>, options: &CompiledOptions) -> Vec<Entry> {
    let mut groups: Vec<Vec<OrderedImport>> = Vec::new();
    for (barrier, run) in chunks(statements, options.side_effects) {
        if barrier {
            groups.push(
                run.into_iter()
                    .map(|statement| OrderedImport {
                        statement,
                        reordered: false,
                    })
                    .collect(),
            );
        } else {
            groups.extend(sorted_groups(run, options));
        }
    }

    let mut entries = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 && options.separation {
            entries.push(Entry::Separator);
        }
        entries.extend(group.into_iter().map(Entry::Import));
    }
    entries
}

/// The statements of `entries` in output order.
pub fn statements(entries: &[Entry]) -> impl Iterator<Item = &Statement> {
    entries
        .iter()
        .filter_map(Entry::as_import)
        .map(|import| &import.statement)
}
