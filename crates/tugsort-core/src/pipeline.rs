//! The per-file sort pipeline.
//!
//! ```text
//! exclude glob -> ignore directive -> select -> validate -> order -> render
//!     -> removal ranges -> overlap check -> reassemble
//! ```
//!
//! Removal covers every selected import together with its leading comments,
//! the line terminator after the statement, and whitespace-only gaps between
//! consecutive removed pieces. The rendered block goes in at
//! [`inject_offset`], so a file that is already sorted comes back unchanged.
//!
//! An import with comments inside its text keeps its binding order even when
//! specifier sorting is on, so no comment is lost by regeneration.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::{Program, Statement};
use crate::error::{SortError, SortResult};
use crate::names::{module_names, specifier_names};
use crate::options::CompiledOptions;
use crate::order::{self, order_imports};
use crate::render::{render_block, RenderStyle};
use crate::select::{has_ignore_directive, inject_offset, select_import_statements};
use crate::splice::{find_overlaps, reassemble, Range};
use crate::text::{
    byte_offset_to_position, contains_comment, detect_line_ending, extract_span,
    line_terminator_len, Span,
};

/// Why a file was returned untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The path matched an exclude glob.
    Excluded,
    /// A `sort-imports-ignore` comment was found.
    IgnoreDirective,
    /// No top-level imports.
    NoImports,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Excluded => "excluded",
            SkipReason::IgnoreDirective => "ignore_directive",
            SkipReason::NoImports => "no_imports",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of sorting one file.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome {
    /// The complete new file text.
    pub code: String,
    pub changed: bool,
    pub skipped: Option<SkipReason>,
    /// Module paths in sorted order.
    pub modules: Vec<String>,
    /// Binding names in sorted order.
    pub specifiers: Vec<String>,
}

impl SortOutcome {
    fn unchanged(code: &str, reason: SkipReason) -> Self {
        SortOutcome {
            code: code.to_string(),
            changed: false,
            skipped: Some(reason),
            modules: Vec::new(),
            specifiers: Vec::new(),
        }
    }
}

/// Sort the imports of `code`, whose parse is `program`.
///
/// `path` is only used for exclude globs.
pub fn sort_imports(
    code: &str,
    program: &Program,
    options: &CompiledOptions,
    path: Option<&Path>,
) -> SortResult<SortOutcome> {
    if let Some(path) = path.filter(|p| options.is_excluded(p)) {
        debug!("Skipping excluded file {}", path.display());
        return Ok(SortOutcome::unchanged(code, SkipReason::Excluded));
    }
    if has_ignore_directive(program) {
        debug!("Skipping file with sort-imports-ignore directive");
        return Ok(SortOutcome::unchanged(code, SkipReason::IgnoreDirective));
    }

    let mut selected: Vec<Statement> = select_import_statements(program).cloned().collect();
    if selected.is_empty() {
        return Ok(SortOutcome::unchanged(code, SkipReason::NoImports));
    }
    for stmt in &mut selected {
        validate_statement(code, stmt)?;
        if extract_span(code, &stmt.span()).is_some_and(contains_comment) {
            stmt.inner_comments = true;
        }
        if stmt.inner_comments && options.sort_specifiers {
            warn!(
                "Keeping specifier order of import '{}': it contains comments",
                stmt.source
            );
        }
    }

    let removal = removal_spans(code, &selected)?;
    let count = selected.len();
    let entries = order_imports(selected, options);
    let placed = order::statements(&entries).count();
    if placed != count {
        return Err(SortError::internal(format!(
            "ordering placed {} of {} imports",
            placed, count
        )));
    }

    let line_ending = detect_line_ending(code);
    let style = RenderStyle {
        line_ending,
        attributes_keyword: options.attributes_keyword,
    };
    let mut block = render_block(code, &entries, style);

    // Keep a missing final newline missing when the block ends the file.
    let offset = inject_offset(program);
    if !code.ends_with('\n')
        && ends_output(&removal, offset, code.len())
        && block.ends_with(line_ending)
    {
        block.truncate(block.len() - line_ending.len());
    }

    let ranges: Vec<Range> = removal.iter().copied().map(Range::from_span).collect();
    let new_code = reassemble(code, &ranges, Some(&block), offset);

    let sorted: Vec<&Statement> = order::statements(&entries).collect();
    let modules = module_names(sorted.iter().copied()).map(str::to_string).collect();
    let specifiers = specifier_names(sorted.iter().copied()).map(str::to_string).collect();
    let changed = new_code != code;
    debug!(
        "Sorted {} imports ({} removal ranges, inject at {}), changed: {}",
        entries.len(),
        ranges.len(),
        offset,
        changed
    );

    Ok(SortOutcome {
        code: new_code,
        changed,
        skipped: None,
        modules,
        specifiers,
    })
}

/// True when every byte from `offset` to `len` is removed, so nothing follows
/// the injected block.
fn ends_output(removal: &[Span], offset: usize, len: usize) -> bool {
    let mut cursor = offset;
    for span in removal {
        if span.end <= cursor {
            continue;
        }
        if span.start > cursor {
            return false;
        }
        cursor = span.end;
    }
    cursor >= len
}

fn validate_statement(code: &str, stmt: &Statement) -> SortResult<()> {
    let in_bounds = stmt.start <= stmt.end
        && stmt.end <= code.len()
        && code.is_char_boundary(stmt.start)
        && code.is_char_boundary(stmt.end);
    if in_bounds {
        return Ok(());
    }
    Err(SortError::invalid_ast(format!(
        "import '{}' at [{}, {}) does not fit the {}-byte source",
        stmt.source,
        stmt.start,
        stmt.end,
        code.len()
    )))
}

/// Sorted, non-overlapping spans to delete from `code`.
fn removal_spans(code: &str, statements: &[Statement]) -> SortResult<Vec<Span>> {
    let mut spans = Vec::new();
    for stmt in statements {
        let before = spans.len();
        spans.extend(stmt.comment_spans(code));
        let skipped = stmt.leading_comments.len() - (spans.len() - before);
        if skipped > 0 {
            warn!(
                "Leaving {} comment(s) with unusable offsets in place (import '{}')",
                skipped, stmt.source
            );
        }
        let end = stmt.end + line_terminator_len(code, stmt.end);
        spans.push(Span::new(stmt.start, end));
    }
    spans.sort();
    spans.dedup();

    let ranges: Vec<Range> = spans.iter().copied().map(Range::from_span).collect();
    if let Some((first, second)) = find_overlaps(code, &ranges).into_iter().next() {
        let (line, _) = byte_offset_to_position(code, second.start);
        return Err(SortError::OverlappingRanges {
            first,
            second,
            line,
        });
    }

    let gaps: Vec<Span> = spans
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let gap = code.get(a.end..b.start)?;
            (a.end < b.start && gap.chars().all(char::is_whitespace)).then(|| Span::new(a.end, b.start))
        })
        .collect();
    spans.extend(gaps);
    spans.sort();
    Ok(spans)
}

// ============================================================================
// Tests
// ============================================================================
