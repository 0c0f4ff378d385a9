//! Rendering the ordered imports back to source text.
//!
//! Statements whose bindings kept their order are copied verbatim from the
//! original code. Statements with re-ordered bindings are regenerated,
//! keeping the declaration kind, quote style, semicolon and import
//! attributes of the original. A binding list written over several lines
//! stays one binding per line with the original indentation.

use crate::ast::{ImportKind, Specifier, SpecifierKind, Statement};
use crate::options::AttributesKeyword;
use crate::order::{Entry, OrderedImport};
use crate::text::{extract_span, Span};

/// Formatting choices shared by every rendered line.
#[derive(Debug, Clone, Copy)]
pub struct RenderStyle<'a> {
    pub line_ending: &'a str,
    pub attributes_keyword: AttributesKeyword,
}

/// Render `entries` as one block. Every line, the last included, ends with
/// `style.line_ending`.
///
/// Statement spans must already be validated against `code`. Only leading
/// comments with usable spans are emitted.
pub fn render_block(code: &str, entries: &[Entry], style: RenderStyle<'_>) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            Entry::Separator => out.push_str(style.line_ending),
            Entry::Import(import) => {
                render_import(&mut out, code, import, style);
                out.push_str(style.line_ending);
            }
        }
    }
    out
}

fn render_import(out: &mut String, code: &str, import: &OrderedImport, style: RenderStyle<'_>) {
    let stmt = &import.statement;
    let comments: Vec<Span> = stmt.comment_spans(code).collect();

    for (i, span) in comments.iter().enumerate() {
        out.push_str(extract_span(code, span).unwrap_or_default());
        let next = comments.get(i + 1).map_or(stmt.start, |s| s.start);
        let gap = code.get(span.end..next).unwrap_or_default();
        if gap.chars().all(char::is_whitespace) && span.end <= next {
            out.push_str(gap);
        } else {
            out.push_str(style.line_ending);
        }
    }

    let original = &code[stmt.start..stmt.end];
    if import.reordered {
        out.push_str(&regenerate(stmt, original, style.attributes_keyword));
    } else {
        out.push_str(original);
    }
}

/// Quote character of the module path in `original`, `"` when unknown.
fn quote_style(original: &str, source: &str) -> char {
    let single = format!("'{}'", source);
    let double = format!("\"{}\"", source);
    match (original.rfind(&single), original.rfind(&double)) {
        (Some(s), Some(d)) if s > d => '\'',
        (Some(_), None) => '\'',
        _ => '"',
    }
}

fn quoted(value: &str, quote: char) -> String {
    let quote = if value.contains(quote) {
        if quote == '"' {
            '\''
        } else {
            '"'
        }
    } else {
        quote
    };
    format!("{quote}{value}{quote}")
}

fn specifier_text(spec: &Specifier) -> String {
    let prefix = if spec.type_only { "type " } else { "" };
    match &spec.imported_name {
        Some(imported) => format!("{prefix}{imported} as {}", spec.local_name),
        None => format!("{prefix}{}", spec.local_name),
    }
}

/// Layout of a `{ ... }` binding list that spans several lines.
#[derive(Debug, PartialEq)]
struct MultiLine<'a> {
    line_ending: &'a str,
    indent: &'a str,
    close_indent: &'a str,
    trailing_comma: bool,
}

/// The first brace pair of `original` holds the named bindings.
fn multi_line_layout(original: &str) -> Option<MultiLine<'_>> {
    let open = original.find('{')?;
    let close = open + original[open..].find('}')?;
    let inner = &original[open + 1..close];
    if !inner.contains('\n') {
        return None;
    }
    let first = inner.split('\n').nth(1)?;
    let indent = &first[..first.len() - first.trim_start().len()];
    let last = inner.rsplit('\n').next()?;
    Some(MultiLine {
        line_ending: if inner.contains("\r\n") { "\r\n" } else { "\n" },
        indent,
        close_indent: if last.trim().is_empty() { last } else { "" },
        trailing_comma: inner.trim_end().ends_with(','),
    })
}

fn named_list(named: &[String], layout: Option<MultiLine<'_>>) -> String {
    let Some(layout) = layout else {
        return format!("{{ {} }}", named.join(", "));
    };
    let mut text = String::from("{");
    for (i, name) in named.iter().enumerate() {
        text.push_str(layout.line_ending);
        text.push_str(layout.indent);
        text.push_str(name);
        if i + 1 < named.len() || layout.trailing_comma {
            text.push(',');
        }
    }
    text.push_str(layout.line_ending);
    text.push_str(layout.close_indent);
    text.push('}');
    text
}

/// Source text for `stmt` in the layout of `original`.
pub fn regenerate(stmt: &Statement, original: &str, keyword: AttributesKeyword) -> String {
    let quote = quote_style(original, &stmt.source);
    let mut text = String::from("import ");
    match stmt.import_kind {
        ImportKind::Value => {}
        ImportKind::Type => text.push_str("type "),
        ImportKind::Typeof => text.push_str("typeof "),
    }

    let mut parts: Vec<String> = Vec::new();
    for spec in &stmt.specifiers {
        if spec.kind == SpecifierKind::Default {
            parts.push(spec.local_name.clone());
        }
    }
    for spec in &stmt.specifiers {
        if spec.kind == SpecifierKind::NamespaceAll {
            parts.push(format!("* as {}", spec.local_name));
        }
    }
    let named: Vec<String> = stmt
        .specifiers
        .iter()
        .filter(|s| s.kind == SpecifierKind::Named)
        .map(specifier_text)
        .collect();
    if !named.is_empty() {
        parts.push(named_list(&named, multi_line_layout(original)));
    }

    if !parts.is_empty() {
        text.push_str(&format!("{} from ", parts.join(", ")));
    }
    text.push_str(&quoted(&stmt.source, quote));

    if !stmt.attributes.is_empty() {
        let attributes: Vec<String> = stmt
            .attributes
            .iter()
            .map(|a| format!("{}: {}", a.key, quoted(&a.value, quote)))
            .collect();
        text.push_str(&format!(" {} {{ {} }}", keyword, attributes.join(", ")));
    }

    if original.trim_end().ends_with(';') {
        text.push(';');
    }
    text
}
