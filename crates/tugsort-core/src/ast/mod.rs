//! Parsed-program data model.
//!
//! tugsort does not parse source text. An external parser supplies the
//! program as data (see [`raw`] for the accepted JSON shape) and the boundary
//! classifies its open-ended node tags into the closed enums below:
//!
//! - [`Node`]: `Import`, ambient `Module` declarations, and everything `Other`
//! - [`SpecifierKind`]: `Default`, `Named`, `NamespaceAll`
//!
//! Statement offsets are validated at the boundary and are plain `usize`
//! byte offsets from then on. Comment offsets stay raw (`f64`) because they
//! flow into reassembly ranges, which filter unsafe values themselves.

pub mod raw;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SortResult;
use crate::text::{safe_span, Span};

// ============================================================================
// Specifiers
// ============================================================================

/// The kind of binding a specifier introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierKind {
    /// `import React from "react"`
    Default,
    /// `import { useState } from "react"`
    Named,
    /// `import * as path from "path"`
    NamespaceAll,
}

impl SpecifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecifierKind::Default => "default",
            SpecifierKind::Named => "named",
            SpecifierKind::NamespaceAll => "namespace_all",
        }
    }
}

impl fmt::Display for SpecifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One imported binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    pub kind: SpecifierKind,
    /// Name bound in the importing module.
    pub local_name: String,
    /// Exported name when it differs from `local_name` (`{ a as b }`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_name: Option<String>,
    /// `{ type T }` inside a value import.
    #[serde(default)]
    pub type_only: bool,
}

impl Specifier {
    fn new(kind: SpecifierKind, local_name: impl Into<String>) -> Self {
        Specifier {
            kind,
            local_name: local_name.into(),
            imported_name: None,
            type_only: false,
        }
    }

    pub fn default_import(local_name: impl Into<String>) -> Self {
        Specifier::new(SpecifierKind::Default, local_name)
    }

    pub fn named(local_name: impl Into<String>) -> Self {
        Specifier::new(SpecifierKind::Named, local_name)
    }

    pub fn namespace(local_name: impl Into<String>) -> Self {
        Specifier::new(SpecifierKind::NamespaceAll, local_name)
    }

    /// Set the exported name (`imported as local`).
    pub fn with_imported(mut self, imported_name: impl Into<String>) -> Self {
        self.imported_name = Some(imported_name.into());
        self
    }

    pub fn with_type_only(mut self) -> Self {
        self.type_only = true;
        self
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// `// value`
    Line,
    /// `/* value */`
    Block,
}

/// A comment attached before a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment text without delimiters.
    pub value: String,
    /// Raw start offset as reported by the parser.
    pub start: f64,
    /// Raw end offset as reported by the parser.
    pub end: f64,
}

impl Comment {
    pub fn line(value: impl Into<String>, start: usize, end: usize) -> Self {
        Comment {
            kind: CommentKind::Line,
            value: value.into(),
            start: start as f64,
            end: end as f64,
        }
    }

    pub fn block(value: impl Into<String>, start: usize, end: usize) -> Self {
        Comment {
            kind: CommentKind::Block,
            value: value.into(),
            start: start as f64,
            end: end as f64,
        }
    }

    /// The comment's span in `code`, if its offsets are usable.
    pub fn span_in(&self, code: &str) -> Option<Span> {
        safe_span(code, self.start, self.end)
    }

}

// ============================================================================
// Statements
// ============================================================================

/// `import` vs `import type` vs `import typeof`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    #[default]
    Value,
    Type,
    Typeof,
}

/// An import attribute such as `type: "json"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAttribute {
    pub key: String,
    pub value: String,
}

/// One import declaration and its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Module path string value.
    pub source: String,
    pub specifiers: Vec<Specifier>,
    #[serde(default)]
    pub import_kind: ImportKind,
    #[serde(default)]
    pub attributes: Vec<ImportAttribute>,
    #[serde(default)]
    pub leading_comments: Vec<Comment>,
    /// Comments sit inside the statement text, so its specifiers keep their
    /// written order.
    #[serde(default)]
    pub inner_comments: bool,
}

impl Statement {
    /// Create a statement with no specifiers (a side-effect import).
    pub fn new(start: usize, end: usize, source: impl Into<String>) -> Self {
        Statement {
            start,
            end,
            source: source.into(),
            specifiers: Vec::new(),
            import_kind: ImportKind::Value,
            attributes: Vec::new(),
            leading_comments: Vec::new(),
            inner_comments: false,
        }
    }

    pub fn with_specifier(mut self, specifier: Specifier) -> Self {
        self.specifiers.push(specifier);
        self
    }

    pub fn with_import_kind(mut self, kind: ImportKind) -> Self {
        self.import_kind = kind;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(ImportAttribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.leading_comments.push(comment);
        self
    }

    pub fn with_inner_comments(mut self) -> Self {
        self.inner_comments = true;
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Textual span length, `end - start`.
    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// `import "./polyfill"`: no bindings.
    pub fn is_side_effect(&self) -> bool {
        self.specifiers.is_empty()
    }

    /// Spans of the leading comments that are usable in `code` and end
    /// before the statement starts.
    pub fn comment_spans<'a>(&'a self, code: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.leading_comments
            .iter()
            .filter_map(move |c| c.span_in(code))
            .filter(move |span| span.end <= self.start)
    }

    pub fn has_namespace_specifier(&self) -> bool {
        self.specifiers
            .iter()
            .any(|s| s.kind == SpecifierKind::NamespaceAll)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// An ambient module declaration (`declare module "x" { ... }`).
///
/// Imports inside it belong to another namespace and are never sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub body: Vec<Node>,
    #[serde(default)]
    pub leading_comments: Vec<Comment>,
}

/// Any other top-level node. Only its position and comments matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherNode {
    /// The parser's node type, kept for diagnostics.
    pub kind: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
    #[serde(default)]
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Import(Statement),
    Module(ModuleDeclaration),
    Other(OtherNode),
}

impl Node {
    pub fn start(&self) -> Option<usize> {
        match self {
            Node::Import(stmt) => Some(stmt.start),
            Node::Module(module) => module.start,
            Node::Other(other) => other.start,
        }
    }

    pub fn leading_comments(&self) -> &[Comment] {
        match self {
            Node::Import(stmt) => &stmt.leading_comments,
            Node::Module(module) => &module.leading_comments,
            Node::Other(other) => &other.leading_comments,
        }
    }
}

/// A parsed program: its top-level nodes in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    pub fn new(body: Vec<Node>) -> Self {
        Program { body }
    }

    /// Classify a parser's JSON output (see [`raw`]).
    pub fn from_json(json: &str) -> SortResult<Program> {
        raw::parse_program(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
