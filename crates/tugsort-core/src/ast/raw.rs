//! JSON boundary: Babel-compatible parser output into [`Program`].
//!
//! Accepted shapes:
//!
//! ```json
//! {"type": "File", "program": {"type": "Program", "body": [...]}}
//! {"type": "Program", "body": [...]}
//! ```
//!
//! Recognised node types are `ImportDeclaration` and `TSModuleDeclaration`;
//! every other type becomes [`Node::Other`]. Specifier types outside
//! `ImportDefaultSpecifier`, `ImportSpecifier` and `ImportNamespaceSpecifier`
//! are rejected here so that no open-ended tag reaches the sorting code.

use serde::Deserialize;
use serde_json::Value;

use super::{
    Comment, CommentKind, ImportAttribute, ImportKind, ModuleDeclaration, Node, OtherNode,
    Program, Specifier, SpecifierKind, Statement,
};
use crate::error::{SortError, SortResult};
use crate::text::safe_offset;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRoot {
    File { program: RawProgram },
    Program(RawProgram),
}

#[derive(Debug, Deserialize)]
struct RawProgram {
    body: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImport {
    start: Option<f64>,
    end: Option<f64>,
    source: Option<RawLiteral>,
    specifiers: Option<Vec<RawSpecifier>>,
    import_kind: Option<String>,
    attributes: Option<Vec<RawAttribute>>,
    assertions: Option<Vec<RawAttribute>>,
    leading_comments: Option<Vec<RawComment>>,
    inner_comments: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModule {
    start: Option<f64>,
    end: Option<f64>,
    body: Option<Value>,
    leading_comments: Option<Vec<RawComment>>,
}

/// Position and comments of any other node; everything else is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOther {
    start: Option<f64>,
    end: Option<f64>,
    leading_comments: Option<Vec<RawComment>>,
}

#[derive(Debug, Deserialize)]
struct RawLiteral {
    value: String,
}

/// An `Identifier` (`name`) or a `StringLiteral` (`value`).
#[derive(Debug, Deserialize)]
struct RawName {
    name: Option<String>,
    value: Option<String>,
}

impl RawName {
    fn into_string(self) -> Option<String> {
        self.name.or(self.value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpecifier {
    #[serde(rename = "type")]
    kind: String,
    local: Option<RawName>,
    imported: Option<RawName>,
    import_kind: Option<String>,
    leading_comments: Option<Vec<Value>>,
    trailing_comments: Option<Vec<Value>>,
}

impl RawSpecifier {
    fn has_comments(&self) -> bool {
        [&self.leading_comments, &self.trailing_comments]
            .into_iter()
            .any(|comments| comments.as_ref().is_some_and(|c| !c.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    key: RawName,
    value: RawLiteral,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    start: Option<f64>,
    end: Option<f64>,
}

/// Parse and classify parser JSON output.
pub fn parse_program(json: &str) -> SortResult<Program> {
    let root: RawRoot = serde_json::from_str(json)?;
    let program = match root {
        RawRoot::File { program } | RawRoot::Program(program) => program,
    };
    let body = program
        .body
        .into_iter()
        .map(classify_node)
        .collect::<SortResult<Vec<_>>>()?;
    Ok(Program { body })
}

fn classify_node(value: Value) -> SortResult<Node> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SortError::invalid_ast("program node without a type"))?
        .to_string();
    match kind.as_str() {
        "ImportDeclaration" => classify_import(serde_json::from_value(value)?).map(Node::Import),
        "TSModuleDeclaration" => classify_module(serde_json::from_value(value)?).map(Node::Module),
        _ => {
            let raw: RawOther = serde_json::from_value(value)?;
            Ok(Node::Other(OtherNode {
                kind,
                start: raw.start.and_then(safe_offset),
                end: raw.end.and_then(safe_offset),
                leading_comments: classify_comments(raw.leading_comments)?,
            }))
        }
    }
}

fn classify_import(raw: RawImport) -> SortResult<Statement> {
    let (start, end) = match (
        raw.start.and_then(safe_offset),
        raw.end.and_then(safe_offset),
    ) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            return Err(SortError::invalid_ast(format!(
                "import declaration has unusable offsets (start: {:?}, end: {:?})",
                raw.start, raw.end
            )))
        }
    };
    let source = raw
        .source
        .ok_or_else(|| {
            SortError::invalid_ast(format!("import declaration at {} has no source", start))
        })?
        .value;

    let raw_specifiers = raw.specifiers.unwrap_or_default();
    let inner_comments = raw.inner_comments.is_some_and(|c| !c.is_empty())
        || raw_specifiers.iter().any(RawSpecifier::has_comments);
    let specifiers = raw_specifiers
        .into_iter()
        .map(classify_specifier)
        .collect::<SortResult<Vec<_>>>()?;

    let attributes = raw
        .attributes
        .or(raw.assertions)
        .unwrap_or_default()
        .into_iter()
        .map(|attr| {
            let key = attr
                .key
                .into_string()
                .ok_or_else(|| SortError::invalid_ast("import attribute without a key"))?;
            Ok(ImportAttribute {
                key,
                value: attr.value.value,
            })
        })
        .collect::<SortResult<Vec<_>>>()?;

    Ok(Statement {
        start,
        end,
        source,
        specifiers,
        import_kind: classify_import_kind(raw.import_kind.as_deref()),
        attributes,
        leading_comments: classify_comments(raw.leading_comments)?,
        inner_comments,
    })
}

fn classify_specifier(raw: RawSpecifier) -> SortResult<Specifier> {
    let kind = match raw.kind.as_str() {
        "ImportDefaultSpecifier" => SpecifierKind::Default,
        "ImportSpecifier" => SpecifierKind::Named,
        "ImportNamespaceSpecifier" => SpecifierKind::NamespaceAll,
        other => {
            return Err(SortError::invalid_ast(format!(
                "unknown specifier type '{}'",
                other
            )))
        }
    };
    let local_name = raw
        .local
        .and_then(RawName::into_string)
        .ok_or_else(|| SortError::invalid_ast(format!("{} without a local name", raw.kind)))?;
    let imported_name = raw
        .imported
        .and_then(RawName::into_string)
        .filter(|imported| *imported != local_name);

    Ok(Specifier {
        kind,
        local_name,
        imported_name,
        type_only: matches!(raw.import_kind.as_deref(), Some("type") | Some("typeof")),
    })
}

fn classify_import_kind(kind: Option<&str>) -> ImportKind {
    match kind {
        Some("type") => ImportKind::Type,
        Some("typeof") => ImportKind::Typeof,
        _ => ImportKind::Value,
    }
}

fn classify_module(raw: RawModule) -> SortResult<ModuleDeclaration> {
    let body = match raw.body {
        Some(body) => classify_module_body(body)?,
        None => Vec::new(),
    };
    Ok(ModuleDeclaration {
        start: raw.start.and_then(safe_offset),
        end: raw.end.and_then(safe_offset),
        body,
        leading_comments: classify_comments(raw.leading_comments)?,
    })
}

/// `TSModuleBlock { body: [...] }`, or a nested `TSModuleDeclaration` for
/// dotted namespaces (`declare namespace a.b { }`).
fn classify_module_body(body: Value) -> SortResult<Vec<Node>> {
    let nested = body.get("type").and_then(Value::as_str) == Some("TSModuleDeclaration");
    if nested {
        return Ok(vec![classify_node(body)?]);
    }
    match body {
        Value::Object(mut block) => match block.remove("body") {
            Some(Value::Array(items)) => items.into_iter().map(classify_node).collect(),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

fn classify_comments(raw: Option<Vec<RawComment>>) -> SortResult<Vec<Comment>> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|comment| {
            let kind = match comment.kind.as_str() {
                "CommentLine" => CommentKind::Line,
                "CommentBlock" => CommentKind::Block,
                other => {
                    return Err(SortError::invalid_ast(format!(
                        "unknown comment type '{}'",
                        other
                    )))
                }
            };
            Ok(Comment {
                kind,
                value: comment.value,
                // Missing offsets are carried as NaN and dropped at reassembly.
                start: comment.start.unwrap_or(f64::NAN),
                end: comment.end.unwrap_or(f64::NAN),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"{
        "type": "File",
        "program": {
            "type": "Program",
            "body": [
                {
                    "type": "ImportDeclaration",
                    "start": 0, "end": 36,
                    "importKind": "value",
                    "source": {"type": "StringLiteral", "value": "react"},
                    "specifiers": [
                        {"type": "ImportDefaultSpecifier", "local": {"type": "Identifier", "name": "React"}},
                        {"type": "ImportSpecifier",
                         "imported": {"type": "Identifier", "name": "useState"},
                         "local": {"type": "Identifier", "name": "useState"}}
                    ],
                    "leadingComments": [
                        {"type": "CommentLine", "value": " ui", "start": 0, "end": 5}
                    ]
                },
                {"type": "ExpressionStatement", "start": 37, "end": 40}
            ]
        }
    }"#;

    mod shapes {
        use super::*;

        #[test]
        fn file_wrapper() {
            let program = parse_program(SIMPLE).unwrap();
            assert_eq!(program.body.len(), 2);
            let Node::Import(stmt) = &program.body[0] else {
                panic!("expected import");
            };
            assert_eq!(stmt.source, "react");
            assert_eq!(stmt.span_len(), 36);
            assert_eq!(stmt.specifiers[0], Specifier::default_import("React"));
            // imported == local collapses to no alias
            assert_eq!(stmt.specifiers[1], Specifier::named("useState"));
            assert_eq!(stmt.leading_comments[0].kind, CommentKind::Line);
            assert!(matches!(&program.body[1], Node::Other(o) if o.kind == "ExpressionStatement"));
        }

        #[test]
        fn bare_program() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0, "end": 20,
                 "source": {"value": "./side-effect"}}
            ]}"#;
            let program = parse_program(json).unwrap();
            let Node::Import(stmt) = &program.body[0] else {
                panic!("expected import");
            };
            assert!(stmt.is_side_effect());
        }

        #[test]
        fn aliases_types_and_attributes() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0, "end": 60, "importKind": "type",
                 "source": {"value": "./data.json"},
                 "attributes": [{"key": {"name": "type"}, "value": {"value": "json"}}],
                 "specifiers": [
                    {"type": "ImportSpecifier", "importKind": "type",
                     "imported": {"type": "StringLiteral", "value": "a-b"},
                     "local": {"name": "ab"}},
                    {"type": "ImportNamespaceSpecifier", "local": {"name": "all"}}
                 ]}
            ]}"#;
            let program = parse_program(json).unwrap();
            let Node::Import(stmt) = &program.body[0] else {
                panic!("expected import");
            };
            assert_eq!(stmt.import_kind, ImportKind::Type);
            assert_eq!(stmt.attributes[0].key, "type");
            assert_eq!(stmt.attributes[0].value, "json");
            assert_eq!(
                stmt.specifiers[0],
                Specifier::named("ab").with_imported("a-b").with_type_only()
            );
            assert_eq!(stmt.specifiers[1].kind, SpecifierKind::NamespaceAll);
        }

        #[test]
        fn legacy_assertions() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0, "end": 40,
                 "source": {"value": "./x.json"},
                 "assertions": [{"key": {"name": "type"}, "value": {"value": "json"}}],
                 "specifiers": [{"type": "ImportDefaultSpecifier", "local": {"name": "x"}}]}
            ]}"#;
            let program = parse_program(json).unwrap();
            let Node::Import(stmt) = &program.body[0] else {
                panic!("expected import");
            };
            assert_eq!(stmt.attributes.len(), 1);
        }

        #[test]
        fn specifier_comments_mark_statement() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0, "end": 38,
                 "source": {"value": "x"},
                 "specifiers": [
                    {"type": "ImportSpecifier", "local": {"name": "b"},
                     "trailingComments": [{"type": "CommentLine", "value": " keep me"}]},
                    {"type": "ImportSpecifier", "local": {"name": "a"}, "leadingComments": []}
                 ]},
                {"type": "ImportDeclaration", "start": 39, "end": 59,
                 "source": {"value": "y"},
                 "specifiers": [{"type": "ImportSpecifier", "local": {"name": "y"}}]}
            ]}"#;
            let program = parse_program(json).unwrap();
            let flags: Vec<bool> = program
                .body
                .iter()
                .filter_map(|node| match node {
                    Node::Import(stmt) => Some(stmt.inner_comments),
                    _ => None,
                })
                .collect();
            assert_eq!(flags, vec![true, false]);
        }
    }

    mod modules {
        use super::*;

        #[test]
        fn ambient_module_imports_are_nested() {
            let json = r#"{"type": "Program", "body": [
                {"type": "TSModuleDeclaration", "start": 0, "end": 50,
                 "body": {"type": "TSModuleBlock", "body": [
                    {"type": "ImportDeclaration", "start": 20, "end": 40,
                     "source": {"value": "inner"}}
                 ]}}
            ]}"#;
            let program = parse_program(json).unwrap();
            let Node::Module(module) = &program.body[0] else {
                panic!("expected module");
            };
            assert!(matches!(&module.body[0], Node::Import(s) if s.source == "inner"));
        }

        #[test]
        fn dotted_namespace_nests_declarations() {
            let json = r#"{"type": "Program", "body": [
                {"type": "TSModuleDeclaration", "start": 0, "end": 30,
                 "body": {"type": "TSModuleDeclaration", "start": 10, "end": 30,
                          "body": {"type": "TSModuleBlock", "body": []}}}
            ]}"#;
            let program = parse_program(json).unwrap();
            let Node::Module(outer) = &program.body[0] else {
                panic!("expected module");
            };
            assert!(matches!(&outer.body[0], Node::Module(_)));
        }
    }

    mod rejections {
        use super::*;

        #[test]
        fn unknown_specifier_type() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0, "end": 20,
                 "source": {"value": "x"},
                 "specifiers": [{"type": "ExportSpecifier", "local": {"name": "x"}}]}
            ]}"#;
            let err = parse_program(json).unwrap_err();
            assert!(err.to_string().contains("unknown specifier type 'ExportSpecifier'"));
        }

        #[test]
        fn fractional_import_offsets() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ImportDeclaration", "start": 0.5, "end": 20,
                 "source": {"value": "x"}}
            ]}"#;
            assert!(matches!(
                parse_program(json),
                Err(SortError::InvalidAst { .. })
            ));
        }

        #[test]
        fn malformed_json() {
            assert!(matches!(parse_program("{"), Err(SortError::Json(_))));
        }

        #[test]
        fn comment_offsets_stay_lenient() {
            let json = r#"{"type": "Program", "body": [
                {"type": "ExpressionStatement", "start": 10, "end": 20,
                 "leadingComments": [{"type": "CommentBlock", "value": "x", "start": 1.5}]}
            ]}"#;
            let program = parse_program(json).unwrap();
            let comment = &program.body[0].leading_comments()[0];
            assert_eq!(comment.start, 1.5);
            assert!(comment.end.is_nan());
        }
    }
}
