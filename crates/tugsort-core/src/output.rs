//! JSON output types for CLI responses.
//!
//! Every response carries `status` first and a `schema_version`, and is
//! emitted through [`emit_response`] so the bytes are deterministic for a
//! given input.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{OutputErrorCode, SortError};
use crate::pipeline::{SkipReason, SortOutcome};
use crate::text::Span;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Content Hash
// ============================================================================

/// SHA-256 of file content, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Success Responses
// ============================================================================

/// Response for `tugsort sort`.
#[derive(Debug, Clone, Serialize)]
pub struct SortResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    /// Source file, when read from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub changed: bool,
    /// Present when the file was not processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    /// Whether the result was written back.
    pub written: bool,
    pub input_hash: ContentHash,
    pub output_hash: ContentHash,
    /// Module paths in sorted order.
    pub modules: Vec<String>,
    /// Binding names in sorted order.
    pub specifiers: Vec<String>,
    /// The new file text.
    pub code: String,
}

impl SortResponse {
    pub fn new(input: &str, outcome: &SortOutcome, file: Option<String>, written: bool) -> Self {
        SortResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file,
            changed: outcome.changed,
            skipped: outcome.skipped,
            written,
            input_hash: ContentHash::compute(input.as_bytes()),
            output_hash: ContentHash::compute(outcome.code.as_bytes()),
            modules: outcome.modules.clone(),
            specifiers: outcome.specifiers.clone(),
            code: outcome.code.clone(),
        }
    }
}

/// Response for `tugsort check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// Status: "ok" when sorted, "unsorted" otherwise.
    pub status: String,
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sorted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub input_hash: ContentHash,
    /// Hash the file would have after sorting.
    pub expected_hash: ContentHash,
}

impl CheckResponse {
    pub fn new(input: &str, outcome: &SortOutcome, file: Option<String>) -> Self {
        let sorted = !outcome.changed;
        CheckResponse {
            status: if sorted { "ok" } else { "unsorted" }.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file,
            sorted,
            skipped: outcome.skipped,
            input_hash: ContentHash::compute(input.as_bytes()),
            expected_hash: ContentHash::compute(outcome.code.as_bytes()),
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code, also the process exit code.
    pub code: u8,
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &SortError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            SortError::InvalidPattern { pattern, .. } | SortError::InvalidGlob { pattern, .. } => {
                Some(serde_json::json!({ "pattern": pattern }))
            }
            SortError::OverlappingRanges {
                first,
                second,
                line,
            } => Some(serde_json::json!({
                "first": span_json(first),
                "second": span_json(second),
                "line": line
            })),
            SortError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

fn span_json(span: &Span) -> serde_json::Value {
    serde_json::json!({ "start": span.start, "end": span.end })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &SortError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(code: &str, changed: bool) -> SortOutcome {
        SortOutcome {
            code: code.to_string(),
            changed,
            skipped: None,
            modules: vec!["a".to_string()],
            specifiers: vec!["x".to_string()],
        }
    }

    mod hashing {
        use super::*;

        #[test]
        fn known_digest() {
            assert_eq!(
                ContentHash::compute(b"").0,
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn same_input_same_hash() {
            assert_eq!(ContentHash::compute(b"abc"), ContentHash::compute(b"abc"));
            assert_ne!(ContentHash::compute(b"abc"), ContentHash::compute(b"abd"));
        }
    }

    mod responses {
        use super::*;

        #[test]
        fn sort_response_shape() {
            let response = SortResponse::new("old", &outcome("new", true), Some("a.ts".into()), false);
            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["status"], "ok");
            assert_eq!(json["schema_version"], SCHEMA_VERSION);
            assert_eq!(json["changed"], true);
            assert_eq!(json["code"], "new");
            assert_eq!(json["modules"][0], "a");
            assert!(json.get("skipped").is_none());
            assert_ne!(json["input_hash"], json["output_hash"]);
        }

        #[test]
        fn check_response_unsorted() {
            let response = CheckResponse::new("old", &outcome("new", true), None);
            assert_eq!(response.status, "unsorted");
            assert!(!response.sorted);

            let response = CheckResponse::new("same", &outcome("same", false), None);
            assert_eq!(response.status, "ok");
            assert_eq!(response.input_hash, response.expected_hash);
        }

        #[test]
        fn skipped_reason_serialized() {
            let mut skipped = outcome("x", false);
            skipped.skipped = Some(SkipReason::IgnoreDirective);
            let response = CheckResponse::new("x", &skipped, None);
            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["skipped"], "ignore_directive");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn error_response_carries_code() {
            let err = SortError::InvalidPattern {
                pattern: "(".to_string(),
                message: "unclosed group".to_string(),
            };
            let response = ErrorResponse::from_error(&err);
            assert_eq!(response.status, "error");
            assert_eq!(response.error.code, 2);
            assert_eq!(response.error.details.unwrap()["pattern"], "(");
        }

        #[test]
        fn overlap_details() {
            let err = SortError::OverlappingRanges {
                first: Span::new(0, 10),
                second: Span::new(5, 12),
                line: 1,
            };
            let info = ErrorInfo::from_error(&err);
            let details = info.details.unwrap();
            assert_eq!(details["second"]["start"], 5);
            assert_eq!(details["line"], 1);
        }

        #[test]
        fn emit_is_pretty_and_newline_terminated() {
            let response = ErrorResponse::from_error(&SortError::file_not_found("x.ts"));
            let mut buf = Vec::new();
            emit_response(&response, &mut buf).unwrap();
            let text = String::from_utf8(buf).unwrap();
            assert!(text.starts_with("{\n  \"status\": \"error\""));
            assert!(text.ends_with("}\n"));
        }
    }
}
