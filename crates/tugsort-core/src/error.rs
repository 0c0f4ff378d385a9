//! Error types and error code constants for tugsort.
//!
//! `SortError` is the single error type surfaced by the pipeline and the CLI.
//! Ordinary inputs never produce an error: comparators are total and unsafe
//! ranges are dropped silently. Errors are reserved for bad configuration,
//! input that violates the parsed-program contract, and I/O.
//!
//! ## Error Code Mapping
//!
//! Exit codes:
//! - `2`: Invalid arguments (bad options, bad patterns)
//! - `3`: Input errors (malformed AST, missing file)
//! - `4`: Apply errors (removal ranges violate the contract, write failed)
//! - `10`: Internal errors

use std::fmt;

use thiserror::Error;

use crate::text::Span;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes used in JSON output and as process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad options, malformed patterns).
    InvalidArguments = 2,
    /// Input could not be used (malformed AST, file not found).
    InputError = 3,
    /// The transformation could not be applied.
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum SortError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// An `importOrder` entry is not a valid regular expression.
    #[error("invalid import order pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An exclude entry is not a valid glob.
    #[error("invalid exclude glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// The parsed program violates the input contract.
    #[error("invalid AST: {message}")]
    InvalidAst { message: String },

    /// Two removal ranges genuinely overlap.
    #[error("overlapping removal ranges {first} and {second} (line {line})")]
    OverlappingRanges { first: Span, second: Span, line: u32 },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// IO failure while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<&SortError> for OutputErrorCode {
    fn from(err: &SortError) -> Self {
        match err {
            SortError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            SortError::InvalidPattern { .. } => OutputErrorCode::InvalidArguments,
            SortError::InvalidGlob { .. } => OutputErrorCode::InvalidArguments,
            SortError::InvalidAst { .. } => OutputErrorCode::InputError,
            SortError::FileNotFound { .. } => OutputErrorCode::InputError,
            SortError::Json(_) => OutputErrorCode::InputError,
            SortError::OverlappingRanges { .. } => OutputErrorCode::ApplyError,
            SortError::Io(_) => OutputErrorCode::ApplyError,
            SortError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<SortError> for OutputErrorCode {
    fn from(err: SortError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl SortError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        SortError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn invalid_ast(message: impl Into<String>) -> Self {
        SortError::InvalidAst {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        SortError::FileNotFound { path: path.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        SortError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

/// Result alias used throughout the crate.
pub type SortResult<T> = Result<T, SortError>;

// ============================================================================
// Tests
// ============================================================================
