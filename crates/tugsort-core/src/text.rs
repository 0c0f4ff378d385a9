//! Byte spans and text position utilities.
//!
//! ## Coordinate Conventions
//!
//! - Byte offsets are **0-indexed** UTF-8 offsets into the source text
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Spans are half-open intervals: `[start, end)`
//!
//! Offsets reported by an external parser arrive as JSON numbers. They are
//! only trusted once [`safe_offset`] has accepted them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest integer a JSON number (IEEE-754 double) represents exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Two spans overlap if they share any byte position.
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Offset Validation
// ============================================================================

/// Convert a raw numeric offset into a byte offset.
///
/// Returns `None` unless the value is finite, integral, non-negative and no
/// larger than [`MAX_SAFE_INTEGER`].
pub fn safe_offset(value: f64) -> Option<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > MAX_SAFE_INTEGER {
        return None;
    }
    usize::try_from(value as u64).ok()
}

/// Convert a raw `(start, end)` pair into a span that can slice `content`.
///
/// Both offsets must pass [`safe_offset`], satisfy `start <= end`, lie within
/// `content` and fall on UTF-8 character boundaries.
pub fn safe_span(content: &str, start: f64, end: f64) -> Option<Span> {
    let start = safe_offset(start)?;
    let end = safe_offset(end)?;
    if start > end || end > content.len() {
        return None;
    }
    if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
        return None;
    }
    Some(Span { start, end })
}

/// Largest character boundary in `content` that is `<= offset`.
pub fn floor_char_boundary(content: &str, offset: usize) -> usize {
    if offset >= content.len() {
        return content.len();
    }
    let mut offset = offset;
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ============================================================================
// Line Utilities
// ============================================================================

/// Length of the line terminator (`\n` or `\r\n`) starting at `offset`, or 0.
pub fn line_terminator_len(content: &str, offset: usize) -> usize {
    let rest = content.as_bytes().get(offset..).unwrap_or_default();
    if rest.starts_with(b"\r\n") {
        2
    } else if rest.starts_with(b"\n") {
        1
    } else {
        0
    }
}

/// The line terminator used by `content` (`"\r\n"` if the first one is CRLF).
pub fn detect_line_ending(content: &str) -> &'static str {
    match content.find('\n') {
        Some(i) if i > 0 && content.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Convert a byte offset to 1-indexed line and column (Unicode-aware).
///
/// Columns count Unicode scalar values, not bytes.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, ch) in content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Extract the text of a span, `None` if it is out of bounds.
pub fn extract_span<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// True when `text` holds a `//` or `/*` comment outside string literals.
pub fn contains_comment(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;
    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                if ch == '\\' {
                    chars.next();
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '/' if matches!(chars.peek(), Some('/') | Some('*')) => return true,
                _ => {}
            },
        }
    }
    false
}

// ============================================================================
// Tests
// ============================================================================
