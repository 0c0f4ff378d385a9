//! Source reassembly: delete marked ranges, splice text in at one offset.
//!
//! [`reassemble`] is a single left-to-right walk over a sorted range list
//! with a monotonic cursor. Text outside every removal range is copied
//! byte for byte. Overlapping removal ranges are absorbed by the cursor;
//! callers that need overlap reported run [`find_overlaps`] first.
//!
//! Range offsets are raw parser numbers (`f64`). A range whose offsets are
//! not finite non-negative integers, are reversed, fall outside the code or
//! split a UTF-8 character is dropped and treated as absent.

use serde::{Deserialize, Serialize};

use crate::text::{floor_char_boundary, safe_span, Span};

/// What a [`Range`] does during reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Delete `[start, end)`.
    Remove,
    /// Zero-width injection marker.
    Inject,
}

/// A half-open interval of the original code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub kind: RangeKind,
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub fn remove(start: f64, end: f64) -> Self {
        Range {
            kind: RangeKind::Remove,
            start,
            end,
        }
    }

    /// Removal range from validated byte offsets.
    pub fn from_span(span: Span) -> Self {
        Range::remove(span.start as f64, span.end as f64)
    }

    /// The range as a span of `code`, or `None` if it is unsafe.
    pub fn span_in(&self, code: &str) -> Option<Span> {
        safe_span(code, self.start, self.end)
    }
}

/// A validated range in walk order.
#[derive(Debug, Clone, Copy)]
struct Step {
    span: Span,
    inject: bool,
    order: usize,
}

/// Rebuild `code` without the removal ranges, with `injected` at `inject_offset`.
///
/// Ranges sort by start offset, ties by input order. The injection marker is
/// appended after every removal range, so at a shared offset the removal is
/// applied first and the injected text follows it. Ranges of kind
/// [`RangeKind::Inject`] in `remove` are ignored. `inject_offset` past the
/// end of `code` is clamped to it.
pub fn reassemble(code: &str, remove: &[Range], injected: Option<&str>, inject_offset: usize) -> String {
    let mut steps: Vec<Step> = remove
        .iter()
        .filter(|range| range.kind == RangeKind::Remove)
        .filter_map(|range| range.span_in(code))
        .enumerate()
        .map(|(order, span)| Step {
            span,
            inject: false,
            order,
        })
        .collect();

    if injected.is_some() {
        let at = floor_char_boundary(code, inject_offset);
        steps.push(Step {
            span: Span::new(at, at),
            inject: true,
            order: steps.len(),
        });
    }

    steps.sort_by_key(|step| (step.span.start, step.order));

    let capacity = code.len() + injected.map_or(0, str::len);
    let mut out = String::with_capacity(capacity);
    let mut idx = 0usize;

    for step in &steps {
        if step.span.start > idx {
            out.push_str(&code[idx..step.span.start]);
            idx = step.span.start;
        }
        if step.inject {
            out.push_str(injected.unwrap_or_default());
        }
        if step.span.end > idx {
            idx = step.span.end;
        }
    }

    if idx < code.len() {
        out.push_str(&code[idx..]);
    }
    out
}

/// Pairs of removal ranges that share at least one byte.
///
/// Touching ranges (`a.end == b.start`) and exact duplicates do not count.
/// Unsafe ranges are skipped the same way [`reassemble`] skips them.
pub fn find_overlaps(code: &str, ranges: &[Range]) -> Vec<(Span, Span)> {
    let mut spans: Vec<Span> = ranges
        .iter()
        .filter(|range| range.kind == RangeKind::Remove)
        .filter_map(|range| range.span_in(code))
        .collect();
    spans.sort();
    spans.dedup();

    let mut overlaps = Vec::new();
    for (i, a) in spans.iter().enumerate() {
        for b in &spans[i + 1..] {
            if b.start >= a.end {
                break;
            }
            if a.overlaps(b) {
                overlaps.push((*a, *b));
            }
        }
    }
    overlaps
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: f64, end: f64) -> Range {
        Range::remove(start, end)
    }

    mod walk {
        use super::*;

        #[test]
        fn empty_removal_is_identity() {
            for code in ["", "a", "import a;\n", "héllo wörld", "\r\n\r\n"] {
                assert_eq!(reassemble(code, &[], None, 0), code);
            }
        }

        #[test]
        fn exact_deletion() {
            let code = "0123456789";
            for start in 0..=code.len() {
                for end in start..=code.len() {
                    let expected = format!("{}{}", &code[..start], &code[end..]);
                    assert_eq!(
                        reassemble(code, &[r(start as f64, end as f64)], None, 0),
                        expected
                    );
                }
            }
        }

        #[test]
        fn injection_placement() {
            assert_eq!(reassemble("AB", &[], Some("X"), 1), "AXB");
            assert_eq!(reassemble("AB", &[], Some("X"), 0), "XAB");
            assert_eq!(reassemble("AB", &[], Some("X"), 2), "ABX");
        }

        #[test]
        fn remove_and_inject() {
            let code = "import a;\nimport b;\n";
            let out = reassemble(code, &[r(0.0, 20.0)], Some("import b;\nimport a;\n"), 0);
            assert_eq!(out, "import b;\nimport a;\n");
        }

        #[test]
        fn inject_after_removal_at_same_offset() {
            // Removal starting at the marker is applied before the injection.
            let out = reassemble("AAABBB", &[r(3.0, 6.0)], Some("X"), 3);
            assert_eq!(out, "AAAX");
            let out = reassemble("AAABBB", &[r(0.0, 3.0)], Some("X"), 0);
            assert_eq!(out, "XBBB");
        }

        #[test]
        fn inject_inside_removed_span_lands_at_cursor() {
            let out = reassemble("0123456789", &[r(2.0, 8.0)], Some("X"), 5);
            assert_eq!(out, "01X89");
        }

        #[test]
        fn overlap_absorbed_by_cursor() {
            let out = reassemble("0123456789", &[r(2.0, 6.0), r(4.0, 8.0)], None, 0);
            assert_eq!(out, "0189");
            let out = reassemble("0123456789", &[r(4.0, 8.0), r(2.0, 6.0), r(3.0, 4.0)], None, 0);
            assert_eq!(out, "0189");
        }

        #[test]
        fn unsorted_input_ranges() {
            let out = reassemble("abcdef", &[r(4.0, 5.0), r(0.0, 1.0)], None, 0);
            assert_eq!(out, "bcdf");
        }

        #[test]
        fn caller_inject_ranges_ignored() {
            let marker = Range {
                kind: RangeKind::Inject,
                start: 1.0,
                end: 3.0,
            };
            assert_eq!(reassemble("abcd", &[marker], None, 0), "abcd");
        }

        #[test]
        fn inject_offset_clamped() {
            assert_eq!(reassemble("ab", &[], Some("X"), 99), "abX");
            // Inside the two-byte 'é' rounds down to its start.
            assert_eq!(reassemble("é", &[], Some("X"), 1), "Xé");
        }
    }

    mod unsafe_ranges {
        use super::*;

        #[test]
        fn non_finite_dropped() {
            let code = "import a;\nrest";
            let ranges = [r(f64::NAN, 5.0), r(0.0, f64::INFINITY), r(0.0, 10.0)];
            assert_eq!(reassemble(code, &ranges, Some("X;\n"), 0), "X;\nrest");
        }

        #[test]
        fn fractional_negative_reversed_dropped() {
            let code = "abcdef";
            let ranges = [r(0.5, 2.0), r(-1.0, 2.0), r(4.0, 2.0), r(1.0, 2.0)];
            assert_eq!(reassemble(code, &ranges, None, 0), "acdef");
        }

        #[test]
        fn out_of_bounds_and_mid_char_dropped() {
            assert_eq!(reassemble("abc", &[r(1.0, 10.0)], None, 0), "abc");
            assert_eq!(reassemble("aéb", &[r(0.0, 2.0)], None, 0), "aéb");
            assert_eq!(reassemble("aéb", &[r(0.0, 3.0)], None, 0), "b");
        }
    }

    mod overlaps {
        use super::*;

        #[test]
        fn touching_and_duplicates_are_fine() {
            let code = "0123456789";
            assert!(find_overlaps(code, &[r(0.0, 3.0), r(3.0, 6.0)]).is_empty());
            assert!(find_overlaps(code, &[r(2.0, 4.0), r(2.0, 4.0)]).is_empty());
            assert!(find_overlaps(code, &[r(2.0, 2.0), r(2.0, 4.0)]).is_empty());
        }

        #[test]
        fn genuine_overlap_reported() {
            let code = "0123456789";
            let found = find_overlaps(code, &[r(4.0, 8.0), r(2.0, 6.0)]);
            assert_eq!(found, vec![(Span::new(2, 6), Span::new(4, 8))]);
        }

        #[test]
        fn containment_reported() {
            let code = "0123456789";
            let found = find_overlaps(code, &[r(0.0, 9.0), r(3.0, 4.0)]);
            assert_eq!(found, vec![(Span::new(0, 9), Span::new(3, 4))]);
        }

        #[test]
        fn unsafe_ranges_ignored() {
            let code = "0123456789";
            assert!(find_overlaps(code, &[r(0.0, 9.0), r(f64::NAN, 4.0)]).is_empty());
        }
    }
}
