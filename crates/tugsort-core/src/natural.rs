//! Natural (alphanumeric-aware) string ordering.
//!
//! Strings are split into alternating runs of ASCII digits and non-digits.
//! Digit runs compare by numeric value, so `"item2"` sorts before `"item10"`.
//! Non-digit runs compare character by character, optionally case-folded.
//!
//! ## Totality
//!
//! Two strings whose runs all tie (`"a01"` vs `"a1"`, or `"A"` vs `"a"` in
//! case-insensitive mode) fall back to plain byte comparison. `Equal` is
//! therefore returned only for identical strings, which makes the ordering
//! usable as a deterministic sort key.

use std::cmp::Ordering;

/// Compare two strings with the case-sensitive natural ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    NaturalOrder::default().compare(a, b)
}

/// Natural ordering with a configurable case mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder {
    /// Fold case before comparing non-digit runs.
    pub case_insensitive: bool,
}

impl NaturalOrder {
    pub fn new(case_insensitive: bool) -> Self {
        NaturalOrder { case_insensitive }
    }

    /// Compare `a` and `b`.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let mut left = Runs::new(a);
        let mut right = Runs::new(b);

        loop {
            match (left.next(), right.next()) {
                (None, None) => break,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => {
                    let ord = self.compare_runs(x, y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }

        a.cmp(b)
    }

    fn compare_runs(&self, x: Run<'_>, y: Run<'_>) -> Ordering {
        match (x, y) {
            (Run::Digits(x), Run::Digits(y)) => compare_numeric(x, y),
            // A digit run against a text run is decided by their first
            // characters, which always differ.
            (x, y) => self.compare_text(x.as_str(), y.as_str()),
        }
    }

    fn compare_text(&self, x: &str, y: &str) -> Ordering {
        if self.case_insensitive {
            x.chars()
                .flat_map(char::to_lowercase)
                .cmp(y.chars().flat_map(char::to_lowercase))
        } else {
            x.cmp(y)
        }
    }
}

/// Compare two ASCII digit runs by value without parsing them.
fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Run<'a> {
    fn as_str(self) -> &'a str {
        match self {
            Run::Digits(s) | Run::Text(s) => s,
        }
    }
}

/// Iterator over the digit / non-digit runs of a string.
struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Runs { rest: s }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let split = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(if digits {
            Run::Digits(run)
        } else {
            Run::Text(run)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str], order: NaturalOrder) -> Vec<String> {
        let mut items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        items.sort_by(|a, b| order.compare(a, b));
        items
    }

    mod ordering {
        use super::*;

        #[test]
        fn digit_runs_compare_numerically() {
            assert_eq!(
                sorted(&["item2", "item10", "item1"], NaturalOrder::default()),
                vec!["item1", "item2", "item10"]
            );
        }

        #[test]
        fn empty_sorts_first() {
            assert_eq!(compare("", "a"), Ordering::Less);
            assert_eq!(compare("a", ""), Ordering::Greater);
            assert_eq!(compare("", ""), Ordering::Equal);
            assert_eq!(compare("", "0"), Ordering::Less);
        }

        #[test]
        fn prefix_sorts_first() {
            assert_eq!(compare("react", "react-dom"), Ordering::Less);
            assert_eq!(compare("./a", "./a/b"), Ordering::Less);
        }

        #[test]
        fn module_paths() {
            assert_eq!(
                sorted(&["./b", "./a", "@scope/z"], NaturalOrder::default()),
                vec!["./a", "./b", "@scope/z"]
            );
        }

        #[test]
        fn numbers_longer_than_u64() {
            let big = "v184467440737095516160";
            let bigger = "v184467440737095516161";
            assert_eq!(compare(big, bigger), Ordering::Less);
            assert_eq!(compare("v9", big), Ordering::Less);
        }

        #[test]
        fn digits_against_text_use_characters() {
            // '.' < '0' < 'a'
            assert_eq!(compare(".a", "1a"), Ordering::Less);
            assert_eq!(compare("1a", "aa"), Ordering::Less);
        }
    }

    mod case_modes {
        use super::*;

        #[test]
        fn case_sensitive_puts_uppercase_first() {
            assert_eq!(
                sorted(&["b", "B", "a", "A"], NaturalOrder::default()),
                vec!["A", "B", "a", "b"]
            );
        }

        #[test]
        fn case_insensitive_interleaves() {
            assert_eq!(
                sorted(&["b", "B", "a", "A"], NaturalOrder::new(true)),
                vec!["A", "a", "B", "b"]
            );
        }

        #[test]
        fn case_insensitive_is_still_total() {
            let order = NaturalOrder::new(true);
            assert_ne!(order.compare("React", "react"), Ordering::Equal);
            assert_eq!(
                order.compare("React", "react"),
                order.compare("react", "React").reverse()
            );
        }
    }

    mod totality {
        use super::*;

        const SAMPLES: &[&str] = &[
            "", "0", "00", "1", "01", "a", "A", "a1", "a01", "a10", "a2", "a-b", "a_b", "a.b",
            "item10", "item9", "Item9", "@scope/x", "./x", "../x", "é", "x1y2", "x1y10",
        ];

        #[test]
        fn equal_only_for_identical_strings() {
            for order in [NaturalOrder::default(), NaturalOrder::new(true)] {
                for a in SAMPLES {
                    for b in SAMPLES {
                        let ord = order.compare(a, b);
                        assert_eq!(ord == Ordering::Equal, a == b, "{a:?} vs {b:?}");
                        assert_eq!(ord, order.compare(b, a).reverse(), "{a:?} vs {b:?}");
                    }
                }
            }
        }

        #[test]
        fn transitive_over_samples() {
            for order in [NaturalOrder::default(), NaturalOrder::new(true)] {
                for a in SAMPLES {
                    for b in SAMPLES {
                        for c in SAMPLES {
                            if order.compare(a, b) == Ordering::Less
                                && order.compare(b, c) == Ordering::Less
                            {
                                assert_eq!(
                                    order.compare(a, c),
                                    Ordering::Less,
                                    "{a:?} < {b:?} < {c:?}"
                                );
                            }
                        }
                    }
                }
            }
        }

        #[test]
        fn leading_zeros_break_ties_by_bytes() {
            assert_eq!(compare("a01", "a1"), "a01".cmp("a1"));
        }
    }
}
