//! "First decisive" comparator combinator.
//!
//! A sort order made of several precedence rules is expressed as an ordered
//! list of rule functions. The combined comparator evaluates them in order and
//! returns the first result that is not `Equal`, so every rule stays a small
//! function that can be tested on its own.

use std::cmp::Ordering;
use std::fmt;

/// A single ordering rule over `T`.
pub type Rule<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// An ordered list of rules combined by "first decisive wins".
pub struct ComparatorChain<'a, T> {
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T> Default for ComparatorChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> ComparatorChain<'a, T> {
    pub fn new() -> Self {
        ComparatorChain { rules: Vec::new() }
    }

    /// Append a rule with lower precedence than all rules added so far.
    pub fn then(mut self, rule: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append a rule only when `enabled`.
    pub fn then_if(self, enabled: bool, rule: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        if enabled {
            self.then(rule)
        } else {
            self
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compare with the first rule that decides; `Equal` if none does.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        first_decisive(self.rules.iter().map(|rule| rule(a, b)))
    }
}

impl<T> fmt::Debug for ComparatorChain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorChain")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// The first non-`Equal` ordering of a lazily evaluated sequence.
pub fn first_decisive(orderings: impl IntoIterator<Item = Ordering>) -> Ordering {
    orderings
        .into_iter()
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn first_decisive_skips_equal() {
        assert_eq!(
            first_decisive([Ordering::Equal, Ordering::Greater, Ordering::Less]),
            Ordering::Greater
        );
        assert_eq!(first_decisive([Ordering::Equal]), Ordering::Equal);
        assert_eq!(first_decisive(std::iter::empty()), Ordering::Equal);
    }

    #[test]
    fn chain_respects_precedence() {
        let chain = ComparatorChain::new()
            .then(|a: &(u8, u8), b: &(u8, u8)| a.0.cmp(&b.0))
            .then(|a: &(u8, u8), b: &(u8, u8)| b.1.cmp(&a.1));
        assert_eq!(chain.compare(&(1, 9), &(2, 0)), Ordering::Less);
        assert_eq!(chain.compare(&(1, 9), &(1, 0)), Ordering::Less);
        assert_eq!(chain.compare(&(1, 0), &(1, 0)), Ordering::Equal);
    }

    #[test]
    fn later_rules_not_evaluated_after_decision() {
        let calls = Cell::new(0);
        let chain = ComparatorChain::new()
            .then(|a: &u8, b: &u8| a.cmp(b))
            .then(|_: &u8, _: &u8| {
                calls.set(calls.get() + 1);
                Ordering::Equal
            });
        chain.compare(&1, &2);
        assert_eq!(calls.get(), 0);
        chain.compare(&1, &1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn then_if_skips_disabled_rules() {
        let chain = ComparatorChain::new()
            .then_if(false, |a: &u8, b: &u8| a.cmp(b))
            .then_if(true, |a: &u8, b: &u8| b.cmp(a));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.compare(&1, &2), Ordering::Greater);
        assert!(ComparatorChain::<u8>::new().is_empty());
    }
}
