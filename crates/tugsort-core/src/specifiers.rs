//! Ordering of the bindings inside one import statement.
//!
//! A `Default` binding always comes first; everything else is ordered by the
//! natural ordering of its local name. The sort is stable.

use std::cmp::Ordering;

use crate::ast::{Specifier, SpecifierKind, Statement};
use crate::compare::ComparatorChain;
use crate::natural::NaturalOrder;

/// Rule 1: when kinds differ and one of them is `Default`, it sorts first.
pub fn default_first(a: &Specifier, b: &Specifier) -> Ordering {
    match (a.kind, b.kind) {
        (x, y) if x == y => Ordering::Equal,
        (SpecifierKind::Default, _) => Ordering::Less,
        (_, SpecifierKind::Default) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Rule 2: natural ordering of the local names.
pub fn by_local_name(order: NaturalOrder) -> impl Fn(&Specifier, &Specifier) -> Ordering {
    move |a, b| order.compare(&a.local_name, &b.local_name)
}

/// The full specifier comparator.
pub fn specifier_comparator<'a>(order: NaturalOrder) -> ComparatorChain<'a, Specifier> {
    ComparatorChain::new()
        .then(default_first)
        .then(by_local_name(order))
}

/// Reorder `statement.specifiers` in place. No other field changes.
///
/// Returns `true` when the order changed.
pub fn sort_specifiers(statement: &mut Statement, order: NaturalOrder) -> bool {
    let comparator = specifier_comparator(order);
    let before: Vec<String> = statement
        .specifiers
        .iter()
        .map(|s| s.local_name.clone())
        .collect();
    statement
        .specifiers
        .sort_by(|a, b| comparator.compare(a, b));
    statement
        .specifiers
        .iter()
        .map(|s| &s.local_name)
        .ne(before.iter())
}

/// Owned variant of [`sort_specifiers`].
pub fn sorted_specifiers(mut statement: Statement, order: NaturalOrder) -> Statement {
    sort_specifiers(&mut statement, order);
    statement
}
