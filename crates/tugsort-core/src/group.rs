//! Ordering of import statements within one group.
//!
//! Rules in precedence order, first decisive wins:
//!
//! 1. namespace priority: a statement with a `* as ns` binding first
//! 2. length mode `asc`/`desc`: span length, ties broken by plain `source`
//!    comparison
//! 3. default mode: natural ordering of `source`
//!
//! The sort is stable. Equal-ranked statements keep their input order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::Statement;
use crate::compare::ComparatorChain;
use crate::error::SortError;
use crate::natural::NaturalOrder;

// ============================================================================
// Configuration
// ============================================================================

/// Whether statements are ordered by text length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    /// Natural ordering of the module path.
    #[default]
    Default,
    /// Shortest statement first.
    Asc,
    /// Longest statement first.
    Desc,
}

impl LengthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthMode::Default => "default",
            LengthMode::Asc => "asc",
            LengthMode::Desc => "desc",
        }
    }
}

impl fmt::Display for LengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LengthMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(LengthMode::Default),
            "asc" => Ok(LengthMode::Asc),
            "desc" => Ok(LengthMode::Desc),
            other => Err(SortError::invalid_args(format!(
                "unknown length mode '{}'",
                other
            ))),
        }
    }
}

/// Immutable configuration for one sort invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub length_mode: LengthMode,
    /// Statements with a namespace binding sort first.
    pub namespace_priority: bool,
    /// Fold case in natural comparisons.
    pub case_insensitive: bool,
}

impl SortConfig {
    pub fn with_length_mode(mut self, mode: LengthMode) -> Self {
        self.length_mode = mode;
        self
    }

    pub fn with_namespace_priority(mut self, enabled: bool) -> Self {
        self.namespace_priority = enabled;
        self
    }

    pub fn with_case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    pub fn natural_order(&self) -> NaturalOrder {
        NaturalOrder::new(self.case_insensitive)
    }
}

// ============================================================================
// Rules
// ============================================================================

pub fn namespace_rule(a: &Statement, b: &Statement) -> Ordering {
    // true sorts first
    b.has_namespace_specifier()
        .cmp(&a.has_namespace_specifier())
}

/// Span length in the requested direction, then literal `source` order.
///
/// Returns `Equal` in [`LengthMode::Default`] so the chain falls through.
pub fn length_rule(mode: LengthMode) -> impl Fn(&Statement, &Statement) -> Ordering {
    move |a, b| {
        let by_len = match mode {
            LengthMode::Default => return Ordering::Equal,
            LengthMode::Asc => a.span_len().cmp(&b.span_len()),
            LengthMode::Desc => b.span_len().cmp(&a.span_len()),
        };
        by_len.then_with(|| a.source.as_str().cmp(b.source.as_str()))
    }
}

pub fn natural_source_rule(order: NaturalOrder) -> impl Fn(&Statement, &Statement) -> Ordering {
    move |a, b| order.compare(&a.source, &b.source)
}

/// Build the comparator for `config`.
pub fn group_comparator<'a>(config: &SortConfig) -> ComparatorChain<'a, Statement> {
    let by_length = config.length_mode != LengthMode::Default;
    ComparatorChain::new()
        .then_if(config.namespace_priority, namespace_rule)
        .then_if(by_length, length_rule(config.length_mode))
        .then_if(!by_length, natural_source_rule(config.natural_order()))
}

// ============================================================================
// Sorting
// ============================================================================

/// Stable in-place sort of `statements` under `config`.
pub fn sort_group(statements: &mut [Statement], config: &SortConfig) {
    let comparator = group_comparator(config);
    statements.sort_by(|a, b| comparator.compare(a, b));
}

/// Owned variant of [`sort_group`].
pub fn sorted_group(mut statements: Vec<Statement>, config: &SortConfig) -> Vec<Statement> {
    sort_group(&mut statements, config);
    statements
}

// ============================================================================
// Tests
// ============================================================================
