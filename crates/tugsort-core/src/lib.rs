//! Core engine for tugsort: ordering import statements and splicing the
//! sorted block back into source text.
//!
//! Components, leaf first:
//!
//! - [`natural`]: alphanumeric-aware string ordering
//! - [`compare`]: the "first decisive" comparator combinator
//! - [`specifiers`]: ordering bindings inside one import
//! - [`names`]: flat name projections
//! - [`group`]: ordering statements within a group
//! - [`select`]: picking the top-level imports of a program
//! - [`splice`]: deleting ranges and injecting text
//!
//! [`pipeline::sort_imports`] ties them together with [`order`] and
//! [`render`] for one file.

pub mod ast;
pub mod compare;
pub mod error;
pub mod group;
pub mod names;
pub mod natural;
pub mod options;
pub mod order;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod select;
pub mod specifiers;
pub mod splice;
pub mod text;

pub use ast::{Node, Program, Specifier, SpecifierKind, Statement};
pub use error::{OutputErrorCode, SortError, SortResult};
pub use group::{sort_group, LengthMode, SortConfig};
pub use options::{CompiledOptions, SortOptions};
pub use pipeline::{sort_imports, SkipReason, SortOutcome};
pub use splice::{reassemble, Range, RangeKind};
