//! tugsort: deterministic import sorting for JavaScript and TypeScript.
//!
//! The engine takes source text plus a parser's description of its imports
//! and returns the text with the imports sorted. It never parses source
//! itself.

// Engine - re-exported from tugsort-core
pub use tugsort_core::ast;
pub use tugsort_core::compare;
pub use tugsort_core::error;
pub use tugsort_core::group;
pub use tugsort_core::names;
pub use tugsort_core::natural;
pub use tugsort_core::options;
pub use tugsort_core::order;
pub use tugsort_core::output;
pub use tugsort_core::pipeline;
pub use tugsort_core::render;
pub use tugsort_core::select;
pub use tugsort_core::specifiers;
pub use tugsort_core::splice;
pub use tugsort_core::text;

// Front door
pub mod cli;
