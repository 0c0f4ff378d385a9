//! Flat name projections over a list of statements.

use crate::ast::Statement;

/// Every binding's local name, statement by statement.
pub fn specifier_names<'a, I>(statements: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a Statement>,
{
    statements
        .into_iter()
        .flat_map(|stmt| stmt.specifiers.iter().map(|s| s.local_name.as_str()))
}

/// The module path of each statement, in input order.
pub fn module_names<'a, I>(statements: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a Statement>,
{
    statements.into_iter().map(|stmt| stmt.source.as_str())
}
