//! WHERE clause compilation.
//!
//! A [`Filter`] carries either a free-text boolean expression or a set of
//! column=value condition pairs. The text is trusted and inserted verbatim;
//! pairs are always bound as parameters. When both are present the text
//! wins and the pairs are ignored.

use super::Dialect;
use crate::models::{Fields, Value};

/// Row selection for select, get, update and delete.
///
/// # Examples
///
/// ```
/// use beesql::{Dialect, Filter};
/// use beesql::sql::compile_where;
///
/// let filter = Filter::new().and("release_year", 2012).and("release_manager", "John Doe");
/// let clause = compile_where(&filter, Dialect::Sqlite);
/// assert_eq!(clause.sql, " WHERE release_year=? AND release_manager=?");
/// assert_eq!(clause.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    expression: Option<String>,
    conditions: Fields,
}

impl Filter {
    /// Creates a filter matching every row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expression: None,
            conditions: Fields::new(),
        }
    }

    /// Creates a filter from a free-text expression, e.g. `"version < 2.0"`.
    #[must_use]
    pub fn raw(expression: impl Into<String>) -> Self {
        Self::new().with_where(expression)
    }

    /// Creates a filter from condition pairs.
    #[must_use]
    pub fn conditions(conditions: impl Into<Fields>) -> Self {
        Self {
            expression: None,
            conditions: conditions.into(),
        }
    }

    /// Sets the free-text expression.
    #[must_use]
    pub fn with_where(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Adds a `column=value` condition.
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.set(column, value);
        self
    }

    /// The free-text expression, if set and non-empty.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref().filter(|e| !e.is_empty())
    }

    /// The condition pairs.
    #[must_use]
    pub const fn condition_fields(&self) -> &Fields {
        &self.conditions
    }

    /// Returns true when the filter selects every row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expression().is_none() && self.conditions.is_empty()
    }
}

impl From<Fields> for Filter {
    fn from(conditions: Fields) -> Self {
        Self::conditions(conditions)
    }
}

impl From<&str> for Filter {
    fn from(expression: &str) -> Self {
        Self::raw(expression)
    }
}

/// A compiled WHERE fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Empty, or `" WHERE "` followed by the condition.
    pub sql: String,
    /// Values for the fragment's placeholders.
    pub params: Vec<Value>,
}

/// Compiles a filter into a WHERE fragment for the given dialect.
#[must_use]
pub fn compile_where(filter: &Filter, dialect: Dialect) -> WhereClause {
    if let Some(expression) = filter.expression() {
        return WhereClause {
            sql: format!(" WHERE {expression}"),
            params: Vec::new(),
        };
    }

    if filter.conditions.is_empty() {
        return WhereClause::default();
    }

    let placeholder = dialect.placeholder();
    let condition = filter
        .conditions
        .columns()
        .map(|column| format!("{column}={placeholder}"))
        .collect::<Vec<_>>()
        .join(" AND ");

    WhereClause {
        sql: format!(" WHERE {condition}"),
        params: filter.conditions.values().cloned().collect(),
    }
}
