//! Structured inputs for select, update and delete.

use super::Filter;
use crate::models::Fields;

/// Sort direction for `GROUP BY` and `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending (no keyword emitted).
    #[default]
    Asc,
    /// Descending (`DESC`).
    Desc,
}

impl Direction {
    /// Maps an "ascending?" flag to a direction.
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }

    /// Returns true for [`Direction::Desc`].
    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

/// A `SELECT` request.
///
/// # Examples
///
/// ```
/// use beesql::{Dialect, Select, StatementBuilder};
///
/// let query = Select::new("beesql_version")
///     .column("SUM(billed_hours)")
///     .with_where("release_year > 2010")
///     .group_by(["release_manager"])
///     .having("SUM(billed_hours) > 100");
///
/// let stmt = StatementBuilder::new(Dialect::Sqlite).select(&query)?;
/// assert_eq!(
///     stmt.sql(),
///     "SELECT SUM(billed_hours) FROM beesql_version WHERE release_year > 2010 \
///      GROUP BY release_manager HAVING SUM(billed_hours) > 100"
/// );
/// # Ok::<(), beesql::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub(crate) table: String,
    pub(crate) columns: Vec<String>,
    pub(crate) distinct: bool,
    pub(crate) filter: Filter,
    pub(crate) group_by: Vec<String>,
    pub(crate) group_direction: Direction,
    pub(crate) having: Option<String>,
    pub(crate) order_by: Vec<String>,
    pub(crate) order_direction: Direction,
    pub(crate) limit: Option<u64>,
}

impl Select {
    /// Selects every column of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Adds one column (or expression) to the select list.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Adds several columns to the select list.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Emits `SELECT DISTINCT`.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Replaces the row filter.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Sets a free-text WHERE expression.
    #[must_use]
    pub fn with_where(mut self, expression: impl Into<String>) -> Self {
        self.filter = self.filter.with_where(expression);
        self
    }

    /// Adds a `column=value` condition.
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.filter = self.filter.and(column, value);
        self
    }

    /// Groups by one or more columns.
    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Sets the `GROUP BY` direction.
    ///
    /// Only MySQL honors [`Direction::Desc`] here; `SQLite` renders the
    /// grouping ascending and logs a warning.
    #[must_use]
    pub const fn group_direction(mut self, direction: Direction) -> Self {
        self.group_direction = direction;
        self
    }

    /// Sets a `HAVING` expression, inserted verbatim.
    #[must_use]
    pub fn having(mut self, expression: impl Into<String>) -> Self {
        self.having = Some(expression.into());
        self
    }

    /// Orders by one or more columns.
    #[must_use]
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Sets the `ORDER BY` direction.
    #[must_use]
    pub const fn order_direction(mut self, direction: Direction) -> Self {
        self.order_direction = direction;
        self
    }

    /// Limits the number of rows.
    ///
    /// A limit of zero means no limit.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = non_zero_limit(limit);
        self
    }

    /// The table being selected from.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// An `UPDATE` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub(crate) table: String,
    pub(crate) values: Fields,
    pub(crate) filter: Filter,
    pub(crate) limit: Option<u64>,
}

impl Update {
    /// Sets `values` on rows of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>, values: impl Into<Fields>) -> Self {
        Self {
            table: table.into(),
            values: values.into(),
            ..Self::default()
        }
    }

    /// Replaces the row filter.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Sets a free-text WHERE expression.
    #[must_use]
    pub fn with_where(mut self, expression: impl Into<String>) -> Self {
        self.filter = self.filter.with_where(expression);
        self
    }

    /// Adds a `column=value` condition.
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.filter = self.filter.and(column, value);
        self
    }

    /// Limits the number of rows updated (MySQL only).
    ///
    /// A limit of zero means no limit.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = non_zero_limit(limit);
        self
    }
}

/// A `DELETE` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    pub(crate) table: String,
    pub(crate) filter: Filter,
    pub(crate) limit: Option<u64>,
}

impl Delete {
    /// Deletes rows of `table`; every row unless a filter is set.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Replaces the row filter.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Sets a free-text WHERE expression.
    #[must_use]
    pub fn with_where(mut self, expression: impl Into<String>) -> Self {
        self.filter = self.filter.with_where(expression);
        self
    }

    /// Adds a `column=value` condition.
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.filter = self.filter.and(column, value);
        self
    }

    /// Limits the number of rows deleted (MySQL only).
    ///
    /// A limit of zero means no limit.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = non_zero_limit(limit);
        self
    }
}

const fn non_zero_limit(limit: u64) -> Option<u64> {
    if limit == 0 { None } else { Some(limit) }
}
