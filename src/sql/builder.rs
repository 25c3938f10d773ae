//! Statement synthesis.
//!
//! [`StatementBuilder`] turns structured requests into [`Statement`]s for
//! one [`Dialect`]. It performs no I/O and never touches a driver; every
//! method is a pure function of its inputs.
//!
//! Clause order for `SELECT`:
//!
//! ```text
//! SELECT [DISTINCT ]<columns|*> FROM <table>
//!   [ WHERE ...][ GROUP BY ...[ DESC]][ HAVING ...][ ORDER BY ...[ DESC]][ LIMIT n]
//! ```

use super::filter::compile_where;
use super::{Delete, Dialect, Filter, Select, Statement, Update};
use crate::models::Fields;
use crate::{Error, Result};

/// Builds statements for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementBuilder {
    dialect: Dialect,
}

impl StatementBuilder {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The dialect statements are built for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Builds a `SELECT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty.
    pub fn select(&self, query: &Select) -> Result<Statement> {
        require_name("table", &query.table)?;

        let mut sql = String::from("SELECT ");
        if query.distinct {
            sql.push_str("DISTINCT ");
        }
        if query.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&query.columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&query.table);

        let clause = compile_where(&query.filter, self.dialect);
        sql.push_str(&clause.sql);

        if !query.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&query.group_by.join(","));
            if query.group_direction.is_desc() {
                if self.dialect.supports_group_by_desc() {
                    sql.push_str(" DESC");
                } else {
                    tracing::warn!(
                        dialect = %self.dialect,
                        table = %query.table,
                        "GROUP BY DESC is not supported by this dialect; grouping ascending"
                    );
                }
            }
        }
        if let Some(having) = query.having.as_deref().filter(|h| !h.is_empty()) {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }
        if !query.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&query.order_by.join(","));
            if query.order_direction.is_desc() {
                sql.push_str(" DESC");
            }
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(Statement::new(sql, clause.params))
    }

    /// Builds a single-row `SELECT * ... LIMIT 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty.
    pub fn get(&self, table: &str, filter: &Filter) -> Result<Statement> {
        self.select(&Select::new(table).filter(filter.clone()).limit(1))
    }

    /// Builds an `INSERT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty or `values` has
    /// no columns.
    pub fn insert(&self, table: &str, values: &Fields) -> Result<Statement> {
        require_name("table", table)?;
        if values.is_empty() {
            return Err(Error::Usage(format!(
                "insert into {table} requires at least one value"
            )));
        }

        let columns = values.columns().collect::<Vec<_>>().join(", ");
        let placeholders = vec![self.dialect.placeholder(); values.len()].join(", ");
        let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");

        Ok(Statement::new(sql, values.values().cloned().collect()))
    }

    /// Builds an `UPDATE`.
    ///
    /// Parameters are the SET values followed by the WHERE values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty, there is nothing
    /// to set, or a limit is requested on a dialect without row-limited
    /// updates.
    pub fn update(&self, update: &Update) -> Result<Statement> {
        require_name("table", &update.table)?;
        if update.values.is_empty() {
            return Err(Error::Usage(format!(
                "update of {} requires at least one value",
                update.table
            )));
        }
        self.require_mutation_limit("UPDATE", update.limit)?;

        let placeholder = self.dialect.placeholder();
        let assignments = update
            .values
            .columns()
            .map(|column| format!("{column}={placeholder}"))
            .collect::<Vec<_>>()
            .join(", ");
        let clause = compile_where(&update.filter, self.dialect);

        let mut sql = format!("UPDATE {} SET {assignments}{}", update.table, clause.sql);
        if let Some(limit) = update.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut params: Vec<_> = update.values.values().cloned().collect();
        params.extend(clause.params);
        Ok(Statement::new(sql, params))
    }

    /// Builds a `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty or a limit is
    /// requested on a dialect without row-limited deletes.
    pub fn delete(&self, delete: &Delete) -> Result<Statement> {
        require_name("table", &delete.table)?;
        self.require_mutation_limit("DELETE", delete.limit)?;

        let clause = compile_where(&delete.filter, self.dialect);
        let mut sql = format!("DELETE FROM {}{}", delete.table, clause.sql);
        if let Some(limit) = delete.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(Statement::new(sql, clause.params))
    }

    /// Builds a statement emptying `table`.
    ///
    /// `SQLite` has no `TRUNCATE`; an unfiltered `DELETE` is its equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the table name is empty.
    pub fn truncate(&self, table: &str) -> Result<Statement> {
        require_name("table", table)?;
        let sql = match self.dialect {
            Dialect::MySql => format!("TRUNCATE TABLE {table}"),
            Dialect::Sqlite => format!("DELETE FROM {table}"),
        };
        Ok(Statement::bare(sql))
    }

    /// Builds a `DROP TABLE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if no table is named, a name is empty, or
    /// several tables are named on a dialect that drops one at a time.
    pub fn drop_table<S: AsRef<str>>(&self, tables: &[S], if_exists: bool) -> Result<Statement> {
        if tables.is_empty() {
            return Err(Error::Usage("drop_table requires a table".to_string()));
        }
        if tables.len() > 1 && !self.dialect.supports_multi_table_drop() {
            return Err(Error::Usage(format!(
                "the {} dialect drops exactly one table per statement, got {}",
                self.dialect,
                tables.len()
            )));
        }
        for table in tables {
            require_name("table", table.as_ref())?;
        }

        let names = tables
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        let guard = if if_exists { "IF EXISTS " } else { "" };
        Ok(Statement::bare(format!("DROP TABLE {guard}{names}")))
    }

    /// Builds a `CREATE DATABASE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the name is empty or the dialect has no
    /// databases.
    pub fn create_database(&self, db: &str, if_not_exists: bool) -> Result<Statement> {
        self.require_databases("CREATE DATABASE")?;
        require_name("database", db)?;
        let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
        Ok(Statement::bare(format!("CREATE DATABASE {guard}{db}")))
    }

    /// Builds a `DROP DATABASE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the name is empty or the dialect has no
    /// databases.
    pub fn drop_database(&self, db: &str, if_exists: bool) -> Result<Statement> {
        self.require_databases("DROP DATABASE")?;
        require_name("database", db)?;
        let guard = if if_exists { "IF EXISTS " } else { "" };
        Ok(Statement::bare(format!("DROP DATABASE {guard}{db}")))
    }

    /// Builds a `USE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the name is empty or the dialect has no
    /// databases.
    pub fn use_database(&self, db: &str) -> Result<Statement> {
        self.require_databases("USE")?;
        require_name("database", db)?;
        Ok(Statement::bare(format!("USE {db}")))
    }

    /// Builds the table listing query.
    #[must_use]
    pub fn tables(&self) -> Statement {
        Statement::bare(self.dialect.tables_query().to_string())
    }

    fn require_mutation_limit(&self, verb: &str, limit: Option<u64>) -> Result<()> {
        if limit.is_some() && !self.dialect.supports_mutation_limit() {
            return Err(Error::Usage(format!(
                "the {} dialect does not support LIMIT on {verb}",
                self.dialect
            )));
        }
        Ok(())
    }

    fn require_databases(&self, verb: &str) -> Result<()> {
        if self.dialect.supports_databases() {
            Ok(())
        } else {
            Err(Error::Usage(format!(
                "the {} dialect does not support {verb}",
                self.dialect
            )))
        }
    }
}

fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Usage(format!("{kind} name must not be empty")));
    }
    Ok(())
}
