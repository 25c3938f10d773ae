//! `SQLite` driver.
//!
//! Wraps a single [`rusqlite::Connection`]. Transactions follow the DB-API
//! convention: a data-modifying statement (`INSERT`, `UPDATE`, `DELETE`,
//! `REPLACE`) implicitly opens one when none is active, and it stays open
//! until [`Driver::commit`] or [`Driver::rollback`]. Schema statements run
//! in autocommit mode.

use crate::config::ConnectOptions;
use crate::models::{Row, Value};
use crate::storage::Driver;
use crate::{Error, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use std::time::Duration;

/// In-memory database target.
pub const MEMORY_TARGET: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const IMPLICIT_BEGIN_VERBS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "REPLACE"];

/// Driver for the embedded `SQLite` engine.
#[derive(Debug)]
pub struct SqliteDriver {
    conn: Connection,
}

/// Helper to map engine errors.
fn sqlite_error(operation: &str, e: impl std::fmt::Display) -> Error {
    Error::DatabaseOperation {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}

impl SqliteDriver {
    /// Opens the database named by `options.database`.
    ///
    /// `":memory:"` opens a private in-memory database; any other value is a
    /// file path, created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no database is given, or
    /// [`Error::DatabaseOperation`] if the file cannot be opened.
    #[tracing::instrument(skip(options), fields(database = ?options.database))]
    pub fn open(options: &ConnectOptions) -> Result<Self> {
        let target = options.database_name().ok_or_else(|| {
            Error::Configuration(
                "sqlite requires a database path or \":memory:\"".to_string(),
            )
        })?;

        let conn = if target == MEMORY_TARGET {
            Connection::open_in_memory()
        } else {
            Connection::open(target)
        }
        .map_err(|e| sqlite_error("sqlite_open", e))?;

        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| sqlite_error("sqlite_open", e))?;

        tracing::info!(database = target, "Opened SQLite database");
        Ok(Self { conn })
    }

    fn begin_if_needed(&self, sql: &str) -> Result<()> {
        if self.conn.is_autocommit() && starts_data_modification(sql) {
            self.conn
                .execute_batch("BEGIN")
                .map_err(|e| sqlite_error("sqlite_begin", e))?;
        }
        Ok(())
    }
}

impl Driver for SqliteDriver {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| sqlite_error("sqlite_prepare", e))?;

        let expected = stmt.parameter_count();
        if expected != params.len() {
            return Err(Error::Usage(format!(
                "statement has {expected} placeholders but {} parameters were given",
                params.len()
            )));
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        self.begin_if_needed(sql)?;

        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(|e| sqlite_error("sqlite_execute", e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| sqlite_error("sqlite_execute", e))? {
            let mut decoded = Row::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                let value = row
                    .get_ref(index)
                    .map_err(|e| sqlite_error("sqlite_decode", e))?;
                decoded.push(column.as_str(), from_value_ref(value));
            }
            out.push(decoded);
        }
        Ok(out)
    }

    fn commit(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("COMMIT")
                .map_err(|e| sqlite_error("sqlite_commit", e))?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("ROLLBACK")
                .map_err(|e| sqlite_error("sqlite_rollback", e))?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| sqlite_error("sqlite_close", e))
    }

    fn last_insert_rowid(&self) -> Option<i64> {
        Some(self.conn.last_insert_rowid())
    }
}

fn starts_data_modification(sql: &str) -> bool {
    let verb = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    IMPLICIT_BEGIN_VERBS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(verb))
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(SqlValue::Null),
            Self::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Self::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Self::Real(r) => ToSqlOutput::Owned(SqlValue::Real(*r)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Self::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}
