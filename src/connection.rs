//! Connection facade.
//!
//! [`Connection`] pairs a live [`Driver`] with a [`StatementBuilder`] for
//! the engine's dialect. Every structured operation builds a statement and
//! runs it through [`Connection::execute`], which commits after each
//! statement unless transaction mode is on.
//!
//! A connection is either open or closed. [`Connection::close`] moves it to
//! closed (repeated calls are no-ops) and every other operation on a closed
//! connection fails with [`Error::Usage`]. Dropping an open connection
//! closes it.

use crate::engine::Engine;
use crate::models::{Fields, Row, Value};
use crate::sql::{Delete, Dialect, Filter, Select, Statement, StatementBuilder, Update};
use crate::storage::{Driver, record_statement_metrics};
use crate::{Error, Result};
use std::time::Instant;
use tracing::instrument;

/// An open session with one engine.
pub struct Connection {
    engine: Engine,
    builder: StatementBuilder,
    driver: Option<Box<dyn Driver>>,
    in_transaction: bool,
    last_statement: Option<Statement>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("engine", &self.engine)
            .field("closed", &self.is_closed())
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}

impl Connection {
    pub(crate) fn new(engine: Engine, driver: Box<dyn Driver>) -> Self {
        Self {
            engine,
            builder: StatementBuilder::new(engine.dialect()),
            driver: Some(driver),
            in_transaction: false,
            last_statement: None,
        }
    }

    /// The engine this connection talks to.
    #[must_use]
    pub const fn engine(&self) -> Engine {
        self.engine
    }

    /// The SQL dialect used for built statements.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.builder.dialect()
    }

    /// The statement builder for this connection's dialect.
    #[must_use]
    pub const fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    /// Runs raw SQL with parameters in the dialect's paramstyle.
    ///
    /// Commits afterwards unless transaction mode is on. Statements without
    /// a result set return an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the connection is closed or the
    /// placeholder and parameter counts disagree, and
    /// [`Error::DatabaseOperation`] if the engine rejects the statement.
    #[instrument(skip(self, sql, params), fields(engine = %self.engine, sql = %sql))]
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let engine = self.engine.as_str();
        let in_transaction = self.in_transaction;
        let driver = self.driver_mut()?;

        let start = Instant::now();
        let result = driver.execute(sql, params).and_then(|rows| {
            if !in_transaction {
                driver.commit()?;
            }
            Ok(rows)
        });
        // Outside transaction mode a failure must not leave an implicit
        // transaction (and its write lock) open.
        if result.is_err()
            && !in_transaction
            && let Err(e) = driver.rollback()
        {
            tracing::warn!(error = %e, "Rollback after failed statement failed");
        }
        let status = if result.is_ok() { "success" } else { "error" };
        record_statement_metrics(engine, start, status);

        match &result {
            Ok(rows) => tracing::debug!(
                rows = rows.len(),
                params = params.len(),
                "Executed statement"
            ),
            Err(e) => tracing::debug!(error = %e, "Statement failed"),
        }

        self.last_statement = Some(Statement::new(sql.to_string(), params.to_vec()));
        result
    }

    /// Runs a built statement.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub fn run(&mut self, statement: &Statement) -> Result<Vec<Row>> {
        self.execute(statement.sql(), statement.params())
    }

    /// Fetches the first row matching `filter`, or `None`.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub fn get(&mut self, table: &str, filter: &Filter) -> Result<Option<Row>> {
        self.ensure_open()?;
        let statement = self.builder.get(table, filter)?;
        Ok(self.run(&statement)?.into_iter().next())
    }

    /// Runs a `SELECT`.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`]; also [`Error::Usage`] for an empty
    /// table name.
    pub fn select(&mut self, query: &Select) -> Result<Vec<Row>> {
        self.ensure_open()?;
        let statement = self.builder.select(query)?;
        self.run(&statement)
    }

    /// Inserts one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if `values` is empty; otherwise see
    /// [`Connection::execute`].
    pub fn insert(&mut self, table: &str, values: &Fields) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.insert(table, values)?;
        self.run(&statement).map(drop)
    }

    /// Runs an `UPDATE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if there is nothing to set or the dialect
    /// cannot limit updates; otherwise see [`Connection::execute`].
    pub fn update(&mut self, update: &Update) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.update(update)?;
        self.run(&statement).map(drop)
    }

    /// Runs a `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the dialect cannot limit deletes;
    /// otherwise see [`Connection::execute`].
    pub fn delete(&mut self, delete: &Delete) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.delete(delete)?;
        self.run(&statement).map(drop)
    }

    /// Removes every row from `table`.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub fn truncate(&mut self, table: &str) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.truncate(table)?;
        self.run(&statement).map(drop)
    }

    /// Drops one or more tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for an empty list, or for several tables on
    /// `SQLite`; otherwise see [`Connection::execute`].
    pub fn drop_table<S: AsRef<str>>(&mut self, tables: &[S], if_exists: bool) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.drop_table(tables, if_exists)?;
        self.run(&statement).map(drop)
    }

    /// Creates a database (MySQL).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] on `SQLite`; otherwise see
    /// [`Connection::execute`].
    pub fn create_database(&mut self, db: &str, if_not_exists: bool) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.create_database(db, if_not_exists)?;
        self.run(&statement).map(drop)
    }

    /// Drops a database (MySQL).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] on `SQLite`; otherwise see
    /// [`Connection::execute`].
    pub fn drop_database(&mut self, db: &str, if_exists: bool) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.drop_database(db, if_exists)?;
        self.run(&statement).map(drop)
    }

    /// Switches the session's current database (MySQL).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] on `SQLite`; otherwise see
    /// [`Connection::execute`].
    pub fn use_database(&mut self, db: &str) -> Result<()> {
        self.ensure_open()?;
        let statement = self.builder.use_database(db)?;
        self.run(&statement).map(drop)
    }

    /// Lists table names in the current database.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub fn tables(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let statement = self.builder.tables();
        let rows = self.run(&statement)?;
        Ok(rows
            .into_iter()
            .filter_map(Row::into_first)
            .map(|value| match value {
                Value::Text(name) => name,
                other => other.to_string(),
            })
            .collect())
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if closed, or the engine's commit failure.
    pub fn commit(&mut self) -> Result<()> {
        self.driver_mut()?.commit()
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if closed, or the engine's rollback failure.
    pub fn rollback(&mut self) -> Result<()> {
        self.driver_mut()?.rollback()
    }

    /// Turns transaction mode on: statements are no longer committed
    /// individually.
    pub fn transaction_on(&mut self) {
        self.in_transaction = true;
    }

    /// Turns transaction mode off. Does not commit pending work.
    pub fn transaction_off(&mut self) {
        self.in_transaction = false;
    }

    /// Whether transaction mode is on.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Closes the connection. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the engine's failure while closing; the connection is closed
    /// either way.
    pub fn close(&mut self) -> Result<()> {
        let Some(driver) = self.driver.take() else {
            return Ok(());
        };
        tracing::info!(engine = %self.engine, "Closing connection");
        driver.close()
    }

    /// Whether [`Connection::close`] has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.driver.is_none()
    }

    /// SQL text of the most recently executed statement.
    #[must_use]
    pub fn last_sql(&self) -> Option<&str> {
        self.last_statement.as_ref().map(Statement::sql)
    }

    /// Parameters of the most recently executed statement.
    #[must_use]
    pub fn last_params(&self) -> Option<&[Value]> {
        self.last_statement.as_ref().map(Statement::params)
    }

    /// Row id of the most recent insert (`SQLite` only).
    #[must_use]
    pub fn last_insert_rowid(&self) -> Option<i64> {
        if !self.dialect().supports_last_insert_rowid() {
            return None;
        }
        self.driver.as_ref().and_then(|d| d.last_insert_rowid())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(closed_error());
        }
        Ok(())
    }

    fn driver_mut(&mut self) -> Result<&mut Box<dyn Driver>> {
        self.driver.as_mut().ok_or_else(closed_error)
    }
}

fn closed_error() -> Error {
    Error::Usage("connection is closed".to_string())
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Failed to close connection on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectOptions;
    use std::sync::{Arc, Mutex};

    fn memory() -> Connection {
        let mut conn = crate::connect(&ConnectOptions::sqlite(":memory:")).unwrap();
        conn.execute(
            "CREATE TABLE beesql_version (version TEXT, release_manager TEXT)",
            &[],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_connection_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Connection>();
    }

    #[test]
    fn test_insert_and_get() {
        let mut conn = memory();
        conn.insert(
            "beesql_version",
            &Fields::new()
                .with("version", "0.1")
                .with("release_manager", "Kasun Herath"),
        )
        .unwrap();

        let row = conn
            .get("beesql_version", &Filter::new().and("version", "0.1"))
            .unwrap()
            .unwrap();
        assert_eq!(row.get("release_manager"), Some(&Value::from("Kasun Herath")));

        let missing = conn
            .get("beesql_version", &Filter::new().and("version", "9.9"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_last_statement_recorded() {
        let mut conn = memory();
        conn.select(&Select::new("beesql_version").and("version", "0.1"))
            .unwrap();
        assert_eq!(
            conn.last_sql(),
            Some("SELECT * FROM beesql_version WHERE version=?")
        );
        assert_eq!(conn.last_params(), Some(&[Value::from("0.1")][..]));
    }

    #[test]
    fn test_transaction_rollback() {
        let mut conn = memory();
        conn.transaction_on();
        assert!(conn.in_transaction());
        conn.insert("beesql_version", &Fields::new().with("version", "0.2"))
            .unwrap();
        conn.rollback().unwrap();
        conn.transaction_off();

        let rows = conn.select(&Select::new("beesql_version")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_autocommit_persists() {
        let mut conn = memory();
        conn.insert("beesql_version", &Fields::new().with("version", "0.2"))
            .unwrap();
        conn.rollback().unwrap();
        let rows = conn.select(&Select::new("beesql_version")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_tables() {
        let mut conn = memory();
        assert_eq!(conn.tables().unwrap(), ["beesql_version"]);
    }

    #[test]
    fn test_close_idempotent_and_use_after_close() {
        let mut conn = memory();
        conn.close().unwrap();
        conn.close().unwrap();
        assert!(conn.is_closed());
        assert!(matches!(conn.tables(), Err(Error::Usage(_))));
        assert!(matches!(conn.execute("SELECT 1", &[]), Err(Error::Usage(_))));
        assert!(matches!(conn.commit(), Err(Error::Usage(_))));
        assert_eq!(conn.last_insert_rowid(), None);
    }

    #[test]
    fn test_dialect_rejections_do_not_reach_driver() {
        let mut conn = memory();
        assert!(matches!(
            conn.use_database("app"),
            Err(Error::Usage(_))
        ));
        assert!(matches!(
            conn.insert("beesql_version", &Fields::new()),
            Err(Error::Usage(_))
        ));
        assert_eq!(conn.last_sql(), Some(
            "CREATE TABLE beesql_version (version TEXT, release_manager TEXT)"
        ));
    }

    /// Driver that records each call and fails statements containing `FAIL`.
    struct RecordingDriver {
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Driver for RecordingDriver {
        fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<Vec<Row>> {
            self.calls.lock().unwrap().push("execute");
            if sql.contains("FAIL") {
                return Err(Error::DatabaseOperation {
                    operation: "recording_execute".to_string(),
                    cause: "rejected".to_string(),
                });
            }
            Ok(Vec::new())
        }

        fn commit(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push("commit");
            Ok(())
        }

        fn rollback(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push("rollback");
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }

        fn last_insert_rowid(&self) -> Option<i64> {
            Some(7)
        }
    }

    fn recording(engine: Engine) -> (Connection, Arc<Mutex<Vec<&'static str>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let driver = RecordingDriver {
            calls: Arc::clone(&calls),
        };
        (Connection::new(engine, Box::new(driver)), calls)
    }

    #[test]
    fn test_failed_statement_rolls_back_outside_transaction() {
        let (mut conn, calls) = recording(Engine::MySql);
        conn.execute("SELECT 1", &[]).unwrap();
        assert!(conn.execute("FAIL", &[]).is_err());
        assert_eq!(
            *calls.lock().unwrap(),
            ["execute", "commit", "execute", "rollback"]
        );
    }

    #[test]
    fn test_failed_statement_in_transaction_is_left_to_caller() {
        let (mut conn, calls) = recording(Engine::MySql);
        conn.transaction_on();
        assert!(conn.execute("FAIL", &[]).is_err());
        assert_eq!(*calls.lock().unwrap(), ["execute"]);
    }

    #[test]
    fn test_last_insert_rowid_follows_dialect() {
        let (conn, _) = recording(Engine::MySql);
        assert_eq!(conn.last_insert_rowid(), None);
        let (conn, _) = recording(Engine::Sqlite);
        assert_eq!(conn.last_insert_rowid(), Some(7));
    }
}
