//! Driver trait.

use crate::Result;
use crate::models::{Row, Value};

/// A live session with one database engine.
///
/// Drivers receive SQL already written in their dialect's paramstyle and
/// the parameters in placeholder order. They are the only place where
/// engine errors are converted into [`Error`](crate::Error) values.
pub trait Driver: Send {
    /// Runs one statement and returns every result row.
    ///
    /// Statements that produce no result set return an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseOperation`](crate::Error::DatabaseOperation)
    /// if the engine rejects the statement, or
    /// [`Error::Usage`](crate::Error::Usage) if the placeholder and
    /// parameter counts disagree.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Commits the open transaction, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses the commit.
    fn commit(&mut self) -> Result<()>;

    /// Rolls back the open transaction, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses the rollback.
    fn rollback(&mut self) -> Result<()>;

    /// Closes the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine reports a failure while closing.
    fn close(self: Box<Self>) -> Result<()>;

    /// Row id of the most recent successful insert, for engines that track one.
    fn last_insert_rowid(&self) -> Option<i64> {
        None
    }
}
