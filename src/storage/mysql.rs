//! MySQL driver.
//!
//! Uses `sqlx` over the text protocol. Parameters are bound client-side:
//! each `%s` in the statement is replaced by the escaped literal of the next
//! parameter (see [`interpolate`](crate::sql::interpolate)), so the engine
//! only ever receives complete SQL text.
//!
//! The driver is blocking. It owns a current-thread `tokio` runtime that is
//! used only to drive its own socket; calling it from inside another `tokio`
//! runtime is not supported.

use crate::config::ConnectOptions;
use crate::{Error, Result};

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Credentials checked before any I/O.
fn credentials(options: &ConnectOptions) -> Result<(&str, &str)> {
    let username = options
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Configuration("mysql requires a username".to_string()))?;
    let password = options
        .password_str()
        .ok_or_else(|| Error::Configuration("mysql requires a password".to_string()))?;
    Ok((username, password))
}

#[cfg(feature = "mysql")]
mod implementation {
    use super::{DEFAULT_PORT, credentials};
    use crate::config::ConnectOptions;
    use crate::models::{Row, Value};
    use crate::sql::interpolate;
    use crate::storage::Driver;
    use crate::{Error, Result};
    use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
    use sqlx::{Column, ConnectOptions as _, Connection as _, Row as _, TypeInfo, ValueRef};
    use tokio::runtime::Runtime;

    const INTEGER_TYPES: [&str; 6] = ["TINYINT", "SMALLINT", "MEDIUMINT", "INT", "INTEGER", "BIGINT"];
    const REAL_TYPES: [&str; 2] = ["FLOAT", "DOUBLE"];
    const BINARY_TYPES: [&str; 7] = [
        "BINARY",
        "VARBINARY",
        "BLOB",
        "TINYBLOB",
        "MEDIUMBLOB",
        "LONGBLOB",
        "BIT",
    ];

    /// Driver for the networked MySQL engine.
    pub struct MysqlDriver {
        runtime: Runtime,
        conn: MySqlConnection,
    }

    impl std::fmt::Debug for MysqlDriver {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MysqlDriver").finish_non_exhaustive()
        }
    }

    /// Helper to map engine errors.
    fn mysql_error(operation: &str, e: impl std::fmt::Display) -> Error {
        Error::DatabaseOperation {
            operation: operation.to_string(),
            cause: e.to_string(),
        }
    }

    impl MysqlDriver {
        /// Connects and opens a session with autocommit disabled.
        ///
        /// When `options.unix_socket` is set it replaces host and port. When
        /// `options.database` is set that database is selected on connect.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Configuration`] if the username is missing or
        /// empty or the password is unset, and
        /// [`Error::DatabaseOperation`] if the server cannot be reached or
        /// rejects the login.
        #[tracing::instrument(skip(options), fields(host = %options.host, port = ?options.port))]
        pub fn connect(options: &ConnectOptions) -> Result<Self> {
            let (username, password) = credentials(options)?;

            let mut connect_options = MySqlConnectOptions::new()
                .username(username)
                .password(password)
                .host(&options.host)
                .port(options.port.unwrap_or(DEFAULT_PORT));
            if let Some(socket) = &options.unix_socket {
                connect_options = connect_options.socket(socket);
            }
            if let Some(database) = options.database_name() {
                connect_options = connect_options.database(database);
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| mysql_error("mysql_create_runtime", e))?;

            let mut conn = runtime
                .block_on(connect_options.connect())
                .map_err(|e| mysql_error("mysql_connect", e))?;
            runtime
                .block_on(sqlx::raw_sql("SET autocommit=0").execute(&mut conn))
                .map_err(|e| mysql_error("mysql_connect", e))?;

            tracing::info!(
                host = %options.host,
                database = ?options.database_name(),
                "Connected to MySQL"
            );
            Ok(Self { runtime, conn })
        }

        fn run(&mut self, operation: &str, sql: &str) -> Result<Vec<MySqlRow>> {
            self.runtime
                .block_on(sqlx::raw_sql(sql).fetch_all(&mut self.conn))
                .map_err(|e| mysql_error(operation, e))
        }
    }

    impl Driver for MysqlDriver {
        fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
            let sql = interpolate(sql, params)?;
            let rows = self.run("mysql_execute", &sql)?;
            rows.iter().map(decode_row).collect()
        }

        fn commit(&mut self) -> Result<()> {
            self.run("mysql_commit", "COMMIT").map(drop)
        }

        fn rollback(&mut self) -> Result<()> {
            self.run("mysql_rollback", "ROLLBACK").map(drop)
        }

        fn close(self: Box<Self>) -> Result<()> {
            let Self { runtime, conn } = *self;
            runtime
                .block_on(conn.close())
                .map_err(|e| mysql_error("mysql_close", e))
        }
    }

    fn decode_row(row: &MySqlRow) -> Result<Row> {
        let mut decoded = Row::with_capacity(row.columns().len());
        for (index, column) in row.columns().iter().enumerate() {
            let raw = row
                .try_get_raw(index)
                .map_err(|e| mysql_error("mysql_decode", e))?;
            let value = if raw.is_null() {
                Value::Null
            } else {
                decode_value(row, index, column.type_info().name())?
            };
            decoded.push(column.name(), value);
        }
        Ok(decoded)
    }

    /// Decodes a non-null text-protocol value by its column type.
    ///
    /// Integers that overflow `i64` (large `BIGINT UNSIGNED`) and `DECIMAL`
    /// values stay text so no precision is lost.
    fn decode_value(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value> {
        let base = type_name.split_whitespace().next().unwrap_or_default();

        if BINARY_TYPES.contains(&base) {
            let bytes: Vec<u8> = row
                .try_get_unchecked(index)
                .map_err(|e| mysql_error("mysql_decode", e))?;
            return Ok(Value::Blob(bytes));
        }

        let text: String = row
            .try_get_unchecked(index)
            .map_err(|e| mysql_error("mysql_decode", e))?;
        Ok(text_to_value(base, text))
    }

    pub(super) fn text_to_value(base: &str, text: String) -> Value {
        if base == "BOOLEAN" {
            return Value::Bool(text != "0");
        }
        if INTEGER_TYPES.contains(&base) {
            return text.parse().map_or(Value::Text(text), Value::Integer);
        }
        if REAL_TYPES.contains(&base) {
            return text.parse().map_or(Value::Text(text), Value::Real);
        }
        Value::Text(text)
    }
}

#[cfg(feature = "mysql")]
pub use implementation::MysqlDriver;

#[cfg(not(feature = "mysql"))]
mod stub {
    use super::credentials;
    use crate::config::ConnectOptions;
    use crate::models::{Row, Value};
    use crate::storage::Driver;
    use crate::{Error, Result};

    /// Stub MySQL driver when the `mysql` feature is not enabled.
    #[derive(Debug)]
    pub struct MysqlDriver {
        _private: (),
    }

    fn not_enabled() -> Error {
        Error::FeatureNotEnabled("mysql".to_string())
    }

    impl MysqlDriver {
        /// Validates credentials, then fails: MySQL support is compiled out.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Configuration`] for missing credentials and
        /// [`Error::FeatureNotEnabled`] otherwise.
        pub fn connect(options: &ConnectOptions) -> Result<Self> {
            credentials(options)?;
            Err(not_enabled())
        }
    }

    impl Driver for MysqlDriver {
        fn execute(&mut self, _sql: &str, _params: &[Value]) -> Result<Vec<Row>> {
            Err(not_enabled())
        }

        fn commit(&mut self) -> Result<()> {
            Err(not_enabled())
        }

        fn rollback(&mut self) -> Result<()> {
            Err(not_enabled())
        }

        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }
}

#[cfg(not(feature = "mysql"))]
pub use stub::MysqlDriver;
