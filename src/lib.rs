//! # beesql
//!
//! Boilerplate-free SQL for MySQL and `SQLite`.
//!
//! beesql turns structured calls (insert these fields, select where these
//! conditions hold, drop these tables) into parameterized SQL and runs them
//! through a uniform [`Connection`] over two engines:
//!
//! - **mysql**: networked engine, format paramstyle (`%s`), bound client-side
//! - **sqlite**: embedded file engine, qmark paramstyle (`?`)
//!
//! The statement builder in [`sql`] is pure and can be used on its own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beesql::{ConnectOptions, Fields, Filter, Select};
//!
//! let mut db = beesql::connect(&ConnectOptions::sqlite(":memory:"))?;
//! db.execute("CREATE TABLE beesql_version (version TEXT, release_manager TEXT)", &[])?;
//! db.insert(
//!     "beesql_version",
//!     &Fields::new()
//!         .with("version", "0.1")
//!         .with("release_manager", "Kasun Herath"),
//! )?;
//!
//! let rows = db.select(
//!     &Select::new("beesql_version").filter(Filter::new().and("version", "0.1")),
//! )?;
//! assert_eq!(rows.len(), 1);
//! # Ok::<(), beesql::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod connection;
pub mod engine;
pub mod models;
pub mod observability;
pub mod sql;
pub mod storage;

pub use config::{BeeConfig, ConnectOptions};
pub use connection::Connection;
pub use engine::{Engine, EngineRegistry, connect};
pub use models::{Fields, Row, Value};
pub use sql::{Delete, Dialect, Filter, Select, Statement, StatementBuilder, Update};

/// Error type for beesql operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Configuration` | Unknown engine name, missing credentials or target, bad config file |
/// | `DatabaseOperation` | The driver reports a failure (syntax, constraint, connectivity) |
/// | `Usage` | Caller misuse caught before the driver is touched |
/// | `FeatureNotEnabled` | Connecting to an engine whose cargo feature is off |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The connection could not be configured.
    ///
    /// Raised when:
    /// - The engine name is not registered
    /// - MySQL is missing a username or password
    /// - `SQLite` is missing a database target
    /// - A config file or environment override cannot be parsed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The underlying driver failed while running a statement.
    ///
    /// The driver's message is preserved in `cause`. Never retried.
    #[error("database operation '{operation}' failed: {cause}")]
    DatabaseOperation {
        /// The operation that failed.
        operation: String,
        /// The driver's message.
        cause: String,
    },

    /// The caller misused the API.
    ///
    /// Raised when:
    /// - `insert` or `update` receives no fields
    /// - A table or database name is empty
    /// - A clause is not supported by the connection's dialect
    /// - The connection was already closed
    /// - Placeholder and parameter counts disagree
    #[error("usage error: {0}")]
    Usage(String),

    /// Engine not compiled in.
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for beesql operations.
pub type Result<T> = std::result::Result<T, Error>;
