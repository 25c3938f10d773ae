//! Engine drivers.
//!
//! A [`Driver`] owns one live session with an engine and knows how to run
//! SQL in that engine's paramstyle:
//! - **MySQL**: networked, `%s` placeholders bound client-side (`mysql` feature)
//! - **`SQLite`**: embedded, `?` placeholders bound by the engine
//!
//! Drivers are created by the engine registry and used only through the
//! [`Connection`](crate::Connection) facade.

mod driver;
mod metrics;
pub mod mysql;
pub mod sqlite;

pub use driver::Driver;
pub use metrics::record_statement_metrics;
pub use mysql::MysqlDriver;
pub use sqlite::SqliteDriver;
