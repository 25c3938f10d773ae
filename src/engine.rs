//! Engine resolution.
//!
//! Engines are looked up by name in an [`EngineRegistry`], a fixed table
//! built at compile time. The registry maps a name to the driver
//! constructor for that engine; connection options are forwarded to the
//! constructor unchanged.

use crate::config::ConnectOptions;
use crate::connection::Connection;
use crate::sql::Dialect;
use crate::storage::{Driver, MysqlDriver, SqliteDriver};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A supported database engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Networked MySQL server.
    MySql,
    /// Embedded `SQLite` file.
    Sqlite,
}

impl Engine {
    /// Every engine, in registry order.
    pub const ALL: [Self; 2] = [Self::MySql, Self::Sqlite];

    /// The name used to select this engine.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// The SQL dialect this engine speaks.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        match self {
            Self::MySql => Dialect::MySql,
            Self::Sqlite => Dialect::Sqlite,
        }
    }

    /// Default port for networked engines.
    #[must_use]
    pub const fn default_port(&self) -> Option<u16> {
        match self {
            Self::MySql => Some(crate::storage::mysql::DEFAULT_PORT),
            Self::Sqlite => None,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("invalid engine: {s}")))
    }
}

type OpenDriver = fn(&ConnectOptions) -> Result<Box<dyn Driver>>;

#[derive(Clone, Copy)]
struct RegistryEntry {
    engine: Engine,
    open: OpenDriver,
}

fn open_mysql(options: &ConnectOptions) -> Result<Box<dyn Driver>> {
    Ok(Box::new(MysqlDriver::connect(options)?))
}

fn open_sqlite(options: &ConnectOptions) -> Result<Box<dyn Driver>> {
    Ok(Box::new(SqliteDriver::open(options)?))
}

const STANDARD_ENTRIES: &[RegistryEntry] = &[
    RegistryEntry {
        engine: Engine::MySql,
        open: open_mysql,
    },
    RegistryEntry {
        engine: Engine::Sqlite,
        open: open_sqlite,
    },
];

/// The process-wide standard registry.
pub static STANDARD_REGISTRY: EngineRegistry = EngineRegistry::standard();

/// Maps engine names to driver constructors.
#[derive(Clone, Copy)]
pub struct EngineRegistry {
    entries: &'static [RegistryEntry],
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngineRegistry {
    /// The registry of every engine this build knows about.
    ///
    /// `mysql` is always listed; connecting to it without the `mysql` cargo
    /// feature fails with [`Error::FeatureNotEnabled`].
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            entries: STANDARD_ENTRIES,
        }
    }

    /// Registered engine names, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.engine.as_str())
    }

    /// Resolves an engine by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] (`"invalid engine: <name>"`) if no
    /// engine is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Engine> {
        self.entry(name).map(|entry| entry.engine)
    }

    /// Opens a connection to the engine named in `options.engine`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an unknown engine or invalid
    /// options, [`Error::FeatureNotEnabled`] if the engine is compiled out,
    /// and [`Error::DatabaseOperation`] if the engine cannot be reached.
    #[tracing::instrument(skip(self, options), fields(engine = %options.engine))]
    pub fn connect(&self, options: &ConnectOptions) -> Result<Connection> {
        let entry = self.entry(&options.engine)?;
        let driver = (entry.open)(options)?;
        Ok(Connection::new(entry.engine, driver))
    }

    fn entry(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.engine.as_str() == name)
            .ok_or_else(|| Error::Configuration(format!("invalid engine: {name}")))
    }
}

/// Opens a connection using the standard registry.
///
/// # Errors
///
/// See [`EngineRegistry::connect`].
pub fn connect(options: &ConnectOptions) -> Result<Connection> {
    STANDARD_REGISTRY.connect(options)
}
