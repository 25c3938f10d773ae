//! Configuration management.
//!
//! Connection options come from, in increasing precedence: defaults, a TOML
//! config file, `BEESQL_*` environment variables, and finally whatever the
//! caller (or CLI flags) sets directly on [`ConnectOptions`].
//!
//! ```toml
//! [connection]
//! engine = "mysql"
//! username = "root"
//! password = "secret"
//! host = "db.internal"
//! port = 3307
//! database = "app"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

mod connect;

pub use connect::{ConnectOptions, DEFAULT_ENGINE, DEFAULT_HOST};

use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for beesql.
#[derive(Debug, Clone, Default)]
pub struct BeeConfig {
    /// Connection options.
    pub connection: ConnectOptions,
    /// Logging section, if present in the file.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Connection section.
    pub connection: Option<ConfigFileConnection>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Connection section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileConnection {
    /// Engine name.
    pub engine: Option<String>,
    /// Username.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Host.
    pub host: Option<String>,
    /// Port.
    pub port: Option<u16>,
    /// Database name or `SQLite` path.
    pub database: Option<String>,
    /// Unix socket path.
    pub unix_socket: Option<PathBuf>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `"info"` or `"beesql=debug"`.
    pub level: Option<String>,
    /// `"pretty"` or `"json"`.
    pub format: Option<String>,
}

impl BeeConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("invalid config file {}: {e}", path.display()))
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on malformed TOML or unknown keys.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| Error::Configuration(format!("invalid config file: {e}")))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `beesql/config.toml` in the platform config directory and
    /// falls back to defaults when it is missing or unreadable.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            },
        }
    }

    /// Path of the default config file, if a home directory is known.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("beesql").join("config.toml"))
    }

    /// Applies `BEESQL_*` environment variable overrides.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `BEESQL_ENGINE` | engine |
    /// | `BEESQL_USERNAME` | username |
    /// | `BEESQL_PASSWORD` | password |
    /// | `BEESQL_HOST` | host |
    /// | `BEESQL_PORT` | port |
    /// | `BEESQL_DATABASE` | database |
    /// | `BEESQL_UNIX_SOCKET` | unix socket |
    /// | `BEESQL_LOG_FORMAT` | logging format |
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `BEESQL_PORT` is not a port number.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup (the environment in
    /// production, a map in tests).
    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let conn = &mut self.connection;
        if let Some(engine) = lookup("BEESQL_ENGINE") {
            conn.engine = engine;
        }
        if let Some(username) = lookup("BEESQL_USERNAME") {
            conn.username = Some(username);
        }
        if let Some(password) = lookup("BEESQL_PASSWORD") {
            conn.password = Some(SecretString::from(password));
        }
        if let Some(host) = lookup("BEESQL_HOST") {
            conn.host = host;
        }
        if let Some(port) = lookup("BEESQL_PORT") {
            let port = port.parse::<u16>().map_err(|e| {
                Error::Configuration(format!("BEESQL_PORT must be a port number: {e}"))
            })?;
            conn.port = Some(port);
        }
        if let Some(database) = lookup("BEESQL_DATABASE") {
            conn.database = Some(database);
        }
        if let Some(socket) = lookup("BEESQL_UNIX_SOCKET") {
            conn.unix_socket = Some(PathBuf::from(socket));
        }
        if let Some(format) = lookup("BEESQL_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        Ok(self)
    }

    /// Converts a `ConfigFile` to `BeeConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(conn) = file.connection {
            if let Some(engine) = conn.engine {
                config.connection.engine = engine;
            }
            config.connection.username = conn.username;
            if let Some(password) = conn.password {
                config.connection.password = Some(SecretString::from(password));
            }
            if let Some(host) = conn.host {
                config.connection.host = host;
            }
            config.connection.port = conn.port;
            config.connection.database = conn.database;
            config.connection.unix_socket = conn.unix_socket;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}
