//! Connection parameters.

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

/// Default engine name.
pub const DEFAULT_ENGINE: &str = "mysql";

/// Default host for networked engines.
pub const DEFAULT_HOST: &str = "localhost";

/// Everything needed to open a [`Connection`](crate::Connection).
///
/// Options are forwarded unchanged to the engine's driver, which validates
/// the ones it needs before doing any I/O. The password is kept in a
/// [`SecretString`] so it never shows up in `Debug` output or logs.
///
/// # Examples
///
/// ```
/// use beesql::ConnectOptions;
///
/// let mysql = ConnectOptions::mysql("root", "secret").with_database("app");
/// assert_eq!(mysql.engine, "mysql");
/// assert_eq!(mysql.port, None);
///
/// let sqlite = ConnectOptions::sqlite("app.db");
/// assert_eq!(sqlite.database.as_deref(), Some("app.db"));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Engine name, resolved through the engine registry.
    pub engine: String,
    /// Username (networked engines).
    pub username: Option<String>,
    /// Password (networked engines); `Some("")` is a valid empty password.
    pub password: Option<SecretString>,
    /// Host (networked engines).
    pub host: String,
    /// Port; `None` means the engine default.
    pub port: Option<u16>,
    /// Database to select after connecting, or the `SQLite` file path.
    pub database: Option<String>,
    /// Unix socket path; replaces host and port when set.
    pub unix_socket: Option<PathBuf>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            username: None,
            password: None,
            host: DEFAULT_HOST.to_string(),
            port: None,
            database: None,
            unix_socket: None,
        }
    }
}

impl ConnectOptions {
    /// Creates options for a named engine with defaults elsewhere.
    #[must_use]
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            ..Self::default()
        }
    }

    /// MySQL options with credentials.
    #[must_use]
    pub fn mysql(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new("mysql")
            .with_username(username)
            .with_password(password)
    }

    /// `SQLite` options for a file path or `":memory:"`.
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self::new("sqlite").with_database(path)
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the database (or `SQLite` file).
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the unix socket.
    #[must_use]
    pub fn with_unix_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.unix_socket = Some(path.into());
        self
    }

    /// The password, exposed for handing to a driver.
    pub(crate) fn password_str(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.expose_secret())
    }

    /// The database option, if set and non-empty.
    pub(crate) fn database_name(&self) -> Option<&str> {
        self.database.as_deref().filter(|d| !d.is_empty())
    }
}
