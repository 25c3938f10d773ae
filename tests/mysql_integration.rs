//! MySQL integration tests.
//!
//! These tests require a running MySQL server. Set the environment variables
//! below to enable them; each test is skipped when `BEESQL_TEST_MYSQL_USER`
//! is unset:
//!
//! ```bash
//! export BEESQL_TEST_MYSQL_USER=root
//! export BEESQL_TEST_MYSQL_PASSWORD=secret
//! export BEESQL_TEST_MYSQL_HOST=127.0.0.1   # optional, default localhost
//! export BEESQL_TEST_MYSQL_PORT=3306        # optional
//! cargo test --features mysql mysql_integration
//! ```
//!
//! Every test works in its own scratch database, dropped afterwards.

// Integration tests use unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::unwrap_used, clippy::panic, clippy::print_stderr)]
#![cfg(feature = "mysql")]

use beesql::{ConnectOptions, Connection, Error, Fields, Filter, Select, Update, Value};
use std::env;
use std::sync::atomic::{AtomicU32, Ordering};

/// Environment variable naming the test user.
const USER_ENV: &str = "BEESQL_TEST_MYSQL_USER";

static DATABASE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Returns connection options if the test server is configured.
fn mysql_options() -> Option<ConnectOptions> {
    let user = env::var(USER_ENV).ok()?;
    let password = env::var("BEESQL_TEST_MYSQL_PASSWORD").unwrap_or_default();
    let mut options = ConnectOptions::mysql(user, password);
    if let Ok(host) = env::var("BEESQL_TEST_MYSQL_HOST") {
        options = options.with_host(host);
    }
    if let Some(port) = env::var("BEESQL_TEST_MYSQL_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
    {
        options = options.with_port(port);
    }
    Some(options)
}

/// Macro to skip tests when MySQL is not available.
macro_rules! require_mysql {
    () => {
        match mysql_options() {
            Some(options) => options,
            None => {
                eprintln!("Skipping test: {USER_ENV} not set.");
                return;
            },
        }
    };
}

/// Connects and switches into a fresh scratch database.
fn scratch(options: &ConnectOptions) -> (Connection, String) {
    let n = DATABASE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db = format!("beesql_test_{}_{n}", std::process::id());
    let mut conn = beesql::connect(options).unwrap();
    conn.create_database(&db, true).unwrap();
    conn.use_database(&db).unwrap();
    conn.execute(
        "CREATE TABLE beesql_version (version VARCHAR(16), release_manager VARCHAR(64), release_year INT)",
        &[],
    )
    .unwrap();
    (conn, db)
}

fn cleanup(mut conn: Connection, db: &str) {
    conn.drop_database(db, true).unwrap();
    conn.close().unwrap();
}

#[test]
fn test_crud_round_trip() {
    let options = require_mysql!();
    let (mut conn, db) = scratch(&options);

    conn.insert(
        "beesql_version",
        &Fields::new()
            .with("version", "0.1")
            .with("release_manager", "O'Brien")
            .with("release_year", 2012),
    )
    .unwrap();

    let row = conn
        .get("beesql_version", &Filter::new().and("version", "0.1"))
        .unwrap()
        .unwrap();
    assert_eq!(row.get("release_manager"), Some(&Value::from("O'Brien")));
    assert_eq!(row.get("release_year"), Some(&Value::Integer(2012)));

    conn.update(
        &Update::new("beesql_version", Fields::new().with("release_year", 2013))
            .and("version", "0.1")
            .limit(1),
    )
    .unwrap();
    let rows = conn
        .select(&Select::new("beesql_version").with_where("release_year = 2013"))
        .unwrap();
    assert_eq!(rows.len(), 1);

    assert_eq!(conn.tables().unwrap(), ["beesql_version"]);
    cleanup(conn, &db);
}

#[test]
fn test_transaction_rollback() {
    let options = require_mysql!();
    let (mut conn, db) = scratch(&options);

    conn.transaction_on();
    conn.insert("beesql_version", &Fields::new().with("version", "0.9"))
        .unwrap();
    conn.rollback().unwrap();
    conn.transaction_off();

    assert!(conn.select(&Select::new("beesql_version")).unwrap().is_empty());
    cleanup(conn, &db);
}

#[test]
fn test_multi_table_drop() {
    let options = require_mysql!();
    let (mut conn, db) = scratch(&options);

    conn.execute("CREATE TABLE other_table (id INT)", &[]).unwrap();
    conn.drop_table(&["beesql_version", "other_table"], false)
        .unwrap();
    assert!(conn.tables().unwrap().is_empty());
    cleanup(conn, &db);
}

#[test]
fn test_bad_credentials() {
    let options = require_mysql!();
    let options = options.with_password("definitely-not-the-password");
    assert!(matches!(
        beesql::connect(&options),
        Err(Error::DatabaseOperation { .. })
    ));
}
