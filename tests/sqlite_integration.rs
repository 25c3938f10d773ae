//! `SQLite` integration tests.
//!
//! Exercises the full connection facade against in-memory and file-backed
//! databases:
//! - Structured CRUD through the statement builder
//! - Transaction mode and rollback
//! - Table listing and introspection
//! - Closed-connection behavior
//! - Engine resolution failures

// Integration tests use unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::unwrap_used, clippy::panic)]

use beesql::sql::Direction;
use beesql::{
    ConnectOptions, Connection, Delete, EngineRegistry, Error, Fields, Filter, Select, Update,
    Value,
};
use tempfile::TempDir;

const CREATE_VERSION_TABLE: &str =
    "CREATE TABLE beesql_version (version TEXT, release_manager TEXT, release_year INTEGER)";

fn memory_connection() -> Connection {
    let mut conn = beesql::connect(&ConnectOptions::sqlite(":memory:")).unwrap();
    conn.execute(CREATE_VERSION_TABLE, &[]).unwrap();
    conn
}

fn release(version: &str, manager: &str, year: i64) -> Fields {
    Fields::new()
        .with("version", version)
        .with("release_manager", manager)
        .with("release_year", year)
}

fn seed(conn: &mut Connection) {
    conn.insert("beesql_version", &release("0.1", "Kasun Herath", 2012))
        .unwrap();
    conn.insert("beesql_version", &release("0.2", "John Doe", 2013))
        .unwrap();
    conn.insert("beesql_version", &release("0.3", "John Doe", 2014))
        .unwrap();
}

// ============================================================================
// CRUD
// ============================================================================

#[test]
fn test_select_with_conditions() {
    let mut conn = memory_connection();
    seed(&mut conn);

    let rows = conn
        .select(
            &Select::new("beesql_version")
                .column("version")
                .and("release_manager", "John Doe")
                .order_by(["version"])
                .order_direction(Direction::Desc),
        )
        .unwrap();
    let versions: Vec<_> = rows
        .iter()
        .map(|row| row.get("version").unwrap().clone())
        .collect();
    assert_eq!(versions, [Value::from("0.3"), Value::from("0.2")]);
}

#[test]
fn test_select_distinct_and_where_text() {
    let mut conn = memory_connection();
    seed(&mut conn);

    let rows = conn
        .select(
            &Select::new("beesql_version")
                .column("release_manager")
                .distinct()
                .with_where("release_year > 2012"),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get("release_manager"),
        Some(&Value::from("John Doe"))
    );
}

#[test]
fn test_group_by_having() {
    let mut conn = memory_connection();
    seed(&mut conn);

    let rows = conn
        .select(
            &Select::new("beesql_version")
                .columns(["release_manager", "COUNT(*) AS releases"])
                .group_by(["release_manager"])
                .having("COUNT(*) > 1"),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("releases"), Some(&Value::Integer(2)));
}

#[test]
fn test_get_returns_none_on_no_match() {
    let mut conn = memory_connection();
    seed(&mut conn);

    let row = conn
        .get("beesql_version", &Filter::new().and("version", "0.1"))
        .unwrap()
        .unwrap();
    assert_eq!(row.get("release_year"), Some(&Value::Integer(2012)));

    let missing = conn
        .get("beesql_version", &Filter::raw("version = '9.9'"))
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_update_and_delete() {
    let mut conn = memory_connection();
    seed(&mut conn);

    conn.update(
        &Update::new("beesql_version", Fields::new().with("release_manager", "Jane Roe"))
            .and("version", "0.2"),
    )
    .unwrap();
    let row = conn
        .get("beesql_version", &Filter::new().and("version", "0.2"))
        .unwrap()
        .unwrap();
    assert_eq!(row.get("release_manager"), Some(&Value::from("Jane Roe")));

    conn.delete(&Delete::new("beesql_version").with_where("release_year < 2014"))
        .unwrap();
    let rows = conn.select(&Select::new("beesql_version")).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_truncate() {
    let mut conn = memory_connection();
    seed(&mut conn);
    conn.truncate("beesql_version").unwrap();
    assert!(conn.select(&Select::new("beesql_version")).unwrap().is_empty());
}

#[test]
fn test_sqlite_only_rejections() {
    let mut conn = memory_connection();
    assert!(matches!(
        conn.update(&Update::new("beesql_version", Fields::new().with("version", "1")).limit(1)),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        conn.drop_table(&["beesql_version", "other"], true),
        Err(Error::Usage(_))
    ));
    assert!(matches!(conn.create_database("app", true), Err(Error::Usage(_))));
}

#[test]
fn test_engine_error_is_database_operation() {
    let mut conn = memory_connection();
    let err = conn
        .insert("missing_table", &Fields::new().with("a", 1))
        .unwrap_err();
    match err {
        Error::DatabaseOperation { cause, .. } => assert!(cause.contains("missing_table")),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_transaction_rollback_discards_inserts() {
    let mut conn = memory_connection();
    conn.transaction_on();
    seed(&mut conn);
    conn.rollback().unwrap();
    conn.transaction_off();

    assert!(conn.select(&Select::new("beesql_version")).unwrap().is_empty());
}

#[test]
fn test_transaction_commit_keeps_inserts() {
    let mut conn = memory_connection();
    conn.transaction_on();
    seed(&mut conn);
    conn.commit().unwrap();
    conn.rollback().unwrap();
    conn.transaction_off();

    assert_eq!(conn.select(&Select::new("beesql_version")).unwrap().len(), 3);
}

// ============================================================================
// Introspection
// ============================================================================

#[test]
fn test_tables_lists_exactly_created_table() {
    let mut conn = memory_connection();
    assert_eq!(conn.tables().unwrap(), ["beesql_version"]);

    conn.drop_table(&["beesql_version"], false).unwrap();
    assert!(conn.tables().unwrap().is_empty());
}

#[test]
fn test_last_statement_and_rowid() {
    let mut conn = beesql::connect(&ConnectOptions::sqlite(":memory:")).unwrap();
    conn.execute(
        "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
        &[],
    )
    .unwrap();
    conn.insert("items", &Fields::new().with("name", "first"))
        .unwrap();
    conn.insert("items", &Fields::new().with("name", "second"))
        .unwrap();

    assert_eq!(conn.last_sql(), Some("INSERT INTO items (name) VALUES (?)"));
    assert_eq!(conn.last_params(), Some(&[Value::from("second")][..]));
    assert_eq!(conn.last_insert_rowid(), Some(2));
}

#[test]
fn test_raw_execute_with_params() {
    let mut conn = memory_connection();
    seed(&mut conn);
    let rows = conn
        .execute(
            "SELECT COUNT(*) AS n FROM beesql_version WHERE release_year >= ?",
            &[Value::Integer(2013)],
        )
        .unwrap();
    assert_eq!(rows[0].get("n"), Some(&Value::Integer(2)));

    assert!(matches!(
        conn.execute("SELECT * FROM beesql_version WHERE version = ?", &[]),
        Err(Error::Usage(_))
    ));
}

// ============================================================================
// Files and lifecycle
// ============================================================================

#[test]
fn test_file_database_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("beesql.db");
    let options = ConnectOptions::sqlite(path.to_string_lossy());

    {
        let mut conn = beesql::connect(&options).unwrap();
        conn.execute(CREATE_VERSION_TABLE, &[]).unwrap();
        conn.insert("beesql_version", &release("0.1", "Kasun Herath", 2012))
            .unwrap();
        conn.close().unwrap();
    }

    let mut conn = beesql::connect(&options).unwrap();
    assert_eq!(conn.tables().unwrap(), ["beesql_version"]);
    assert_eq!(conn.select(&Select::new("beesql_version")).unwrap().len(), 1);
}

#[test]
fn test_drop_discards_uncommitted_transaction() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pending.db");
    let options = ConnectOptions::sqlite(path.to_string_lossy());

    {
        let mut conn = beesql::connect(&options).unwrap();
        conn.execute(CREATE_VERSION_TABLE, &[]).unwrap();
        conn.transaction_on();
        conn.insert("beesql_version", &release("0.1", "Kasun Herath", 2012))
            .unwrap();
    }

    let mut conn = beesql::connect(&options).unwrap();
    assert!(conn.select(&Select::new("beesql_version")).unwrap().is_empty());
}

#[test]
fn test_failed_statement_releases_write_lock() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.db");
    let options = ConnectOptions::sqlite(path.to_string_lossy());

    let mut first = beesql::connect(&options).unwrap();
    first
        .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])
        .unwrap();
    first.insert("t", &Fields::new().with("id", 1)).unwrap();
    let err = first.insert("t", &Fields::new().with("id", 1)).unwrap_err();
    assert!(matches!(err, Error::DatabaseOperation { .. }));

    let mut second = beesql::connect(&options).unwrap();
    let started = std::time::Instant::now();
    second.insert("t", &Fields::new().with("id", 2)).unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(1));

    let rows = first.select(&Select::new("t").order_by(["id"])).unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.get("id").unwrap().clone()).collect();
    assert_eq!(ids, [Value::Integer(1), Value::Integer(2)]);
}

#[test]
fn test_failed_statement_in_transaction_keeps_earlier_work() {
    let mut conn = memory_connection();
    conn.transaction_on();
    conn.insert("beesql_version", &release("0.1", "Kasun Herath", 2012))
        .unwrap();
    assert!(conn.insert("missing_table", &Fields::new().with("a", 1)).is_err());
    conn.commit().unwrap();
    conn.transaction_off();

    assert_eq!(conn.select(&Select::new("beesql_version")).unwrap().len(), 1);
}

#[test]
fn test_tables_keeps_names_resembling_internal_tables() {
    let mut conn = memory_connection();
    conn.execute("CREATE TABLE sqlitexdata (id INTEGER)", &[])
        .unwrap();
    let mut tables = conn.tables().unwrap();
    tables.sort();
    assert_eq!(tables, ["beesql_version", "sqlitexdata"]);
}

#[test]
fn test_closed_connection() {
    let mut conn = memory_connection();
    conn.close().unwrap();
    conn.close().unwrap();

    assert!(conn.is_closed());
    assert!(matches!(
        conn.select(&Select::new("beesql_version")),
        Err(Error::Usage(_))
    ));
    assert!(matches!(conn.rollback(), Err(Error::Usage(_))));
}

#[test]
fn test_missing_sqlite_target() {
    assert!(matches!(
        beesql::connect(&ConnectOptions::new("sqlite")),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_invalid_engine() {
    let err = EngineRegistry::standard()
        .connect(&ConnectOptions::new("oracle").with_database("x"))
        .unwrap_err();
    assert_eq!(err.to_string(), "configuration error: invalid engine: oracle");
}
