//! Per-backend SQL variation.

use std::fmt;

/// The syntax and capability differences between the two engines.
///
/// | | `MySql` | `Sqlite` |
/// |---|---|---|
/// | placeholder | `%s` | `?` |
/// | `GROUP BY ... DESC` | yes | no, rendered ascending |
/// | `LIMIT` on `UPDATE`/`DELETE` | yes | no |
/// | several tables per `DROP TABLE` | yes | no |
/// | `CREATE`/`DROP`/`USE DATABASE` | yes | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Networked MySQL engine, format paramstyle.
    MySql,
    /// Embedded `SQLite` engine, qmark paramstyle.
    Sqlite,
}

impl Dialect {
    /// The parameter placeholder token.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::MySql => "%s",
            Self::Sqlite => "?",
        }
    }

    /// Whether `GROUP BY` honors a `DESC` direction.
    #[must_use]
    pub const fn supports_group_by_desc(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether `UPDATE` and `DELETE` accept `LIMIT`.
    #[must_use]
    pub const fn supports_mutation_limit(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether one `DROP TABLE` may name several tables.
    #[must_use]
    pub const fn supports_multi_table_drop(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether `CREATE DATABASE`, `DROP DATABASE` and `USE` exist.
    #[must_use]
    pub const fn supports_databases(self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Whether the driver can report the last inserted row id.
    #[must_use]
    pub const fn supports_last_insert_rowid(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    /// Statement listing the tables of the current database.
    ///
    /// The table name is always the first column of each row.
    #[must_use]
    pub const fn tables_query(self) -> &'static str {
        match self {
            Self::MySql => "SHOW TABLES",
            Self::Sqlite => {
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'"
            },
        }
    }

    /// Dialect name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Counts placeholder tokens in a statement.
    ///
    /// For `%s` a preceding `%` escapes the token (`%%s` is a literal `%s`).
    #[must_use]
    pub fn count_placeholders(self, sql: &str) -> usize {
        match self {
            Self::Sqlite => sql.matches('?').count(),
            Self::MySql => {
                let mut count = 0;
                let mut chars = sql.chars();
                while let Some(c) = chars.next() {
                    if c == '%' && chars.next() == Some('s') {
                        count += 1;
                    }
                }
                count
            },
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::MySql.placeholder(), "%s");
        assert_eq!(Dialect::Sqlite.placeholder(), "?");
    }

    #[test]
    fn test_capabilities() {
        assert!(Dialect::MySql.supports_group_by_desc());
        assert!(!Dialect::Sqlite.supports_group_by_desc());
        assert!(Dialect::MySql.supports_mutation_limit());
        assert!(!Dialect::Sqlite.supports_mutation_limit());
        assert!(Dialect::MySql.supports_multi_table_drop());
        assert!(!Dialect::Sqlite.supports_multi_table_drop());
        assert!(!Dialect::Sqlite.supports_databases());
        assert!(Dialect::Sqlite.supports_last_insert_rowid());
    }

    #[test]
    fn test_count_placeholders() {
        assert_eq!(Dialect::Sqlite.count_placeholders("a=? AND b=?"), 2);
        assert_eq!(Dialect::MySql.count_placeholders("a=%s AND b=%s"), 2);
        assert_eq!(Dialect::MySql.count_placeholders("a LIKE '100%%s' AND b=%s"), 1);
        assert_eq!(Dialect::MySql.count_placeholders("no params"), 0);
    }
}
