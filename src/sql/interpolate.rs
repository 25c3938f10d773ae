//! Client-side parameter binding for the format paramstyle.
//!
//! The MySQL dialect emits `%s` placeholders. The networked driver binds
//! them on the client: each `%s` becomes the escaped SQL literal of the next
//! parameter and `%%` becomes a literal `%`. Statements without parameters
//! are sent verbatim, so a `%` in parameter-free SQL needs no doubling.

use crate::models::Value;
use crate::{Error, Result};

/// Renders a value as a MySQL literal.
///
/// Text is quoted with `'` and backslash-escapes NUL, newline, carriage
/// return, `\x1a`, backslash and both quote characters. Blobs become hex
/// literals.
///
/// # Errors
///
/// Returns [`Error::Usage`] for NaN or infinite reals, which have no literal.
///
/// # Examples
///
/// ```
/// use beesql::Value;
/// use beesql::sql::escape_literal;
///
/// assert_eq!(escape_literal(&Value::from("O'Brien")).unwrap(), r"'O\'Brien'");
/// assert_eq!(escape_literal(&Value::Null).unwrap(), "NULL");
/// assert_eq!(escape_literal(&Value::Bool(true)).unwrap(), "1");
/// ```
pub fn escape_literal(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(r) if r.is_finite() => Ok(format!("{r:?}")),
        Value::Real(r) => Err(Error::Usage(format!(
            "cannot bind non-finite real {r} as a SQL literal"
        ))),
        Value::Text(s) => Ok(quote_text(s)),
        Value::Blob(b) => Ok(format!("X'{}'", hex::encode(b))),
    }
}

fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Substitutes `%s` placeholders with escaped literals.
///
/// # Errors
///
/// Returns [`Error::Usage`] if the placeholder count differs from the
/// parameter count, or a parameter cannot be rendered.
///
/// # Examples
///
/// ```
/// use beesql::Value;
/// use beesql::sql::interpolate;
///
/// let sql = interpolate(
///     "INSERT INTO t (name, pct) VALUES (%s, %s)",
///     &[Value::from("it's"), Value::from(50)],
/// )
/// .unwrap();
/// assert_eq!(sql, r"INSERT INTO t (name, pct) VALUES ('it\'s', 50)");
/// ```
pub fn interpolate(sql: &str, params: &[Value]) -> Result<String> {
    if params.is_empty() {
        return Ok(sql.to_string());
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut remaining = params.iter();
    let mut used = 0usize;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                let value = remaining.next().ok_or_else(|| mismatch(sql, params.len()))?;
                out.push_str(&escape_literal(value)?);
                used += 1;
            },
            Some('%') => {
                chars.next();
                out.push('%');
            },
            _ => out.push('%'),
        }
    }

    if used != params.len() {
        return Err(mismatch(sql, params.len()));
    }
    Ok(out)
}

fn mismatch(sql: &str, params: usize) -> Error {
    Error::Usage(format!(
        "statement placeholders do not match {params} parameter(s): {sql}"
    ))
}
