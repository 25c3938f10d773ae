//! Result rows.

use super::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One result tuple: column name → value, in result-set column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a row with room for `n` columns.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            columns: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
        }
    }

    /// Appends a column.
    ///
    /// Drivers call this in result-set order. A repeated column name (for
    /// example from a join) overwrites the earlier value, like a dict row.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        if let Some(idx) = self.columns.iter().position(|c| *c == column) {
            self.values[idx] = value;
        } else {
            self.columns.push(column);
            self.values.push(value);
        }
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Returns the value at a column index.
    #[must_use]
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true for a row without columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column/value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consumes the row, returning the first column's value.
    #[must_use]
    pub fn into_first(self) -> Option<Value> {
        self.values.into_iter().next()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        let mut row = Row::new();
        row.push("id", Value::Integer(1));
        row.push("version", Value::from("0.1.1"));
        row.push("release_manager", Value::from("John Doe"));
        row
    }

    #[test]
    fn test_get_by_name_and_index() {
        let row = sample();
        assert_eq!(row.get("release_manager"), Some(&Value::from("John Doe")));
        assert_eq!(row.get_index(0), Some(&Value::Integer(1)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_duplicate_column_overwrites() {
        let mut row = sample();
        row.push("id", Value::Integer(2));
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"version":"0.1.1","release_manager":"John Doe"}"#
        );
    }

    #[test]
    fn test_into_first() {
        assert_eq!(sample().into_first(), Some(Value::Integer(1)));
        assert_eq!(Row::new().into_first(), None);
    }
}
