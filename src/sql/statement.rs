//! Compiled statements.

use crate::models::Value;
use std::fmt;

/// SQL text plus its ordered parameters, ready for execution.
///
/// Built by [`StatementBuilder`](super::StatementBuilder); the number of
/// placeholder tokens in the text equals the number of parameters, in
/// left-to-right order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub(crate) const fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// Creates a statement without parameters.
    pub(crate) const fn bare(sql: String) -> Self {
        Self::new(sql, Vec::new())
    }

    /// The SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Splits into text and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
