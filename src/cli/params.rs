//! Command-line parameter values.

use crate::models::Value;

/// Parses a `--param` value.
///
/// Tried in order: integer, finite real, `null` (any case), and finally
/// text. Quote-free text such as `inf` or `NaN` stays text.
#[must_use]
pub fn parse_param(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(r) = raw.parse::<f64>()
        && r.is_finite()
    {
        return Value::Real(r);
    }
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    Value::Text(raw.to_string())
}
