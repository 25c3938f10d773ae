//! Statement metrics.

use std::time::Instant;

/// Records metrics for one executed statement.
///
/// Two series are recorded per statement:
/// 1. `beesql_statements_total` - counter by engine and status
/// 2. `beesql_statement_duration_ms` - latency histogram by engine and status
///
/// Nothing is exported unless the host application installs a recorder.
///
/// # Arguments
///
/// * `engine` - Engine name (`"mysql"` or `"sqlite"`)
/// * `start` - Statement start time from `Instant::now()`
/// * `status` - `"success"` or `"error"`
pub fn record_statement_metrics(engine: &'static str, start: Instant, status: &'static str) {
    metrics::counter!(
        "beesql_statements_total",
        "engine" => engine,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "beesql_statement_duration_ms",
        "engine" => engine,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}
