//! Result rendering.

use crate::models::Row;
use crate::{Error, Result};
use std::fmt::Write as _;

/// How result rows are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Table,
    /// JSON array of objects, one per row.
    Json,
}

/// Renders rows in `format`.
///
/// # Errors
///
/// Returns [`Error::Usage`] if JSON serialization fails.
pub fn render_rows(rows: &[Row], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| Error::Usage(format!("cannot render rows as JSON: {e}"))),
        OutputFormat::Table => Ok(render_table(rows)),
    }
}

fn render_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return "(0 rows)".to_string();
    };

    let header = first.columns();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.values().iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|c| c.chars().count()).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, header.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for line in &cells {
        push_line(&mut out, line.iter().map(String::as_str), &widths);
    }
    let noun = if rows.len() == 1 { "row" } else { "rows" };
    let _ = write!(out, "({} {noun})", rows.len());
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
