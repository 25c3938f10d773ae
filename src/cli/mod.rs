//! Support code for the `beesql` binary.
//!
//! Argument parsing lives in the binary itself; this module holds the parts
//! worth testing in isolation.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `query` | Run raw SQL with optional parameters |
//! | `tables` | List tables in the current database |
//! | `select` | Build and run a `SELECT` |
//! | `get` | Fetch a single row |
//!
//! # Example Usage
//!
//! ```bash
//! beesql --engine sqlite --database app.db tables
//! beesql --engine sqlite --database app.db query "SELECT * FROM t WHERE id = ?" --param 1
//! beesql --username root --password secret --database app select users --limit 10
//! ```

mod output;
mod params;

pub use output::{OutputFormat, render_rows};
pub use params::parse_param;
