//! Binary entry point for beesql.
//!
//! Runs SQL against MySQL or `SQLite` from the command line.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context as _;
use beesql::cli::{OutputFormat, parse_param, render_rows};
use beesql::config::BeeConfig;
use beesql::observability;
use beesql::sql::Direction;
use beesql::{Connection, Filter, Select};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process::ExitCode;

/// beesql - boilerplate-free SQL for MySQL and `SQLite`.
#[derive(Parser)]
#[command(name = "beesql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Engine: mysql or sqlite.
    #[arg(long, global = true)]
    engine: Option<String>,

    /// Database to select (MySQL) or file path (`SQLite`).
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// MySQL username.
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// MySQL password.
    #[arg(short, long, global = true, env = "BEESQL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// MySQL host.
    #[arg(long, global = true)]
    host: Option<String>,

    /// MySQL port.
    #[arg(long, global = true)]
    port: Option<u16>,

    /// MySQL unix socket.
    #[arg(long, global = true)]
    unix_socket: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run raw SQL.
    Query {
        /// SQL text, using the engine's placeholder (`%s` or `?`).
        sql: String,

        /// Positional parameter (repeatable).
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// List tables.
    Tables,

    /// Select rows from a table.
    Select {
        /// Table name.
        table: String,

        /// Columns to return (comma-separated).
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Raw WHERE expression.
        #[arg(long = "where")]
        where_clause: Option<String>,

        /// Column to order by.
        #[arg(long)]
        order_by: Option<String>,

        /// Order descending.
        #[arg(long)]
        desc: bool,

        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// Fetch one row.
    Get {
        /// Table name.
        table: String,

        /// Raw WHERE expression.
        #[arg(long = "where")]
        where_clause: String,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Loads the config file, environment overrides and flags, in that order.
fn load_config(cli: &Cli) -> anyhow::Result<BeeConfig> {
    let config = match &cli.config {
        Some(path) => BeeConfig::load_from_file(path)?,
        None => BeeConfig::load_default(),
    };
    let mut config = config.apply_env_overrides()?;

    let conn = &mut config.connection;
    if let Some(engine) = &cli.engine {
        conn.engine.clone_from(engine);
    }
    if let Some(database) = &cli.database {
        conn.database = Some(database.clone());
    }
    if let Some(username) = &cli.username {
        conn.username = Some(username.clone());
    }
    if let Some(password) = &cli.password {
        conn.password = Some(SecretString::from(password.clone()));
    }
    if let Some(host) = &cli.host {
        conn.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        conn.port = Some(port);
    }
    if let Some(socket) = &cli.unix_socket {
        conn.unix_socket = Some(socket.clone());
    }
    Ok(config)
}

/// Runs the selected command.
fn run_command(cli: Cli, config: BeeConfig) -> anyhow::Result<ExitCode> {
    let mut conn = beesql::connect(&config.connection)
        .with_context(|| format!("cannot connect to {}", config.connection.engine))?;
    let format = cli.format;

    let code = match cli.command {
        Commands::Query { sql, params } => cmd_query(&mut conn, &sql, &params, format)?,
        Commands::Tables => cmd_tables(&mut conn, format)?,
        Commands::Select {
            table,
            columns,
            where_clause,
            order_by,
            desc,
            limit,
        } => {
            let mut query = Select::new(table).columns(columns);
            if let Some(expression) = where_clause {
                query = query.with_where(expression);
            }
            if let Some(column) = order_by {
                query = query.order_by([column]);
            }
            if desc {
                query = query.order_direction(Direction::Desc);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            cmd_select(&mut conn, &query, format)?
        },
        Commands::Get {
            table,
            where_clause,
        } => cmd_get(&mut conn, &table, &where_clause, format)?,
    };

    conn.close()?;
    Ok(code)
}

fn cmd_query(
    conn: &mut Connection,
    sql: &str,
    params: &[String],
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let params: Vec<_> = params.iter().map(|p| parse_param(p)).collect();
    let rows = conn.execute(sql, &params)?;
    println!("{}", render_rows(&rows, format)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_tables(conn: &mut Connection, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let tables = conn.tables()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tables)?),
        OutputFormat::Table => {
            for table in tables {
                println!("{table}");
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_select(
    conn: &mut Connection,
    query: &Select,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let rows = conn.select(query)?;
    println!("{}", render_rows(&rows, format)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_get(
    conn: &mut Connection,
    table: &str,
    where_clause: &str,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let Some(row) = conn.get(table, &Filter::raw(where_clause))? else {
        eprintln!("no matching row");
        return Ok(ExitCode::FAILURE);
    };
    println!("{}", render_rows(&[row], format)?);
    Ok(ExitCode::SUCCESS)
}
