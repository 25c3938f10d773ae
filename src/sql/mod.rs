//! SQL statement synthesis.
//!
//! Everything in this module is pure: structured requests go in, a
//! [`Statement`] (SQL text plus ordered parameters) comes out.
//!
//! - [`dialect`]: placeholder token and clause support per engine
//! - [`filter`]: WHERE compilation from free text or condition pairs
//! - [`query`]: structured inputs for select, update and delete
//! - [`builder`]: one method per SQL verb
//! - [`interpolate`]: client-side binding for the `%s` paramstyle

pub mod builder;
pub mod dialect;
pub mod filter;
pub mod interpolate;
pub mod query;
mod statement;

pub use builder::StatementBuilder;
pub use dialect::Dialect;
pub use filter::{Filter, WhereClause, compile_where};
pub use interpolate::{escape_literal, interpolate};
pub use query::{Delete, Direction, Select, Update};
pub use statement::Statement;
