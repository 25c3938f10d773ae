//! Data models for beesql.
//!
//! Scalar values bound into statements, the order-preserving field mapping
//! used for inserts, updates and conditions, and result rows.

mod fields;
mod row;
mod value;

pub use fields::Fields;
pub use row::Row;
pub use value::Value;
