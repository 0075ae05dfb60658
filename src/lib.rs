//! Reporting engine for a food-delivery business database.
//!
//! Every report takes an explicitly passed [`db::DbConn`], runs one
//! parameterized `SELECT`, and returns named-field records from [`models`].
//! Rendering lives in [`render`]; the binaries wire the two together.

pub mod config;
pub mod cooccurrence;
pub mod db;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod models;
pub mod pivot;
pub mod render;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ReportError, ReportResult};
