//! sw-db - Processor boundary for Stepwise
//!
//! The engine submits rendered SQL through the [`Processor`] trait and never
//! looks at a concrete driver. [`DuckDbProcessor`] is the bundled
//! implementation.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use connect::connect;
pub use duckdb::DuckDbProcessor;
pub use error::{DbError, DbResult};
pub use traits::{Processor, SqlValue};
