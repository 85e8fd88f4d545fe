//! Categorization and aggregation of canonical datasets.
//!
//! This module tags each reading with its air-quality band and computes the
//! category counts, trend lines, and distribution views the dashboard draws.

pub mod aggregate;
pub mod analyzer;
pub mod category;
pub mod types;
pub mod utility;
