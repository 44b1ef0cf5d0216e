//! Logic modules: the compatibility pipeline between probe and report.
//!
//! # Modules
//!
//! - `normalize`: identifier pair and canonical vendor extraction
//! - `dedup`: collapses repeated `(type, vendor, model)` components
//! - `resolver`: remote lookup, session cache, vendor-table fallback
//! - `aggregate`: tally, score, readiness and attention list

pub mod aggregate;
pub mod dedup;
pub mod normalize;
pub mod resolver;
