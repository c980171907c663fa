//! Compiler test modules.
//!
//! - `generic`: base rendering of every node kind
//! - `bigquery`: BigQuery rewrites and the placeholder/parameter invariant

mod bigquery;
