//! Forwards load-test stats snapshots to Elasticsearch.
//!
//! Snapshots are cleaned before they are written: configured root fields are
//! dropped, null leaves get a default value and empty subtrees are pruned.

mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
