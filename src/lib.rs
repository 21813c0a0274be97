//! logsieve: log ingestion and severity classification.
//!
//! This crate re-exports the workspace layers so that integration tests and
//! benches can import them from one place, and owns the output rendering
//! used by the `logsieve` binary.
//!
//! # Architecture
//!
//! ```text
//! feeds (file / stdin / k8s response) ──► core::normalizer ──► core::filter ──► render
//! ```

pub mod render;

pub use logsieve_core::{
    config, filter, normalizer, parse, stats, types, Error, Level, LogRecord, Metadata,
};
pub use logsieve_feeds as feeds;
