//! logsieve-core: log ingestion and classification engine.
//!
//! This crate turns raw, arbitrarily formatted log text into an ordered
//! sequence of normalised [`LogRecord`]s, and provides the small amount of
//! downstream machinery every consumer needs: level/keyword/time filtering,
//! statistics and configuration.
//!
//! # Architecture
//!
//! ```text
//! raw text ──► normalizer::parse ──► Vec<LogRecord> ──► filter ──► stats
//!                    ▲
//! remote lines ──► normalizer::continuation (level carry-forward)
//! ```
//!
//! Everything here is synchronous and free of shared mutable state; calls may
//! run concurrently without coordination.

pub mod config;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod stats;
pub mod types;

pub use error::{Error, Result};
pub use normalizer::parse;
pub use types::{Level, LogRecord, Metadata};
