//! logsieve-feeds: log feed source adapters for logsieve.
//!
//! Each adapter reads text from one kind of source and hands it to the core
//! normalizer, producing [`logsieve_core::LogRecord`]s. Transport (HTTP,
//! auth, proxies) belongs to the caller; adapters only see bytes that have
//! already arrived.

pub mod error;
pub mod file;
pub mod kubernetes;
pub mod stdin;

pub use error::FeedError;

use logsieve_core::LogRecord;

/// A source that can be drained into records.
pub trait Feed {
    /// Human-readable origin, used in logs and error messages.
    fn name(&self) -> String;

    /// Read the whole source and normalise it. Records keep source order.
    fn read_records(&mut self) -> Result<Vec<LogRecord>, FeedError>;
}
