//! Normalizer: parses raw log text into structured [`LogRecord`](crate::LogRecord) values.
//!
//! Parsing is attempted in order: whole-document JSON envelope → line
//! grammars → INFO fallback.
//!
//! ```text
//! raw text ──► envelope::detect ──► Events / Array ──► one record per element
//!                    │
//!                    └─ NotApplicable ──► non-blank lines
//!                                              │
//!                          patterns::match_line ──► extract ──► record
//!                                              │
//!                                              └─ no match ──► INFO fallback
//! ```
//!
//! Every stage degrades instead of failing, so [`parse`] has no error type.

pub mod continuation;
pub mod envelope;
pub mod extract;
pub mod patterns;
pub mod severity;

pub use continuation::{classify_lines, Classifier};
pub use envelope::Envelope;
pub use severity::normalize as normalize_level;

use crate::types::now_timestamp;
use crate::{Level, LogRecord};

/// Parse a whole text blob into records, in input order.
///
/// A recognised JSON envelope yields one record per element. Otherwise every
/// non-blank line yields exactly one record.
pub fn parse(raw: &str) -> Vec<LogRecord> {
    if let Some(records) = Envelope::detect(raw).into_records() {
        tracing::debug!(records = records.len(), "parsed JSON envelope");
        return records;
    }

    let mut fallback = 0usize;
    let records: Vec<LogRecord> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (record, matched) = parse_line_inner(line);
            if !matched {
                fallback += 1;
            }
            record
        })
        .collect();

    tracing::debug!(records = records.len(), fallback, "parsed line input");
    records
}

/// Parse a single line. Lines matching no grammar become INFO records
/// carrying the trimmed line, with no source or metadata extraction.
pub fn parse_line(line: &str) -> LogRecord {
    parse_line_inner(line).0
}

fn parse_line_inner(line: &str) -> (LogRecord, bool) {
    match patterns::match_line(line) {
        Some(matched) => {
            let extracted = extract::extract(&matched.message);
            let record = LogRecord {
                timestamp: matched.timestamp,
                level: matched.level,
                message: extracted.message,
                source: extracted.source,
                metadata: extracted.metadata,
                log_stream_name: None,
                event_id: None,
                ingestion_time: None,
            };
            (record, true)
        }
        None => (LogRecord::new(now_timestamp(), Level::Info, line.trim()), false),
    }
}
