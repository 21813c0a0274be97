//! Core types for logsieve-core.
//!
//! This module defines the fundamental data structures produced by the
//! normalizer and consumed by every downstream layer: the normalised
//! [`LogRecord`] and its closed [`Level`] enumeration.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Structured metadata attached to a record. Keys keep their source order.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A normalised log record produced by the normalizer.
///
/// Records are plain values: the normalizer builds them fresh on every call
/// and never mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Timestamp as found in the input, or synthesized when the input had none.
    /// Carried through verbatim; never validated.
    pub timestamp: String,
    pub level: Level,
    /// Message body with any extracted source tag and metadata fragment removed.
    pub message: String,
    /// Component, file or container name, when one was identified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Set only for log-group event exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_stream_name: Option<String>,
    /// Set only for log-group event exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Set only for log-group event exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_time: Option<String>,
}

impl LogRecord {
    /// A record with no source, metadata or envelope fields.
    pub fn new(timestamp: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            level,
            message: message.into(),
            source: None,
            metadata: None,
            log_stream_name: None,
            event_id: None,
            ingestion_time: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Log severity level. Every record carries exactly one of these four values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Exact canonical name lookup (`"ERROR"`, `"WARN"`, `"INFO"`, `"DEBUG"`).
    pub fn from_canonical(token: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.as_str() == token)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Timestamp helpers
// ---------------------------------------------------------------------------

/// Render a UTC instant as ISO-8601 with millisecond precision and a `Z`
/// suffix, e.g. `2023-11-14T22:13:20.000Z`.
pub fn iso_millis(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The synthesized timestamp used when the input carries none.
pub fn now_timestamp() -> String {
    iso_millis(Utc::now())
}

/// Naive layouts accepted after RFC 3339; they are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Best-effort calendar parse of a record timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:45.123Z`, `...+02:00`) and the naive
/// layouts in [`NAIVE_LAYOUTS`]. Anything else, syslog stamps included, is
/// `None`: they have no year and no zone.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}
