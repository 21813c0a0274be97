//! Test builders: ergonomic constructors for `LogRecord` values and API
//! response bodies.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use logsieve::{Level, LogRecord, Metadata};

// ---------------------------------------------------------------------------
// LogRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = LogRecordBuilder::new("timeout connecting to db")
///     .level(Level::Error)
///     .source("api")
///     .field("request_id", "req-abc123")
///     .build();
/// ```
pub struct LogRecordBuilder {
    timestamp: String,
    level: Level,
    message: String,
    source: Option<String>,
    metadata: Option<Metadata>,
}

impl LogRecordBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: "2024-01-15T10:00:00.000Z".to_string(),
            level: Level::Info,
            message: message.into(),
            source: None,
            metadata: None,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> LogRecord {
        let mut record = LogRecord::new(self.timestamp, self.level, self.message);
        record.source = self.source;
        record.metadata = self.metadata;
        record
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Build an INFO record.
pub fn info_record(message: &str) -> LogRecord {
    LogRecordBuilder::new(message).build()
}

/// Build an ERROR record.
pub fn error_record(message: &str) -> LogRecord {
    LogRecordBuilder::new(message).level(Level::Error).build()
}

/// Build a corpus of `n` records alternating ERROR/WARN/INFO/DEBUG, one
/// minute apart starting at 2024-01-15T10:00:00Z.
pub fn build_corpus(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| {
            let level = match i % 10 {
                0 => Level::Error,
                1 | 2 => Level::Warn,
                9 => Level::Debug,
                _ => Level::Info,
            };
            LogRecordBuilder::new(format!("log line {i}"))
                .level(level)
                .timestamp(format!("2024-01-15T{:02}:{:02}:00.000Z", 10 + i / 60 % 14, i % 60))
                .source(format!("producer-{}", i % 3))
                .build()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Kubernetes API response bodies
// ---------------------------------------------------------------------------

/// A log API response body for `pod`/`container` carrying `lines` in order,
/// one second apart.
pub fn api_response_body(pod: &str, container: &str, lines: &[&str]) -> String {
    let logs: Vec<serde_json::Value> = lines
        .iter()
        .enumerate()
        .map(|(i, content)| {
            serde_json::json!({
                "timestamp": format!("2025-10-20T06:26:{:02}.000000000Z", i % 60),
                "content": content,
            })
        })
        .collect();
    serde_json::json!({
        "info": {
            "podName": pod,
            "containerName": container,
            "initContainerName": "",
            "fromDate": "2025-10-20T06:26:00Z",
            "toDate": "2025-10-20T06:27:00Z",
            "truncated": false
        },
        "selection": {
            "referencePoint": { "timestamp": "2025-10-20T06:26:23.103435625Z", "lineNum": -1 },
            "offsetFrom": 0,
            "offsetTo": 5000,
            "logFilePosition": "end"
        },
        "logs": logs
    })
    .to_string()
}
