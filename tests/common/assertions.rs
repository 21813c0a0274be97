//! Domain-specific assertion macros for logsieve harnesses.
//!
//! These add context-rich failure messages that show the record under test,
//! so a failing corpus case names the line that broke it.

use logsieve::LogRecord;

// ---------------------------------------------------------------------------
// Metadata assertions
// ---------------------------------------------------------------------------

/// Assert that a `LogRecord` carries a metadata key with an expected value.
///
/// ```rust
/// assert_has_field!(record, "userId", 42);
/// ```
#[macro_export]
macro_rules! assert_has_field {
    ($record:expr, $key:expr, $value:expr) => {{
        let record: &logsieve::LogRecord = &$record;
        let key: &str = $key;
        let expected = serde_json::json!($value);
        match record.metadata.as_ref().and_then(|m| m.get(key)) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_has_field! failed:\n  metadata[{:?}]\n  expected: {}\n  actual:   {}",
                key, expected, actual
            ),
            None => panic!(
                "assert_has_field! failed: key {:?} not found.\n  metadata: {:?}",
                key, record.metadata
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Level assertions
// ---------------------------------------------------------------------------

/// Assert that a `LogRecord` has a specific level.
///
/// ```rust
/// assert_level!(record, Level::Error);
/// ```
#[macro_export]
macro_rules! assert_level {
    ($record:expr, $level:expr) => {{
        let record: &logsieve::LogRecord = &$record;
        let expected: logsieve::Level = $level;
        if record.level != expected {
            panic!(
                "assert_level! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, record.level, record.message
            );
        }
    }};
}

/// Assert the level sequence of a record slice.
#[macro_export]
macro_rules! assert_levels {
    ($records:expr, $expected:expr) => {{
        let actual: Vec<logsieve::Level> = $records.iter().map(|r| r.level).collect();
        let expected: Vec<logsieve::Level> = $expected.into_iter().collect();
        pretty_assertions::assert_eq!(actual, expected);
    }};
}

// ---------------------------------------------------------------------------
// Source assertions
// ---------------------------------------------------------------------------

/// Assert that a `LogRecord` carries the expected source tag.
#[macro_export]
macro_rules! assert_source {
    ($record:expr, $source:expr) => {{
        let record: &logsieve::LogRecord = &$record;
        let expected: Option<&str> = $source;
        if record.source.as_deref() != expected {
            panic!(
                "assert_source! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, record.source, record.message
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Record invariants
// ---------------------------------------------------------------------------

/// Every record carries a timestamp, and a trimmed message unless it came
/// from a container response, whose content is kept verbatim.
pub fn assert_record_invariants(record: &LogRecord) {
    assert!(
        !record.timestamp.is_empty(),
        "record must carry a timestamp: {:?}",
        record.message
    );
    assert_eq!(
        record.message.trim(),
        record.message,
        "parsed message must be trimmed"
    );
}
