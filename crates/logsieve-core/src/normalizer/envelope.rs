//! Whole-document JSON decoding.
//!
//! Two document shapes bypass line parsing entirely: a log-group export
//! (`{"events": [...]}`) and a bare array of generic log objects. Anything
//! else, including JSON that fails to parse, is [`Envelope::NotApplicable`]
//! and the caller falls back to line-by-line parsing.

use serde_json::Value;

use super::severity;
use crate::types::{iso_millis, now_timestamp, parse_timestamp};
use crate::{Level, LogRecord, Metadata};

const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "date"];
const LEVEL_KEYS: &[&str] = &["level", "severity", "type"];
const MESSAGE_KEYS: &[&str] = &["message", "msg", "text"];
const SOURCE_KEYS: &[&str] = &["source", "component", "service"];
const METADATA_KEYS: &[&str] = &["metadata", "data", "context"];

/// The recognised shape of a whole input document.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{"events": [...]}` log-group export.
    Events(Vec<Value>),
    /// `[...]` array of generic log objects.
    Array(Vec<Value>),
    /// Not JSON, or JSON of another shape.
    NotApplicable,
}

impl Envelope {
    /// Classify `raw` by its JSON shape. Parse failures are not errors.
    pub fn detect(raw: &str) -> Envelope {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(mut root)) => match root.remove("events") {
                Some(Value::Array(events)) => Envelope::Events(events),
                _ => Envelope::NotApplicable,
            },
            Ok(Value::Array(items)) => Envelope::Array(items),
            _ => Envelope::NotApplicable,
        }
    }

    /// One record per element, in element order. `None` when not applicable.
    pub fn into_records(self) -> Option<Vec<LogRecord>> {
        match self {
            Envelope::Events(events) => Some(events.iter().map(event_record).collect()),
            Envelope::Array(items) => Some(items.iter().map(generic_record).collect()),
            Envelope::NotApplicable => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Log-group events
// ---------------------------------------------------------------------------

fn event_record(item: &Value) -> LogRecord {
    let timestamp = item
        .get("timestamp")
        .filter(|v| is_present(v))
        .and_then(instant_to_iso)
        .unwrap_or_else(now_timestamp);
    let ingestion_time = item
        .get("ingestionTime")
        .filter(|v| is_present(v))
        .and_then(instant_to_iso);

    let raw_message = item
        .get("message")
        .filter(|v| is_present(v))
        .map(stringify)
        .unwrap_or_default();
    let level = severity::infer_from_message(&raw_message);

    let log_stream_name = item.get("logStreamName").cloned();
    let event_id = item.get("eventId").cloned();

    let mut metadata = Metadata::new();
    if let Some(value) = &log_stream_name {
        metadata.insert("logStreamName".to_string(), value.clone());
    }
    if let Some(value) = &event_id {
        metadata.insert("eventId".to_string(), value.clone());
    }
    if let Some(value) = &ingestion_time {
        metadata.insert("ingestionTime".to_string(), Value::String(value.clone()));
    }

    LogRecord {
        timestamp,
        level,
        message: raw_message.trim().to_string(),
        source: None,
        metadata: Some(metadata),
        log_stream_name: log_stream_name.as_ref().and_then(non_null_string),
        event_id: event_id.as_ref().and_then(non_null_string),
        ingestion_time,
    }
}

/// Millisecond epoch numbers and calendar strings, rendered as ISO-8601 UTC.
fn instant_to_iso(value: &Value) -> Option<String> {
    let instant = match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            chrono::DateTime::from_timestamp_millis(millis)?
        }
        Value::String(s) => parse_timestamp(s)?,
        _ => return None,
    };
    Some(iso_millis(instant))
}

// ---------------------------------------------------------------------------
// Generic log objects
// ---------------------------------------------------------------------------

fn generic_record(item: &Value) -> LogRecord {
    let timestamp = first_present(item, TIMESTAMP_KEYS)
        .map(stringify)
        .unwrap_or_else(now_timestamp);
    let level = first_present(item, LEVEL_KEYS)
        .map(|v| severity::normalize(&stringify(v)))
        .unwrap_or(Level::Info);
    let message = first_present(item, MESSAGE_KEYS)
        .map(stringify)
        .unwrap_or_else(|| item.to_string());
    let source = first_present(item, SOURCE_KEYS).map(stringify);
    let metadata = first_present(item, METADATA_KEYS).and_then(|v| v.as_object().cloned());

    LogRecord {
        timestamp,
        level,
        message,
        source,
        metadata,
        log_stream_name: None,
        event_id: None,
        ingestion_time: None,
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// A field counts as present unless it is null, `false`, zero or `""`.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_present<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|value| is_present(value))
}

/// Strings verbatim, everything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_null_string(value: &Value) -> Option<String> {
    (!value.is_null()).then(|| stringify(value))
}
