//! Kubernetes dashboard log API adapter.
//!
//! The dashboard's `/api/v1/log/<namespace>/<pod>/<container>` endpoint returns
//! lines that already carry a timestamp but no level. Each response is run
//! through a fresh [`Classifier`], so untagged lines (stack frames, wrapped
//! output) inherit the level of the closest tagged line above them.
//!
//! Fetching is the caller's job; this module builds the query parameters and
//! decodes whatever body comes back.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use logsieve_core::normalizer::Classifier;
use logsieve_core::types::now_timestamp;
use logsieve_core::{Level, LogRecord, Metadata};

use crate::{Feed, FeedError};

/// Source tag for bodies that were not JSON.
pub const RAW_SOURCE: &str = "raw";

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLogResponse {
    #[serde(default)]
    pub info: LogInfo,
    #[serde(default)]
    pub selection: LogSelection,
    #[serde(default)]
    pub logs: Vec<LogLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogInfo {
    pub pod_name: String,
    pub container_name: String,
    pub init_container_name: String,
    pub from_date: String,
    pub to_date: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSelection {
    pub reference_point: ReferencePoint,
    pub offset_from: i64,
    pub offset_to: i64,
    pub log_file_position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferencePoint {
    pub timestamp: String,
    pub line_num: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogLine {
    pub timestamp: String,
    pub content: String,
}

impl ApiLogResponse {
    /// One record per line, levels carried forward across untagged lines.
    pub fn into_records(self) -> Vec<LogRecord> {
        let container = self.info.container_name;
        let mut metadata = Metadata::new();
        metadata.insert("podName".to_string(), Value::String(self.info.pod_name));
        metadata.insert("containerName".to_string(), Value::String(container.clone()));

        let mut classifier = Classifier::new();
        self.logs
            .into_iter()
            .map(|line| {
                let level = classifier.classify(&line.content);
                LogRecord::new(line.timestamp, level, line.content)
                    .with_source(container.clone())
                    .with_metadata(metadata.clone())
            })
            .collect()
    }
}

/// Decode a response body by its content type.
///
/// JSON bodies are parsed as [`ApiLogResponse`]; a malformed JSON body is an
/// error. Any other body (an HTML error page, plain text) becomes one INFO
/// record tagged [`RAW_SOURCE`] so it can still be shown.
pub fn decode_body(content_type: &str, body: &str) -> Result<Vec<LogRecord>, FeedError> {
    if content_type.contains("application/json") {
        let response: ApiLogResponse = serde_json::from_str(body)?;
        tracing::debug!(
            pod = %response.info.pod_name,
            container = %response.info.container_name,
            lines = response.logs.len(),
            truncated = response.info.truncated,
            "kubernetes: decoded log response"
        );
        return Ok(response.into_records());
    }

    tracing::debug!(content_type, bytes = body.len(), "kubernetes: non-JSON body kept raw");
    Ok(vec![LogRecord::new(now_timestamp(), Level::Info, body)
        .with_source(RAW_SOURCE)
        .with_metadata(Metadata::new())])
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Where in the container log a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilePosition {
    Beginning,
    #[default]
    End,
}

impl FilePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePosition::Beginning => "beginning",
            FilePosition::End => "end",
        }
    }
}

/// Parameters of one log fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub log_file_position: FilePosition,
    pub reference_timestamp: String,
    pub reference_line_num: i64,
    pub offset_from: i64,
    pub offset_to: i64,
    /// Read the previous (terminated) container instance.
    pub previous: bool,
}

impl LogQuery {
    /// The dashboard defaults: from the end, lines `0..5000` around the
    /// reference point.
    pub fn new(reference_timestamp: impl Into<String>) -> Self {
        Self {
            log_file_position: FilePosition::End,
            reference_timestamp: reference_timestamp.into(),
            reference_line_num: -1,
            offset_from: 0,
            offset_to: 5000,
            previous: false,
        }
    }

    /// Query-string pairs in the order the API documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("logFilePosition", self.log_file_position.as_str().to_string()),
            ("referenceTimestamp", self.reference_timestamp.clone()),
            ("referenceLineNum", self.reference_line_num.to_string()),
            ("offsetFrom", self.offset_from.to_string()),
            ("offsetTo", self.offset_to.to_string()),
            ("previous", self.previous.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Saved responses
// ---------------------------------------------------------------------------

/// A response body saved to disk. `.json` files are decoded as API
/// responses; anything else is treated as a raw body.
pub struct ApiResponseFeed {
    path: PathBuf,
}

impl ApiResponseFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn content_type(&self) -> &'static str {
        let is_json = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            "application/json"
        } else {
            "text/plain"
        }
    }
}

impl Feed for ApiResponseFeed {
    fn name(&self) -> String {
        format!("api-response:{}", self.path.display())
    }

    fn read_records(&mut self) -> Result<Vec<LogRecord>, FeedError> {
        let body = crate::file::read_lossy(&self.path)?;
        decode_body(self.content_type(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(lines: &[&str]) -> String {
        json!({
            "info": {
                "podName": "api-7f9b4d",
                "containerName": "api",
                "initContainerName": "",
                "fromDate": "2025-10-20T06:00:00Z",
                "toDate": "2025-10-20T06:30:00Z",
                "truncated": false
            },
            "selection": {
                "referencePoint": { "timestamp": "2025-10-20T06:26:23.103435625Z", "lineNum": -1 },
                "offsetFrom": 0,
                "offsetTo": 5000,
                "logFilePosition": "end"
            },
            "logs": lines
                .iter()
                .enumerate()
                .map(|(i, content)| json!({
                    "timestamp": format!("2025-10-20T06:26:{:02}Z", i),
                    "content": content,
                }))
                .collect::<Vec<_>>()
        })
        .to_string()
    }

    #[test]
    fn stack_trace_lines_inherit_error() {
        let body = response(&[
            "[INFO] handling request",
            "[ERROR] exception thrown",
            "  at foo.bar()",
            "  at baz.qux()",
            "[info ] recovered",
        ]);
        let records = decode_body("application/json; charset=utf-8", &body).unwrap();
        let levels: Vec<_> = records.iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![Level::Info, Level::Error, Level::Error, Level::Error, Level::Info]
        );
    }

    #[test]
    fn records_carry_pod_context_and_verbatim_content() {
        let body = response(&["  at foo.bar()"]);
        let records = decode_body("application/json", &body).unwrap();
        let record = &records[0];
        assert_eq!(record.timestamp, "2025-10-20T06:26:00Z");
        assert_eq!(record.message, "  at foo.bar()");
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.source.as_deref(), Some("api"));
        assert_eq!(
            Value::Object(record.metadata.clone().unwrap()),
            json!({"podName": "api-7f9b4d", "containerName": "api"})
        );
    }

    #[test]
    fn each_response_starts_from_info() {
        let first = decode_body("application/json", &response(&["[ERROR] boom"])).unwrap();
        let second = decode_body("application/json", &response(&["continuation"])).unwrap();
        assert_eq!(first[0].level, Level::Error);
        assert_eq!(second[0].level, Level::Info);
    }

    #[test]
    fn non_json_body_becomes_one_raw_record() {
        let body = "<html>502 Bad Gateway</html>\nsecond line";
        let records = decode_body("text/html", body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[0].message, body);
        assert_eq!(records[0].source.as_deref(), Some(RAW_SOURCE));
        assert_eq!(records[0].metadata, Some(Metadata::new()));
    }

    #[test]
    fn malformed_json_body_is_an_error() {
        let err = decode_body("application/json", "{not json").unwrap_err();
        assert!(matches!(err, FeedError::Response(_)));
    }

    #[test]
    fn missing_sections_default() {
        let records = decode_body("application/json", r#"{"logs":[{"content":"[WARN] x"}]}"#).unwrap();
        assert_eq!(records[0].level, Level::Warn);
        assert_eq!(records[0].source.as_deref(), Some(""));
    }

    #[test]
    fn query_pairs_use_dashboard_defaults() {
        let query = LogQuery::new("2025-10-20T06:26:23.103435625Z");
        assert_eq!(
            query.query_pairs(),
            vec![
                ("logFilePosition", "end".to_string()),
                ("referenceTimestamp", "2025-10-20T06:26:23.103435625Z".to_string()),
                ("referenceLineNum", "-1".to_string()),
                ("offsetFrom", "0".to_string()),
                ("offsetTo", "5000".to_string()),
                ("previous", "false".to_string()),
            ]
        );
    }

    #[test]
    fn saved_response_is_decoded_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("tail.json");
        std::fs::write(&json_path, response(&["[DEBUG] a", "b"])).unwrap();
        let text_path = dir.path().join("tail.html");
        std::fs::write(&text_path, "gateway timeout").unwrap();

        let json_records = ApiResponseFeed::new(&json_path).read_records().unwrap();
        assert_eq!(json_records.len(), 2);
        assert_eq!(json_records[1].level, Level::Debug);

        let raw_records = ApiResponseFeed::new(&text_path).read_records().unwrap();
        assert_eq!(raw_records[0].source.as_deref(), Some(RAW_SOURCE));
    }
}
