//! Static log corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of representative log lines.
//! Every line in [`CORPUS_GRAMMARS`] matches one of the line grammars;
//! every line in [`CORPUS_UNMATCHED`] matches none.

/// One or more lines per line grammar, in table order.
pub const CORPUS_GRAMMARS: &[&str] = &[
    r#"2024-01-15T10:30:45.123Z [ERROR] [auth] Login failed {"userId":42}"#,
    "2024-01-15T10:30:46Z [WARN] retrying upstream",
    "2024-01-15 10:30:47 INFO Starting application version 2.4.1",
    "2024-01-15 10:30:48.500 DEBUG cache warmed",
    "Jan 15 10:30:49 myhost sshd[12345]: Failed password for admin",
    "[ERROR] [db] connection refused",
    "[info] [scheduler] tick",
    "WARN: disk usage high",
    "DEBUG: [worker] job picked up {\"jobId\":\"j-9\"}",
];

/// Lines that match no grammar and fall back to INFO.
pub const CORPUS_UNMATCHED: &[&str] = &[
    "???garbled???",
    "GET /api/v1/users 200 47ms",
    "  at com.example.App.handle(App.java:42)",
    "\tat java.base/java.lang.Thread.run(Thread.java:833)",
    "plain words with no structure",
];

/// Everything above interleaved, as one document would arrive.
pub const CORPUS_MIXED: &[&str] = &[
    "2024-01-15T10:30:45.123Z [ERROR] [auth] Login failed",
    "  at com.example.Auth.check(Auth.java:17)",
    "WARN: disk usage high",
    "???garbled???",
    "[DEBUG] [cache] miss key=user:42",
];

/// Container output in the shape the Kubernetes dashboard returns: tagged
/// lines followed by untagged continuation lines.
pub const CORPUS_CONTAINER: &[&str] = &[
    "[INFO] handling request id=7",
    "[ERROR] unhandled exception",
    "java.lang.IllegalStateException: boom",
    "  at com.example.Handler.run(Handler.java:88)",
    "  at java.base/java.lang.Thread.run(Thread.java:833)",
    "[ WARN ] retry scheduled",
    "[fatal] giving up",
    "[trace] cleanup",
    "shutting down",
];

/// A CloudWatch-style events envelope with three entries.
pub const EVENTS_ENVELOPE: &str = r#"{
  "events": [
    {"timestamp": 1700000000000, "message": "Something Error happened", "logStreamName": "app/1", "eventId": "e-1", "ingestionTime": 1700000000500},
    {"timestamp": 1700000001000, "message": "Warning: memory pressure", "logStreamName": "app/1", "eventId": "e-2"},
    {"timestamp": 1700000002000, "message": "request served"}
  ]
}"#;

/// A top-level array of already-structured records.
pub const ARRAY_ENVELOPE: &str = r#"[
  {"timestamp": "2024-01-15T10:00:00.000Z", "level": "err", "message": "payment failed", "source": "billing", "metadata": {"orderId": 7}},
  {"time": "2024-01-15T10:00:01.000Z", "severity": "warning", "msg": "slow response"},
  {"level": "DEBUG", "message": "cache hit", "metadata": "dropped"}
]"#;

/// Join a corpus into one newline-separated document.
pub fn document(lines: &[&str]) -> String {
    lines.join("\n")
}
