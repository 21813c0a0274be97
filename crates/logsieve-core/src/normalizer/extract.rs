//! Inline extraction from a matched message body: a leading `[source]` tag
//! and a trailing single-level `{...}` JSON metadata fragment.

use std::sync::OnceLock;

use regex::Regex;

use crate::Metadata;

/// A message with its inline source tag and metadata fragment split out.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub message: String,
    pub source: Option<String>,
    pub metadata: Option<Metadata>,
}

fn source_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]+)\]\s*").expect("source tag regex must compile"))
}

// Nested objects never match: `[^}]` stops at the first closing brace.
fn trailing_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]+\}$").expect("metadata regex must compile"))
}

/// Split the source tag and metadata fragment out of `message`.
///
/// The tag is checked first; the metadata check runs on what is left. A
/// fragment that is not valid JSON stays in the message. The result is
/// always trimmed.
pub fn extract(message: &str) -> Extracted {
    let (source, rest) = match source_tag().captures(message) {
        Some(caps) => {
            let tag_end = caps.get(0).map_or(0, |m| m.end());
            (
                caps.get(1).map(|m| m.as_str().to_string()),
                &message[tag_end..],
            )
        }
        None => (None, message),
    };

    let (metadata, rest) = match trailing_object().find(rest) {
        Some(fragment) => match serde_json::from_str::<Metadata>(fragment.as_str()) {
            Ok(metadata) => (Some(metadata), &rest[..fragment.start()]),
            Err(err) => {
                tracing::trace!(fragment = fragment.as_str(), %err, "trailing braces are not JSON");
                (None, rest)
            }
        },
        None => (None, rest),
    };

    Extracted {
        message: rest.trim().to_string(),
        source,
        metadata,
    }
}
