//! Severity normalisation: arbitrary level tokens onto the four [`Level`]s.

use crate::Level;

/// Map any level token to one of the four canonical levels.
///
/// The token is upper-cased first. Canonical names map to themselves;
/// anything else is classified by substring, checked in order: `ERR`, `WARN`,
/// `DEBUG`. Whatever is left (`TRACE`, `NOTICE`, `FATAL`, numbers, empty) is
/// INFO. Total: never fails, never yields a fifth value.
pub fn normalize(token: &str) -> Level {
    let upper = token.to_uppercase();
    if let Some(level) = Level::from_canonical(&upper) {
        return level;
    }

    if upper.contains("ERR") {
        Level::Error
    } else if upper.contains("WARN") {
        Level::Warn
    } else if upper.contains("DEBUG") {
        Level::Debug
    } else {
        Level::Info
    }
}

/// Level inference for log-group event messages, which carry no level field.
///
/// Case-sensitive substring search over the raw message: `ERROR` or `Error`
/// wins over `WARN` or `Warning`, which wins over `DEBUG`.
pub fn infer_from_message(message: &str) -> Level {
    if message.contains("ERROR") || message.contains("Error") {
        Level::Error
    } else if message.contains("WARN") || message.contains("Warning") {
        Level::Warn
    } else if message.contains("DEBUG") {
        Level::Debug
    } else {
        Level::Info
    }
}
