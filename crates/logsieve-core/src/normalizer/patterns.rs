//! Line grammars for unstructured text.
//!
//! The grammars form an explicit ordered table; [`match_line`] walks it top to
//! bottom and stops at the first grammar that matches. Order matters: the more
//! specific timestamped forms must be tried before the bare `TOKEN:` form,
//! which would otherwise swallow almost anything.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::severity;
use crate::types::now_timestamp;
use crate::Level;

/// What a successful grammar match yields. `message` is the raw remainder,
/// before source-tag and metadata extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch {
    pub grammar: &'static str,
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

/// How a grammar's capture groups map onto record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Groups: timestamp, level, message.
    TimestampLevel,
    /// Groups: level, message. Timestamp synthesized.
    LevelOnly,
    /// Groups: token, message. An alphabetic token is a level, anything else
    /// is a timestamp with level INFO.
    Token,
}

struct Grammar {
    name: &'static str,
    regex: Regex,
    shape: Shape,
}

/// (name, pattern, shape) in priority order.
///
/// Character classes are spelled out as ASCII: `\d` and `\w` are Unicode-aware
/// in `regex` and would accept digits and letters from other scripts.
const GRAMMAR_TABLE: &[(&str, &str, Shape)] = &[
    (
        "iso8601_bracketed",
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{3})?Z?)\s*\[([A-Za-z0-9_]+)\]\s*(.+)$",
        Shape::TimestampLevel,
    ),
    (
        "datetime_bare",
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}\s+[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{3})?)\s+([A-Za-z0-9_]+)\s+(.+)$",
        Shape::TimestampLevel,
    ),
    (
        "syslog",
        r"^([A-Za-z0-9_]{3}\s+[0-9]{1,2}\s+[0-9]{2}:[0-9]{2}:[0-9]{2})\s+([A-Za-z0-9_]+)\s+(.+)$",
        Shape::TimestampLevel,
    ),
    (
        "bracketed_level",
        r"^\[([A-Za-z0-9_]+)\]\s*(.+)$",
        Shape::LevelOnly,
    ),
    (
        "token_colon",
        r"^([A-Za-z0-9_]+):\s*(.+)$",
        Shape::Token,
    ),
];

fn grammars() -> &'static [Grammar] {
    static GRAMMARS: OnceLock<Vec<Grammar>> = OnceLock::new();
    GRAMMARS.get_or_init(|| {
        GRAMMAR_TABLE
            .iter()
            .map(|&(name, pattern, shape)| Grammar {
                name,
                regex: Regex::new(pattern).expect("built-in line grammar must compile"),
                shape,
            })
            .collect()
    })
}

/// Names of the grammars, in the order they are tried.
pub fn grammar_names() -> impl Iterator<Item = &'static str> {
    GRAMMAR_TABLE.iter().map(|(name, _, _)| *name)
}

/// Try each grammar in priority order; `None` when none matches.
pub fn match_line(line: &str) -> Option<LineMatch> {
    grammars().iter().find_map(|grammar| {
        grammar
            .regex
            .captures(line)
            .map(|caps| grammar.apply(&caps))
    })
}

impl Grammar {
    fn apply(&self, caps: &Captures<'_>) -> LineMatch {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        let (timestamp, level, message) = match self.shape {
            Shape::TimestampLevel => (
                group(1).to_string(),
                severity::normalize(group(2)),
                group(3),
            ),
            Shape::LevelOnly => (now_timestamp(), severity::normalize(group(1)), group(2)),
            Shape::Token => {
                let token = group(1);
                if token.chars().all(|c| c.is_ascii_alphabetic()) {
                    (now_timestamp(), severity::normalize(token), group(2))
                } else {
                    (token.to_string(), Level::Info, group(2))
                }
            }
        };

        LineMatch {
            grammar: self.name,
            timestamp,
            level,
            message: message.to_string(),
        }
    }
}
