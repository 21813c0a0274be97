//! Continuation classification for streams of untagged lines.
//!
//! Remote tails deliver lines with a timestamp but no level. A line carrying
//! a bracketed level tag (`[ERROR]`, `[warn ]`, `[Fatal]`) sets the level;
//! every untagged line after it inherits that level, so the frames of a stack
//! trace stay with the exception that introduced them.
//!
//! The carried level lives in a [`Classifier`] owned by the caller. Use a
//! fresh one for every independent fetch.

use std::sync::OnceLock;

use regex::RegexSet;

use crate::Level;

/// Bracket tags in priority order. When a line carries several tags, the
/// earliest entry here wins, not the earliest tag in the line.
const TAG_LEVELS: &[(&str, Level)] = &[
    ("ERROR", Level::Error),
    ("WARN", Level::Warn),
    ("DEBUG", Level::Debug),
    ("INFO", Level::Info),
    ("FATAL", Level::Error),
    ("TRACE", Level::Debug),
];

fn tag_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(
            TAG_LEVELS
                .iter()
                .map(|(tag, _)| format!(r"(?i)\[ *{tag} *\]")),
        )
        .expect("level tag patterns must compile")
    })
}

/// The level named by a bracket tag anywhere in `line`, if any.
pub fn explicit_level(line: &str) -> Option<Level> {
    tag_set()
        .matches(line)
        .into_iter()
        .next()
        .map(|index| TAG_LEVELS[index].1)
}

/// Carry-forward state for one fetch. Starts at INFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    current: Level,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            current: Level::Info,
        }
    }

    /// The level an untagged line would receive right now.
    pub fn current(&self) -> Level {
        self.current
    }

    /// Classify one line, updating the carried level when the line is tagged.
    pub fn classify(&mut self, line: &str) -> Level {
        if let Some(level) = explicit_level(line) {
            self.current = level;
        }
        self.current
    }
}

/// Classify a whole sequence with fresh state; one level per line, in order.
pub fn classify_lines<I, S>(lines: I) -> Vec<Level>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .scan(Classifier::new(), |classifier, line| {
            Some(classifier.classify(line.as_ref()))
        })
        .collect()
}
