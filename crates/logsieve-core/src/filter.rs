//! Record filtering.
//!
//! A [`RecordFilter`] combines a level choice, a case-insensitive keyword, a
//! free-text [`Search`], an exact source and an inclusive time window.

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::types::parse_timestamp;
use crate::{Level, LogRecord};

// ---------------------------------------------------------------------------
// Level filter
// ---------------------------------------------------------------------------

/// `ALL`, or exactly one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    pub fn matches(&self, level: Level) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(wanted) => *wanted == level,
        }
    }
}

impl std::str::FromStr for LevelFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "ALL" || upper.is_empty() {
            return Ok(LevelFilter::All);
        }
        Level::from_canonical(&upper)
            .map(LevelFilter::Only)
            .ok_or_else(|| Error::UnknownLevel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Relative ranges
// ---------------------------------------------------------------------------

/// A preset look-back window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeRange {
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours6,
    Hours24,
}

impl RelativeRange {
    pub fn span(&self) -> Duration {
        match self {
            RelativeRange::Minutes5 => Duration::minutes(5),
            RelativeRange::Minutes15 => Duration::minutes(15),
            RelativeRange::Minutes30 => Duration::minutes(30),
            RelativeRange::Hours1 => Duration::hours(1),
            RelativeRange::Hours6 => Duration::hours(6),
            RelativeRange::Hours24 => Duration::hours(24),
        }
    }

    /// `(now - span, now)`.
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - self.span(), now)
    }
}

impl std::str::FromStr for RelativeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "5m" => Ok(RelativeRange::Minutes5),
            "15m" => Ok(RelativeRange::Minutes15),
            "30m" => Ok(RelativeRange::Minutes30),
            "1h" => Ok(RelativeRange::Hours1),
            "6h" => Ok(RelativeRange::Hours6),
            "24h" => Ok(RelativeRange::Hours24),
            other => Err(Error::UnknownRange(other.to_string())),
        }
    }
}

/// Parse a user-supplied time bound with the same rules as record timestamps.
pub fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| Error::InvalidTime(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Free-text search
// ---------------------------------------------------------------------------

/// Case-insensitive search over `message` and `timestamp`.
#[derive(Debug, Clone)]
pub enum Search {
    /// Lower-cased needle.
    Substring(String),
    Regex(Regex),
}

impl Search {
    pub fn substring(query: &str) -> Self {
        Search::Substring(query.to_lowercase())
    }

    /// A case-insensitive regex. An invalid pattern degrades to a substring
    /// search for the same text.
    pub fn regex(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => Search::Regex(re),
            Err(err) => {
                tracing::debug!(pattern, %err, "invalid search regex, using substring search");
                Search::substring(pattern)
            }
        }
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Search::Substring(needle) => {
                record.message.to_lowercase().contains(needle.as_str())
                    || record.timestamp.to_lowercase().contains(needle.as_str())
            }
            Search::Regex(re) => re.is_match(&record.message) || re.is_match(&record.timestamp),
        }
    }
}

impl PartialEq for Search {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Search::Substring(a), Search::Substring(b)) => a == b,
            (Search::Regex(a), Search::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Record filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub level: LevelFilter,
    /// Matched case-insensitively against `message` and `source`.
    pub keyword: Option<String>,
    pub search: Option<Search>,
    /// Exact `source` match.
    pub source: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// An empty query searches nothing.
    pub fn search(mut self, search: Search) -> Self {
        let empty = match &search {
            Search::Substring(needle) => needle.is_empty(),
            Search::Regex(re) => re.as_str().is_empty(),
        };
        self.search = (!empty).then_some(search);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn within(self, range: RelativeRange, now: DateTime<Utc>) -> Self {
        let (start, end) = range.resolve(now);
        self.between(Some(start), Some(end))
    }

    /// Every criterion must hold. With a time bound set, records whose
    /// timestamp cannot be parsed never match.
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.level.matches(record.level)
            && self.keyword_matches(record)
            && self.search.as_ref().map_or(true, |search| search.matches(record))
            && self.source_matches(record)
            && self.time_matches(record)
    }

    /// Matching records, in their original order.
    pub fn apply<'a>(&self, records: &'a [LogRecord]) -> Vec<&'a LogRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// A blank keyword matches everything; otherwise it is used untrimmed.
    fn keyword_matches(&self, record: &LogRecord) -> bool {
        let Some(keyword) = self.keyword.as_deref().filter(|k| !k.trim().is_empty()) else {
            return true;
        };
        let needle = keyword.to_lowercase();
        record.message.to_lowercase().contains(&needle)
            || record
                .source
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }

    fn source_matches(&self, record: &LogRecord) -> bool {
        self.source
            .as_deref()
            .map_or(true, |wanted| record.source.as_deref() == Some(wanted))
    }

    fn time_matches(&self, record: &LogRecord) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(ts) = parse_timestamp(&record.timestamp) else {
            return false;
        };
        self.start.map_or(true, |start| ts >= start) && self.end.map_or(true, |end| ts <= end)
    }
}
