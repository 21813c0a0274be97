//! Aggregations over records: level counts and shares, per-source counts and
//! hourly level buckets.
//!
//! [`StatsReport`] bundles all three for output.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

use crate::types::parse_timestamp;
use crate::{Level, LogRecord};

/// Bucket for records without a source.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Number of most recent hours kept in a [`StatsReport`].
pub const HOURLY_WINDOW: usize = 24;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Per-level record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
    pub total: usize,
}

impl LevelStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.record(record.level);
            stats
        })
    }

    pub fn record(&mut self, level: Level) {
        match level {
            Level::Error => self.error += 1,
            Level::Warn => self.warn += 1,
            Level::Info => self.info += 1,
            Level::Debug => self.debug += 1,
        }
        self.total += 1;
    }

    pub fn count(&self, level: Level) -> usize {
        match level {
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
        }
    }

    /// Share of `level` in percent; 0 when there are no records.
    pub fn percentage(&self, level: Level) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(level) as f64 * 100.0 / self.total as f64
    }

    /// Share of ERROR records in percent.
    pub fn error_rate(&self) -> f64 {
        self.percentage(Level::Error)
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Record counts per source. Missing or empty sources land in
/// [`UNKNOWN_SOURCE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    counts: Vec<SourceCount>,
    index: HashMap<String, usize>,
}

impl SourceStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.record(record.source.as_deref());
            stats
        })
    }

    pub fn record(&mut self, source: Option<&str>) {
        let source = source.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_SOURCE);
        match self.index.get(source) {
            Some(&slot) => self.counts[slot].count += 1,
            None => {
                self.index.insert(source.to_string(), self.counts.len());
                self.counts.push(SourceCount {
                    source: source.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn count(&self, source: &str) -> usize {
        self.index.get(source).map_or(0, |&slot| self.counts[slot].count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent first; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<SourceCount> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

// ---------------------------------------------------------------------------
// Hourly buckets
// ---------------------------------------------------------------------------

/// Level counts per UTC hour of the parsed record timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourlyHistogram {
    buckets: BTreeMap<DateTime<Utc>, LevelStats>,
    skipped: usize,
}

impl HourlyHistogram {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut histogram, record| {
            histogram.record(record);
            histogram
        })
    }

    /// Records whose timestamp does not parse are counted as skipped.
    pub fn record(&mut self, record: &LogRecord) {
        match parse_timestamp(&record.timestamp).and_then(hour_of) {
            Some(hour) => self.buckets.entry(hour).or_default().record(record.level),
            None => self.skipped += 1,
        }
    }

    /// Buckets in chronological order.
    pub fn buckets(&self) -> impl Iterator<Item = (DateTime<Utc>, &LevelStats)> {
        self.buckets.iter().map(|(hour, stats)| (*hour, stats))
    }

    /// The `n` most recent buckets, oldest first.
    pub fn last(&self, n: usize) -> Vec<(DateTime<Utc>, LevelStats)> {
        let skip = self.buckets.len().saturating_sub(n);
        self.buckets
            .iter()
            .skip(skip)
            .map(|(hour, stats)| (*hour, *stats))
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

fn hour_of(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ts.date_naive()
        .and_hms_opt(ts.hour(), 0, 0)
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    /// Start of the hour, ISO-8601 UTC.
    pub hour: String,
    #[serde(flatten)]
    pub levels: LevelStats,
}

/// Everything `--stats` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub levels: LevelStats,
    pub error_rate: f64,
    pub sources: Vec<SourceCount>,
    /// The last [`HOURLY_WINDOW`] hours that have records.
    pub hourly: Vec<HourBucket>,
    /// Records left out of `hourly` because their timestamp did not parse.
    pub unplaced: usize,
}

impl StatsReport {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        let records: Vec<&LogRecord> = records.into_iter().collect();
        let levels = LevelStats::from_records(records.iter().copied());
        let sources = SourceStats::from_records(records.iter().copied());
        let hourly = HourlyHistogram::from_records(records.iter().copied());

        Self {
            levels,
            error_rate: levels.error_rate(),
            sources: sources.ranked(),
            hourly: hourly
                .last(HOURLY_WINDOW)
                .into_iter()
                .map(|(hour, levels)| HourBucket {
                    hour: hour.to_rfc3339_opts(SecondsFormat::Secs, true),
                    levels,
                })
                .collect(),
            unplaced: hourly.skipped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<LogRecord> {
        vec![
            LogRecord::new("2024-01-15T10:00:00Z", Level::Info, "server started").with_source("api"),
            LogRecord::new("2024-01-15T10:05:00Z", Level::Error, "Connection refused").with_source("db"),
            LogRecord::new("2024-01-15 10:59:59", Level::Warn, "slow query").with_source("db"),
            LogRecord::new("2024-01-15T11:00:00+01:00", Level::Error, "retry").with_source(""),
            LogRecord::new("Jan 15 10:15:00", Level::Error, "disk full"),
        ]
    }

    #[test]
    fn level_counts_and_shares() {
        let stats = LevelStats::from_records(&sample());
        assert_eq!(
            stats,
            LevelStats { error: 3, warn: 1, info: 1, debug: 0, total: 5 }
        );
        assert_eq!(stats.count(Level::Error), 3);
        assert!((stats.percentage(Level::Warn) - 20.0).abs() < 1e-9);
        assert!((stats.error_rate() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_zero_rate() {
        let stats = LevelStats::default();
        assert_eq!(stats.error_rate(), 0.0);
        assert_eq!(stats.percentage(Level::Info), 0.0);
    }

    #[test]
    fn sources_rank_by_count_with_unknown_bucket() {
        let stats = SourceStats::from_records(&sample());
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.count("db"), 2);
        assert_eq!(stats.count(UNKNOWN_SOURCE), 2);
        assert_eq!(stats.count("nope"), 0);
        let ranked: Vec<_> = stats
            .ranked()
            .into_iter()
            .map(|c| (c.source, c.count))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("db".to_string(), 2),
                (UNKNOWN_SOURCE.to_string(), 2),
                ("api".to_string(), 1),
            ]
        );
    }

    #[test]
    fn hourly_buckets_use_utc_hours_and_skip_unparseable() {
        let histogram = HourlyHistogram::from_records(&sample());
        let buckets: Vec<_> = histogram
            .buckets()
            .map(|(hour, stats)| (hour.to_rfc3339(), stats.total, stats.error))
            .collect();
        assert_eq!(
            buckets,
            vec![("2024-01-15T10:00:00+00:00".to_string(), 4, 2)]
        );
        assert_eq!(histogram.skipped(), 1);
    }

    #[test]
    fn last_keeps_the_most_recent_hours() {
        let records: Vec<_> = (0..30)
            .map(|h| {
                LogRecord::new(
                    format!("2024-01-{:02}T{:02}:30:00Z", 15 + h / 24, h % 24),
                    Level::Info,
                    "tick",
                )
            })
            .collect();
        let histogram = HourlyHistogram::from_records(&records);
        let last = histogram.last(HOURLY_WINDOW);
        assert_eq!(last.len(), HOURLY_WINDOW);
        assert_eq!(last[0].0.to_rfc3339(), "2024-01-15T06:00:00+00:00");
        assert_eq!(last[23].0.to_rfc3339(), "2024-01-16T05:00:00+00:00");
    }

    #[test]
    fn report_bundles_every_aggregation() {
        let records = sample();
        let report = StatsReport::from_records(&records);
        assert_eq!(report.levels.total, 5);
        assert!((report.error_rate - 60.0).abs() < 1e-9);
        assert_eq!(report.sources[0].source, "db");
        assert_eq!(report.hourly.len(), 1);
        assert_eq!(report.hourly[0].hour, "2024-01-15T10:00:00Z");
        assert_eq!(report.unplaced, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errorRate"], 60.0);
        assert_eq!(json["hourly"][0]["error"], 2);
        assert_eq!(json["sources"][1]["source"], UNKNOWN_SOURCE);
    }
}
