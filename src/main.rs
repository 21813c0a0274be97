use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use logsieve::config::{Config, OutputFormat};
use logsieve::feeds::file::FileFeed;
use logsieve::feeds::kubernetes::ApiResponseFeed;
use logsieve::feeds::stdin::StdinFeed;
use logsieve::feeds::Feed;
use logsieve::filter::{parse_bound, LevelFilter, RecordFilter, RelativeRange, Search};
use logsieve::render;
use logsieve::stats::StatsReport;

#[derive(Parser)]
#[command(name = "logsieve", about = "logsieve: normalise and classify log text")]
struct Cli {
    /// Log files or folders to read. Reads stdin when none are given.
    paths: Vec<PathBuf>,

    /// Only read folder files whose name contains this text.
    #[arg(long, value_name = "TEXT")]
    name_pattern: Option<String>,

    /// Saved Kubernetes log API response; `.json` is decoded, anything else is kept raw.
    #[arg(long, value_name = "FILE")]
    api_response: Vec<PathBuf>,

    /// Only show one level: ALL, ERROR, WARN, INFO or DEBUG.
    #[arg(long)]
    level: Option<String>,

    /// Case-insensitive substring of the message or source.
    #[arg(long)]
    keyword: Option<String>,

    /// Case-insensitive search over message and timestamp.
    #[arg(long)]
    search: Option<String>,

    /// Treat --search as a regular expression; an invalid one is searched as text.
    #[arg(long, requires = "search")]
    regex: bool,

    /// Only show records whose source is exactly this value.
    #[arg(long)]
    source: Option<String>,

    /// Relative window ending now: 5m, 15m, 30m, 1h, 6h or 24h.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    since: Option<String>,

    /// Inclusive lower time bound.
    #[arg(long)]
    start: Option<String>,

    /// Inclusive upper time bound.
    #[arg(long)]
    end: Option<String>,

    /// Print level, source and hourly counts instead of records.
    #[arg(long)]
    stats: bool,

    /// Output format: text, json or ndjson.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Write debug logs to /tmp/logsieve-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/logsieve-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("logsieve debug log started, tail -f /tmp/logsieve-debug.log");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config load failed, using defaults");
        Config::defaults()
    });
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let mut records = Vec::new();
    for mut feed in feeds(&cli) {
        let name = feed.name();
        let read = feed
            .read_records()
            .with_context(|| format!("reading {name}"))?;
        tracing::debug!(feed = %name, records = read.len(), "feed drained");
        records.extend(read);
    }

    let filter = build_filter(&cli, &config)?;
    let selected = filter.apply(&records);

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    if cli.stats {
        let report = StatsReport::from_records(selected.iter().copied());
        render::write_stats(&mut out, &report, config.output.format)?;
    } else {
        render::write_records(&mut out, &selected, &config.output)?;
    }
    out.flush()?;
    Ok(())
}

fn feeds(cli: &Cli) -> Vec<Box<dyn Feed>> {
    let mut feeds: Vec<Box<dyn Feed>> = Vec::new();
    for path in &cli.paths {
        let mut feed = FileFeed::new(path);
        if let Some(pattern) = &cli.name_pattern {
            feed = feed.with_name_pattern(pattern.clone());
        }
        feeds.push(Box::new(feed));
    }
    for path in &cli.api_response {
        feeds.push(Box::new(ApiResponseFeed::new(path)));
    }
    if feeds.is_empty() {
        feeds.push(Box::new(StdinFeed::new()));
    }
    feeds
}

/// Flags win over `[filter]` config values.
fn build_filter(cli: &Cli, config: &Config) -> anyhow::Result<RecordFilter> {
    let level: LevelFilter = cli
        .level
        .as_deref()
        .unwrap_or(&config.filter.level)
        .parse()?;
    let mut filter = RecordFilter::default().level(level);

    if let Some(keyword) = &cli.keyword {
        filter = filter.keyword(keyword.clone());
    }
    if let Some(query) = &cli.search {
        let search = if cli.regex {
            Search::regex(query)
        } else {
            Search::substring(query)
        };
        filter = filter.search(search);
    }
    if let Some(source) = &cli.source {
        filter = filter.source(source.clone());
    }

    let since = cli
        .since
        .as_deref()
        .or_else(|| (!config.filter.since.is_empty()).then_some(config.filter.since.as_str()));

    if cli.start.is_some() || cli.end.is_some() {
        let start = cli.start.as_deref().map(parse_bound).transpose()?;
        let end = cli.end.as_deref().map(parse_bound).transpose()?;
        filter = filter.between(start, end);
    } else if let Some(since) = since {
        let range: RelativeRange = since.parse()?;
        filter = filter.within(range, chrono::Utc::now());
    }

    Ok(filter)
}
