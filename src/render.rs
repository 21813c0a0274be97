//! Output rendering for the `logsieve` binary.

use std::io::{self, Write};

use logsieve_core::config::{OutputConfig, OutputFormat};
use logsieve_core::stats::StatsReport;
use logsieve_core::{Level, LogRecord};

/// One record as a single text line: `timestamp LEVEL [source] message`.
pub fn text_line(record: &LogRecord, output: &OutputConfig) -> String {
    let mut line = format!("{} {:<5}", record.timestamp, record.level.as_str());
    if output.show_source {
        if let Some(source) = &record.source {
            line.push_str(" [");
            line.push_str(source);
            line.push(']');
        }
    }
    line.push(' ');
    line.push_str(&record.message);
    if output.show_metadata {
        if let Some(metadata) = &record.metadata {
            if !metadata.is_empty() {
                line.push(' ');
                line.push_str(&serde_json::Value::Object(metadata.clone()).to_string());
            }
        }
    }
    line
}

/// Write records in the configured format.
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[&LogRecord],
    output: &OutputConfig,
) -> io::Result<()> {
    match output.format {
        OutputFormat::Text => {
            for record in records {
                writeln!(out, "{}", text_line(record, output))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Ndjson => {
            for record in records {
                serde_json::to_writer(&mut *out, record)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Write a stats report. Text output lists level counts with their share,
/// the error rate, per-source counts and hourly buckets; the JSON formats
/// write the report as one object.
pub fn write_stats<W: Write>(
    out: &mut W,
    report: &StatsReport,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_stats_text(out, report),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
        OutputFormat::Ndjson => {
            serde_json::to_writer(&mut *out, report)?;
            writeln!(out)
        }
    }
}

fn write_stats_text<W: Write>(out: &mut W, report: &StatsReport) -> io::Result<()> {
    let levels = &report.levels;
    for level in Level::ALL {
        writeln!(
            out,
            "{:<5} {} ({:.1}%)",
            level.as_str(),
            levels.count(level),
            levels.percentage(level)
        )?;
    }
    writeln!(out, "TOTAL {}", levels.total)?;
    writeln!(out, "ERROR RATE {:.2}%", report.error_rate)?;

    if !report.sources.is_empty() {
        writeln!(out, "\nSOURCES")?;
        for entry in &report.sources {
            writeln!(out, "{} {}", entry.source, entry.count)?;
        }
    }

    if !report.hourly.is_empty() {
        writeln!(out, "\nHOURLY")?;
        for bucket in &report.hourly {
            let b = &bucket.levels;
            writeln!(
                out,
                "{} ERROR {} WARN {} INFO {} DEBUG {} TOTAL {}",
                bucket.hour, b.error, b.warn, b.info, b.debug, b.total
            )?;
        }
    }
    if report.unplaced > 0 {
        writeln!(out, "UNPLACED {}", report.unplaced)?;
    }
    Ok(())
}
