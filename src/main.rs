//! Fixed-window series driver
//!
//! Usage: `fixed-window-series [STATE_FILE]`
//!
//! Reads samples from stdin, one per line, as `<when> <value>` where `<when>`
//! is Unix seconds or an RFC 3339 timestamp, or a bare `<value>` recorded at
//! the current time. The series is loaded from STATE_FILE (a fresh one is
//! created if the file is missing or invalid) and written back afterwards;
//! without STATE_FILE the final series is printed to stdout.

use anyhow::{bail, Context};
use fixed_window_series::infrastructure::{config::Config, logging::init_logging};
use fixed_window_series::{AddOutcome, FixedWindowSeries, SeriesField};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Tally of what happened to the input lines
#[derive(Debug, Default)]
struct IngestStats {
    added: usize,
    replaced: usize,
    truncated: usize,
    shifted: usize,
    rejected: usize,
}

impl IngestStats {
    fn record(&mut self, outcome: AddOutcome) {
        match outcome {
            AddOutcome::Added => self.added += 1,
            AddOutcome::Replaced => self.replaced += 1,
            AddOutcome::Truncated => self.truncated += 1,
            AddOutcome::Shifted => self.shifted += 1,
        }
    }
}

fn parse_when(raw: &str) -> anyhow::Result<OffsetDateTime> {
    if let Ok(secs) = raw.parse::<i64>() {
        return OffsetDateTime::from_unix_timestamp(secs)
            .with_context(|| format!("timestamp out of range: {}", raw));
    }
    OffsetDateTime::parse(raw, &Rfc3339).with_context(|| format!("invalid timestamp: {}", raw))
}

fn parse_line(line: &str) -> anyhow::Result<(OffsetDateTime, f64)> {
    let mut parts = line.split_whitespace();
    let (when, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(value), None, None) => (OffsetDateTime::now_utc(), value),
        (Some(when), Some(value), None) => (parse_when(when)?, value),
        _ => bail!("expected `<when> <value>` or `<value>`"),
    };
    let value = value
        .parse::<f64>()
        .with_context(|| format!("invalid value: {}", value))?;
    Ok((when, value))
}

fn load_state(field: &SeriesField, path: Option<&Path>) -> anyhow::Result<FixedWindowSeries> {
    let Some(path) = path else {
        return Ok(field.new_default());
    };
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(field.load_text(Some(text.as_str()))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(field.new_default()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn ingest(series: &mut FixedWindowSeries, input: impl BufRead) -> anyhow::Result<IngestStats> {
    let mut stats = IngestStats::default();

    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = parse_line(line)
            .and_then(|(when, value)| series.add(value, when).map_err(anyhow::Error::from));
        match result {
            Ok(outcome) => {
                tracing::debug!(line = lineno + 1, outcome = outcome.as_str(), "sample recorded");
                stats.record(outcome);
            }
            Err(e) => {
                tracing::warn!(line = lineno + 1, "rejected sample: {:#}", e);
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let _guards = init_logging(&config.logging).context("failed to initialize logging")?;

    let field = config
        .series
        .field()
        .context("invalid [series] configuration")?;
    let state_path: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let mut series = load_state(&field, state_path.as_deref())?;
    tracing::info!(
        points = series.len(),
        resolution = %series.resolution(),
        max_points = series.max_points(),
        "series loaded"
    );

    let stats = ingest(&mut series, io::stdin().lock())?;
    tracing::info!(?stats, "ingest finished");

    let text = field.store_text(Some(&series));
    match &state_path {
        Some(path) => std::fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", text),
    }

    let normalized = series.normalized_points();
    match (normalized.min, normalized.max) {
        (Some(min), Some(max)) => tracing::info!(
            min,
            max,
            points = normalized.points.len(),
            sparkline = %normalized.sparkline(),
            "series range"
        ),
        _ => tracing::info!("series has no visual range"),
    }

    Ok(())
}
