//! Logging setup
//!
//! Console output always; when a directory is configured, JSON lines are
//! also written to `<dir>/series.<date>` with daily rotation.
//! RUST_LOG overrides the configured level.

use crate::infrastructure::config::LoggingConfig;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target used by series events
pub const SERIES_TARGET: &str = "series";

/// Initialize logging
///
/// Returns the WorkerGuards which must be kept alive for the duration of
/// the program, or the I/O error from creating the log directory.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<Vec<WorkerGuard>> {
    let mut guards = Vec::new();

    let file_layer = match &config.directory {
        Some(dir) => {
            let (appender, guard) = create_appender(dir, SERIES_TARGET)?;
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .json(),
            )
        }
        None => None,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    // try_init: a subscriber may already be installed (tests, embedding apps)
    let _ = tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(file_layer)
        .with(console_layer)
        .try_init();

    tracing::info!(
        directory = ?config.directory,
        "Logging system initialized"
    );

    Ok(guards)
}

/// RUST_LOG if set and valid, else the configured directive
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Create a daily rolling file appender
fn create_appender(dir: &Path, name: &str) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Emit an event on the series target
#[macro_export]
macro_rules! log_series {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "series", $level, $($arg)+)
    };
}
