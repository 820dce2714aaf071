//! Console and per-run file logging.

use anyhow::{Context, Result};
use goal_migrator::PathsConfig;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name for a run started now, e.g. `logs_14_05_19_10_2026.log`.
pub fn log_file_name() -> String {
    chrono::Local::now()
        .format(PathsConfig::LOG_FILE_FORMAT)
        .to_string()
}

/// Install stdout and file logging.
///
/// `RUST_LOG` overrides the level chosen by `debug`. The returned guard must
/// be held until exit so buffered file output is flushed.
pub fn init(log_dir: &Path, debug: bool) -> Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_name = log_file_name();
    let log_path = log_dir.join(&file_name);
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, &file_name));

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok((guard, log_path))
}
