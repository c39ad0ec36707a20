//! Logging setup for the client.
//!
//! The terminal belongs to the UI, so logs go only to a per-launch file under
//! the user's data directory. Old files are pruned to a bounded count.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Maximum number of log files to retain.
const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "chatline";
const LOG_ENV: &str = "CHATLINE_LOG";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Returns the log file path.
///
/// Subsequent calls are no-ops. Failures are returned so the caller can carry
/// on without logging.
pub fn init() -> Result<Option<PathBuf>> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to prepare log directory {}", log_dir.display()))?;

    let log_file_name = format_log_file_name(Local::now());
    let log_path = log_dir.join(&log_file_name);
    ensure_file_exists(&log_path)?;
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let file_appender = rolling::never(&log_dir, log_file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(file_layer)
        .try_init()?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("Logging initialized; log file at {}", log_path.display());
    Ok(Some(log_path))
}

fn log_directory() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("No suitable data directory available for logs"))?;
    Ok(data_dir.join("chatline").join("logs"))
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to create log file at {}", path.display()))?;
    Ok(())
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|(modified, _)| *modified);
    let excess = entries.len().saturating_sub(max_files);
    for (_, path) in entries.into_iter().take(excess) {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove old log file {}", path.display()))?;
    }
    Ok(())
}

fn format_log_file_name(now: DateTime<Local>) -> String {
    format!("{}_{}.log", LOG_FILE_PREFIX, now.format("%Y-%m-%d_%H-%M-%S"))
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
