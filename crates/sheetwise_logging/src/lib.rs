//! Shared logging utilities for the sheetwise binary.
//!
//! Two separate concerns live here:
//! - diagnostics: `tracing` output to a daily-rolling file and stderr
//! - the user-visible error log: an append-only sink that records one line
//!   per failed operation (see [`ErrorSink`])

mod error_log;

pub use error_log::{ErrorSink, FileErrorLog, MemoryErrorLog, DEFAULT_ERROR_LOG};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "sheetwise=info,sheetwise_db=info,sheetwise_logging=info";

/// Logging configuration for the binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only.
    pub verbose: bool,
}

/// Initialize tracing with a rolling file writer and stderr output.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process. If the log directory cannot be created, logging
/// continues on stderr only.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<WorkerGuard>> {
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // The interactive shell owns stdout; keep stderr quiet unless asked.
    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    let (file_layer, guard) = match ensure_logs_dir() {
        Ok(dir) => {
            let file_name = format!("{}.log", sanitize_name(config.app_name));
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("Warning: file logging disabled: {:#}", err);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Get the sheetwise home directory: `$SHEETWISE_HOME` or `~/.sheetwise`.
///
/// Falls back to `./.sheetwise` when no home directory can be determined.
pub fn sheetwise_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("SHEETWISE_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sheetwise")
}

/// Get the logs directory: `<home>/logs`
pub fn logs_dir() -> PathBuf {
    sheetwise_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
