//! # Logging
//!
//! Sets up `tracing` with two sinks: a per-session log file and stdout.
//! The file is truncated on every start so it only holds the current session.

use crate::domain::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let dir = Path::new(&config.directory);
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let log_path = dir.join(&config.file);
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(dir, &config.file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter(&config.filter))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// `RUST_LOG` wins over the configured directives; invalid directives fall back to `info`.
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
