use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "tarara.log";

/// Parse a filter directive, falling back to `info` when it doesn't parse.
pub fn build_filter(log_level: &str) -> EnvFilter {
    match EnvFilter::try_new(log_level) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
            EnvFilter::new("info")
        }
    }
}

pub fn default_log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("tarara").join("logs"))
}

/// Initialize logging to a daily rotating file.
///
/// The terminal belongs to the UI, so nothing is written to stdout or
/// stderr once this is installed.
pub fn init_logging(log_level: &str, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Could not install log subscriber: {}", e))?;

    Ok(())
}
