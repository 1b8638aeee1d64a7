//! File log sink.
//!
//! While the UI owns the terminal nothing may be printed to it, so every
//! event goes to a plain-text file instead.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Environment variable holding the filter directives, e.g. `FL_LOG=debug`.
pub const LOG_ENV: &str = "FL_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Split a log file path into the directory to create and the file name.
fn split_target(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Logging(format!("no file name in {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

/// Filter from `directives`, falling back to `info` when absent or invalid.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber, appending to `path`.
///
/// Call once, before the terminal is switched into raw mode.
pub fn init_logging(path: &Path) -> Result<()> {
    let (dir, file_name) = split_target(path)?;
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&dir)
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let directives = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::info!(log = %path.display(), "logging started");
    Ok(())
}
