//! Log output setup.
//!
//! Library code only emits `tracing` events; the driver decides where they
//! go. [`init`] installs a subscriber that writes every event to stdout and,
//! when a log file is configured, appends the same events (without ANSI
//! colors) to that file through a background writer.
//!
//! `RUST_LOG` takes precedence over the configured level.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log level '{0}': {1}")]
    Filter(String, String),
    #[error("log file path has no file name: {0}")]
    FilePath(PathBuf),
    #[error("cannot open log file: {0}")]
    File(#[from] tracing_appender::rolling::InitError),
    #[error("failed to install log subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// When the log file starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// A single file, appended to across runs.
    #[default]
    Never,
    Daily,
    Hourly,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"respimage=debug"`.
    pub level: String,
    /// Log file. `None` logs to stdout only.
    pub file: Option<PathBuf>,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("respimage.log")),
            rotation: LogRotation::Never,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the program exits.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggingError::Filter(config.level.clone(), e.to_string()))?,
    };

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let appender = file_appender(path, config.rotation)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn file_appender(path: &Path, rotation: LogRotation) -> Result<RollingFileAppender, LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::FilePath(path.to_path_buf()))?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let appender = RollingFileAppender::builder()
        .rotation(rotation.into())
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)?;
    Ok(appender)
}
