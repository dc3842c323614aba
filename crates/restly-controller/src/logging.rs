//! Tracing subscriber setup: stderr plus optional daily rolling files.

use crate::{AppError, AppResult, config::LoggingConfig};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::warn;
use tracing_appender::rolling::{Builder, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt::writer::MakeWriterExt};

const LOG_FILE_PREFIX: &str = "controller";
const MAX_LOG_FILES: usize = 5;

/// Default filter when `RUST_LOG` is not set.
pub(crate) fn filter_directives(level: &str) -> String {
    format!("restly_controller={level},restly_core={level},tower_http=warn")
}

/// Daily rolling appender writing `controller.<date>.log` into `log_dir`.
#[track_caller]
pub(crate) fn file_appender(log_dir: &Path) -> AppResult<RollingFileAppender> {
    Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| AppError::LoggingError {
            reason: format!("Failed to create log appender in {:?}: {}", log_dir, e),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Install the global subscriber.
///
/// `log_dir` is only used when `config.log_to_file` is set. If no log file
/// can be opened there, logging continues on stderr alone and a warning is
/// emitted through the installed subscriber.
#[track_caller]
pub(crate) fn init_logging(config: &LoggingConfig, log_dir: &Path) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let (appender, file_error) = if config.log_to_file {
        match file_appender(log_dir) {
            Ok(appender) => (Some(appender), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let result = match appender {
        Some(appender) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::io::stderr.and(appender))
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| AppError::LoggingError {
        reason: format!("Failed to install subscriber: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if let Some(e) = file_error {
        warn!(error = %e, log_dir = ?log_dir, "File logging unavailable, logging to stderr only");
    }

    Ok(())
}
