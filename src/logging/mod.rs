//! Tracing subscriber initialization.
//!
//! The binary writes its report to stdout, so diagnostics go to a log file.
//! Follow them with `tail -f` in a separate terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,

    /// Configured filter is not a valid `EnvFilter` directive list
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter {
        /// The configured filter
        filter: String,
        /// Parser message
        reason: String,
    },
}

/// Filter used when neither `RUST_LOG` nor the configuration sets one.
///
/// Raise `lines_layout` to `debug` to see commits, rebuilds and flushes, or
/// to `trace` for every edit translation.
pub const DEFAULT_LOG_FILTER: &str = "lines_layout=info";

/// Initialize the tracing subscriber with file-based logging.
///
/// `RUST_LOG` wins over `filter` when it parses; `filter` comes from the
/// resolved configuration and defaults to [`DEFAULT_LOG_FILTER`].
///
/// Creates the log directory if it doesn't exist.
///
/// # Errors
///
/// Returns `LoggingError` if the path has no file name, the directory could
/// not be created, `filter` does not parse, or the subscriber was already
/// initialized.
pub fn init(log_path: &Path, filter: &str) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let env_filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), filter)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_path = %log_path.display(),
        filter,
        "lines-layout logging started"
    );
    Ok(())
}

/// Directory and file name of `log_path`. A bare file name logs to the
/// current directory.
fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;
    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };

    Ok((directory, file_name))
}

/// Filter from `RUST_LOG` when set and valid, otherwise from `configured`.
fn build_filter(from_env: Option<String>, configured: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(filter) = from_env.filter(|filter| !filter.trim().is_empty()) {
        if let Ok(env_filter) = EnvFilter::try_new(&filter) {
            return Ok(env_filter);
        }
    }
    EnvFilter::try_new(configured).map_err(|error| LoggingError::InvalidFilter {
        filter: configured.to_string(),
        reason: error.to_string(),
    })
}
