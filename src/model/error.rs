//! Error types for the lines-layout binary.
//!
//! Layout queries and edits are total and never fail. Errors only come from
//! the outer surface: configuration, logging setup, scenario input and
//! writing the report.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`ConfigError`] - config file or environment override failures
//!   - [`LoggingError`] - tracing subscriber setup failures
//!   - [`ScenarioError`] - scenario read or parse failures
//!   - `serde_json::Error` - report serialization failures
//!   - `std::io::Error` - stdin/stdout failures

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::logging::LoggingError;
pub use crate::scenario::ScenarioError;

/// Top-level application error encompassing all failure modes.
///
/// Every domain error converts via `From`, so `main` propagates with `?`.
///
/// # Examples
///
/// ```
/// use lines_layout::model::error::{AppError, ConfigError};
///
/// let err: AppError = ConfigError::InvalidPath("empty".to_string()).into();
/// assert!(err.to_string().contains("Configuration error"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Scenario input is unreadable or malformed.
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Report could not be serialized.
    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),

    /// Reading stdin or writing stdout failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
