//! Error types for the autosize application shell.
//!
//! The attachment itself has a single failure mode, a text area that never
//! shows up under its host, and that one is reported through a `warn!` log
//! rather than an error value. Everything in this module belongs to the
//! surrounding shell: configuration, logging setup and the terminal.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from `main`
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse or invalid values
//!   - [`LoggingError`](crate::logging::LoggingError) - log directory or subscriber setup
//!   - [`ViewError`](crate::view::ViewError) - terminal I/O while running the interactive view
//!
//! All variants convert with `#[from]`, so `main` composes the shell with `?`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::ViewError;
use thiserror::Error;

/// Top-level application error encompassing all failure modes of the shell.
///
/// # Recovery Behavior
///
/// - **Config**: Fatal - the user asked for a file that cannot be used.
///   A *missing* config file is not an error and never reaches this type.
/// - **Logging**: Fatal - without a log file the lookup warning would be lost.
/// - **View**: Fatal - without a working terminal there is nothing to show.
///
/// # Examples
///
/// ```
/// use autosize::config::ConfigError;
/// use autosize::model::AppError;
///
/// let err: AppError = ConfigError::InvalidValue {
///     key: "AUTOSIZE_MIN_ROWS",
///     value: "many".to_string(),
/// }
/// .into();
/// assert!(err.to_string().contains("AUTOSIZE_MIN_ROWS"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal failure while running the interactive view.
    #[error("View error: {0}")]
    View(#[from] ViewError),
}
