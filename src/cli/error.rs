//! CLI-level errors (wraps config and batch failures)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("{failed} of {total} collections failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("config file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("no config directory available")]
    NoConfigDir,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Settings(_) => exitcode::CONFIG,
            CliError::UnknownCollection(_) => exitcode::USAGE,
            CliError::BatchFailed { .. } => exitcode::DATAERR,
            CliError::ConfigExists(_) | CliError::NoConfigDir => exitcode::CANTCREAT,
            CliError::Io { .. } => exitcode::IOERR,
        }
    }
}
