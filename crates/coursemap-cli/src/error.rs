//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema could not be loaded or encoded.
    #[error(transparent)]
    Schema(#[from] coursemap_core::Error),

    /// The log directive could not be parsed.
    #[error("invalid log directive: {0}")]
    LogDirective(String),
}

impl CliError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
