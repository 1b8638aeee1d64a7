use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Everything except `Terminal` and `InvalidPath` is recoverable: the session
/// records it and the requested action simply does not happen.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Soft delete was requested on something that is not a regular file.
    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The backup location is the live file itself.
    #[error("Backup would overwrite the file itself: {}", .0.display())]
    SameFile(PathBuf),

    /// An external program could not be launched.
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The search pattern did not compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The log sink could not be set up.
    #[error("Logging error: {0}")]
    Logging(String),
}
