//! Error types for the archiver module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while moving processed files or resetting the
/// scratch folder.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Source file not found.
    #[error("File not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Permission denied.
    #[error("Permission denied to move file: {path}")]
    PermissionDenied { path: PathBuf },

    /// Failed to move/rename file.
    #[error("Error moving file from {source} to {destination}: {error}")]
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to wipe or recreate a folder.
    #[error("Failed to prepare folder {path}: {error}")]
    Folder {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl ArchiveError {
    /// Classifies an I/O error raised while moving `source`.
    pub fn from_move(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::SourceNotFound { path: source },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: source },
            _ => Self::MoveFailed {
                source,
                destination,
                error,
            },
        }
    }
}
