//! Crate-level error type.

use std::path::PathBuf;

use crate::source::SourceError;

/// Errors produced by operations spanning several modules or files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One module of a batch failed to load.
    #[error("Error analyzing {path}")]
    Analyze {
        path: String,
        #[source]
        source: SourceError,
    },

    /// A directory to search does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Writing progress output or walking a directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
