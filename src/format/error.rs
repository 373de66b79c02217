//! Error types for export and delivery operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact could not be written to its destination
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image dimensions could not be decoded
    #[error("Could not read dimensions of '{image}': {reason}")]
    DimensionProbeFailed {
        /// Image name
        image: String,
        /// Decoder message
        reason: String,
    },

    /// Nothing is loaded, so there is nothing to export
    #[error("No images loaded")]
    NoImages,
}

impl FormatError {
    /// Create a dimension probe failure.
    pub fn probe_failed(image: impl Into<String>, reason: impl ToString) -> Self {
        Self::DimensionProbeFailed {
            image: image.into(),
            reason: reason.to_string(),
        }
    }
}
