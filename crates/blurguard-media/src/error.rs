//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during detection, redaction or media I/O.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unreadable input: {0}")]
    UnreadableInput(PathBuf),

    #[error("missing model artifact: {0}")]
    MissingModel(PathBuf),

    #[error("no video writer available for {0} (fallback codec also failed)")]
    WriterUnavailable(PathBuf),

    #[error("failed to encode output: {0}")]
    EncodeFailed(PathBuf),

    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
