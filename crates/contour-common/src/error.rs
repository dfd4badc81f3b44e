//! Error types for the contour pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ContourError.
pub type ContourResult<T> = Result<T, ContourError>;

/// Primary error type for contour rendering.
#[derive(Debug, Error)]
pub enum ContourError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image '{path}': {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode image '{path}': {message}")]
    Encode { path: PathBuf, message: String },

    // === Resource Errors ===
    #[error("Unable to allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: usize },

    // === Input Errors ===
    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid contour stamp {index}: {message}")]
    InvalidStamp { index: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    // === Worker Lifecycle Errors ===
    #[error("Worker {id} panicked before completing the pipeline")]
    WorkerPanicked { id: usize },
}

impl ContourError {
    /// Whether the error was caused by the caller's input rather than by the
    /// pipeline itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ContourError::Decode { .. }
                | ContourError::InvalidDimensions(_)
                | ContourError::InvalidStamp { .. }
                | ContourError::InvalidConfig(_)
                | ContourError::InvalidWorkerCount(_)
        )
    }
}

impl From<serde_yaml::Error> for ContourError {
    fn from(err: serde_yaml::Error) -> Self {
        ContourError::InvalidConfig(format!("YAML error: {}", err))
    }
}
