//! Error types for classifier loading and inference

use std::path::PathBuf;
use thiserror::Error;

/// Failure while running the classifier on a batch of inputs
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The classifier produced no label for an input
    #[error("classifier returned {got} labels for {expected} inputs")]
    OutputMismatch { expected: usize, got: usize },

    /// Any other inference failure reported by the model
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Failure while loading the classifier artifact from disk
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("'{}' not found. Make sure the classifier artifact is at this path", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse classifier artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    Invalid(String),

    #[error("artifact checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;
