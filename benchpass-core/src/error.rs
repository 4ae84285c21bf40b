//! Error types for result loading and comparison

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading result sets or writing reports
#[derive(Error, Debug)]
pub enum CompareError {
    /// Result file could not be read
    #[error("failed to read results from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Result file is not a valid JSON document
    #[error("invalid JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report could not be written
    #[error("failed to write report to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be encoded as JSON
    #[error("failed to encode report")]
    Encode(#[from] serde_json::Error),
}

/// Result type for comparison operations
pub type CompareResult<T> = Result<T, CompareError>;
