//! Error types for alteris operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for alteris operations
pub type Result<T> = std::result::Result<T, AlterisError>;

/// Errors that can occur during dataset ingestion and comparison
#[derive(Error, Debug)]
pub enum AlterisError {
    #[error("Unsupported file format: '{extension}' (supported: csv)")]
    UnsupportedFormat { extension: String },

    #[error("Failed to load '{path}': {message}")]
    LoadError { path: PathBuf, message: String },

    #[error("Invalid key selection: {reason}")]
    InvalidKeySelection { reason: String },

    #[error("No common columns between base and current datasets - comparison cannot proceed")]
    NoCommonColumns,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AlterisError {
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn load_error(path: &Path, message: impl std::fmt::Display) -> Self {
        Self::LoadError {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn invalid_key_selection(reason: impl Into<String>) -> Self {
        Self::InvalidKeySelection {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
