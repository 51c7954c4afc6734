//! Dataset loading error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the meal dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the primary nor the fallback encoding could decode the file
    #[error("Could not decode {path:?} as {primary} or {fallback}")]
    Decode {
        path: PathBuf,
        primary: &'static str,
        fallback: &'static str,
    },

    /// Encoding label not recognised
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// CSV structure could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is not in the header row
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A date cell did not parse as a calendar date
    #[error("Line {line}: could not parse date '{value}'")]
    InvalidDate { line: usize, value: String },
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
