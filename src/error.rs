//! Custom error types for the finance dashboard
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// Errors raised while importing transactions from a CSV file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The header line is missing one or more required columns
    #[error("Invalid header. Expected: \"{}\". Found: \"{}\".", .expected.join("; "), .found.join("; "))]
    InvalidHeader {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The file had a valid header but no row could be parsed
    #[error("No valid transactions found in the file")]
    NoValidRows,

    /// The source could not be read or decoded
    #[error("Failed to read file: {0}")]
    UnreadableFile(String),

    /// The selected file is not a .csv file
    #[error("Invalid file type '{0}'. Please select a .csv file")]
    InvalidFileType(String),
}

/// The main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// CSV import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
