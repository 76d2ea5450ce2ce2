// src/error.rs

use thiserror::Error;

/// Failures that stop a whole parse or upload before any row is handled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// The file could not be read from disk or was not valid UTF-8.
    /// The reason is kept for logs; users only see the short message.
    #[error("Failed to read file")]
    ReadFailed(String),

    #[error("CSV file seems empty or missing data rows")]
    NoDataRows,

    #[error("CSV must have at least 'date', 'kwh', and 'company' columns in the header.")]
    MissingColumns { missing: Vec<&'static str> },

    #[error("No valid rows to upload.")]
    NothingToUpload,

    #[error("Missing auth token. Please log in again.")]
    MissingCredential,

    /// A single-record save was rejected; batches report these per row instead.
    #[error("{0}")]
    SaveFailed(SaveFailure),
}

/// Why one set of raw fields could not become a usage record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Missing date, kwh, or company")]
    Missing,

    #[error("kwh is not a valid number (\"{0}\")")]
    InvalidKwh(String),

    #[error("date must be in YYYY-MM-DD format (\"{0}\")")]
    InvalidDate(String),
}

/// A field error pinned to its 1-based row number (the header is row 1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Row {line}: {kind}")]
pub struct RowError {
    pub line: usize,
    pub kind: FieldError,
}

/// How the record-creation endpoint refused (or never answered) one save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveFailure {
    /// Non-success status with a JSON body carrying an `error` message.
    #[error("failed to save ({status}) - {message}")]
    StructuredError { status: u16, message: String },

    /// Non-success status with no body, a non-JSON body, or no `error` field.
    #[error("failed to save ({status})")]
    UnstructuredFailure { status: u16 },

    /// No response at all (connection refused, reset, DNS, ...).
    #[error("network/other error - {0}")]
    TransportFailure(String),
}

/// A save failure pinned to the row number of the row that was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Row {line}: {failure}")]
pub struct SubmitError {
    pub line: usize,
    pub failure: SaveFailure,
}
