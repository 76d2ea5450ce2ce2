//! Bulk import of electricity usage records from CSV files.
//!
//! [`parse`] turns an uploaded file into accepted rows plus per-row errors;
//! [`upload`] sends an accepted-row snapshot to the dashboard backend one row
//! at a time.

pub mod auth;
pub mod config;
pub mod error;
pub mod parse;
pub mod session;
pub mod summary;
pub mod upload;

pub use error::{FieldError, ImportError, RowError, SaveFailure, SubmitError};
pub use parse::{load_csv_file, parse_csv, ParseReport, ParsedRow, UsageRecord};
pub use session::ImportSession;
pub use upload::{submit_batch, submit_record, HttpSink, RecordSink, UploadReport};
