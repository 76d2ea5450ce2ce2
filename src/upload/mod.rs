// src/upload/mod.rs
pub mod sink;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::CredentialProvider,
    error::{ImportError, SubmitError},
    parse::{ParsedRow, UsageRecord},
};
pub use sink::{HttpSink, RecordSink};

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub saved: usize,
    /// Only rows that failed appear here, in the order they were sent.
    pub errors: Vec<SubmitError>,
}

impl UploadReport {
    pub fn any_saved(&self) -> bool {
        self.saved > 0
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Send every row in `rows` to `sink`, one at a time and in order.
///
/// `rows` is the batch's own snapshot: replacing the caller's row list while
/// this runs has no effect on what gets sent. A failed row never stops the
/// rows after it, and nothing is retried. `on_complete` runs once, after the
/// last row, if at least one row was saved.
#[instrument(level = "info", skip_all, fields(rows = rows.len()))]
pub async fn submit_batch<S, C, F>(
    sink: &S,
    credentials: &C,
    rows: Arc<[ParsedRow]>,
    on_complete: F,
) -> Result<UploadReport, ImportError>
where
    S: RecordSink + ?Sized,
    C: CredentialProvider + ?Sized,
    F: FnOnce(&UploadReport),
{
    if rows.is_empty() {
        return Err(ImportError::NothingToUpload);
    }
    let token = credentials
        .credential()
        .ok_or(ImportError::MissingCredential)?;

    let mut report = UploadReport::default();
    for row in rows.iter() {
        match sink.save(&row.record, &token).await {
            Ok(()) => {
                debug!(line = row.line, "row saved");
                report.saved += 1;
            }
            Err(failure) => {
                warn!(line = row.line, %failure, "row not saved");
                report.errors.push(SubmitError {
                    line: row.line,
                    failure,
                });
            }
        }
    }

    info!(
        saved = report.saved,
        failed = report.errors.len(),
        "batch finished"
    );
    if report.any_saved() {
        on_complete(&report);
    }
    Ok(report)
}

/// Save a single hand-entered record.
#[instrument(level = "info", skip_all, fields(date = %record.date, company = %record.company))]
pub async fn submit_record<S, C>(
    sink: &S,
    credentials: &C,
    record: &UsageRecord,
) -> Result<(), ImportError>
where
    S: RecordSink + ?Sized,
    C: CredentialProvider + ?Sized,
{
    let token = credentials
        .credential()
        .ok_or(ImportError::MissingCredential)?;
    sink.save(record, &token)
        .await
        .map_err(ImportError::SaveFailed)?;
    info!("record saved");
    Ok(())
}
