// src/parse/mod.rs
pub mod header;
pub mod row;

use std::{path::Path, sync::Arc};
use tracing::{debug, instrument, warn};

use crate::error::{ImportError, RowError};
pub use header::ColumnIndex;
pub use row::{ParsedRow, UsageRecord};

/// Everything one pass over a file produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    /// Accepted rows in source order. Shared so an upload can hold on to
    /// the exact list it started with.
    pub rows: Arc<[ParsedRow]>,
    /// One entry per rejected data line, in source order.
    pub errors: Vec<RowError>,
}

impl ParseReport {
    pub fn accepted(&self) -> usize {
        self.rows.len()
    }

    pub fn snapshot(&self) -> Arc<[ParsedRow]> {
        Arc::clone(&self.rows)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Parse decoded CSV text into accepted rows plus per-row errors.
///
/// - A leading byte-order mark is dropped.
/// - Lines are split on `\n` (a trailing `\r` is trimmed away with the rest
///   of the whitespace) and blank lines are skipped.
/// - The first non-blank line is the header; `date`, `kwh` and `company`
///   must be present or nothing is parsed.
/// - Commas always separate fields. Quoted values are not understood.
///
/// Row numbers count from the header, which is row 1. Blank lines before the
/// header are not counted; blank lines after it are, so a number still points
/// at the offending line below the header.
#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_csv(text: &str) -> Result<ParseReport, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<(usize, &str)> = text
        .split('\n')
        .enumerate()
        .map(|(idx, line)| (idx, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let Some((&(header_idx, header), data)) = lines.split_first() else {
        return Err(ImportError::NoDataRows);
    };
    if data.is_empty() {
        return Err(ImportError::NoDataRows);
    }

    let columns = ColumnIndex::from_header(header)?;
    debug!(?columns, data_lines = data.len(), "header resolved");

    let mut rows = Vec::with_capacity(data.len());
    let mut errors = Vec::new();

    for &(idx, raw) in data {
        let line = idx - header_idx + 1;
        let cols: Vec<&str> = raw.split(',').collect();
        let fields = columns.extract(&cols);

        match UsageRecord::from_raw(fields.date, fields.kwh, fields.company, fields.notes) {
            Ok(record) => rows.push(ParsedRow { line, record }),
            Err(kind) => {
                debug!(line, %kind, "row rejected");
                errors.push(RowError { line, kind });
            }
        }
    }

    if !errors.is_empty() {
        warn!(
            accepted = rows.len(),
            rejected = errors.len(),
            "some rows failed validation"
        );
    }

    Ok(ParseReport {
        rows: rows.into(),
        errors,
    })
}

/// Read a file and decode it as UTF-8.
pub async fn read_csv_file(path: impl AsRef<Path>) -> Result<String, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "could not read file");
        ImportError::ReadFailed(e.to_string())
    })?;

    String::from_utf8(bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "file is not valid UTF-8");
        ImportError::ReadFailed(e.to_string())
    })
}

/// [`read_csv_file`] followed by [`parse_csv`].
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_csv_file(path: impl AsRef<Path>) -> Result<ParseReport, ImportError> {
    let text = read_csv_file(path).await?;
    parse_csv(&text)
}
