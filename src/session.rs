// src/session.rs

use std::{path::Path, sync::Arc};
use tracing::info;

use crate::{
    error::ImportError,
    parse::{self, ParseReport, ParsedRow},
    upload::UploadReport,
};

/// What a user currently sees for one import: the chosen file, its accepted
/// rows, the messages to show, and how many rows the last upload saved.
///
/// Every field is replaced as a whole, never edited in place, so an upload
/// that took a [`snapshot`](Self::snapshot) is unaffected by a later file.
#[derive(Debug, Clone)]
pub struct ImportSession {
    file_name: Option<String>,
    rows: Arc<[ParsedRow]>,
    messages: Vec<String>,
    saved: usize,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self {
            file_name: None,
            rows: Vec::new().into(),
            messages: Vec::new(),
            saved: 0,
        }
    }
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse `path`, replacing everything from the previous file.
    pub async fn select_file(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.reset(name);

        match parse::read_csv_file(path).await {
            Ok(text) => self.apply_parse(parse::parse_csv(&text)),
            Err(e) => self.messages = vec![e.to_string()],
        }
    }

    /// Same as [`select_file`](Self::select_file) for text already in memory.
    pub fn select_text(&mut self, name: impl Into<String>, text: &str) {
        self.reset(name.into());
        self.apply_parse(parse::parse_csv(text));
    }

    fn reset(&mut self, name: String) {
        self.file_name = Some(name);
        self.rows = Vec::new().into();
        self.messages = Vec::new();
        self.saved = 0;
    }

    fn apply_parse(&mut self, result: Result<ParseReport, ImportError>) {
        match result {
            Ok(report) => {
                info!(
                    file = self.file_name.as_deref().unwrap_or_default(),
                    accepted = report.accepted(),
                    rejected = report.errors.len(),
                    "file parsed"
                );
                self.messages = report.error_messages();
                self.rows = report.rows;
            }
            Err(e) => self.messages = vec![e.to_string()],
        }
    }

    /// The rows an upload should send, frozen at the moment of the call.
    pub fn snapshot(&self) -> Arc<[ParsedRow]> {
        Arc::clone(&self.rows)
    }

    /// Replace the displayed messages and count with an upload's result.
    pub fn record_upload(&mut self, result: Result<UploadReport, ImportError>) {
        match result {
            Ok(report) => {
                self.saved = report.saved;
                self.messages = report.error_messages();
            }
            Err(e) => {
                self.saved = 0;
                self.messages = vec![e.to_string()];
            }
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn rows(&self) -> &[ParsedRow] {
        &self.rows
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn saved(&self) -> usize {
        self.saved
    }
}
