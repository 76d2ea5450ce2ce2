// src/upload/sink.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{auth::Credential, error::SaveFailure, parse::UsageRecord};

/// Anything that can persist one usage record on behalf of a user.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn save(&self, record: &UsageRecord, token: &Credential) -> Result<(), SaveFailure>;
}

/// Posts records as JSON to the backend's record-creation endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: Url,
}

impl HttpSink {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSink for HttpSink {
    #[instrument(level = "debug", skip_all, fields(date = %record.date, company = %record.company))]
    async fn save(&self, record: &UsageRecord, token: &Credential) -> Result<(), SaveFailure> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.expose())
            .json(record)
            .send()
            .await
            .map_err(|e| SaveFailure::TransportFailure(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "saved");
            return Ok(());
        }

        // a body that fails to arrive is treated like an empty one
        let body = resp.bytes().await.ok();
        Err(classify_rejection(status.as_u16(), body.as_deref()))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turn a non-success status and its (possibly absent) body into a failure.
/// Only a JSON object with a non-empty string `error` counts as structured.
pub fn classify_rejection(status: u16, body: Option<&[u8]>) -> SaveFailure {
    let message = body
        .and_then(|b| serde_json::from_slice::<ErrorBody>(b).ok())
        .and_then(|b| b.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    match message {
        Some(message) => SaveFailure::StructuredError { status, message },
        None => SaveFailure::UnstructuredFailure { status },
    }
}
