// src/upload/testing.rs

use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

use super::RecordSink;
use crate::{auth::Credential, error::SaveFailure, parse::UsageRecord};

/// Sink that replays scripted outcomes (then `Ok` once they run out) and
/// records what it was sent.
#[derive(Default)]
pub struct ScriptedSink {
    script: Mutex<VecDeque<Result<(), SaveFailure>>>,
    sent: Mutex<Vec<(UsageRecord, String)>>,
}

impl ScriptedSink {
    pub fn new(script: Vec<Result<(), SaveFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(UsageRecord, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for ScriptedSink {
    async fn save(&self, record: &UsageRecord, token: &Credential) -> Result<(), SaveFailure> {
        self.sent
            .lock()
            .unwrap()
            .push((record.clone(), token.expose().to_string()));
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
