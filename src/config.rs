// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::auth::{CredentialProvider, StaticToken, TokenFile};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_SAVE_PATH: &str = "/api/save-energy-usage";

/// Optional YAML config file. Every key may be left out.
///
/// ```yaml
/// api_base: https://dash.example.com
/// save_path: /api/save-energy-usage
/// token_file: ~/.config/kwh-import/token
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub save_path: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub save_path: Option<String>,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
}

/// Resolved settings: overrides, then the config file, then built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: Url,
    pub save_path: String,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<Self> {
        let file = file.unwrap_or_default();

        let api_base = overrides
            .api_base
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base =
            Url::parse(&api_base).with_context(|| format!("invalid API base URL {api_base:?}"))?;

        let save_path = overrides
            .save_path
            .or(file.save_path)
            .unwrap_or_else(|| DEFAULT_SAVE_PATH.to_string());

        Ok(Self {
            api_base,
            save_path,
            token: overrides.token,
            token_file: overrides.token_file.or(file.token_file),
        })
    }

    /// Full URL of the record-creation endpoint. The save path is appended to
    /// the base as text, so a base with its own path prefix keeps it.
    pub fn endpoint(&self) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            self.save_path.trim_start_matches('/')
        );
        Url::parse(&joined).with_context(|| format!("invalid endpoint URL {joined:?}"))
    }

    /// An explicit token wins over a token file.
    pub fn credential_provider(&self) -> Box<dyn CredentialProvider> {
        match (&self.token, &self.token_file) {
            (Some(token), _) => Box::new(StaticToken::new(Some(token.clone()))),
            (None, Some(path)) => Box::new(TokenFile::new(path)),
            (None, None) => Box::new(StaticToken::new(None)),
        }
    }
}
