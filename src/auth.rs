// src/auth.rs

use std::{fmt, path::PathBuf};
use tracing::{debug, warn};

/// A bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Blank tokens count as no token at all.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where the submitter gets its token from. Asked once per batch.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// A token known up front (CLI flag or environment).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<Credential>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.and_then(Credential::new))
    }
}

impl CredentialProvider for StaticToken {
    fn credential(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// A token stored in a file, e.g. written by a separate login step.
/// Re-read on every call so a refreshed token is picked up.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for TokenFile {
    fn credential(&self) -> Option<Credential> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let cred = Credential::new(contents);
                if cred.is_none() {
                    debug!(path = %self.path.display(), "token file is empty");
                }
                cred
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read token file");
                None
            }
        }
    }
}

impl<P: CredentialProvider + ?Sized> CredentialProvider for Box<P> {
    fn credential(&self) -> Option<Credential> {
        (**self).credential()
    }
}
