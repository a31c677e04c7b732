use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Bearer credentials issued by `auth/token/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Default)]
struct SessionInner {
    tokens: Option<Tokens>,
}

/// Shared handle to the login state, mirrored to a JSON file on disk.
///
/// Every network call site gets a clone of this handle; there is no global
/// lookup. Any clone may clear the tokens at any time (401 handling), so
/// readers must re-check on every request.
#[derive(Clone, Debug)]
pub struct Session {
    path: PathBuf,
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    /// Opens the token store at `path`. A missing or unreadable file means
    /// "logged out" rather than an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tokens = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Tokens>(&text) {
                Ok(tokens) => Some(tokens),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            inner: Arc::new(Mutex::new(SessionInner { tokens })),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, tokens: Tokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory {}", parent.display())
                })?;
            }
        }
        let text = serde_json::to_string(&tokens).context("Failed to encode session")?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;

        self.lock().tokens = Some(tokens);
        Ok(())
    }

    /// Drops both tokens, in memory and on disk.
    pub fn clear(&self) {
        self.lock().tokens = None;
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove session file {}: {}", self.path.display(), e);
            }
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().tokens.as_ref().map(|t| t.access.clone())
    }

    pub fn tokens(&self) -> Option<Tokens> {
        self.lock().tokens.clone()
    }

    pub fn is_active(&self) -> bool {
        self.lock().tokens.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // A poisoned lock only means another task panicked mid-update; the
        // token slot itself is always in a valid state.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
