//! GitHub token storage
//!
//! The token lives in a small JSON file (`{"token": "..."}`), by default
//! ~/.liferaft/liferaft.json. Each save replaces the whole file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use crate::Result;

/// Persisted token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
}

/// Token store trait - where an acquired token ends up
pub trait TokenStore: Send + Sync {
    /// Replace the stored token
    fn save(&self, token: &str) -> Result<()>;

    /// Stored token, if any
    fn load(&self) -> Result<Option<String>>;
}

/// File-backed token store
pub struct JsonTokenStore {
    path: PathBuf,
}

impl JsonTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for JsonTokenStore {
    fn save(&self, token: &str) -> Result<()> {
        // Create parent directory
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let record = StoredToken {
            token: token.to_string(),
        };
        let content = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, content)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        tracing::debug!("Stored GitHub token at {:?}", self.path);
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(record.token))
    }
}

/// In-memory token store for testing
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save` was called
    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }
}
