use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Persisted token pair. The field names double as the on-disk keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Process-wide token storage shared by the API client and the route guard.
///
/// Written once per login, read on every request and navigation. Share it as
/// `Arc<SessionStore>`.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    data: RwLock<SessionData>,
}

impl SessionStore {
    /// Open the store backed by `<dir>/session.json`, loading any saved tokens.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(SESSION_FILE);
        let data = match Self::read_file(&path) {
            Ok(Some(data)) => data,
            Ok(None) => SessionData::default(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Ignoring unreadable session file");
                SessionData::default()
            }
        };

        Self {
            path: Some(path),
            data: RwLock::new(data),
        }
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(SessionData::default()),
        }
    }

    /// Overwrite both tokens. The in-memory copy is updated even when the
    /// file write fails.
    pub fn save_session(&self, access: &str, refresh: &str) -> Result<()> {
        let snapshot = {
            let mut data = self.write();
            data.access_token = Some(access.to_string());
            data.refresh_token = Some(refresh.to_string());
            data.clone()
        };
        debug!("Session tokens updated");

        if let Some(ref path) = self.path {
            Self::write_file(path, &snapshot).inspect_err(|e| {
                warn!(error = %e, path = %path.display(), "Failed to save session");
            })?;
        }
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    /// Stored but never sent anywhere.
    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read()
            .access_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> SessionData {
        self.read().clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_file(path: &Path) -> Result<Option<SessionData>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .context("Failed to read session file")?;
        let data = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(data))
    }

    fn write_file(path: &Path, data: &SessionData) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }
}
