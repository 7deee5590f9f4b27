//! JSON file store for conversation sessions
//!
//! One file per session, `<dir>/<name>.json`:
//!
//! ```json
//! { "version": 1, "saved_at": "2024-05-01T12:00:00Z", "session": { "messages": [...] } }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_domain::session::repository::is_valid_session_name;
use relay_domain::{ConversationSession, SessionRepository, SessionStoreError};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub session: ConversationSession,
}

pub struct JsonSessionRepository {
    dir: PathBuf,
}

impl JsonSessionRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/toolrelay/sessions`, falling back to `./.toolrelay/sessions`.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("toolrelay").join("sessions"))
            .unwrap_or_else(|| PathBuf::from(".toolrelay").join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SessionStoreError> {
        if !is_valid_session_name(name) {
            return Err(SessionStoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> SessionStoreError {
    SessionStoreError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn save(
        &self,
        name: &str,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError> {
        let path = self.path_for(name)?;
        let snapshot = SessionSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&self.dir, e))?;

        // Write then rename so a crash never leaves a half-written snapshot
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!(session = name, messages = session.len(), "Saved session");
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<ConversationSession, SessionStoreError> {
        let path = self.path_for(name)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SessionStoreError::NotFound(name.to_string()));
            }
            Err(e) => return Err(storage_error(&path, e)),
        };

        let snapshot: SessionSnapshot = serde_json::from_str(&json)
            .map_err(|e| SessionStoreError::Corrupt(format!("{}: {}", name, e)))?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SessionStoreError::Corrupt(format!(
                "{}: unsupported snapshot version {}",
                name, snapshot.version
            )));
        }

        debug!(session = name, saved_at = %snapshot.saved_at, "Loaded session");
        Ok(snapshot.session)
    }

    async fn list(&self) -> Result<Vec<String>, SessionStoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.dir, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && is_valid_session_name(stem)
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
