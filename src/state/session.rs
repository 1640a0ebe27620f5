//! Signed-in user session and its persistence
//!
//! The session is loaded once when the app starts and cleared on logout.
//! Stores are injected so tests and ephemeral runs never touch the disk.

use super::document::DocumentHistory;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A user together with the bearer token issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Where sessions and per-user history are kept
pub trait SessionStore: Send {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&mut self, session: &Session) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn load_history(&self, user_id: &str) -> Result<DocumentHistory>;
    fn save_history(&mut self, user_id: &str, history: &DocumentHistory) -> Result<()>;
}

const SESSION_FILE: &str = "session.json";

/// JSON files under a data directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn history_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("user_documents_{user_id}.json"))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data dir {}", self.dir.display()))?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                tracing::info!(user = %session.user.email, "Restored session");
                Ok(Some(session))
            }
            Err(e) => {
                // A corrupt session file is treated as signed out
                tracing::warn!("Ignoring unreadable session file: {e}");
                Ok(None)
            }
        }
    }

    fn save(&mut self, session: &Session) -> Result<()> {
        self.write_json(&self.session_path(), session)?;
        tracing::debug!(user = %session.user.email, "Session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
        tracing::debug!("Session cleared");
        Ok(())
    }

    fn load_history(&self, user_id: &str) -> Result<DocumentHistory> {
        let path = self.history_path(user_id);
        if !path.exists() {
            return Ok(DocumentHistory::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_history(&mut self, user_id: &str, history: &DocumentHistory) -> Result<()> {
        self.write_json(&self.history_path(user_id), history)
    }
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    session: Option<Session>,
    histories: HashMap<String, DocumentHistory>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &Session) -> Result<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }

    fn load_history(&self, user_id: &str) -> Result<DocumentHistory> {
        Ok(self.histories.get(user_id).cloned().unwrap_or_default())
    }

    fn save_history(&mut self, user_id: &str, history: &DocumentHistory) -> Result<()> {
        self.histories.insert(user_id.to_string(), history.clone());
        Ok(())
    }
}
