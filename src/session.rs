//! Durable session store
//!
//! Holds the authenticated identity and bearer token, persisted as a JSON
//! file in the user's data directory so the session survives process
//! restarts. Lifecycle is tied to login/logout: created on successful
//! login or signup, destroyed on logout and on forced logout.

use crate::error::{Result, SachatError};
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filename of the persisted session inside the data directory
const SESSION_FILE: &str = "session.json";

/// The current authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-side user identifier
    pub user_id: String,
    /// Display name shown in the prompt
    pub display_name: String,
    /// Bearer token attached to every gateway request
    pub token: String,
    /// When this session was stored
    pub saved_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session stamped with the current time
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}

/// File-backed store for the current session
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted in the user's data directory
    ///
    /// The path can be overridden via the `SACHAT_SESSION_FILE`
    /// environment variable, which makes it easy to point the binary at a
    /// test file without touching the user's real session.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("SACHAT_SESSION_FILE") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "sachat", "sachat")
            .ok_or_else(|| SachatError::Session("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| SachatError::Session(e.to_string()))?;

        Ok(Self {
            path: data_dir.join(SESSION_FILE),
        })
    }

    /// Creates a store that uses the specified file path
    ///
    /// Primarily useful for tests where the default application data
    /// directory is not desirable (for example, a temporary directory).
    ///
    /// # Examples
    ///
    /// ```
    /// use sachat::session::SessionStore;
    ///
    /// let store = SessionStore::new_with_path("/tmp/test_session.json").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for session file")
                .map_err(|e| SachatError::Session(e.to_string()))?;
        }
        Ok(Self { path })
    }

    /// Loads the persisted session, if any
    ///
    /// A missing file means no session. A corrupt file is treated the
    /// same way and removed, so a damaged session never wedges the client.
    pub fn load(&self) -> Result<Option<Session>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SachatError::Session(format!(
                    "Failed to read session file: {}",
                    e
                ))
                .into())
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding corrupt session file: {}", e);
                let _ = std::fs::remove_file(&self.path);
                Ok(None)
            }
        }
    }

    /// Persists a session, replacing any existing one
    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)
            .context("Failed to serialize session")
            .map_err(|e| SachatError::Session(e.to_string()))?;
        std::fs::write(&self.path, json)
            .context("Failed to write session file")
            .map_err(|e| SachatError::Session(e.to_string()))?;
        tracing::debug!("Session saved for user {}", session.user_id);
        Ok(())
    }

    /// Removes the persisted session
    ///
    /// A missing file is not an error; logout must be idempotent.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(SachatError::Session(format!("Failed to remove session file: {}", e)).into())
            }
        }
    }
}
