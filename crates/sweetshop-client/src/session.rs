//! # Session
//!
//! The signed-in user and their bearer token, with an explicit lifecycle.
//!
//! ```text
//! SessionStore::load()  ──► Some(Session) | None (missing, unreadable or expired)
//! SessionStore::store() ──► session.json written (0600 on unix)
//! SessionStore::clear() ──► session.json removed
//! ```
//!
//! Default location is the platform data directory, e.g.
//! `~/.local/share/sweetshop/session.json` on Linux.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use sweetshop_core::{AuthResponse, PublicUser, Role};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Session for a fresh login/registration response.
    pub fn from_auth(auth: AuthResponse, now: DateTime<Utc>) -> Self {
        Session {
            token: auth.token,
            user: auth.user,
            expires_at: now + Duration::seconds(auth.expires_in),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

/// Where the session is persisted.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> ClientResult<Self> {
        directories::ProjectDirs::from("com", "sweetshop", "sweetshop")
            .map(|dirs| Self::new(dirs.data_dir().join("session.json")))
            .ok_or_else(|| ClientError::Session("No home directory available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved session.
    ///
    /// An expired or corrupt file is removed and reported as no session.
    pub fn load(&self) -> ClientResult<Option<Session>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No saved session");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let session: Session = match serde_json::from_str(&contents) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Discarding unreadable session file");
                self.clear()?;
                return Ok(None);
            }
        };

        if session.is_expired(Utc::now()) {
            info!(email = %session.user.email, "Saved session expired");
            self.clear()?;
            return Ok(None);
        }

        debug!(email = %session.user.email, "Session restored");
        Ok(Some(session))
    }

    pub fn store(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)?;

        debug!(path = ?self.path, "Session saved");
        Ok(())
    }

    /// Removes the saved session. Missing file is fine.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ClientResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> ClientResult<()> {
    Ok(())
}
