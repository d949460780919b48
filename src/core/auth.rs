//! Authentication abstractions and the locally persisted session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("User")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self, session: &Session) -> Result<()>;
}

/// Reads and writes the signed-in session as JSON under the data directory.
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, if any and not yet expired.
    pub fn current(&self) -> Option<Session> {
        if !self.path.exists() {
            debug!("No session file at {}", self.path.display());
            return None;
        }

        let session: Session = match fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|s| serde_json::from_str(&s).map_err(anyhow::Error::from))
        {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                return None;
            }
        };

        if session.is_expired(Utc::now()) {
            warn!("Session expired, sign in again");
            return None;
        }
        Some(session)
    }

    pub fn current_user(&self) -> Option<User> {
        self.current().map(|session| session.user)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        write_private(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Writes `contents` readable by the owner only, since the session holds
/// bearer tokens.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // An existing file keeps its old mode on open.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn session(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at,
            user: User {
                id: "user-1".to_string(),
                email: Some("ana@example.com".to_string()),
                full_name: Some("Ana".to_string()),
            },
        }
    }

    #[test]
    fn test_display_name_falls_back() {
        let mut user = session(None).user;
        assert_eq!(user.display_name(), "Ana");
        user.full_name = None;
        assert_eq!(user.display_name(), "User");
    }

    #[test]
    fn test_session_round_trip_through_disk() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = SessionManager::new(dir.path());
        assert!(manager.current_user().is_none());

        manager.save(&session(Some(Utc::now() + Duration::hours(1))))?;
        let user = manager.current_user().expect("session should be present");
        assert_eq!(user.id, "user-1");

        manager.clear()?;
        assert!(manager.current_user().is_none());
        assert!(!manager.path().exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let manager = SessionManager::new(dir.path());
        fs::write(manager.path(), "stale")?;
        fs::set_permissions(manager.path(), fs::Permissions::from_mode(0o644))?;

        manager.save(&session(None))?;

        let mode = fs::metadata(manager.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(manager.current_user().unwrap().id, "user-1");
        Ok(())
    }

    #[test]
    fn test_expired_session_means_no_user() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = SessionManager::new(dir.path());
        manager.save(&session(Some(Utc::now() - Duration::minutes(1))))?;
        assert!(manager.current_user().is_none());
        Ok(())
    }

    #[test]
    fn test_corrupt_session_file_is_ignored() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = SessionManager::new(dir.path());
        fs::write(manager.path(), "not json")?;
        assert!(manager.current().is_none());
        Ok(())
    }
}
