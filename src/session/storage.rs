//! Session file persistence.
//!
//! Sessions are stored as pretty-printed JSON:
//!
//! ```json
//! {
//!   "session_id": "…",
//!   "created_at": "2024-01-01T00:00:00+00:00",
//!   "last_updated_at": "2024-01-01T00:05:00+00:00",
//!   "order": ["bob", "alice"],
//!   "current_index": 1,
//!   "requests": {
//!     "bob": { "status": "completed", "last_opened_at": "…", "completed_at": "…" },
//!     "alice": { "status": "pending", "last_opened_at": null, "completed_at": null }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::state::{RequestState, RequestStatus, SessionState};
use crate::core::datetime::{rfc3339, rfc3339_option};
use crate::error::SweepError;

/// On-disk shape of a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    session_id: String,
    #[serde(with = "rfc3339")]
    created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    last_updated_at: DateTime<Utc>,
    order: Vec<String>,
    current_index: usize,
    requests: BTreeMap<String, StoredRequest>,
}

/// On-disk shape of a single request. Both timestamps are required keys;
/// absence is written as `null`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredRequest {
    status: RequestStatus,
    #[serde(with = "rfc3339_option")]
    last_opened_at: Option<DateTime<Utc>>,
    #[serde(with = "rfc3339_option")]
    completed_at: Option<DateTime<Utc>>,
}

impl From<&SessionState> for SessionFile {
    fn from(session: &SessionState) -> Self {
        Self {
            session_id: session.session_id.clone(),
            created_at: session.created_at,
            last_updated_at: session.last_updated_at,
            order: session.order.clone(),
            current_index: session.current_index,
            requests: session
                .requests
                .iter()
                .map(|(username, state)| {
                    (
                        username.clone(),
                        StoredRequest {
                            status: state.status,
                            last_opened_at: state.last_opened_at,
                            completed_at: state.completed_at,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl From<SessionFile> for SessionState {
    fn from(file: SessionFile) -> Self {
        Self {
            session_id: file.session_id,
            created_at: file.created_at,
            last_updated_at: file.last_updated_at,
            order: file.order,
            current_index: file.current_index,
            requests: file
                .requests
                .into_iter()
                .map(|(username, stored)| {
                    let state = RequestState {
                        username: username.clone(),
                        status: stored.status,
                        last_opened_at: stored.last_opened_at,
                        completed_at: stored.completed_at,
                    };
                    (username, state)
                })
                .collect(),
        }
    }
}

/// Reads and writes a session at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store for the given session file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a session file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the session, replacing any previous file.
    ///
    /// The file is written next to its final location and renamed into
    /// place, so an interrupted save leaves the old session intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, session: &SessionState) -> Result<(), SweepError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(&SessionFile::from(session))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved session {} to {} (index {}/{})",
            session.session_id,
            self.path.display(),
            session.current_index,
            session.order.len()
        );
        Ok(())
    }

    /// Load the session.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::NotFound` if there is no session file, and
    /// `SweepError::InvalidSession` if the file is missing required keys,
    /// has malformed values, or breaks a session invariant.
    pub fn load(&self) -> Result<SessionState, SweepError> {
        if !self.exists() {
            return Err(SweepError::NotFound(format!(
                "No session at {}",
                self.path.display()
            )));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_json::from_str(&contents)
            .map_err(|e| SweepError::InvalidSession(format!("{}: {e}", self.path.display())))?;

        let session = SessionState::from(file);
        session.validate()?;

        debug!(
            "Loaded session {} from {}",
            session.session_id,
            self.path.display()
        );
        Ok(session)
    }

    /// Load the session if one exists.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::load`] other than `NotFound`.
    pub fn load_if_exists(&self) -> Result<Option<SessionState>, SweepError> {
        if self.exists() {
            self.load().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Delete the session file.
    ///
    /// Returns `true` if a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be deleted.
    pub fn delete(&self) -> Result<bool, SweepError> {
        if !self.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        debug!("Deleted session file {}", self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::PendingRequest;
    use crate::session::initialize_session;
    use tempfile::TempDir;

    fn at(secs: i64, nanos: u32) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, nanos).unwrap()
    }

    fn sample_session() -> SessionState {
        let pending = ["carol", "bob", "alice"]
            .iter()
            .zip([300, 200, 100])
            .map(|(u, ts)| PendingRequest {
                username: (*u).to_string(),
                profile_url: format!("https://www.instagram.com/{u}"),
                requested_at: at(ts, 0),
            })
            .collect();
        let mut session = initialize_session(pending, "abc-123", at(1_000, 0));

        let alice = session.requests.get_mut("alice").unwrap();
        alice.status = RequestStatus::Completed;
        alice.last_opened_at = Some(at(1_100, 123_456_789));
        alice.completed_at = Some(at(1_105, 5));

        let bob = session.requests.get_mut("bob").unwrap();
        bob.status = RequestStatus::Skipped;
        bob.last_opened_at = Some(at(1_200, 0));

        session.requests.get_mut("carol").unwrap().last_opened_at = Some(at(1_300, 0));
        session.current_index = 2;
        session.last_updated_at = at(1_300, 0);
        session
    }

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let session = sample_session();

        store.save(&session).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_saved_format() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save(&sample_session()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(raw["session_id"], "abc-123");
        assert_eq!(raw["created_at"], "1970-01-01T00:16:40+00:00");
        assert_eq!(raw["current_index"], 2);
        assert_eq!(raw["order"], serde_json::json!(["alice", "bob", "carol"]));
        assert_eq!(raw["requests"]["bob"]["status"], "skipped");
        assert!(raw["requests"]["bob"]["completed_at"].is_null());
        assert_eq!(raw["requests"]["alice"]["status"], "completed");
        assert!(raw["requests"]["alice"]["completed_at"].is_string());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = store_in(&temp_dir).load().unwrap_err();
        assert!(matches!(err, SweepError::NotFound(_)));
        assert!(store_in(&temp_dir).load_if_exists().unwrap().is_none());
    }

    #[test]
    fn test_load_missing_key_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"session_id": "x", "created_at": "2024-01-01T00:00:00+00:00",
                "order": [], "current_index": 0, "requests": {}}"#,
        )
        .unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, SweepError::InvalidSession(_)));
        assert!(err.to_string().contains("last_updated_at"));
    }

    #[test]
    fn test_load_missing_request_timestamp_key_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"session_id": "x",
                "created_at": "2024-01-01T00:00:00+00:00",
                "last_updated_at": "2024-01-01T00:00:00+00:00",
                "order": ["a"], "current_index": 0,
                "requests": {"a": {"status": "pending", "last_opened_at": null}}}"#,
        )
        .unwrap();

        assert!(matches!(store.load(), Err(SweepError::InvalidSession(_))));
    }

    #[test]
    fn test_load_accepts_zulu_and_fractional_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"session_id": "x",
                "created_at": "2024-01-01T00:00:00.123456+00:00",
                "last_updated_at": "2024-01-01T00:00:00Z",
                "order": ["a"], "current_index": 0,
                "requests": {"a": {"status": "pending", "last_opened_at": null, "completed_at": null}}}"#,
        )
        .unwrap();

        let session = store.load().unwrap();
        assert_eq!(session.created_at.timestamp_subsec_micros(), 123_456);
        assert_eq!(session.current_request().unwrap().username, "a");
    }

    #[test]
    fn test_load_rejects_inconsistent_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"session_id": "x",
                "created_at": "2024-01-01T00:00:00+00:00",
                "last_updated_at": "2024-01-01T00:00:00+00:00",
                "order": ["a", "b"], "current_index": 0,
                "requests": {"a": {"status": "pending", "last_opened_at": null, "completed_at": null}}}"#,
        )
        .unwrap();

        assert!(matches!(store.load(), Err(SweepError::InvalidSession(_))));
    }

    #[test]
    fn test_load_rejects_empty_string_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(
            store.path(),
            r#"{"session_id": "x",
                "created_at": "2024-01-01T00:00:00+00:00",
                "last_updated_at": "2024-01-01T00:00:00+00:00",
                "order": ["a"], "current_index": 0,
                "requests": {"a": {"status": "pending", "last_opened_at": "", "completed_at": null}}}"#,
        )
        .unwrap();

        assert!(store.load().is_err());
    }

    #[test]
    fn test_load_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), "definitely not json").unwrap();
        assert!(matches!(store.load(), Err(SweepError::InvalidSession(_))));
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("nested").join("session.json"));
        store.save(&sample_session()).unwrap();
        assert!(store.exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        assert!(!store.delete().unwrap());

        store.save(&sample_session()).unwrap();
        assert!(store.delete().unwrap());
        assert!(!store.exists());
    }
}
