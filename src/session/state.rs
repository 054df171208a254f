//! Session state types and initialization.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::import::PendingRequest;

/// Where a request stands in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Not yet resolved.
    #[default]
    Pending,
    /// The user handled the request.
    Completed,
    /// The user passed on the request.
    Skipped,
}

impl RequestStatus {
    /// Get the lowercase name used in session files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// Whether the request has left `pending`.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Progress of a single follow request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestState {
    /// Account the request was sent to.
    pub username: String,
    /// Current status.
    pub status: RequestStatus,
    /// Last time the profile was opened, if ever.
    #[serde(serialize_with = "crate::core::datetime::rfc3339_option::serialize")]
    pub last_opened_at: Option<DateTime<Utc>>,
    /// When the request was completed. Set only for `Completed`.
    #[serde(serialize_with = "crate::core::datetime::rfc3339_option::serialize")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl RequestState {
    /// Create a fresh pending request.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            status: RequestStatus::Pending,
            last_opened_at: None,
            completed_at: None,
        }
    }

    /// Whether the profile has been opened at least once.
    #[must_use]
    pub const fn is_opened(&self) -> bool {
        self.last_opened_at.is_some()
    }
}

/// Counts for a session, useful for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    /// Number of requests in the queue.
    pub total: usize,
    /// Requests marked completed.
    pub completed: usize,
    /// Requests skipped.
    pub skipped: usize,
    /// Requests still pending, including the current one.
    pub pending: usize,
    /// Zero-based position of the cursor.
    pub position: usize,
}

impl SessionProgress {
    /// Whether every request has been resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.position >= self.total
    }

    /// Get progress as a percentage (0-100).
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        #[allow(clippy::cast_possible_truncation)]
        let percent = (self.position.min(self.total) * 100 / self.total) as u8;
        percent
    }
}

/// The whole session: queue order, cursor and per-request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Identifier assigned at import time.
    pub session_id: String,
    /// When the session was initialized.
    pub created_at: DateTime<Utc>,
    /// When the session last changed.
    pub last_updated_at: DateTime<Utc>,
    pub(crate) order: Vec<String>,
    pub(crate) current_index: usize,
    pub(crate) requests: HashMap<String, RequestState>,
}

impl SessionState {
    /// Usernames in processing order.
    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Zero-based cursor into [`Self::order`].
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of requests in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a request by username.
    #[must_use]
    pub fn request(&self, username: &str) -> Option<&RequestState> {
        self.requests.get(username)
    }

    /// Iterate over requests in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &RequestState> {
        self.order.iter().filter_map(|u| self.requests.get(u))
    }

    /// The request under the cursor, or `None` once the queue is exhausted.
    #[must_use]
    pub fn current_request(&self) -> Option<&RequestState> {
        self.order
            .get(self.current_index)
            .and_then(|u| self.requests.get(u))
    }

    pub(crate) fn current_request_mut(&mut self) -> Option<&mut RequestState> {
        let username = self.order.get(self.current_index)?;
        self.requests.get_mut(username)
    }

    /// Summarize the session.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let mut progress = SessionProgress {
            total: self.order.len(),
            completed: 0,
            skipped: 0,
            pending: 0,
            position: self.current_index,
        };
        for request in self.requests.values() {
            match request.status {
                RequestStatus::Pending => progress.pending += 1,
                RequestStatus::Completed => progress.completed += 1,
                RequestStatus::Skipped => progress.skipped += 1,
            }
        }
        progress
    }

    /// Check every structural invariant of the session.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::InvalidSession` describing the first violation.
    pub fn validate(&self) -> Result<(), SweepError> {
        let invalid = |msg: String| Err(SweepError::InvalidSession(msg));

        let mut seen = HashSet::with_capacity(self.order.len());
        for username in &self.order {
            if !seen.insert(username.as_str()) {
                return invalid(format!("duplicate username in order: {username}"));
            }
        }

        if self.requests.len() != self.order.len() {
            return invalid(format!(
                "order has {} entries but requests has {}",
                self.order.len(),
                self.requests.len()
            ));
        }

        if self.current_index > self.order.len() {
            return invalid(format!(
                "current_index {} is past the end of a queue of {}",
                self.current_index,
                self.order.len()
            ));
        }

        for (index, username) in self.order.iter().enumerate() {
            let Some(request) = self.requests.get(username) else {
                return invalid(format!("no request state for {username}"));
            };
            if request.username != *username {
                return invalid(format!(
                    "request keyed {username} names {}",
                    request.username
                ));
            }

            let resolved = request.status.is_resolved();
            if index < self.current_index && !resolved {
                return invalid(format!("{username} is behind the cursor but still pending"));
            }
            if index >= self.current_index && resolved {
                return invalid(format!("{username} is at or ahead of the cursor but {}", request.status));
            }
            if resolved && !request.is_opened() {
                return invalid(format!("{username} was resolved without being opened"));
            }
            if (request.status == RequestStatus::Completed) != request.completed_at.is_some() {
                return invalid(format!("{username} has completed_at inconsistent with status"));
            }
        }

        Ok(())
    }
}

/// Build a new session from imported requests.
///
/// Requests are ordered oldest first; equal timestamps keep their input
/// order. A username that appears more than once keeps only its most
/// recent request (ties go to the later record).
#[must_use]
pub fn initialize_session(
    pending: Vec<PendingRequest>,
    session_id: impl Into<String>,
    now: DateTime<Utc>,
) -> SessionState {
    let mut sorted = pending;
    sorted.sort_by_key(|r| r.requested_at);

    let mut seen = HashSet::with_capacity(sorted.len());
    let mut order: Vec<String> = Vec::with_capacity(sorted.len());
    for request in sorted.into_iter().rev() {
        if seen.insert(request.username.clone()) {
            order.push(request.username);
        } else {
            warn!(
                "Duplicate request for {}; keeping the most recent one",
                request.username
            );
        }
    }
    order.reverse();

    let requests = order
        .iter()
        .map(|u| (u.clone(), RequestState::new(u.clone())))
        .collect();

    let session_id = session_id.into();
    debug!("Initialized session {session_id} with {} request(s)", order.len());

    SessionState {
        session_id,
        created_at: now,
        last_updated_at: now,
        order,
        current_index: 0,
        requests,
    }
}
