//! Wall-clock collaborator.
//!
//! The workflow never calls `Utc::now()` directly; it asks a [`Clock`], so
//! tests can pin time and walk it forward across the open cooldown.

use chrono::{DateTime, Utc};

/// Source of the current UTC instant.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
