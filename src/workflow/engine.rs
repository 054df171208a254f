//! Progression engine.
//!
//! The engine is the only code that moves a session forward. Each
//! operation takes the session explicitly, checks the gating rules, and
//! either applies the change or returns a [`Refusal`] leaving the session
//! untouched.
//!
//! Per request: `pending` → opened (still `pending`, `last_opened_at` set)
//! → `completed` or `skipped`. Resolved requests are never revisited.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use thiserror::Error;

use super::opener::{profile_url, ProfileOpener};
use crate::core::{Clock, SystemClock};
use crate::error::SweepError;
use crate::session::{RequestState, RequestStatus, SessionState};

/// Minimum seconds between two opens of the same current request.
pub const DEFAULT_COOLDOWN_SECS: i64 = 8;

/// Why the engine declined an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    /// Every request has been resolved.
    #[error("no request left in the queue")]
    NoCurrentItem,
    /// Complete/skip was attempted before the profile was opened.
    #[error("open the profile before completing or skipping it")]
    NotOpened,
    /// The current profile was opened too recently.
    #[error("profile was just opened; wait {}s before opening it again", remaining_secs(.remaining))]
    CoolingDown {
        /// Time left until another open is accepted.
        remaining: Duration,
    },
}

fn remaining_secs(remaining: &Duration) -> i64 {
    // Round up so "wait 0s" is never shown while still refusing.
    let millis = remaining.num_milliseconds();
    (millis + 999) / 1000
}

impl From<Refusal> for SweepError {
    fn from(refusal: Refusal) -> Self {
        Self::NotAllowed(refusal.to_string())
    }
}

/// Result of a state transition.
pub type Transition = Result<(), Refusal>;

/// Applies the legal transitions to a session.
#[derive(Debug, Clone)]
pub struct Engine<C: Clock = SystemClock> {
    clock: C,
    cooldown: Duration,
}

impl Engine<SystemClock> {
    /// Create an engine on the system clock with the default cooldown.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Engine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Engine<C> {
    /// Create an engine with a specific clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            cooldown: Duration::seconds(DEFAULT_COOLDOWN_SECS),
        }
    }

    /// Replace the open cooldown window.
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// The open cooldown window.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// The request under the cursor, or `None` once the queue is exhausted.
    #[must_use]
    pub fn current<'a>(&self, session: &'a SessionState) -> Option<&'a RequestState> {
        session.current_request()
    }

    /// Whether any request is left to resolve.
    #[must_use]
    pub fn has_more(&self, session: &SessionState) -> bool {
        session.current_index() < session.len()
    }

    /// Check whether the current request may be opened right now.
    ///
    /// # Errors
    ///
    /// Returns the refusal `mark_opened` would give.
    pub fn can_open(&self, session: &SessionState) -> Transition {
        self.can_open_at(session, self.clock.now())
    }

    fn can_open_at(&self, session: &SessionState, now: DateTime<Utc>) -> Transition {
        let request = session.current_request().ok_or(Refusal::NoCurrentItem)?;
        let Some(last_opened) = request.last_opened_at else {
            return Ok(());
        };

        let elapsed = now - last_opened;
        if elapsed >= self.cooldown {
            return Ok(());
        }

        let remaining = (self.cooldown - elapsed).min(self.cooldown);
        Err(Refusal::CoolingDown { remaining })
    }

    /// Record that the current profile was opened.
    ///
    /// # Errors
    ///
    /// Refuses when the queue is exhausted or the previous open of this
    /// request is within the cooldown window.
    pub fn mark_opened(&self, session: &mut SessionState) -> Transition {
        let now = self.clock.now();
        self.can_open_at(session, now)?;

        let request = session
            .current_request_mut()
            .ok_or(Refusal::NoCurrentItem)?;
        request.last_opened_at = Some(now);
        debug!("Opened {}", request.username);

        session.last_updated_at = now;
        Ok(())
    }

    /// Record the open and show the profile through `opener`.
    ///
    /// The state change happens first and stands whether or not the opener
    /// succeeds; a failed launch is only logged. Returns the profile URL.
    ///
    /// # Errors
    ///
    /// Refuses for the same reasons as [`Self::mark_opened`].
    pub fn open_current(
        &self,
        session: &mut SessionState,
        opener: &dyn ProfileOpener,
    ) -> Result<String, Refusal> {
        self.mark_opened(session)?;

        let url = session
            .current_request()
            .map(|r| profile_url(&r.username))
            .ok_or(Refusal::NoCurrentItem)?;

        if let Err(e) = opener.open(&url) {
            log::warn!("Could not open {url}: {e}");
        }
        Ok(url)
    }

    /// Mark the current request completed and advance.
    ///
    /// # Errors
    ///
    /// Refuses when the queue is exhausted or the request was never opened.
    pub fn mark_completed(&self, session: &mut SessionState) -> Transition {
        self.resolve(session, RequestStatus::Completed)
    }

    /// Skip the current request and advance.
    ///
    /// # Errors
    ///
    /// Refuses when the queue is exhausted or the request was never opened.
    pub fn mark_skipped(&self, session: &mut SessionState) -> Transition {
        self.resolve(session, RequestStatus::Skipped)
    }

    fn resolve(&self, session: &mut SessionState, status: RequestStatus) -> Transition {
        let now = self.clock.now();
        let request = session
            .current_request_mut()
            .ok_or(Refusal::NoCurrentItem)?;

        if !request.is_opened() {
            return Err(Refusal::NotOpened);
        }

        request.status = status;
        if status == RequestStatus::Completed {
            request.completed_at = Some(now);
        }
        debug!("Marked {} {status}", request.username);

        session.current_index += 1;
        session.last_updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::MockClock;
    use crate::import::PendingRequest;
    use crate::session::initialize_session;
    use crate::workflow::opener::MockProfileOpener;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session_of(names: &[(&str, i64)]) -> SessionState {
        let pending = names
            .iter()
            .map(|(u, ts)| PendingRequest {
                username: (*u).to_string(),
                profile_url: profile_url(u),
                requested_at: at(*ts),
            })
            .collect();
        initialize_session(pending, "test", at(0))
    }

    fn bob_alice() -> SessionState {
        session_of(&[("alice", 1000), ("bob", 500)])
    }

    fn engine_at(secs: i64) -> Engine<MockClock> {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(at(secs));
        Engine::with_clock(clock)
    }

    fn engine_with_times(times: Vec<i64>) -> Engine<MockClock> {
        let mut seq = times.into_iter().map(at);
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(move || seq.next().unwrap_or_else(|| at(i64::from(u32::MAX))));
        Engine::with_clock(clock)
    }

    #[test]
    fn test_current_and_has_more() {
        let engine = engine_at(10);
        let session = bob_alice();
        assert_eq!(engine.current(&session).unwrap().username, "bob");
        assert!(engine.has_more(&session));
    }

    #[test]
    fn test_complete_before_open_is_refused() {
        let engine = engine_at(10);
        let mut session = bob_alice();
        let before = session.clone();

        assert_eq!(engine.mark_completed(&mut session), Err(Refusal::NotOpened));
        assert_eq!(engine.mark_skipped(&mut session), Err(Refusal::NotOpened));

        assert_eq!(session, before);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.request("bob").unwrap().status, RequestStatus::Pending);
    }

    #[test]
    fn test_open_then_complete() {
        let engine = engine_at(10);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        assert_eq!(session.request("bob").unwrap().last_opened_at, Some(at(10)));
        assert_eq!(session.last_updated_at, at(10));

        engine.mark_completed(&mut session).unwrap();
        let bob = session.request("bob").unwrap();
        assert_eq!(bob.status, RequestStatus::Completed);
        assert_eq!(bob.completed_at, Some(at(10)));
        assert_eq!(session.current_index(), 1);
        assert_eq!(engine.current(&session).unwrap().username, "alice");
        assert!(engine.has_more(&session));
        session.validate().unwrap();
    }

    #[test]
    fn test_open_then_skip() {
        let engine = engine_at(10);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        engine.mark_skipped(&mut session).unwrap();

        let bob = session.request("bob").unwrap();
        assert_eq!(bob.status, RequestStatus::Skipped);
        assert!(bob.completed_at.is_none());
        assert_eq!(session.current_index(), 1);
        session.validate().unwrap();
    }

    #[test]
    fn test_exhausted_queue() {
        let engine = engine_with_times(vec![0, 1, 100, 101]);
        let mut session = session_of(&[("only", 1)]);

        engine.mark_opened(&mut session).unwrap();
        engine.mark_completed(&mut session).unwrap();

        assert!(!engine.has_more(&session));
        assert!(engine.current(&session).is_none());
        let before = session.clone();
        assert_eq!(engine.mark_opened(&mut session), Err(Refusal::NoCurrentItem));
        assert_eq!(engine.mark_completed(&mut session), Err(Refusal::NoCurrentItem));
        assert_eq!(engine.mark_skipped(&mut session), Err(Refusal::NoCurrentItem));
        assert_eq!(session, before);
    }

    #[test]
    fn test_empty_session() {
        let engine = engine_at(0);
        let mut session = session_of(&[]);
        assert!(!engine.has_more(&session));
        assert_eq!(engine.mark_opened(&mut session), Err(Refusal::NoCurrentItem));
    }

    #[test]
    fn test_reopen_within_cooldown_is_refused() {
        // first open at t=100, retry at t=105
        let engine = engine_with_times(vec![100, 105]);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        let before = session.clone();

        match engine.mark_opened(&mut session) {
            Err(Refusal::CoolingDown { remaining }) => {
                assert_eq!(remaining, Duration::seconds(3));
            },
            other => panic!("expected cooldown refusal, got {other:?}"),
        }
        assert_eq!(session, before);
    }

    #[test]
    fn test_reopen_after_cooldown_succeeds() {
        let engine = engine_with_times(vec![100, 108]);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        engine.mark_opened(&mut session).unwrap();
        assert_eq!(session.request("bob").unwrap().last_opened_at, Some(at(108)));
    }

    #[test]
    fn test_open_records_the_instant_it_checked() {
        let mut clock = MockClock::new();
        let mut times = vec![at(100), at(108)].into_iter();
        clock
            .expect_now()
            .times(2)
            .returning(move || times.next().unwrap_or_else(|| at(0)));
        let engine = Engine::with_clock(clock);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        engine.mark_opened(&mut session).unwrap();
        assert_eq!(session.request("bob").unwrap().last_opened_at, Some(at(108)));
        assert_eq!(session.last_updated_at, at(108));
    }

    #[test]
    fn test_cooldown_does_not_carry_to_next_item() {
        let engine = engine_at(50);
        let mut session = bob_alice();

        engine.mark_opened(&mut session).unwrap();
        engine.mark_completed(&mut session).unwrap();
        engine.mark_opened(&mut session).unwrap();
        assert_eq!(session.request("alice").unwrap().last_opened_at, Some(at(50)));
    }

    #[test]
    fn test_custom_cooldown() {
        let engine = engine_with_times(vec![0, 2]).with_cooldown(Duration::seconds(2));
        assert_eq!(engine.cooldown(), Duration::seconds(2));
        let mut session = bob_alice();
        engine.mark_opened(&mut session).unwrap();
        engine.mark_opened(&mut session).unwrap();
    }

    #[test]
    fn test_open_current_calls_opener() {
        let engine = engine_at(10);
        let mut session = bob_alice();
        let mut opener = MockProfileOpener::new();
        opener.expect_open().times(1).returning(|_| Ok(()));

        let url = engine.open_current(&mut session, &opener).unwrap();
        assert_eq!(url, "https://www.instagram.com/bob");
        assert!(session.request("bob").unwrap().is_opened());
    }

    #[test]
    fn test_open_current_records_even_if_opener_fails() {
        let engine = engine_at(10);
        let mut session = bob_alice();
        let mut opener = MockProfileOpener::new();
        opener
            .expect_open()
            .times(1)
            .returning(|_| Err(SweepError::NotFound("no browser".to_string())));

        engine.open_current(&mut session, &opener).unwrap();
        assert_eq!(session.request("bob").unwrap().last_opened_at, Some(at(10)));
        engine.mark_completed(&mut session).unwrap();
    }

    #[test]
    fn test_open_current_refused_does_not_call_opener() {
        let engine = engine_at(10);
        let mut session = session_of(&[]);
        let mut opener = MockProfileOpener::new();
        opener.expect_open().times(0);

        assert_eq!(
            engine.open_current(&mut session, &opener),
            Err(Refusal::NoCurrentItem)
        );
    }

    #[test]
    fn test_resolved_prefix_invariant_over_walk() {
        let engine = engine_at(1_000);
        let mut session = session_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

        for (i, complete) in [true, false, true, false].into_iter().enumerate() {
            assert_eq!(session.current_index(), i);
            engine.mark_opened(&mut session).unwrap();
            if complete {
                engine.mark_completed(&mut session).unwrap();
            } else {
                engine.mark_skipped(&mut session).unwrap();
            }
            let resolved = session
                .iter()
                .take(session.current_index())
                .filter(|r| r.status.is_resolved())
                .count();
            assert_eq!(resolved, session.current_index());
            session.validate().unwrap();
        }

        assert!(!engine.has_more(&session));
        let progress = session.progress();
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.skipped, 2);
        assert_eq!(progress.pending, 0);
    }

    #[test]
    fn test_refusal_messages() {
        assert_eq!(
            Refusal::CoolingDown { remaining: Duration::milliseconds(2_500) }.to_string(),
            "profile was just opened; wait 3s before opening it again"
        );
        let err: SweepError = Refusal::NotOpened.into();
        assert!(matches!(err, SweepError::NotAllowed(_)));
    }
}
