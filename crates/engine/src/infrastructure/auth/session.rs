//! In-memory bearer session store.
//!
//! Tokens are opaque random strings; the store keeps the owning user and
//! the expiry. Sessions do not survive a restart.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;

use jojo_domain::UserId;

use crate::infrastructure::ports::{ClockPort, SessionError, SessionPort, SessionToken};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
    clock: Arc<dyn ClockPort>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionPort for InMemorySessionStore {
    fn issue(&self, user_id: UserId) -> SessionToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let expires_at = self.clock.now() + self.ttl;

        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at,
            },
        );
        tracing::debug!(user_id = %user_id, expires_at = %expires_at, "Session issued");

        SessionToken { token, expires_at }
    }

    fn verify(&self, token: &str) -> Result<UserId, SessionError> {
        // Copy out before removing; holding a DashMap ref across remove deadlocks.
        let session = self
            .sessions
            .get(token)
            .map(|entry| *entry.value())
            .ok_or(SessionError::Invalid)?;

        if session.expires_at <= self.clock.now() {
            self.sessions.remove(token);
            return Err(SessionError::Expired);
        }
        Ok(session.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    /// Clock that returns `start()` for the first `calls` reads, then jumps by `later`.
    fn clock(calls: usize, later: Duration) -> Arc<dyn ClockPort> {
        let mut clock = MockClockPort::new();
        let mut seen = 0usize;
        clock.expect_now().returning(move || {
            seen += 1;
            if seen <= calls {
                start()
            } else {
                start() + later
            }
        });
        Arc::new(clock)
    }

    #[test]
    fn issued_token_verifies_to_its_user() {
        let store = InMemorySessionStore::new(Duration::hours(24), clock(1, Duration::hours(1)));
        let user_id = UserId::new();

        let session = store.issue(user_id);
        assert_eq!(session.token.len(), TOKEN_BYTES * 2);
        assert_eq!(session.expires_at, start() + Duration::hours(24));
        assert_eq!(store.verify(&session.token), Ok(user_id));
    }

    #[test]
    fn unknown_token_is_invalid() {
        let store = InMemorySessionStore::new(Duration::hours(24), clock(1, Duration::zero()));
        assert_eq!(store.verify("deadbeef"), Err(SessionError::Invalid));
    }

    #[test]
    fn expired_token_is_rejected_and_evicted() {
        let store = InMemorySessionStore::new(Duration::hours(24), clock(1, Duration::hours(25)));
        let session = store.issue(UserId::new());

        assert_eq!(store.verify(&session.token), Err(SessionError::Expired));
        assert!(store.is_empty());
        assert_eq!(store.verify(&session.token), Err(SessionError::Invalid));
    }

    #[test]
    fn purge_removes_only_expired_sessions() {
        // The first session is issued 23h early and has lapsed by the purge.
        let mut clock = MockClockPort::new();
        let mut seen = 0usize;
        clock.expect_now().returning(move || {
            seen += 1;
            match seen {
                1 => start() - Duration::hours(23),
                2 => start(),
                _ => start() + Duration::hours(2),
            }
        });
        let store = InMemorySessionStore::new(Duration::hours(24), Arc::new(clock));
        store.issue(UserId::new());
        let fresh = store.issue(UserId::new());

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.verify(&fresh.token).is_ok());
    }
}
