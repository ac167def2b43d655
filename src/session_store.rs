// ABOUTME: Server-side session store mapping gateway cookies to controller sessions
// ABOUTME: Per-session mutex serializes refresh attempts; expired entries are swept on insert
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One [`ControllerSession`] per browser session, keyed by an unguessable
//! random id carried in the gateway cookie. Lookups are by exact cookie value
//! only, so a token pair can never be observed from another session.
//!
//! The per-session [`tokio::sync::Mutex`] makes concurrent requests for the
//! same session take turns: two in-flight calls that both observe an expired
//! access token cannot race the refresh grant with an already-superseded
//! refresh token.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::ControllerSession;

/// Shared handle to one caller's session.
pub type SharedSession = Arc<Mutex<ControllerSession>>;

struct SessionEntry {
    session: SharedSession,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with a fixed TTL.
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Store a session and return its fresh cookie value.
    pub fn insert(&self, session: ControllerSession) -> String {
        let now = Utc::now();
        // Opportunistic sweep keeps the map bounded without a background task.
        self.entries.retain(|_, entry| entry.expires_at > now);

        let id = Uuid::new_v4().to_string();
        self.entries.insert(
            id.clone(),
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                expires_at: now + self.ttl,
            },
        );
        id
    }

    /// Look up a live session by cookie value.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SharedSession> {
        let expired = {
            let entry = self.entries.get(id)?;
            if entry.expires_at <= Utc::now() {
                true
            } else {
                return Some(Arc::clone(&entry.session));
            }
        };
        if expired {
            self.entries.remove(id);
        }
        None
    }

    /// Drop a session, returning the handle so the caller can invalidate the
    /// held token pair.
    pub fn remove(&self, id: &str) -> Option<SharedSession> {
        self.entries.remove(id).map(|(_, entry)| entry.session)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
