//! In-memory session store. Nothing here outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::session::models::Session;

/// Cloneable handle over all live sessions.
///
/// `update` closures are synchronous, so the lock is never held across an
/// LLM call; handlers read a snapshot, do the slow work, then write back.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::minutes(ttl_minutes.max(1)),
        }
    }

    pub async fn create(&self) -> Session {
        let now = Utc::now();
        self.prune_expired(now).await;

        let session = Session::new(now);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        debug!(session_id = %session.id, "Session created");
        session
    }

    /// Returns a snapshot of the session and marks it active.
    /// Expired sessions are evicted and reported as missing.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.update(id, |session| session.clone()).await
    }

    /// Runs `f` against the session under the write lock.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if sessions
            .get(&id)
            .is_some_and(|s| self.is_expired(s, now))
        {
            sessions.remove(&id);
            debug!(session_id = %id, "Session expired");
            return None;
        }

        let session = sessions.get_mut(&id)?;
        session.last_active = now;
        Some(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.last_active > self.ttl
    }
}
