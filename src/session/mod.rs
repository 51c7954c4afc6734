//! Session Store
//!
//! Each visitor gets a session holding their own vote tally. Sessions are
//! independent; the store's lock only guards the map itself. Idle sessions
//! are swept periodically and the least recently seen session is evicted
//! when the store is full.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::interval;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::tally::VoteTally;

/// Unique identifier for a visitor session
pub type SessionId = String;

/// State owned by one visitor
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub tally: VoteTally,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            tally: VoteTally::new(),
            last_seen: Utc::now(),
        }
    }
}

/// Value produced inside a session, plus how the session was resolved
#[derive(Debug)]
pub struct Entered<R> {
    pub session_id: SessionId,
    /// True when a fresh session was started for this request
    pub created: bool,
    pub value: R,
}

/// In-memory map of visitor sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run `f` against the caller's session.
    ///
    /// An unknown or absent id starts a new session with a fresh id; ids
    /// supplied by the client are never adopted.
    pub async fn enter<R>(
        &self,
        id: Option<&str>,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Entered<R> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        if let Some(session) = id.and_then(|id| sessions.get_mut(id)) {
            session.last_seen = now;
            return Entered {
                session_id: session.id.clone(),
                created: false,
                value: f(session),
            };
        }

        if sessions.len() >= self.config.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let session_id = Uuid::new_v4().to_string();
        let session = sessions
            .entry(session_id.clone())
            .or_insert_with(|| Session::new(session_id.clone()));

        tracing::info!(session_id = %session_id, "Session started");

        Entered {
            session_id,
            created: true,
            value: f(session),
        }
    }

    /// Drop sessions idle longer than the configured timeout
    pub async fn sweep_idle(&self) -> usize {
        let cutoff = Utc::now() - Duration::seconds(self.config.idle_timeout_secs as i64);
        self.sweep_before(cutoff).await
    }

    async fn sweep_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen >= cutoff);
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::debug!(removed, remaining = sessions.len(), "Swept idle sessions");
        }
        removed
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start background idle-session sweeping
    pub fn start_background_sweep(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let period = std::time::Duration::from_secs(store.config.sweep_interval_secs.max(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                store.sweep_idle().await;
            }
        })
    }
}

fn evict_least_recent(sessions: &mut HashMap<SessionId, Session>) {
    let oldest = sessions
        .values()
        .min_by_key(|s| s.last_seen)
        .map(|s| s.id.clone());

    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::warn!(session_id = %id, "Session store full, evicted least recently seen session");
    }
}
