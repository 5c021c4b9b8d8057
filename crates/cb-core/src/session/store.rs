use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::interval;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::types::{ChatSession, ChatTurn, TurnRole};

/// Thread-safe in-memory session store
pub struct SessionStore {
    sessions: DashMap<String, ChatSession>,
    clock: Arc<dyn Clock>,
    timeout: chrono::Duration,
}

impl SessionStore {
    /// Create a store on the system clock
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_clock(timeout_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(timeout_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
            timeout: chrono::Duration::seconds(timeout_secs as i64),
        }
    }

    /// Resolve a session id, creating the session when it does not exist.
    ///
    /// Blank or missing ids get a fresh UUID. Touching an
    /// existing session refreshes its last-activity time.
    pub fn open(&self, session_id: Option<&str>, user_id: Option<&str>) -> String {
        let now = self.clock.now();
        let id = match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        self.sessions
            .entry(id.clone())
            .and_modify(|s| s.last_activity = now)
            .or_insert_with(|| {
                debug!("Created chat session: {}", id);
                ChatSession::new(id.clone(), user_id.map(str::to_string), now)
            });

        id
    }

    /// Append a turn. Returns false when the session no longer exists.
    pub fn append(&self, session_id: &str, role: TurnRole, content: &str) -> bool {
        let now = self.clock.now();
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.push(role, content, now);
                true
            }
            None => false,
        }
    }

    /// The last `n` turns of a session, oldest first
    pub fn recent_turns(&self, session_id: &str, n: usize) -> Vec<ChatTurn> {
        self.sessions
            .get(session_id)
            .map(|s| s.recent(n).to_vec())
            .unwrap_or_default()
    }

    /// Snapshot of a session
    pub fn get(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    pub fn remove(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Evict every session idle for at least the timeout. Returns the count.
    pub fn tick(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now - session.last_activity < self.timeout);
        let evicted = before.saturating_sub(self.sessions.len());

        if evicted > 0 {
            info!("Cleaned up {} expired chat sessions", evicted);
        }
        evicted
    }

    /// Start a background task that sweeps expired sessions
    pub fn start_sweep_task(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                let now = self.clock.now();
                self.tick(now);
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(30 * 60)
    }
}
