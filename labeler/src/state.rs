//! Shared application state
//!
//! Live sessions are kept in memory. Each session sits behind its own mutex
//! so actions on one session run one at a time while different sessions
//! proceed independently. Sessions untouched for longer than the idle
//! timeout are dropped when a new session is registered.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::core::{ReviewService, ReviewSession};
use crate::error::{LabelerError, LabelerResult};
use crate::types::SessionId;

pub type SessionHandle = Arc<Mutex<ReviewSession>>;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory registry of open sessions
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Register a session and return its handle
    pub async fn insert(&self, session: ReviewSession) -> SessionHandle {
        self.evict_idle().await;

        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        let entry = SessionEntry {
            handle: handle.clone(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        handle
    }

    /// Look up a session and mark it as active
    pub async fn get(&self, id: &SessionId) -> LabelerResult<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id).ok_or_else(|| LabelerError::SessionNotFound {
            session_id: id.to_string(),
        })?;
        entry.last_seen = Instant::now();
        Ok(entry.handle.clone())
    }

    /// Drop sessions idle for longer than the timeout, returning how many went
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now.duration_since(entry.last_seen) <= self.idle_timeout;
            if !keep {
                tracing::debug!("🗑️ Evicted idle session {}", id);
            }
            keep
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("🧹 Evicted {} idle sessions", evicted);
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// State handed to every HTTP handler
#[derive(Clone)]
pub struct AppState {
    pub service: ReviewService,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(service: ReviewService, idle_timeout: Duration) -> Self {
        Self {
            service,
            sessions: SessionRegistry::with_idle_timeout(idle_timeout),
        }
    }
}
