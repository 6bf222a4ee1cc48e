//! Scheduling sessions shared between threads.
//!
//! A [`SharedSession`] guards one orchestrator with a single mutex so that a
//! whole push (resolution across all queues plus commit) is one critical
//! section. Locking queues individually would let two concurrent pushes each
//! resolve against the other's uncommitted candidate.
//!
//! [`SessionStore`] keeps independent sessions in memory, keyed by a generated
//! id. Its own lock only guards the map and is never held during a push.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::models::{Message, PlanEntry};
use crate::scheduler::ScheduleOrchestrator;

crate::define_key_type!(
    /// Identifier of a scheduling session.
    SessionId
);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Thread-safe handle to one scheduling session.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<ScheduleOrchestrator>>,
}

impl SharedSession {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::from_orchestrator(ScheduleOrchestrator::new(config))
    }

    pub fn from_orchestrator(orchestrator: ScheduleOrchestrator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(orchestrator)),
        }
    }

    pub fn push(&self, message: Message) -> Result<()> {
        self.inner.lock().push(message)
    }

    /// Push a batch under one lock, so no other caller interleaves with it.
    ///
    /// Returns how many messages were scheduled before the first failure
    /// alongside that failure, if any.
    pub fn push_batch(&self, messages: Vec<Message>) -> (usize, Result<()>) {
        let mut orchestrator = self.inner.lock();
        let mut accepted = 0;
        for message in messages {
            if let Err(e) = orchestrator.push(message) {
                return (accepted, Err(e));
            }
            accepted += 1;
        }
        (accepted, Ok(()))
    }

    pub fn get_plan(&self) -> Vec<PlanEntry> {
        self.inner.lock().get_plan()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn config(&self) -> SchedulerConfig {
        *self.inner.lock().config()
    }

    /// Run `f` with exclusive access to the orchestrator.
    pub fn with<R>(&self, f: impl FnOnce(&mut ScheduleOrchestrator) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Summary of a stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub scheduled_count: usize,
}

struct SessionEntry {
    session: SharedSession,
    created_at: DateTime<Utc>,
}

/// In-memory registry of scheduling sessions.
#[derive(Clone)]
pub struct SessionStore {
    default_config: SchedulerConfig,
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
}

impl SessionStore {
    /// Create an empty store whose sessions default to `default_config`.
    pub fn new(default_config: SchedulerConfig) -> Self {
        Self {
            default_config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn default_config(&self) -> SchedulerConfig {
        self.default_config
    }

    /// Create a session and return its id.
    pub fn create_session(&self, config: Option<SchedulerConfig>) -> SessionId {
        let config = config.unwrap_or(self.default_config);
        let session_id = SessionId::generate();
        let entry = SessionEntry {
            session: SharedSession::new(config),
            created_at: Utc::now(),
        };
        self.sessions.write().insert(session_id.clone(), entry);
        log::info!("Created scheduling session {}", session_id);
        session_id
    }

    /// Get a session handle by id.
    pub fn get(&self, session_id: &SessionId) -> Option<SharedSession> {
        self.sessions
            .read()
            .get(session_id)
            .map(|entry| entry.session.clone())
    }

    /// Drop a session. Returns false if it did not exist.
    pub fn remove(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            log::info!("Removed scheduling session {}", session_id);
        }
        removed
    }

    /// Summaries of all sessions, oldest first.
    pub fn list(&self) -> Vec<SessionInfo> {
        let handles: Vec<(SessionId, DateTime<Utc>, SharedSession)> = self
            .sessions
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.created_at, entry.session.clone()))
            .collect();

        let mut infos: Vec<SessionInfo> = handles
            .into_iter()
            .map(|(session_id, created_at, session)| SessionInfo {
                session_id,
                created_at,
                scheduled_count: session.len(),
            })
            .collect();
        infos.sort_by_key(|info| info.created_at);
        infos
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
