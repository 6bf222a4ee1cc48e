//! Application state for the HTTP server.

use crate::config::SchedulerConfig;
use crate::services::SessionStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Scheduling sessions
    pub sessions: SessionStore,
}

impl AppState {
    /// Create a new application state with the given session store.
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// State with an empty store whose sessions use `config` by default.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::new(SessionStore::new(config))
    }
}
