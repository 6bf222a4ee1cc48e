//! Service layer on top of the scheduling core.
//!
//! Services hold scheduling sessions for callers that share them across
//! threads or requests.

pub mod session_store;

pub use session_store::{SessionId, SessionInfo, SessionStore, SharedSession};
