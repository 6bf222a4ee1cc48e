//! Data Transfer Objects for the HTTP API.
//!
//! Request and response bodies. Domain records ([`Message`], [`PlanEntry`],
//! [`SessionInfo`]) are serialized as-is where their shape already fits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{IntervalSettings, SchedulerConfig};
use crate::error::Result;
use crate::models::{Message, MessageId, PlanEntry, Priority, RecipientKey};
use crate::services::{SessionId, SessionInfo};

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of live sessions
    pub sessions: usize,
}

// =============================================================================
// Sessions
// =============================================================================

/// Request to create a scheduling session.
///
/// Omitted intervals fall back to the server defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub global_interval_secs: Option<u64>,
    #[serde(default)]
    pub recipient_interval_secs: Option<u64>,
    #[serde(default)]
    pub recipient_broadcast_interval_secs: Option<u64>,
}

impl CreateSessionRequest {
    /// Merge the overrides onto `defaults` and validate the result.
    pub fn resolve(&self, defaults: SchedulerConfig) -> Result<SchedulerConfig> {
        defaults.with_secs_overrides(
            self.global_interval_secs,
            self.recipient_interval_secs,
            self.recipient_broadcast_interval_secs,
        )
    }
}

/// Response after creating a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    /// Effective intervals of the new session
    pub intervals: IntervalSettings,
}

/// List of sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionInfo>,
    pub total: usize,
}

// =============================================================================
// Messages
// =============================================================================

/// Priority as submitted by clients: either a class name or an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityInput {
    Code(i32),
    Class(Priority),
}

impl Default for PriorityInput {
    fn default() -> Self {
        PriorityInput::Class(Priority::Normal)
    }
}

impl From<PriorityInput> for Priority {
    fn from(input: PriorityInput) -> Self {
        match input {
            PriorityInput::Code(code) => Priority::from(code),
            PriorityInput::Class(priority) => priority,
        }
    }
}

/// One message in a push request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: MessageId,
    pub recipient: RecipientKey,
    #[serde(default)]
    pub priority: PriorityInput,
    pub desired_at: DateTime<Utc>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message::new(dto.id, dto.recipient, dto.priority.into(), dto.desired_at)
    }
}

/// Messages to schedule, in push order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessagesRequest {
    pub messages: Vec<MessageDto>,
}

/// Result of a push request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessagesResponse {
    /// Messages scheduled by this request
    pub accepted: usize,
    /// Messages scheduled in the session overall
    pub total: usize,
}

// =============================================================================
// Plan
// =============================================================================

/// Committed send times of a session, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub session_id: SessionId,
    pub entries: Vec<PlanEntry>,
    pub total: usize,
}
