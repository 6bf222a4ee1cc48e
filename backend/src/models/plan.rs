use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::MessageId;

/// A send time bound to the message that owns it.
///
/// Entries are immutable: resolving a message produces a fresh entry for
/// every forward push instead of mutating the previous candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEntry {
    pub send_at: DateTime<Utc>,
    pub message_id: MessageId,
}

impl ScheduledEntry {
    pub fn new(send_at: DateTime<Utc>, message_id: MessageId) -> Self {
        Self {
            send_at,
            message_id,
        }
    }

    /// Same owner, different time.
    pub fn moved_to(&self, send_at: DateTime<Utc>) -> Self {
        Self {
            send_at,
            message_id: self.message_id.clone(),
        }
    }
}

/// Final committed send time of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub message_id: MessageId,
    pub scheduled_at: DateTime<Utc>,
}

impl From<&ScheduledEntry> for PlanEntry {
    fn from(entry: &ScheduledEntry) -> Self {
        Self {
            message_id: entry.message_id.clone(),
            scheduled_at: entry.send_at,
        }
    }
}
