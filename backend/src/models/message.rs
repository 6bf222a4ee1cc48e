//! Outbound message records submitted for scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_key_type!(
    /// Opaque, caller-generated message identifier.
    MessageId
);

crate::define_key_type!(
    /// Recipient identity (phone number, chat id, address...).
    RecipientKey
);

/// Integer priority code that marks a broadcast-class message.
pub const BROADCAST_PRIORITY_CODE: i32 = 1;

/// Priority class of a message.
///
/// Priority only decides which constraint queues apply to a message. It never
/// reorders messages or lets one preempt another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Regular message
    #[default]
    Normal,
    /// Mass mailing; additionally subject to the long per-recipient interval
    Broadcast,
}

impl Priority {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Priority::Broadcast)
    }
}

impl From<i32> for Priority {
    /// Upstream producers tag broadcasts with code `1`; every other code is a
    /// regular message.
    fn from(code: i32) -> Self {
        if code == BROADCAST_PRIORITY_CODE {
            Priority::Broadcast
        } else {
            Priority::Normal
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Normal => f.write_str("normal"),
            Priority::Broadcast => f.write_str("broadcast"),
        }
    }
}

/// A message waiting for a send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: MessageId,
    /// Who the message goes to
    pub recipient: RecipientKey,
    /// Priority class
    #[serde(default)]
    pub priority: Priority,
    /// Earliest time the caller wants the message sent
    pub desired_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: impl Into<MessageId>,
        recipient: impl Into<RecipientKey>,
        priority: Priority,
        desired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            recipient: recipient.into(),
            priority,
            desired_at,
        }
    }

    /// Shorthand for a [`Priority::Normal`] message.
    pub fn normal(
        id: impl Into<MessageId>,
        recipient: impl Into<RecipientKey>,
        desired_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, recipient, Priority::Normal, desired_at)
    }

    /// Shorthand for a [`Priority::Broadcast`] message.
    pub fn broadcast(
        id: impl Into<MessageId>,
        recipient: impl Into<RecipientKey>,
        desired_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, recipient, Priority::Broadcast, desired_at)
    }
}
