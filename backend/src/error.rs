//! Error types for the antiban scheduler

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::MessageId;
use crate::scheduler::QueueKind;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur while scheduling messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A commit collided with an entry already committed to the queue.
    ///
    /// This means resolution did not reach a real fixed point; it is a
    /// programming defect, never an expected runtime condition.
    #[error("Duplicate slot in {queue} queue at {send_at}: collides with message '{existing}'")]
    DuplicateSlot {
        queue: QueueKind,
        send_at: DateTime<Utc>,
        existing: MessageId,
    },

    /// Advancing a candidate past a collision left the representable time range.
    #[error("Send time overflow in {queue} queue while moving past {send_at}")]
    TimeOverflow {
        queue: QueueKind,
        send_at: DateTime<Utc>,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SchedulerError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateSlot { .. } => "DUPLICATE_SLOT",
            Self::TimeOverflow { .. } => "TIME_OVERFLOW",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether this error signals an orchestration defect rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::DuplicateSlot { .. })
    }
}
