use std::collections::HashMap;

use chrono::TimeDelta;

use super::queue::{ConstraintQueue, QueueKind};
use crate::models::RecipientKey;

/// The two queues that belong to one recipient.
#[derive(Debug, Clone)]
pub struct RecipientQueues {
    /// Every message to the recipient
    pub all: ConstraintQueue,
    /// Broadcast-class messages to the recipient
    pub broadcast: ConstraintQueue,
}

impl RecipientQueues {
    pub fn new(interval: TimeDelta, broadcast_interval: TimeDelta) -> Self {
        Self {
            all: ConstraintQueue::new(QueueKind::Recipient, interval),
            broadcast: ConstraintQueue::new(QueueKind::RecipientBroadcast, broadcast_interval),
        }
    }
}

/// Recipient → queue pair, kept for the lifetime of the registry.
///
/// Queues are only registered once a message to that recipient has been
/// committed, so a failed push leaves no trace here.
#[derive(Debug, Clone, Default)]
pub struct RecipientRegistry {
    queues: HashMap<RecipientKey, RecipientQueues>,
}

impl RecipientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, recipient: &RecipientKey) -> Option<&RecipientQueues> {
        self.queues.get(recipient)
    }

    pub fn get_mut(&mut self, recipient: &RecipientKey) -> Option<&mut RecipientQueues> {
        self.queues.get_mut(recipient)
    }

    /// Store the queues of a newly seen recipient.
    pub fn register(&mut self, recipient: RecipientKey, queues: RecipientQueues) {
        log::debug!("Registering queues for recipient '{}'", recipient);
        self.queues.insert(recipient, queues);
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queues_are_visible_once_registered() {
        let mut registry = RecipientRegistry::new();
        let alice = RecipientKey::new("alice");

        let queues = RecipientQueues::new(TimeDelta::minutes(1), TimeDelta::hours(24));
        assert_eq!(queues.all.kind(), QueueKind::Recipient);
        assert_eq!(queues.all.interval(), TimeDelta::minutes(1));
        assert_eq!(queues.broadcast.kind(), QueueKind::RecipientBroadcast);
        assert_eq!(queues.broadcast.interval(), TimeDelta::hours(24));
        assert!(registry.is_empty());

        registry.register(alice.clone(), queues);
        assert!(registry.get(&alice).is_some());
        assert!(registry.get_mut(&RecipientKey::new("bob")).is_none());
        assert_eq!(registry.len(), 1);
    }
}
