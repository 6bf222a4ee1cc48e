//! Routes messages through their constraint queues and commits the first
//! send time every applicable queue accepts.

use super::queue::{ConstraintQueue, QueueKind};
use super::registry::{RecipientQueues, RecipientRegistry};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::models::{Message, PlanEntry, RecipientKey, ScheduledEntry};

/// Owns the global queue and the recipient registry of one scheduling session.
///
/// Messages are resolved strictly in push order. Priority only decides which
/// queues a message is checked against:
///
/// | priority    | queues (in resolution order)                  |
/// |-------------|-----------------------------------------------|
/// | `Normal`    | recipient, global                             |
/// | `Broadcast` | recipient-broadcast, recipient, global        |
///
/// # Example
///
/// ```rust
/// use antiban::{Message, ScheduleOrchestrator};
/// use chrono::{TimeDelta, TimeZone, Utc};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
/// let mut orchestrator = ScheduleOrchestrator::default();
/// orchestrator.push(Message::normal("m1", "alice", t0)).unwrap();
/// orchestrator.push(Message::normal("m2", "alice", t0)).unwrap();
///
/// let plan = orchestrator.get_plan();
/// assert_eq!(plan[1].scheduled_at, t0 + TimeDelta::minutes(1));
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleOrchestrator {
    config: SchedulerConfig,
    global: ConstraintQueue,
    registry: RecipientRegistry,
}

impl Default for ScheduleOrchestrator {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl ScheduleOrchestrator {
    /// Build an orchestrator without checking `config`.
    ///
    /// Every interval must be strictly positive. With a zero or negative
    /// interval no two distinct times collide, and an identical time only
    /// surfaces at commit as [`DuplicateSlot`](crate::SchedulerError::DuplicateSlot).
    /// Use [`try_new`](Self::try_new) for configuration that was not validated.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            global: ConstraintQueue::new(QueueKind::Global, config.global_interval),
            registry: RecipientRegistry::new(),
        }
    }

    /// Validate `config`, then build an orchestrator from it.
    pub fn try_new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Number of messages scheduled so far.
    pub fn len(&self) -> usize {
        self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    /// Number of distinct recipients seen so far.
    pub fn recipient_count(&self) -> usize {
        self.registry.len()
    }

    pub fn recipient_queues(&self, recipient: &RecipientKey) -> Option<&RecipientQueues> {
        self.registry.get(recipient)
    }

    /// Resolve a send time for `message` and commit it.
    ///
    /// On error nothing is committed to any queue.
    pub fn push(&mut self, message: Message) -> Result<()> {
        // A recipient seen for the first time gets its queues registered only
        // after the commit succeeds.
        let mut pending = None;
        let recipient = match self.registry.get_mut(&message.recipient) {
            Some(queues) => queues,
            None => pending.insert(RecipientQueues::new(
                self.config.recipient_interval,
                self.config.recipient_broadcast_interval,
            )),
        };

        let mut selected: Vec<&mut ConstraintQueue> = Vec::with_capacity(3);
        if message.priority.is_broadcast() {
            selected.push(&mut recipient.broadcast);
        }
        selected.push(&mut recipient.all);
        selected.push(&mut self.global);

        let initial = ScheduledEntry::new(message.desired_at, message.id);
        let (resolved, passes) = resolve(&selected, initial)?;

        // All-or-nothing: verify every queue before touching any of them.
        for queue in &selected {
            queue.check(&resolved)?;
        }
        for queue in selected.iter_mut() {
            queue.commit(resolved.clone())?;
        }
        drop(selected);

        if let Some(queues) = pending {
            self.registry.register(message.recipient.clone(), queues);
        }

        log::debug!(
            "Scheduled '{}' ({}, recipient '{}') at {} (desired {}, {} pass(es))",
            resolved.message_id,
            message.priority,
            message.recipient,
            resolved.send_at,
            message.desired_at,
            passes
        );
        Ok(())
    }

    /// Push messages in iteration order, stopping at the first failure.
    ///
    /// Messages pushed before the failing one stay scheduled.
    pub fn push_all<I>(&mut self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = Message>,
    {
        for message in messages {
            self.push(message)?;
        }
        Ok(())
    }

    /// Committed send time of every pushed message, ascending by time.
    pub fn get_plan(&self) -> Vec<PlanEntry> {
        self.global.entries().map(PlanEntry::from).collect()
    }
}

/// Run full passes over `queues` until a pass leaves the send time unchanged.
///
/// Every adjustment moves the candidate strictly forward and each queue holds
/// finitely many entries, so this terminates. A single pass is not enough:
/// clearing a later queue can land the candidate on an entry of an earlier one.
fn resolve(
    queues: &[&mut ConstraintQueue],
    initial: ScheduledEntry,
) -> Result<(ScheduledEntry, usize)> {
    let mut candidate = initial;
    let mut passes = 0;
    loop {
        passes += 1;
        let pass_start = candidate.send_at;
        for queue in queues {
            candidate = queue.propose(candidate)?;
        }
        if candidate.send_at == pass_start {
            return Ok((candidate, passes));
        }
    }
}
