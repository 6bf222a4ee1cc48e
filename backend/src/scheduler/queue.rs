//! Constraint queue: one minimum-spacing rule over committed send times.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::interval_set::IntervalOrderedSet;
use crate::error::{Result, SchedulerError};
use crate::models::ScheduledEntry;

/// Which spacing rule a queue enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Every message, system-wide
    Global,
    /// Every message to one recipient
    Recipient,
    /// Broadcast-class messages to one recipient
    RecipientBroadcast,
}

impl std::fmt::Display for QueueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueKind::Global => f.write_str("global"),
            QueueKind::Recipient => f.write_str("recipient"),
            QueueKind::RecipientBroadcast => f.write_str("recipient-broadcast"),
        }
    }
}

/// Committed entries plus the interval they must keep between each other.
///
/// Scheduling against a queue is two-phase: [`propose`](Self::propose) finds
/// the earliest acceptable time without touching state, and
/// [`commit`](Self::commit) records the result.
#[derive(Debug, Clone)]
pub struct ConstraintQueue {
    kind: QueueKind,
    slots: IntervalOrderedSet,
}

impl ConstraintQueue {
    pub fn new(kind: QueueKind, interval: TimeDelta) -> Self {
        Self {
            kind,
            slots: IntervalOrderedSet::new(interval),
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn interval(&self) -> TimeDelta {
        self.slots.interval()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Committed entries in ascending time order.
    pub fn entries(&self) -> impl Iterator<Item = &ScheduledEntry> {
        self.slots.iter()
    }

    /// Move `candidate` forward until it collides with no committed entry.
    ///
    /// Each collision with an entry at `E` moves the candidate to exactly
    /// `E + interval`, then the lookup repeats.
    pub fn propose(&self, candidate: ScheduledEntry) -> Result<ScheduledEntry> {
        let mut candidate = candidate;
        while let Some(existing) = self.slots.find_collision(candidate.send_at) {
            let next = existing
                .send_at
                .checked_add_signed(self.interval())
                .ok_or(SchedulerError::TimeOverflow {
                    queue: self.kind,
                    send_at: existing.send_at,
                })?;
            candidate = candidate.moved_to(next);
        }
        Ok(candidate)
    }

    /// Fail with `DuplicateSlot` if `entry` cannot be committed as-is.
    pub fn check(&self, entry: &ScheduledEntry) -> Result<()> {
        match self.slots.conflict_with(entry) {
            Some(existing) => Err(SchedulerError::DuplicateSlot {
                queue: self.kind,
                send_at: entry.send_at,
                existing: existing.message_id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Record an entry produced by [`propose`](Self::propose).
    pub fn commit(&mut self, entry: ScheduledEntry) -> Result<()> {
        let send_at = entry.send_at;
        self.slots.insert(entry).map_err(|existing| {
            log::warn!(
                "Rejected commit into {} queue at {}: slot held by '{}'",
                self.kind,
                send_at,
                existing.message_id
            );
            SchedulerError::DuplicateSlot {
                queue: self.kind,
                send_at,
                existing: existing.message_id,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(secs: i64, id: &str) -> ScheduledEntry {
        ScheduledEntry::new(t(secs), id.into())
    }

    fn queue(interval: i64) -> ConstraintQueue {
        ConstraintQueue::new(QueueKind::Global, TimeDelta::seconds(interval))
    }

    #[test]
    fn test_propose_on_empty_queue_keeps_time() {
        let q = queue(10);
        assert_eq!(q.propose(entry(5, "a")).unwrap(), entry(5, "a"));
    }

    #[test]
    fn test_propose_moves_one_interval_past_colliding_entry() {
        let mut q = queue(10);
        q.commit(entry(0, "a")).unwrap();

        // Collides with 0, lands at 0 + 10, not at 3 + 10.
        let proposed = q.propose(entry(3, "b")).unwrap();
        assert_eq!(proposed.send_at, t(10));
        assert_eq!(proposed.message_id.as_str(), "b");
    }

    #[test]
    fn test_propose_walks_a_chain_of_collisions() {
        let mut q = queue(10);
        for (i, secs) in [0, 10, 20, 35].iter().enumerate() {
            q.commit(entry(*secs, &format!("m{}", i))).unwrap();
        }

        assert_eq!(q.propose(entry(0, "x")).unwrap().send_at, t(45));
        assert_eq!(q.propose(entry(-5, "y")).unwrap().send_at, t(45));
        assert_eq!(q.propose(entry(-10, "z")).unwrap().send_at, t(-10));
    }

    #[test]
    fn test_propose_does_not_mutate() {
        let mut q = queue(10);
        q.commit(entry(0, "a")).unwrap();
        let _ = q.propose(entry(0, "b")).unwrap();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_commit_duplicate_slot_fails() {
        let mut q = queue(10);
        q.commit(entry(0, "a")).unwrap();

        let err = q.commit(entry(0, "b")).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::DuplicateSlot {
                queue: QueueKind::Global,
                send_at: t(0),
                existing: "a".into(),
            }
        );
        assert!(err.is_invariant_violation());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_check_matches_commit() {
        let mut q = queue(10);
        q.commit(entry(0, "a")).unwrap();
        assert!(q.check(&entry(9, "b")).is_err());
        assert!(q.check(&entry(10, "b")).is_ok());
    }

    #[test]
    fn test_propose_reports_overflow() {
        let mut q = queue(10);
        q.commit(ScheduledEntry::new(DateTime::<Utc>::MAX_UTC, "last".into()))
            .unwrap();
        let err = q
            .propose(ScheduledEntry::new(DateTime::<Utc>::MAX_UTC, "x".into()))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::TimeOverflow { .. }));
    }
}
