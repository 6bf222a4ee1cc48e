//! Ordered set of scheduled entries with interval-tolerant equality.
//!
//! Two entries are "the same slot" when their times are strictly less than
//! `interval` apart. The set never holds two such entries, which is what lets
//! a collision lookup inspect only the closest neighbour on each side of the
//! candidate: any entry further away is at least one interval past that
//! neighbour and therefore at least one interval past the candidate.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::ScheduledEntry;

/// Sorted container of committed entries spaced at least `interval` apart.
#[derive(Debug, Clone)]
pub struct IntervalOrderedSet {
    interval: TimeDelta,
    entries: BTreeMap<DateTime<Utc>, ScheduledEntry>,
}

impl IntervalOrderedSet {
    pub fn new(interval: TimeDelta) -> Self {
        Self {
            interval,
            entries: BTreeMap::new(),
        }
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Committed entries in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEntry> {
        self.entries.values()
    }

    /// Slot ordering of `candidate` relative to `existing`.
    ///
    /// With `diff = candidate - existing`:
    /// - `diff <= -interval` is `Less`
    /// - `diff >= interval` is `Greater`
    /// - anything in between is `Equal`, i.e. a collision
    ///
    /// A gap of exactly one interval is therefore never a collision.
    pub fn compare_slots(&self, candidate: DateTime<Utc>, existing: DateTime<Utc>) -> Ordering {
        let diff = candidate - existing;
        if diff <= -self.interval {
            Ordering::Less
        } else if diff >= self.interval {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// The committed entry occupying the same slot as `candidate`, if any.
    ///
    /// When entries collide on both sides the earlier one is returned.
    pub fn find_collision(&self, candidate: DateTime<Utc>) -> Option<&ScheduledEntry> {
        let before = self
            .entries
            .range((Bound::Unbounded, Bound::Included(candidate)))
            .next_back()
            .map(|(_, entry)| entry);
        let after = self
            .entries
            .range((Bound::Excluded(candidate), Bound::Unbounded))
            .next()
            .map(|(_, entry)| entry);

        before
            .into_iter()
            .chain(after)
            .find(|entry| self.compare_slots(candidate, entry.send_at) == Ordering::Equal)
    }

    /// Whether `entry` could be inserted right now.
    ///
    /// Returns the entry it collides with otherwise. An identical timestamp is
    /// always a collision, even for a zero interval.
    pub fn conflict_with(&self, entry: &ScheduledEntry) -> Option<&ScheduledEntry> {
        self.entries
            .get(&entry.send_at)
            .or_else(|| self.find_collision(entry.send_at))
    }

    /// Insert an entry that no committed entry collides with.
    ///
    /// On collision nothing is inserted and the colliding entry is returned
    /// in the error.
    pub fn insert(&mut self, entry: ScheduledEntry) -> Result<(), ScheduledEntry> {
        if let Some(existing) = self.conflict_with(&entry) {
            return Err(existing.clone());
        }
        self.entries.insert(entry.send_at, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(secs: i64, id: &str) -> ScheduledEntry {
        ScheduledEntry::new(t(secs), id.into())
    }

    fn set_with(interval: i64, times: &[i64]) -> IntervalOrderedSet {
        let mut set = IntervalOrderedSet::new(TimeDelta::seconds(interval));
        for (i, secs) in times.iter().enumerate() {
            set.insert(entry(*secs, &format!("m{}", i))).unwrap();
        }
        set
    }

    #[test]
    fn test_compare_slots_boundaries() {
        let set = IntervalOrderedSet::new(TimeDelta::seconds(10));
        assert_eq!(set.compare_slots(t(0), t(10)), Ordering::Less);
        assert_eq!(set.compare_slots(t(0), t(25)), Ordering::Less);
        assert_eq!(set.compare_slots(t(1), t(10)), Ordering::Equal);
        assert_eq!(set.compare_slots(t(10), t(10)), Ordering::Equal);
        assert_eq!(set.compare_slots(t(19), t(10)), Ordering::Equal);
        assert_eq!(set.compare_slots(t(20), t(10)), Ordering::Greater);
    }

    #[test]
    fn test_empty_set_has_no_collision() {
        let set = IntervalOrderedSet::new(TimeDelta::seconds(10));
        assert!(set.find_collision(t(0)).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_find_collision_either_side() {
        let set = set_with(10, &[100]);
        assert_eq!(set.find_collision(t(95)).unwrap().send_at, t(100));
        assert_eq!(set.find_collision(t(105)).unwrap().send_at, t(100));
        assert_eq!(set.find_collision(t(100)).unwrap().send_at, t(100));
        assert!(set.find_collision(t(90)).is_none());
        assert!(set.find_collision(t(110)).is_none());
    }

    #[test]
    fn test_find_collision_prefers_earlier_neighbour() {
        let set = set_with(10, &[0, 12]);
        let hit = set.find_collision(t(6)).unwrap();
        assert_eq!(hit.send_at, t(0));
        assert_eq!(hit.message_id.as_str(), "m0");
    }

    #[test]
    fn test_find_collision_ignores_distant_entries() {
        let set = set_with(10, &[0, 10, 20, 30, 40]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.find_collision(t(25)).unwrap().send_at, t(20));
        assert!(set.find_collision(t(50)).is_none());
        assert!(set.find_collision(t(-10)).is_none());
    }

    #[test]
    fn test_insert_rejects_collision() {
        let mut set = set_with(10, &[0]);
        let err = set.insert(entry(9, "late")).unwrap_err();
        assert_eq!(err.message_id.as_str(), "m0");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_rejects_identical_time() {
        let mut set = set_with(10, &[0]);
        assert!(set.insert(entry(0, "dup")).is_err());
    }

    #[test]
    fn test_insert_accepts_exact_interval() {
        let mut set = set_with(10, &[0]);
        assert!(set.insert(entry(10, "next")).is_ok());
        assert!(set.insert(entry(-10, "prev")).is_ok());
        let times: Vec<_> = set.iter().map(|e| e.send_at).collect();
        assert_eq!(times, vec![t(-10), t(0), t(10)]);
    }

    #[test]
    fn test_zero_interval_only_rejects_identical_time() {
        let mut set = IntervalOrderedSet::new(TimeDelta::zero());
        set.insert(entry(0, "a")).unwrap();
        set.insert(entry(1, "b")).unwrap();
        assert!(set.insert(entry(1, "c")).is_err());
    }
}
