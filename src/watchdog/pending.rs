//! The set of in-flight calls that may need a still-running warning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::format::Value;
use crate::intercept::{JoinPoint, Loggable};

/// Identifies a registered call in the pending set.
pub type CallId = u64;

/// Snapshot of a call taken when it registered.
#[derive(Debug, Clone)]
pub struct WarnPoint {
    pub join_point: JoinPoint,
    pub declaration: Loggable,
    pub args: Vec<Value>,
    pub start: Instant,
}

impl WarnPoint {
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    pub fn is_overdue(&self, now: Instant) -> bool {
        self.declaration.is_over(self.elapsed(now))
    }
}

/// Concurrent map of registered calls.
///
/// Whoever removes a record owns it: the watchdog only warns about records
/// it removed itself, and a completing call only deregisters.
#[derive(Debug, Default)]
pub struct PendingCalls {
    points: DashMap<CallId, WarnPoint>,
    next_id: AtomicU64,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, point: WarnPoint) -> CallId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.points.insert(id, point);
        id
    }

    pub fn remove(&self, id: CallId) -> Option<WarnPoint> {
        self.points.remove(&id).map(|(_, point)| point)
    }

    pub fn contains(&self, id: CallId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove and return every record past its threshold at `now`.
    ///
    /// Overdue ids are collected first so no shard lock is held during
    /// removal. A record deregistered in between is simply skipped.
    pub fn take_overdue(&self, now: Instant) -> Vec<WarnPoint> {
        let overdue: Vec<CallId> = self
            .points
            .iter()
            .filter(|entry| entry.value().is_overdue(now))
            .map(|entry| *entry.key())
            .collect();

        overdue.into_iter().filter_map(|id| self.remove(id)).collect()
    }
}
