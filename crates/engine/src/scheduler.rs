// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed work queue and per-key error backoff.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// Pending reconcile passes keyed by workspace.
///
/// Each key has at most one deadline; scheduling a key that is already due
/// keeps the earlier deadline. A key is handed out by [`pop_ready`] at most
/// once until [`complete`] is called for it, so passes for the same key never
/// overlap. Deadlines set while a key is in flight are held until it
/// completes.
///
/// [`pop_ready`]: WorkQueue::pop_ready
/// [`complete`]: WorkQueue::complete
#[derive(Debug)]
pub struct WorkQueue<K> {
    due: HashMap<K, Instant>,
    in_flight: HashSet<K>,
}

impl<K> Default for WorkQueue<K> {
    fn default() -> Self {
        Self { due: HashMap::new(), in_flight: HashSet::new() }
    }
}

impl<K: Clone + Eq + Hash + Ord> WorkQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` at `at`, unless it is already due earlier.
    pub fn schedule(&mut self, key: K, at: Instant) {
        self.due.entry(key).and_modify(|d| *d = (*d).min(at)).or_insert(at);
    }

    /// Take the earliest due key that is not in flight and mark it in flight.
    pub fn pop_ready(&mut self, now: Instant) -> Option<K> {
        let key = self
            .due
            .iter()
            .filter(|(k, at)| **at <= now && !self.in_flight.contains(*k))
            .min_by(|(ka, a), (kb, b)| a.cmp(b).then_with(|| ka.cmp(kb)))
            .map(|(k, _)| k.clone())?;
        self.due.remove(&key);
        self.in_flight.insert(key.clone());
        Some(key)
    }

    /// Release `key` after its pass finished.
    pub fn complete(&mut self, key: &K) {
        self.in_flight.remove(key);
    }

    /// Earliest deadline among keys that could be dispatched.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.due.iter().filter(|(k, _)| !self.in_flight.contains(*k)).map(|(_, at)| *at).min()
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains(key)
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.due.contains_key(key)
    }

    /// Number of keys waiting (in flight keys excluded unless rescheduled).
    pub fn len(&self) -> usize {
        self.due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty() && self.in_flight.is_empty()
    }
}

/// Exponential backoff per key, doubling from `base` up to `max`.
#[derive(Debug)]
pub struct Backoff<K> {
    base: Duration,
    max: Duration,
    failures: HashMap<K, u32>,
}

impl<K: Eq + Hash> Backoff<K> {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max, failures: HashMap::new() }
    }

    /// Record a failure for `key` and return how long to wait.
    pub fn next_delay(&mut self, key: K) -> Duration {
        let failures = self.failures.entry(key).or_insert(0);
        let factor = 1u32.checked_shl(*failures).unwrap_or(u32::MAX);
        *failures = failures.saturating_add(1);
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Forget failures for `key` after a successful pass.
    pub fn reset(&mut self, key: &K) {
        self.failures.remove(key);
    }

    pub fn failures(&self, key: &K) -> u32 {
        self.failures.get(key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
