// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Reconcilers compare wall-clock timestamps recorded by the cluster (creation,
//! deletion, condition transitions), so the clock hands out `DateTime<Utc>`
//! rather than a monotonic instant.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    /// Start at a fixed, arbitrary instant so test output is reproducible.
    pub fn new() -> Self {
        let start = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default();
        Self::at(start)
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(now)) }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let delta = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
        *self.current.lock() += delta;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, now: DateTime<Utc>) {
        *self.current.lock() = now;
    }

    /// The instant `duration` before now, for back-dating fixtures.
    pub fn ago(&self, duration: Duration) -> DateTime<Utc> {
        let delta = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
        self.now() - delta
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

/// Elapsed wall time from `since` to `now`, clamped at zero for timestamps
/// that lie in the future (clock skew between nodes).
pub fn elapsed_since(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
