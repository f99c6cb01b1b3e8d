// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last-activity lookup for the timeout controller.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use wsm_core::WorkspaceId;

/// Answers "when was this workspace last seen active?".
///
/// `None` means the workspace has never reported activity.
pub trait ActivityLookup: Clone + Send + Sync + 'static {
    fn last_activity(&self, id: &WorkspaceId) -> Option<DateTime<Utc>>;
}

/// In-process activity table fed by heartbeats.
#[derive(Clone, Default)]
pub struct WorkspaceActivity {
    seen: Arc<RwLock<HashMap<WorkspaceId, DateTime<Utc>>>>,
}

impl WorkspaceActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record activity at `at`. Out-of-order heartbeats never move the
    /// timestamp backwards.
    pub fn record(&self, id: &WorkspaceId, at: DateTime<Utc>) {
        let mut seen = self.seen.write();
        let entry = seen.entry(id.clone()).or_insert(at);
        if at > *entry {
            *entry = at;
        }
    }

    /// Drop the entry for a workspace that no longer exists.
    pub fn forget(&self, id: &WorkspaceId) {
        self.seen.write().remove(id);
    }

    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }
}

impl ActivityLookup for WorkspaceActivity {
    fn last_activity(&self, id: &WorkspaceId) -> Option<DateTime<Utc>> {
        self.seen.read().get(id).copied()
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
