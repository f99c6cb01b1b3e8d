// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace store: the single read/write path the reconcilers use.

use async_trait::async_trait;
use thiserror::Error;
use wsm_core::{PodSnapshot, Workspace, WorkspaceId};

/// Errors from store operations.
///
/// `NotFound` and `Conflict` must stay distinguishable: the first ends a
/// reconcile quietly, the second triggers an immediate re-read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("workspace not found: {0}")]
    NotFound(String),

    #[error("stale write for workspace {0}")]
    Conflict(String),

    #[error("invalid object {name}: {reason}")]
    Invalid { name: String, reason: String },

    #[error("api error: {0}")]
    Api(String),
}

/// Access to workspaces and the pods backing them.
#[async_trait]
pub trait WorkspaceStore: Clone + Send + Sync + 'static {
    /// Fetch the current workspace snapshot.
    async fn get(&self, id: &WorkspaceId) -> Result<Workspace, StoreError>;

    /// All pods whose selector label matches the workspace.
    async fn list_pods(&self, id: &WorkspaceId) -> Result<Vec<PodSnapshot>, StoreError>;

    /// Write `workspace.status`, conditional on `workspace.resource_version`.
    ///
    /// Returns the stored workspace (with its new version), or
    /// [`StoreError::Conflict`] if the object changed since it was read.
    async fn update_status(&self, workspace: &Workspace) -> Result<Workspace, StoreError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{StoreError, WorkspaceStore};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use wsm_core::{PodSnapshot, Workspace, WorkspaceId, WorkspaceStatus};

    /// Recorded status write
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatusWrite {
        pub id: WorkspaceId,
        pub status: WorkspaceStatus,
    }

    #[derive(Default)]
    struct FakeStoreState {
        workspaces: HashMap<WorkspaceId, Workspace>,
        pods: HashMap<WorkspaceId, Vec<PodSnapshot>>,
        next_version: u64,
        writes: Vec<StatusWrite>,
        get_errors: VecDeque<StoreError>,
        update_errors: VecDeque<StoreError>,
        gets: usize,
    }

    impl FakeStoreState {
        fn bump(&mut self) -> String {
            self.next_version += 1;
            self.next_version.to_string()
        }
    }

    /// In-memory, versioned workspace store for testing.
    #[derive(Clone, Default)]
    pub struct FakeWorkspaceStore {
        inner: Arc<Mutex<FakeStoreState>>,
    }

    impl FakeWorkspaceStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace a workspace; assigns a fresh resource version.
        pub fn insert(&self, mut workspace: Workspace) -> Workspace {
            let mut inner = self.inner.lock();
            workspace.resource_version = Some(inner.bump());
            inner.workspaces.insert(workspace.id.clone(), workspace.clone());
            workspace
        }

        pub fn remove(&self, id: &WorkspaceId) {
            self.inner.lock().workspaces.remove(id);
        }

        pub fn set_pods(&self, id: &WorkspaceId, pods: Vec<PodSnapshot>) {
            self.inner.lock().pods.insert(id.clone(), pods);
        }

        /// Current stored snapshot.
        pub fn workspace(&self, id: &WorkspaceId) -> Option<Workspace> {
            self.inner.lock().workspaces.get(id).cloned()
        }

        /// Apply an out-of-band change, as another writer would, bumping the
        /// resource version.
        pub fn modify(&self, id: &WorkspaceId, f: impl FnOnce(&mut Workspace)) {
            let mut inner = self.inner.lock();
            let version = inner.bump();
            if let Some(ws) = inner.workspaces.get_mut(id) {
                f(ws);
                ws.resource_version = Some(version);
            }
        }

        /// Fail the next `get` with `err`.
        pub fn fail_next_get(&self, err: StoreError) {
            self.inner.lock().get_errors.push_back(err);
        }

        /// Fail the next `update_status` with `err`.
        pub fn fail_next_update(&self, err: StoreError) {
            self.inner.lock().update_errors.push_back(err);
        }

        /// All successful status writes, in order.
        pub fn writes(&self) -> Vec<StatusWrite> {
            self.inner.lock().writes.clone()
        }

        pub fn write_count(&self) -> usize {
            self.inner.lock().writes.len()
        }

        pub fn get_count(&self) -> usize {
            self.inner.lock().gets
        }
    }

    #[async_trait]
    impl WorkspaceStore for FakeWorkspaceStore {
        async fn get(&self, id: &WorkspaceId) -> Result<Workspace, StoreError> {
            let mut inner = self.inner.lock();
            inner.gets += 1;
            if let Some(err) = inner.get_errors.pop_front() {
                return Err(err);
            }
            inner
                .workspaces
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        }

        async fn list_pods(&self, id: &WorkspaceId) -> Result<Vec<PodSnapshot>, StoreError> {
            Ok(self.inner.lock().pods.get(id).cloned().unwrap_or_default())
        }

        async fn update_status(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
            let mut inner = self.inner.lock();
            if let Some(err) = inner.update_errors.pop_front() {
                return Err(err);
            }
            let stored_version = match inner.workspaces.get(&workspace.id) {
                Some(stored) => stored.resource_version.clone(),
                None => return Err(StoreError::NotFound(workspace.id.to_string())),
            };
            if stored_version != workspace.resource_version {
                return Err(StoreError::Conflict(workspace.id.to_string()));
            }

            let version = inner.bump();
            let mut updated = workspace.clone();
            updated.resource_version = Some(version);
            inner.workspaces.insert(updated.id.clone(), updated.clone());
            inner
                .writes
                .push(StatusWrite { id: updated.id.clone(), status: updated.status.clone() });
            Ok(updated)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorkspaceStore, StatusWrite};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
