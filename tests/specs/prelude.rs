// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared imports and fixtures for the specs.

#![allow(unused_imports)]

pub use chrono::{DateTime, Utc};
pub use similar_asserts::assert_eq;
pub use std::time::Duration;
pub use wsm_adapters::{FakeWorkspaceStore, StoreError, WorkspaceActivity};
pub use wsm_core::test_support::{
    ready_container, starting_container, terminated_container, waiting_container,
};
pub use wsm_core::{
    Clock, Condition, ConditionStatus, ConditionType, FakeClock, PodPhase, PodSnapshot,
    TimeoutConfig, Workspace, WorkspaceId, WorkspacePhase,
};
pub use wsm_engine::{
    evaluate, failure_from_logs, update_status, Action, Runner, RunnerConfig, StatusReconciler,
    TimeoutReconciler, MULTIPLE_PODS_MESSAGE,
};

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

pub fn hours(n: u64) -> Duration {
    minutes(n * 60)
}

/// A store holding one workspace, plus the clock the reconcilers share.
pub struct World {
    pub store: FakeWorkspaceStore,
    pub clock: FakeClock,
    pub id: WorkspaceId,
}

impl World {
    pub fn new(ws: Workspace) -> Self {
        let store = FakeWorkspaceStore::new();
        let id = store.insert(ws).id;
        Self { store, clock: FakeClock::new(), id }
    }

    pub fn workspace(&self) -> Workspace {
        self.store.workspace(&self.id).expect("workspace exists")
    }

    pub fn phase(&self) -> Option<WorkspacePhase> {
        self.workspace().phase()
    }

    pub fn set_pod(&self, pod: PodSnapshot) {
        self.store.set_pods(&self.id, vec![pod]);
    }

    pub fn status_reconciler(&self) -> StatusReconciler<FakeWorkspaceStore, FakeClock> {
        StatusReconciler::new(self.store.clone(), self.clock.clone())
    }

    pub fn timeout_reconciler(
        &self,
        activity: WorkspaceActivity,
        config: TimeoutConfig,
    ) -> TimeoutReconciler<FakeWorkspaceStore, WorkspaceActivity, FakeClock> {
        TimeoutReconciler::new(self.store.clone(), activity, self.clock.clone(), config)
    }
}
