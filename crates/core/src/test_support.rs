// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    Clock, Condition, ConditionSet, ConditionStatus, ConditionType, ContainerState, ContainerStatus,
    FakeClock, PodPhase, PodSnapshot, Terminated, Workspace, WorkspaceId, WorkspacePhase, WorkspaceRuntime,
    WorkspaceStatus, DISPOSAL_FINALIZER,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for conditions and phases.
pub mod strategies {
    use crate::{ConditionStatus, ConditionType, WorkspacePhase};
    use proptest::prelude::*;

    pub fn arb_condition_type() -> impl Strategy<Value = ConditionType> {
        prop_oneof![
            Just(ConditionType::Deployed),
            Just(ConditionType::Failed),
            Just(ConditionType::Timeout),
            Just(ConditionType::BackupComplete),
            Just(ConditionType::BackupFailure),
            Just(ConditionType::ContentReady),
            Just(ConditionType::Closed),
            Just(ConditionType::UserActivity),
            "[A-Z][a-zA-Z]{2,12}".prop_map(|s| ConditionType::from(s.as_str())),
        ]
    }

    pub fn arb_condition_status() -> impl Strategy<Value = ConditionStatus> {
        prop_oneof![
            Just(ConditionStatus::True),
            Just(ConditionStatus::False),
            Just(ConditionStatus::Unknown),
        ]
    }

    pub fn arb_phase() -> impl Strategy<Value = Option<WorkspacePhase>> {
        prop_oneof![Just(None), proptest::sample::select(WorkspacePhase::ALL).prop_map(Some)]
    }

    /// `(type, status, message)` triples for driving `ConditionSet::upsert`.
    pub fn arb_upsert() -> impl Strategy<Value = (ConditionType, ConditionStatus, String)> {
        (arb_condition_type(), arb_condition_status(), "[a-z ]{0,8}")
    }
}

// ── Workspace builder ───────────────────────────────────────────────────

/// Test builder for [`Workspace`]; defaults to a fresh, non-headless
/// workspace created at `created_at` with no phase.
pub struct WorkspaceBuilder {
    id: WorkspaceId,
    resource_version: Option<String>,
    headless: bool,
    created_at: DateTime<Utc>,
    custom_timeout: Option<Duration>,
    phase: Option<WorkspacePhase>,
    conditions: ConditionSet,
    runtime: WorkspaceRuntime,
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self {
            id: WorkspaceId::new("ws-test"),
            resource_version: Some("1".to_string()),
            headless: false,
            created_at: FakeClock::new().now(),
            custom_timeout: None,
            phase: None,
            conditions: ConditionSet::new(),
            runtime: WorkspaceRuntime::default(),
        }
    }
}

impl WorkspaceBuilder {
    pub fn id(mut self, id: impl Into<WorkspaceId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn resource_version(mut self, v: impl Into<String>) -> Self {
        self.resource_version = Some(v.into());
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn custom_timeout(mut self, d: Duration) -> Self {
        self.custom_timeout = Some(d);
        self
    }

    pub fn phase(mut self, phase: WorkspacePhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Add a condition with the given status at `at`.
    pub fn condition(mut self, ty: ConditionType, status: ConditionStatus, at: DateTime<Utc>) -> Self {
        self.conditions.upsert(Condition::new(ty, status, at));
        self
    }

    pub fn condition_with(mut self, condition: Condition) -> Self {
        self.conditions.upsert(condition);
        self
    }

    pub fn runtime(mut self, runtime: WorkspaceRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn build(self) -> Workspace {
        Workspace {
            id: self.id,
            resource_version: self.resource_version,
            headless: self.headless,
            creation_timestamp: self.created_at,
            custom_timeout: self.custom_timeout,
            status: WorkspaceStatus {
                phase: self.phase,
                conditions: self.conditions,
                runtime: self.runtime,
            },
        }
    }
}

impl Workspace {
    /// Create a builder with test defaults.
    pub fn builder() -> WorkspaceBuilder {
        WorkspaceBuilder::default()
    }
}

// ── Pod builder ─────────────────────────────────────────────────────────

/// Test builder for [`PodSnapshot`]; defaults to a running pod with a single
/// ready container, scheduled on `node-1`.
pub struct PodBuilder {
    pod: PodSnapshot,
}

impl Default for PodBuilder {
    fn default() -> Self {
        Self {
            pod: PodSnapshot {
                name: "ws-test-pod".to_string(),
                deletion_timestamp: None,
                finalizers: Vec::new(),
                phase: PodPhase::Running,
                reason: None,
                message: None,
                container_statuses: vec![ready_container("workspace")],
                node_name: Some("node-1".to_string()),
                host_ip: Some("10.0.0.1".to_string()),
                pod_ip: Some("10.1.0.7".to_string()),
            },
        }
    }
}

impl PodBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.pod.name = name.into();
        self
    }

    pub fn phase(mut self, phase: PodPhase) -> Self {
        self.pod.phase = phase;
        self
    }

    pub fn deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.pod.deletion_timestamp = Some(at);
        self
    }

    pub fn with_disposal_finalizer(mut self) -> Self {
        self.pod.finalizers.push(DISPOSAL_FINALIZER.to_string());
        self
    }

    pub fn failed_with(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        self.pod.phase = PodPhase::Failed;
        self.pod.reason = Some(reason.into());
        self.pod.message = Some(message.into());
        self
    }

    pub fn containers(mut self, containers: Vec<ContainerStatus>) -> Self {
        self.pod.container_statuses = containers;
        self
    }

    pub fn unscheduled(mut self) -> Self {
        self.pod.node_name = None;
        self.pod.host_ip = None;
        self.pod.pod_ip = None;
        self
    }

    pub fn build(self) -> PodSnapshot {
        self.pod
    }
}

impl PodSnapshot {
    pub fn builder() -> PodBuilder {
        PodBuilder::default()
    }
}

// ── Container factories ─────────────────────────────────────────────────

pub fn ready_container(name: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        ready: true,
        state: ContainerState::Running,
        last_termination: None,
    }
}

pub fn starting_container(name: &str) -> ContainerStatus {
    ContainerStatus { ready: false, ..ready_container(name) }
}

pub fn waiting_container(name: &str, reason: &str, message: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        ready: false,
        state: ContainerState::Waiting { reason: reason.to_string(), message: message.to_string() },
        last_termination: None,
    }
}

pub fn terminated_container(name: &str, exit_code: i32, reason: &str, message: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        ready: false,
        state: ContainerState::Terminated(Terminated {
            exit_code,
            reason: reason.to_string(),
            message: message.to_string(),
        }),
        last_termination: None,
    }
}
