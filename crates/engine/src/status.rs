// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status reconciler: derive a workspace's phase and conditions from its pod.

use crate::error::ReconcileError;
use crate::failure::{extract_failure, Failure};
use crate::runner::{Action, Reconciler};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wsm_adapters::{StoreError, WorkspaceStore};
use wsm_core::{
    Clock, Condition, ConditionStatus, ConditionType, PodPhase, PodSnapshot, Workspace,
    WorkspaceId, WorkspacePhase, WorkspaceStatus,
};

/// Message of the `Failed` condition raised when a workspace matches more than one pod.
pub const MULTIPLE_PODS_MESSAGE: &str = "multiple pods exists - this should never happen";

const CREATING_REASONS: [&str; 3] = ["ContainerCreating", "ImagePullBackOff", "ErrImagePull"];

/// One guarded row of the phase table.
struct PhaseRule {
    name: &'static str,
    decide: fn(&Workspace, &PodSnapshot) -> Option<WorkspacePhase>,
}

/// Evaluated top to bottom; the first rule that answers wins. When none
/// does (including a pod in phase `Unknown`), the phase is `Unknown`.
const PHASE_RULES: [PhaseRule; 4] = [
    PhaseRule { name: "deleting", decide: deleting },
    PhaseRule { name: "pod-pending", decide: pod_pending },
    PhaseRule { name: "pod-running", decide: pod_running },
    PhaseRule { name: "headless-finished", decide: headless_finished },
];

fn deleting(ws: &Workspace, pod: &PodSnapshot) -> Option<WorkspacePhase> {
    if !pod.is_being_deleted() {
        return None;
    }
    // Pods only get the disposal finalizer once running; without it there
    // is nothing left to wait for.
    if !pod.has_disposal_finalizer() {
        return Some(WorkspacePhase::Stopped);
    }
    let conditions = &ws.status.conditions;
    let disposed = conditions.is_true(&ConditionType::BackupComplete)
        || conditions.is_true(&ConditionType::BackupFailure)
        || conditions.has_status_with_reason(
            &ConditionType::ContentReady,
            ConditionStatus::False,
            "InitializationFailure",
        );
    Some(if disposed { WorkspacePhase::Stopped } else { WorkspacePhase::Stopping })
}

fn pod_pending(_: &Workspace, pod: &PodSnapshot) -> Option<WorkspacePhase> {
    if pod.phase != PodPhase::Pending {
        return None;
    }
    let creating = pod
        .container_statuses
        .iter()
        .filter_map(|cs| cs.waiting_reason())
        .any(|reason| CREATING_REASONS.contains(&reason));
    Some(if creating { WorkspacePhase::Creating } else { WorkspacePhase::Pending })
}

fn pod_running(_: &Workspace, pod: &PodSnapshot) -> Option<WorkspacePhase> {
    if pod.phase != PodPhase::Running {
        return None;
    }
    let ready = pod.container_statuses.iter().any(|cs| cs.ready);
    Some(if ready { WorkspacePhase::Running } else { WorkspacePhase::Initializing })
}

fn headless_finished(ws: &Workspace, pod: &PodSnapshot) -> Option<WorkspacePhase> {
    let finished = matches!(pod.phase, PodPhase::Succeeded | PodPhase::Failed);
    (ws.headless && finished).then_some(WorkspacePhase::Stopping)
}

/// Outcome of the phase table for a single pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDecision {
    pub phase: WorkspacePhase,
    /// Name of the rule that matched, `None` for the fallback.
    pub rule: Option<&'static str>,
    pub failure: Option<Failure>,
}

/// Run the phase table and failure extraction over one pod.
pub fn decide_phase(ws: &Workspace, pod: &PodSnapshot) -> PhaseDecision {
    let failure = extract_failure(ws, pod);
    for rule in &PHASE_RULES {
        if let Some(phase) = (rule.decide)(ws, pod) {
            return PhaseDecision { phase, rule: Some(rule.name), failure };
        }
    }
    PhaseDecision { phase: WorkspacePhase::Unknown, rule: None, failure }
}

/// Compute the next status of `ws` given the pods matching it.
///
/// Pure: the caller compares the result against `ws.status` and writes only
/// on change.
pub fn update_status(ws: &Workspace, pods: &[PodSnapshot], now: DateTime<Utc>) -> WorkspaceStatus {
    let mut status = ws.status.clone();
    match pods {
        [] => {
            status.phase = match status.phase {
                None | Some(WorkspacePhase::Pending) => Some(WorkspacePhase::Pending),
                Some(_) => Some(WorkspacePhase::Stopped),
            };
        }
        [pod] => {
            status.conditions.upsert(Condition::truthy(ConditionType::Deployed, now));
            status.runtime.fill_from(pod);

            let decision = decide_phase(ws, pod);
            if let Some(failure) = decision.failure {
                status.conditions.upsert(
                    Condition::truthy(ConditionType::Failed, now).with_message(failure.message),
                );
            }
            status.phase = Some(decision.phase);
        }
        _ => {
            status.conditions.upsert(
                Condition::truthy(ConditionType::Failed, now).with_message(MULTIPLE_PODS_MESSAGE),
            );
        }
    }
    status
}

/// Keeps a workspace's phase, conditions and runtime in step with its pod.
#[derive(Clone)]
pub struct StatusReconciler<S, C> {
    store: S,
    clock: C,
}

impl<S: WorkspaceStore, C: Clock> StatusReconciler<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// One read-compute-write pass.
    pub async fn reconcile(&self, id: &WorkspaceId) -> Result<Action, ReconcileError> {
        let ws = match self.store.get(id).await {
            Ok(ws) => ws,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(workspace = %id, "workspace gone, nothing to reconcile");
                return Ok(Action::AwaitChange);
            }
            Err(e) => return Err(e.into()),
        };
        let pods = self.store.list_pods(id).await?;

        let status = update_status(&ws, &pods, self.clock.now());
        if status == ws.status {
            tracing::debug!(workspace = %id, pods = pods.len(), "status unchanged");
            return Ok(Action::AwaitChange);
        }

        if status.phase != ws.status.phase {
            tracing::info!(
                workspace = %id,
                from = ?ws.status.phase,
                to = ?status.phase,
                "workspace phase changed"
            );
        }
        if let Some(failed) = newly_true(&ws.status, &status, &ConditionType::Failed) {
            tracing::info!(workspace = %id, reason = %failed.message, "workspace failed");
        }

        self.store.update_status(&ws.with_status(status)).await?;
        Ok(Action::AwaitChange)
    }
}

fn newly_true<'a>(
    before: &WorkspaceStatus,
    after: &'a WorkspaceStatus,
    ty: &ConditionType,
) -> Option<&'a Condition> {
    if before.conditions.is_true(ty) {
        return None;
    }
    after.conditions.get(ty).filter(|c| c.is_true())
}

#[async_trait]
impl<S: WorkspaceStore, C: Clock> Reconciler for StatusReconciler<S, C> {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn reconcile(&self, id: &WorkspaceId) -> Result<Action, ReconcileError> {
        StatusReconciler::reconcile(self, id).await
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
