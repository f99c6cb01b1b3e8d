// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout reconciler: latches `Timeout=True` once a workspace runs out of time.

use crate::error::ReconcileError;
use crate::runner::{Action, Reconciler};
use crate::timeout::{is_timed_out, TimeoutInputs, TimeoutReason};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use wsm_adapters::{ActivityLookup, StoreError, WorkspaceStore};
use wsm_core::{
    Clock, Condition, ConditionType, PodSnapshot, TimeoutConfig, Workspace, WorkspaceId,
    WorkspacePhase, WorkspaceStatus,
};

/// Result of evaluating one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutPass {
    /// Status to write, when a timeout was newly detected.
    pub status: Option<WorkspaceStatus>,
    pub reason: Option<TimeoutReason>,
    /// When to look again.
    pub requeue_after: Duration,
}

/// Evaluate `ws` against the policy. Pure.
///
/// Terminal workspaces and ones already timed out are left alone, but the
/// next check is still scheduled.
pub fn evaluate(
    ws: &Workspace,
    pods: &[PodSnapshot],
    last_activity: Option<DateTime<Utc>>,
    cfg: &TimeoutConfig,
    now: DateTime<Utc>,
) -> TimeoutPass {
    let requeue_after = cfg.reconcile_interval();
    let settled = ws.phase().is_some_and(|p| p.is_terminal())
        || ws.status.conditions.is_true(&ConditionType::Timeout);
    if settled {
        return TimeoutPass { status: None, reason: None, requeue_after };
    }

    let inputs = TimeoutInputs { pod: pods.first(), last_activity, now };
    let Some(reason) = is_timed_out(ws, inputs, cfg) else {
        return TimeoutPass { status: None, reason: None, requeue_after };
    };

    let mut status = ws.status.clone();
    let changed = status
        .conditions
        .upsert(Condition::truthy(ConditionType::Timeout, now).with_message(reason.to_string()));
    TimeoutPass { status: changed.then_some(status), reason: Some(reason), requeue_after }
}

/// Periodically checks every workspace against the timeout policy.
#[derive(Clone)]
pub struct TimeoutReconciler<S, A, C> {
    store: S,
    activity: A,
    clock: C,
    config: TimeoutConfig,
}

impl<S: WorkspaceStore, A: ActivityLookup, C: Clock> TimeoutReconciler<S, A, C> {
    pub fn new(store: S, activity: A, clock: C, config: TimeoutConfig) -> Self {
        Self { store, activity, clock, config }
    }

    pub async fn reconcile(&self, id: &WorkspaceId) -> Result<Action, ReconcileError> {
        let ws = match self.store.get(id).await {
            Ok(ws) => ws,
            // Deleted; no further notification will come for it.
            Err(StoreError::NotFound(_)) => return Ok(Action::AwaitChange),
            Err(e) => return Err(e.into()),
        };

        // Only the stopping branch of the policy looks at the pod
        let pods = if ws.phase() == Some(WorkspacePhase::Stopping) {
            self.store.list_pods(id).await?
        } else {
            Vec::new()
        };

        let pass = evaluate(
            &ws,
            &pods,
            self.activity.last_activity(id),
            &self.config,
            self.clock.now(),
        );
        if let (Some(status), Some(reason)) = (pass.status, &pass.reason) {
            tracing::info!(
                workspace = %id,
                reason = %reason,
                custom_timeout = ?ws.custom_timeout,
                "workspace timed out"
            );
            self.store.update_status(&ws.with_status(status)).await?;
        }
        Ok(Action::Requeue(pass.requeue_after))
    }
}

#[async_trait]
impl<S: WorkspaceStore, A: ActivityLookup, C: Clock> Reconciler for TimeoutReconciler<S, A, C> {
    fn name(&self) -> &'static str {
        "timeout"
    }

    async fn reconcile(&self, id: &WorkspaceId) -> Result<Action, ReconcileError> {
        TimeoutReconciler::reconcile(self, id).await
    }
}

#[cfg(test)]
#[path = "timeout_reconciler_tests.rs"]
mod tests;
