// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a reconciler: triggers in, bounded concurrent passes out.

use crate::error::ReconcileError;
use crate::scheduler::{Backoff, WorkQueue};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wsm_core::WorkspaceId;

/// What to do after a successful pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Wait for the next watch trigger.
    AwaitChange,
    /// Run again after the delay, even without a trigger.
    Requeue(Duration),
}

/// One read-compute-write pass over a single workspace.
#[async_trait]
pub trait Reconciler: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn reconcile(&self, id: &WorkspaceId) -> Result<Action, ReconcileError>;
}

/// Runner tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum passes in flight at once.
    pub workers: usize,
    /// Each pass is abandoned after this long.
    pub pass_deadline: Duration,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            pass_deadline: Duration::from_secs(5),
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_secs(300),
        }
    }
}

type PassResult = (WorkspaceId, Result<Action, ReconcileError>);

/// Runs one reconciler until cancelled.
///
/// Passes for the same workspace never overlap; passes for different
/// workspaces run concurrently up to `workers`. Not-found drops the key,
/// conflicts requeue immediately, other errors back off exponentially.
pub struct Runner<R> {
    reconciler: Arc<R>,
    config: RunnerConfig,
    queue: WorkQueue<WorkspaceId>,
    backoff: Backoff<WorkspaceId>,
}

impl<R: Reconciler> Runner<R> {
    pub fn new(reconciler: R, config: RunnerConfig) -> Self {
        let backoff = Backoff::new(config.backoff_base, config.backoff_max);
        Self { reconciler: Arc::new(reconciler), config, queue: WorkQueue::new(), backoff }
    }

    /// Process triggers until `cancel` fires, then wait for in-flight passes.
    ///
    /// Also returns once the trigger channel is closed and no work is left.
    pub async fn run(mut self, mut triggers: mpsc::Receiver<WorkspaceId>, cancel: CancellationToken) {
        let name = self.reconciler.name();
        let mut tasks: JoinSet<PassResult> = JoinSet::new();
        let mut triggers_open = true;
        tracing::info!(reconciler = name, workers = self.config.workers, "runner started");

        loop {
            self.dispatch(&mut tasks);

            let wake = if tasks.len() < self.config.workers { self.queue.next_deadline() } else { None };
            tokio::select! {
                _ = cancel.cancelled() => break,
                trigger = triggers.recv(), if triggers_open => match trigger {
                    Some(id) => self.queue.schedule(id, Instant::now()),
                    None => triggers_open = false,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok((id, result)) => self.settle(id, result),
                    Err(e) => tracing::error!(reconciler = name, error = %e, "reconcile task failed to join"),
                },
                _ = sleep_until(wake), if wake.is_some() => {}
            }

            if !triggers_open && tasks.is_empty() && self.queue.is_empty() {
                break;
            }
        }

        let draining = tasks.len();
        while let Some(joined) = tasks.join_next().await {
            if let Ok((id, result)) = joined {
                self.settle(id, result);
            }
        }
        tracing::info!(reconciler = name, drained = draining, "runner stopped");
    }

    fn dispatch(&mut self, tasks: &mut JoinSet<PassResult>) {
        let now = Instant::now();
        while tasks.len() < self.config.workers {
            let Some(id) = self.queue.pop_ready(now) else { break };
            let reconciler = Arc::clone(&self.reconciler);
            let deadline = self.config.pass_deadline;
            tasks.spawn(async move {
                let result = run_pass(reconciler, &id, deadline).await;
                (id, result)
            });
        }
    }

    fn settle(&mut self, id: WorkspaceId, result: Result<Action, ReconcileError>) {
        let name = self.reconciler.name();
        self.queue.complete(&id);
        match result {
            Ok(action) => {
                self.backoff.reset(&id);
                if let Action::Requeue(after) = action {
                    self.queue.schedule(id, Instant::now() + after);
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(reconciler = name, workspace = %id, "workspace gone");
                self.backoff.reset(&id);
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(reconciler = name, workspace = %id, "stale write, requeueing");
                self.queue.schedule(id, Instant::now());
            }
            Err(e) => {
                let delay = self.backoff.next_delay(id.clone());
                tracing::warn!(
                    reconciler = name,
                    workspace = %id,
                    error = %e,
                    retry_in = ?delay,
                    "reconcile failed"
                );
                self.queue.schedule(id, Instant::now() + delay);
            }
        }
    }
}

/// Run one pass on its own task so a panic or deadline only costs this pass.
async fn run_pass<R: Reconciler>(
    reconciler: Arc<R>,
    id: &WorkspaceId,
    deadline: Duration,
) -> Result<Action, ReconcileError> {
    let key = id.clone();
    let mut pass = tokio::spawn(async move { reconciler.reconcile(&key).await });
    match tokio::time::timeout(deadline, &mut pass).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ReconcileError::Aborted(e.to_string())),
        Err(_) => {
            pass.abort();
            Err(ReconcileError::DeadlineExceeded(deadline))
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
