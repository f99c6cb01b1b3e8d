// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: wire the store, the reconcilers and the watch
//! triggers together, then run until interrupted.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use wsm_adapters::{spawn_triggers, ActivityLookup, KubeWorkspaceStore, WorkspaceActivity, WorkspaceStore};
use wsm_core::{Clock, SystemClock, WorkspaceId};
use wsm_engine::{Runner, StatusReconciler, TimeoutReconciler};

use crate::config::Config;

/// Trigger channel depth per reconciler.
const TRIGGER_BUFFER: usize = 1024;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("kubernetes client error: {0}")]
    Kube(#[from] kube::Error),
}

/// Running reconciler tasks and the senders that trigger them.
pub struct Reconcilers {
    /// One sender per reconciler; every trigger must go to all of them.
    pub senders: Vec<mpsc::Sender<WorkspaceId>>,
    handles: Vec<JoinHandle<()>>,
}

impl Reconcilers {
    /// Send `id` to every reconciler.
    pub async fn trigger(&self, id: &WorkspaceId) {
        for tx in &self.senders {
            if tx.send(id.clone()).await.is_err() {
                warn!(workspace = %id, "reconciler stopped; trigger dropped");
            }
        }
    }

    /// Hand the senders to the caller, keeping the task handles.
    pub fn take_senders(&mut self) -> Vec<mpsc::Sender<WorkspaceId>> {
        std::mem::take(&mut self.senders)
    }

    /// Wait for every reconciler task to finish.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "reconciler task failed");
            }
        }
    }
}

/// Spawn the status and timeout reconcilers on a shared store.
pub fn spawn_reconcilers<S, A, C>(
    store: S,
    activity: A,
    clock: C,
    config: &Config,
    cancel: &CancellationToken,
) -> Reconcilers
where
    S: WorkspaceStore,
    A: ActivityLookup,
    C: Clock,
{
    let (status_tx, status_rx) = mpsc::channel(TRIGGER_BUFFER);
    let (timeout_tx, timeout_rx) = mpsc::channel(TRIGGER_BUFFER);

    let status = Runner::new(StatusReconciler::new(store.clone(), clock.clone()), config.runner());
    let timeout = Runner::new(
        TimeoutReconciler::new(store, activity, clock, config.timeouts.clone()),
        config.runner(),
    );

    let handles = vec![
        tokio::spawn(status.run(status_rx, cancel.clone())),
        tokio::spawn(timeout.run(timeout_rx, cancel.clone())),
    ];
    Reconcilers { senders: vec![status_tx, timeout_tx], handles }
}

/// Run the daemon against the cluster from the ambient kubeconfig until
/// Ctrl-C.
///
/// `activity` is the heartbeat table the timeout reconciler consults; whoever
/// receives heartbeats records into a clone of it. Workspaces with no
/// recorded heartbeat fall back to their `UserActivity` condition.
pub async fn run(config: Config, activity: WorkspaceActivity) -> Result<(), LifecycleError> {
    let client = kube::Client::try_default().await?;
    let store = KubeWorkspaceStore::new(client.clone(), config.namespace.clone());
    let cancel = CancellationToken::new();

    info!(
        namespace = %config.namespace,
        workers = config.workers,
        heartbeat_interval = ?config.timeouts.heartbeat_interval,
        "starting workspace lifecycle daemon"
    );

    let mut reconcilers = spawn_reconcilers(store, activity, SystemClock, &config, &cancel);
    let watches =
        spawn_triggers(client, &config.namespace, reconcilers.take_senders(), cancel.clone());

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => warn!(error = %e, "failed to listen for interrupt, shutting down"),
    }
    cancel.cancel();

    for watch in watches {
        if let Err(e) = watch.await {
            warn!(error = %e, "watch task failed");
        }
    }
    reconcilers.join().await;
    info!("daemon stopped");
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
