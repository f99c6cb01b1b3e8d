// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch streams that feed reconcile triggers.

use super::WorkspaceResource;
use futures_util::TryStreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::api::Api;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wsm_core::WorkspaceId;

/// Label tying a pod to the workspace it serves.
pub const WORKSPACE_ID_LABEL: &str = "workspace.wsm.dev/id";

/// Watch workspaces and their pods, sending the owning workspace id to every
/// sender on each change (including deletions).
///
/// The initial list of each watch replays every existing object, so all
/// workspaces get reconciled once at startup.
pub fn spawn_triggers(
    client: Client,
    namespace: &str,
    senders: Vec<mpsc::Sender<WorkspaceId>>,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let workspaces: Api<WorkspaceResource> = Api::namespaced(client.clone(), namespace);
    let pods: Api<Pod> = Api::namespaced(client, namespace);
    let pod_config = watcher::Config::default().labels(WORKSPACE_ID_LABEL);

    vec![
        tokio::spawn(forward(
            "workspace",
            workspaces,
            watcher::Config::default(),
            |ws: &WorkspaceResource| Some(WorkspaceId::new(ws.name_any())),
            senders.clone(),
            cancel.clone(),
        )),
        tokio::spawn(forward(
            "pod",
            pods,
            pod_config,
            |pod: &Pod| pod.labels().get(WORKSPACE_ID_LABEL).map(|id| WorkspaceId::new(id.as_str())),
            senders,
            cancel,
        )),
    ]
}

async fn forward<K, F>(
    kind: &'static str,
    api: Api<K>,
    config: watcher::Config,
    owner: F,
    senders: Vec<mpsc::Sender<WorkspaceId>>,
    cancel: CancellationToken,
) where
    K: Resource + Clone + DeserializeOwned + Debug + Send + 'static,
    F: Fn(&K) -> Option<WorkspaceId> + Send + 'static,
{
    let stream = watcher(api, config).default_backoff().touched_objects();
    tokio::pin!(stream);

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.try_next() => next,
        };
        match next {
            Ok(Some(obj)) => {
                let Some(id) = owner(&obj) else { continue };
                tracing::trace!(kind, workspace = %id, "watch trigger");
                for tx in &senders {
                    if tx.send(id.clone()).await.is_err() {
                        tracing::debug!(kind, "trigger receiver closed, stopping watch");
                        return;
                    }
                }
            }
            Ok(None) => {
                tracing::warn!(kind, "watch stream ended");
                break;
            }
            Err(e) => {
                tracing::warn!(kind, error = %e, "watch error");
            }
        }
    }
    tracing::debug!(kind, "watch stopped");
}
