// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes workspace store.
//!
//! # Module layout
//!
//! - [`crd`]: the `Workspace` custom resource and its conversion
//! - [`pod`]: `Pod` → [`PodSnapshot`] conversion
//! - [`watch`]: watch streams that turn object changes into reconcile triggers
//!
//! Workspaces are namespaced custom resources named after their id. Pods are
//! matched to a workspace by the [`WORKSPACE_ID_LABEL`] label. Status writes
//! go through the status subresource as a merge patch carrying
//! `metadata.resourceVersion`, so the API server rejects stale writes with 409.

mod crd;
mod pod;
mod watch;

pub use crd::{WorkspaceResource, WorkspaceResourceSpec};
pub use pod::snapshot;
pub use watch::{spawn_triggers, WORKSPACE_ID_LABEL};

use crate::store::{StoreError, WorkspaceStore};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::Client;
use wsm_core::{PodSnapshot, Workspace, WorkspaceId};

/// [`WorkspaceStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeWorkspaceStore {
    client: Client,
    namespace: String,
}

impl KubeWorkspaceStore {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self { client, namespace: namespace.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn workspaces(&self) -> Api<WorkspaceResource> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait]
impl WorkspaceStore for KubeWorkspaceStore {
    async fn get(&self, id: &WorkspaceId) -> Result<Workspace, StoreError> {
        let resource = self.workspaces().get(id.as_str()).await.map_err(|e| map_error(id, e))?;
        resource.to_workspace()
    }

    async fn list_pods(&self, id: &WorkspaceId) -> Result<Vec<PodSnapshot>, StoreError> {
        let lp = ListParams::default().labels(&format!("{}={}", WORKSPACE_ID_LABEL, id));
        let pods = self.pods().list(&lp).await.map_err(|e| map_error(id, e))?;
        Ok(pods.items.iter().map(snapshot).collect())
    }

    async fn update_status(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
        let id = &workspace.id;
        let patch = serde_json::json!({
            "metadata": { "resourceVersion": workspace.resource_version },
            "status": workspace.status,
        });
        let updated = self
            .workspaces()
            .patch_status(id.as_str(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_error(id, e))?;
        tracing::debug!(
            workspace = %id,
            resource_version = ?updated.metadata.resource_version,
            "status patched"
        );
        updated.to_workspace()
    }
}

fn map_error(id: &WorkspaceId, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(id.to_string()),
        kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(id.to_string()),
        other => StoreError::Api(other.to_string()),
    }
}
