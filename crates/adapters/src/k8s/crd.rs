// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Workspace` custom resource.

use crate::store::StoreError;
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};
use wsm_core::{parse_duration, Workspace, WorkspaceId, WorkspaceStatus};

/// Desired state of a workspace, as authored by whoever created it.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "workspace.wsm.dev",
    version = "v1",
    kind = "Workspace",
    root = "WorkspaceResource",
    plural = "workspaces",
    shortname = "ws",
    namespaced,
    status = "WorkspaceStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResourceSpec {
    /// Headless workspaces run a job to completion without a user attached.
    #[serde(default)]
    pub headless: bool,
    /// Per-workspace inactivity timeout, e.g. `"45m"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl WorkspaceResource {
    /// Convert into the engine's view of a workspace.
    ///
    /// A resource without a creation timestamp has not been persisted and
    /// is rejected. An unparsable custom timeout is ignored with a warning,
    /// falling back to the configured default.
    pub fn to_workspace(&self) -> Result<Workspace, StoreError> {
        let name = self.name_any();
        let creation_timestamp = self
            .metadata
            .creation_timestamp
            .as_ref()
            .map(|t| t.0)
            .ok_or_else(|| StoreError::Invalid {
                name: name.clone(),
                reason: "missing creationTimestamp".to_string(),
            })?;

        let custom_timeout = match self.spec.timeout.as_deref() {
            None | Some("") => None,
            Some(raw) => match parse_duration(raw) {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::warn!(workspace = %name, timeout = raw, error = %e, "ignoring invalid custom timeout");
                    None
                }
            },
        };

        Ok(Workspace {
            id: WorkspaceId::new(name),
            resource_version: self.metadata.resource_version.clone(),
            headless: self.spec.headless,
            creation_timestamp,
            custom_timeout,
            status: self.status.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod tests;
