// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciled workspace record.
//!
//! A [`Workspace`] is a plain snapshot of the cluster object: identity and
//! immutable spec fields, plus the [`WorkspaceStatus`] that the reconcilers
//! own. Reconcilers never mutate a `Workspace` in place; they compute a new
//! status and the store adapter writes it back conditionally on
//! `resource_version`.

use crate::condition::{ConditionSet, ConditionType};
use crate::phase::WorkspacePhase;
use crate::pod::PodSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::time::Duration;

/// Unique, immutable identifier of a workspace (the object name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub SmolStr);

impl WorkspaceId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WorkspaceId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: WorkspaceId,
    /// Version of the stored object this snapshot was read at; status writes
    /// are conditional on it.
    pub resource_version: Option<String>,
    /// Headless workspaces run a bounded job and follow their own timeout
    /// and terminal policy.
    pub headless: bool,
    pub creation_timestamp: DateTime<Utc>,
    /// Inactivity timeout override supplied at creation.
    pub custom_timeout: Option<Duration>,
    pub status: WorkspaceStatus,
}

impl Workspace {
    pub fn phase(&self) -> Option<WorkspacePhase> {
        self.status.phase
    }

    /// Closed by an external actor (e.g. the user closed the editor).
    pub fn is_closed(&self) -> bool {
        self.status.conditions.is_true(&ConditionType::Closed)
    }

    /// Transition time of the `UserActivity` condition, if any.
    pub fn user_activity(&self) -> Option<DateTime<Utc>> {
        self.status.conditions.get(&ConditionType::UserActivity).map(|c| c.last_transition_time)
    }

    /// Copy of this workspace carrying a different status.
    pub fn with_status(&self, status: WorkspaceStatus) -> Self {
        Self { status, ..self.clone() }
    }
}

/// The part of a workspace the reconcilers are allowed to write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    /// `None` until the status reconciler first sees the workspace.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "phase_or_empty"
    )]
    pub phase: Option<WorkspacePhase>,
    #[serde(default)]
    pub conditions: ConditionSet,
    #[serde(default, skip_serializing_if = "WorkspaceRuntime::is_empty")]
    pub runtime: WorkspaceRuntime,
}

/// Where the workspace pod runs. Each field is filled in once and then kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRuntime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
}

impl WorkspaceRuntime {
    pub fn is_empty(&self) -> bool {
        self.node_name.is_none()
            && self.host_ip.is_none()
            && self.pod_ip.is_none()
            && self.pod_name.is_none()
    }

    /// Fill unset fields from the pod (first write wins). Returns `true` if
    /// anything changed.
    pub fn fill_from(&mut self, pod: &PodSnapshot) -> bool {
        let mut changed = false;
        changed |= fill(&mut self.node_name, pod.node_name.as_deref());
        changed |= fill(&mut self.host_ip, pod.host_ip.as_deref());
        changed |= fill(&mut self.pod_ip, pod.pod_ip.as_deref());
        changed |= fill(&mut self.pod_name, Some(pod.name.as_str()));
        changed
    }
}

fn fill(slot: &mut Option<String>, value: Option<&str>) -> bool {
    match (slot.as_ref(), value) {
        (None, Some(v)) if !v.is_empty() => {
            *slot = Some(v.to_string());
            true
        }
        _ => false,
    }
}

/// Older writers store an unset phase as `""`.
fn phase_or_empty<'de, D>(deserializer: D) -> Result<Option<WorkspacePhase>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|other| {
            serde::de::Error::custom(format!("unknown workspace phase: {other}"))
        }),
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
