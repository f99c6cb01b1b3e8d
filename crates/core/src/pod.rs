// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only snapshot of the pod backing a workspace.
//!
//! Only the fields the reconcilers look at are carried over from the cluster
//! object; see `wsm_adapters::kube::pod` for the conversion.

use crate::phase::PodPhase;
use chrono::{DateTime, Utc};

/// Finalizer placed on a workspace pod once it is running. Its presence means
/// disposal (backup) must finish before the pod may go away.
pub const DISPOSAL_FINALIZER: &str = "workspace.wsm.dev/disposal";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodSnapshot {
    pub name: String,
    pub deletion_timestamp: Option<DateTime<Utc>>,
    pub finalizers: Vec<String>,
    pub phase: PodPhase,
    /// Pod-level failure reason (e.g. `Evicted`)
    pub reason: Option<String>,
    pub message: Option<String>,
    pub container_statuses: Vec<ContainerStatus>,
    pub node_name: Option<String>,
    pub host_ip: Option<String>,
    pub pod_ip: Option<String>,
}

impl PodSnapshot {
    pub fn is_being_deleted(&self) -> bool {
        self.deletion_timestamp.is_some()
    }

    pub fn has_disposal_finalizer(&self) -> bool {
        self.finalizers.iter().any(|f| f == DISPOSAL_FINALIZER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStatus {
    pub name: String,
    pub ready: bool,
    pub state: ContainerState,
    /// Termination recorded for the previous run of this container
    pub last_termination: Option<Terminated>,
}

impl ContainerStatus {
    /// The reason the container is waiting, if it is waiting.
    pub fn waiting_reason(&self) -> Option<&str> {
        match &self.state {
            ContainerState::Waiting { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Current termination, falling back to the last recorded one.
    pub fn termination(&self) -> Option<&Terminated> {
        match &self.state {
            ContainerState::Terminated(t) => Some(t),
            _ => self.last_termination.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContainerState {
    /// The runtime reported no state yet
    #[default]
    Absent,
    Waiting {
        reason: String,
        message: String,
    },
    Running,
    Terminated(Terminated),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terminated {
    pub exit_code: i32,
    pub reason: String,
    /// Termination message; for workspace containers this is the tail of the
    /// container log.
    pub message: String,
}

#[cfg(test)]
#[path = "pod_tests.rs"]
mod tests;
