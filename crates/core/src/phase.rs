// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace and pod lifecycle phases.

use serde::{Deserialize, Serialize};

/// Coarse lifecycle stage of a workspace.
///
/// A freshly created workspace has no phase at all (`Option::None` on
/// [`WorkspaceStatus`](crate::WorkspaceStatus)); the status reconciler moves
/// it to `Pending` on first sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkspacePhase {
    /// Waiting for the pod to be scheduled
    Pending,
    /// Pod scheduled, containers being created or images pulled
    Creating,
    /// Containers started, content/startup still in progress
    Initializing,
    /// At least one container is ready
    Running,
    /// Pod is being torn down; disposal (backup) may still be running
    Stopping,
    /// Terminal: the pod is gone or disposal finished
    Stopped,
    /// Observed pod state did not map onto any other phase
    Unknown,
}

crate::wire_enum! {
    WorkspacePhase {
        Pending => "Pending",
        Creating => "Creating",
        Initializing => "Initializing",
        Running => "Running",
        Stopping => "Stopping",
        Stopped => "Stopped",
        Unknown => "Unknown",
    }
}

impl WorkspacePhase {
    /// No reconciler acts on a terminal workspace.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkspacePhase::Stopped)
    }
}

/// Phase reported by the pod's own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

crate::wire_enum! {
    PodPhase {
        Pending => "Pending",
        Running => "Running",
        Succeeded => "Succeeded",
        Failed => "Failed",
        Unknown => "Unknown",
    }
}

impl PodPhase {
    /// Parse the pod's reported phase, degrading anything unrecognised
    /// (including a missing phase) to `Unknown`.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
