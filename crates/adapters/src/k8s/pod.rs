// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversion from Kubernetes pods to [`PodSnapshot`].

use k8s_openapi::api::core::v1::{
    ContainerState as KubeContainerState, ContainerStatus as KubeContainerStatus, Pod,
};
use wsm_core::{ContainerState, ContainerStatus, PodPhase, PodSnapshot, Terminated};

/// Snapshot the fields of a pod the status reconciler looks at.
pub fn snapshot(pod: &Pod) -> PodSnapshot {
    let status = pod.status.as_ref();
    PodSnapshot {
        name: pod.metadata.name.clone().unwrap_or_default(),
        deletion_timestamp: pod.metadata.deletion_timestamp.as_ref().map(|t| t.0),
        finalizers: pod.metadata.finalizers.clone().unwrap_or_default(),
        phase: PodPhase::parse_lenient(status.and_then(|s| s.phase.as_deref())),
        reason: status.and_then(|s| non_empty(s.reason.as_deref())),
        message: status.and_then(|s| non_empty(s.message.as_deref())),
        container_statuses: status
            .and_then(|s| s.container_statuses.as_ref())
            .map(|cs| cs.iter().map(container_status).collect())
            .unwrap_or_default(),
        node_name: pod.spec.as_ref().and_then(|s| non_empty(s.node_name.as_deref())),
        host_ip: status.and_then(|s| non_empty(s.host_ip.as_deref())),
        pod_ip: status.and_then(|s| non_empty(s.pod_ip.as_deref())),
    }
}

fn container_status(cs: &KubeContainerStatus) -> ContainerStatus {
    ContainerStatus {
        name: cs.name.clone(),
        ready: cs.ready,
        state: cs.state.as_ref().map(container_state).unwrap_or_default(),
        last_termination: cs.last_state.as_ref().and_then(|s| s.terminated.as_ref()).map(|t| {
            Terminated {
                exit_code: t.exit_code,
                reason: t.reason.clone().unwrap_or_default(),
                message: t.message.clone().unwrap_or_default(),
            }
        }),
    }
}

fn container_state(state: &KubeContainerState) -> ContainerState {
    if let Some(t) = &state.terminated {
        return ContainerState::Terminated(Terminated {
            exit_code: t.exit_code,
            reason: t.reason.clone().unwrap_or_default(),
            message: t.message.clone().unwrap_or_default(),
        });
    }
    if let Some(w) = &state.waiting {
        return ContainerState::Waiting {
            reason: w.reason.clone().unwrap_or_default(),
            message: w.message.clone().unwrap_or_default(),
        };
    }
    if state.running.is_some() {
        return ContainerState::Running;
    }
    ContainerState::Absent
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "pod_tests.rs"]
mod tests;
