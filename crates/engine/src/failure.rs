// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure extraction from pod and container state.
//!
//! Produces the text that ends up in a workspace's sticky `Failed` condition,
//! plus the phase the failure points at. The phase is informational: the
//! status reconciler's rule table alone decides the reported phase.

use serde::Deserialize;
use wsm_core::{ContainerState, PodPhase, PodSnapshot, Workspace, WorkspacePhase};

/// Exit code of a container killed by SIGKILL (OOM, eviction, grace period).
pub const KILLED_EXIT_CODE: i32 = 137;

/// Exit code the runtime reports when it could not determine one.
pub const UNKNOWN_EXIT_CODE: i32 = 255;

const IMAGE_PULL_REASONS: [&str; 2] = ["ImagePullBackOff", "ErrImagePull"];

/// A failure found on a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// Phase the failure is associated with, if any.
    pub phase: Option<WorkspacePhase>,
}

impl Failure {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), phase: None }
    }

    fn forcing(message: impl Into<String>, phase: WorkspacePhase) -> Self {
        Self { message: message.into(), phase: Some(phase) }
    }
}

/// Inspect a pod for a failure worth reporting.
///
/// Checks, in order: a failed pod with a reason or message, then each
/// container in turn for image-pull trouble or an unexpected termination.
/// The first hit wins. A headless workspace container that completed ends
/// the scan with no failure.
pub fn extract_failure(ws: &Workspace, pod: &PodSnapshot) -> Option<Failure> {
    if pod.phase == PodPhase::Failed && (pod.reason.is_some() || pod.message.is_some()) {
        let reason = pod.reason.as_deref().unwrap_or_default();
        let message = pod.message.as_deref().unwrap_or_default();
        return Some(Failure::new(format!("{reason}: {message}")));
    }

    let deleted = pod.is_being_deleted();
    for cs in &pod.container_statuses {
        if let Some(reason) = cs.waiting_reason() {
            if IMAGE_PULL_REASONS.contains(&reason) {
                let message = match &cs.state {
                    ContainerState::Waiting { message, .. } => message.as_str(),
                    _ => "",
                };
                let text = format!("cannot pull image: {message}");
                return Some(if deleted {
                    Failure::new(text)
                } else {
                    Failure::forcing(text, WorkspacePhase::Creating)
                });
            }
        }

        let Some(term) = cs.termination() else { continue };

        if term.exit_code != 0 && !term.message.is_empty() {
            let text = failure_from_logs(term.message.as_bytes());
            return Some(if deleted {
                Failure::new(text)
            } else {
                Failure::forcing(text, WorkspacePhase::Running)
            });
        }

        if deleted {
            continue;
        }

        match term.reason.as_str() {
            "Error" if term.exit_code != KILLED_EXIT_CODE => {
                return Some(Failure::forcing(
                    format!("container {} ran with an error: exit code {}", cs.name, term.exit_code),
                    WorkspacePhase::Running,
                ));
            }
            "Completed" if !ws.headless => {
                return Some(Failure::new(format!(
                    "container {} completed; containers of a workspace pod are not supposed to do that",
                    cs.name
                )));
            }
            "Completed" => return None,
            _ if term.exit_code != KILLED_EXIT_CODE && term.exit_code != UNKNOWN_EXIT_CODE => {
                return Some(Failure::forcing(
                    format!(
                        "workspace container {} terminated for an unknown reason: ({}) {}",
                        cs.name, term.reason, term.message
                    ),
                    WorkspacePhase::Unknown,
                ));
            }
            _ => {}
        }
    }

    None
}

#[derive(Deserialize)]
struct LogRecord {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Pull a failure message out of the trailing output of a container.
///
/// Scans lines from the end for the last JSON record with a non-empty
/// `message`, rendered as `message: error` (or just `message`). Falls back
/// to the raw text when no line qualifies.
pub fn failure_from_logs(tail: &[u8]) -> String {
    let text = String::from_utf8_lossy(tail);
    for line in text.lines().rev() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<LogRecord>(line) else { continue };
        if record.message.is_empty() {
            continue;
        }
        if record.error.is_empty() {
            return record.message;
        }
        return format!("{}: {}", record.message, record.error);
    }
    text.into_owned()
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
