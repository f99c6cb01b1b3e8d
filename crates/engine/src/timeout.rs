// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout policy.
//!
//! A pure function of the workspace's phase, its timestamps, the pod's
//! deletion time and the configured limits. It never touches conditions;
//! [`crate::TimeoutReconciler`] decides what to do with the answer.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use wsm_core::clock::elapsed_since;
use wsm_core::{
    format_hours_minutes, ConditionType, PodSnapshot, TimeoutConfig, Workspace, WorkspacePhase,
};

/// What the workspace was doing when it ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Initialization,
    Startup,
    CreatingContainers,
    RunningHeadless,
    Inactivity,
    MaxLifetime,
    Closed,
    Stopping,
    Backup,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Initialization => "initialization",
            Activity::Startup => "startup",
            Activity::CreatingContainers => "creating containers",
            Activity::RunningHeadless => "running the headless workspace",
            Activity::Inactivity => "period of inactivity",
            Activity::MaxLifetime => "maximum lifetime",
            Activity::Closed => "after being closed",
            Activity::Stopping => "stopping",
            Activity::Backup => "backup",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A limit that was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutReason {
    pub activity: Activity,
    pub elapsed: Duration,
    pub limit: Duration,
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "workspace timed out after {} ({}) took longer than {}",
            self.activity,
            format_hours_minutes(self.elapsed),
            format_hours_minutes(self.limit)
        )
    }
}

/// Inputs besides the workspace itself.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutInputs<'a> {
    /// The workspace's pod, if one exists.
    pub pod: Option<&'a PodSnapshot>,
    /// Last activity reported by the heartbeat service.
    pub last_activity: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

/// Last time the workspace was seen active: the later of the heartbeat
/// lookup and the `UserActivity` condition.
pub fn last_activity(ws: &Workspace, reported: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (reported, ws.user_activity()) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Decide whether `ws` has timed out.
pub fn is_timed_out(
    ws: &Workspace,
    inputs: TimeoutInputs<'_>,
    cfg: &TimeoutConfig,
) -> Option<TimeoutReason> {
    let now = inputs.now;
    let created = ws.creation_timestamp;
    let check = |since: DateTime<Utc>, limit: Duration, activity: Activity| {
        let elapsed = elapsed_since(since, now);
        (elapsed >= limit).then_some(TimeoutReason { activity, elapsed, limit })
    };

    match ws.phase()? {
        WorkspacePhase::Pending => check(created, cfg.initialization, Activity::Initialization),
        WorkspacePhase::Initializing => check(created, cfg.total_startup, Activity::Startup),
        WorkspacePhase::Creating => check(created, cfg.total_startup, Activity::CreatingContainers),
        WorkspacePhase::Running => {
            if let Some(reason) = check(created, cfg.max_lifetime, Activity::MaxLifetime) {
                return Some(reason);
            }
            if ws.headless {
                return check(created, cfg.headless_workspace, Activity::RunningHeadless);
            }
            let Some(active_at) = last_activity(ws, inputs.last_activity) else {
                return check(created, cfg.total_startup, Activity::Startup);
            };
            if ws.is_closed() {
                return check(active_at, cfg.after_close, Activity::Closed);
            }
            let limit = ws.custom_timeout.unwrap_or(cfg.regular_workspace);
            check(active_at, limit, Activity::Inactivity)
        }
        WorkspacePhase::Stopping => {
            let deleted_at = inputs.pod.and_then(|p| p.deletion_timestamp)?;
            if ws.status.conditions.is_true(&ConditionType::BackupComplete) {
                check(deleted_at, cfg.content_finalization, Activity::Backup)
            } else {
                check(deleted_at, cfg.stopping, Activity::Stopping)
            }
        }
        WorkspacePhase::Stopped | WorkspacePhase::Unknown => None,
    }
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
