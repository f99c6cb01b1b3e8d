// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-stage timeout durations.

use crate::time_fmt::serde_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// How long a workspace may stay in each lifecycle stage.
///
/// Deserialises from human strings (`initialization = "30m"`); missing keys
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// `Pending`, measured from creation
    #[serde(with = "serde_duration")]
    pub initialization: Duration,
    /// `Creating`/`Initializing`, and `Running` without any activity yet
    #[serde(with = "serde_duration")]
    pub total_startup: Duration,
    /// Inactivity limit for interactive workspaces
    #[serde(with = "serde_duration")]
    pub regular_workspace: Duration,
    /// Run limit for headless workspaces, measured from creation
    #[serde(with = "serde_duration")]
    pub headless_workspace: Duration,
    /// Hard cap on any running workspace, regardless of activity
    #[serde(with = "serde_duration")]
    pub max_lifetime: Duration,
    /// Grace period after the user closed the workspace
    #[serde(with = "serde_duration")]
    pub after_close: Duration,
    /// `Stopping` with the pod deleted but no backup outcome yet
    #[serde(with = "serde_duration")]
    pub stopping: Duration,
    /// `Stopping` after the backup completed
    #[serde(with = "serde_duration")]
    pub content_finalization: Duration,
    /// Period of the activity heartbeat
    #[serde(with = "serde_duration")]
    pub heartbeat_interval: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            initialization: Duration::from_secs(30 * MINUTE),
            total_startup: Duration::from_secs(HOUR),
            regular_workspace: Duration::from_secs(30 * MINUTE),
            headless_workspace: Duration::from_secs(HOUR),
            max_lifetime: Duration::from_secs(36 * HOUR),
            after_close: Duration::from_secs(2 * MINUTE),
            stopping: Duration::from_secs(HOUR),
            content_finalization: Duration::from_secs(HOUR),
            heartbeat_interval: Duration::from_secs(30),
        }
    }
}

impl TimeoutConfig {
    /// Timeout checks sample at twice the heartbeat frequency, so a timed-out
    /// workspace is noticed within half a heartbeat period.
    pub fn reconcile_interval(&self) -> Duration {
        self.heartbeat_interval / 2
    }
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
