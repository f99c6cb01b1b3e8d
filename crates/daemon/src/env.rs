// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

/// Path to the TOML config file.
pub const CONFIG: &str = "WSM_CONFIG";
/// Namespace holding workspaces and their pods.
pub const NAMESPACE: &str = "WSM_NAMESPACE";
/// Worker-pool bound per reconciler.
pub const WORKERS: &str = "WSM_WORKERS";
/// Heartbeat interval, e.g. `"30s"`.
pub const HEARTBEAT_INTERVAL: &str = "WSM_HEARTBEAT_INTERVAL";
/// Per-pass deadline in milliseconds.
pub const PASS_DEADLINE_MS: &str = "WSM_PASS_DEADLINE_MS";
/// Directory for daily-rolling log files; stderr when unset.
pub const LOG_DIR: &str = "WSM_LOG_DIR";

/// Read a variable, treating empty values as unset.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

pub fn config_path() -> Option<PathBuf> {
    var(CONFIG).map(PathBuf::from)
}

pub fn log_dir() -> Option<PathBuf> {
    var(LOG_DIR).map(PathBuf::from)
}
