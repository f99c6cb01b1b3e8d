// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Built-in defaults, overlaid by an optional TOML file, overlaid by
//! environment variables (see [`crate::env`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use wsm_core::time_fmt::serde_duration;
use wsm_core::{parse_duration, TimeoutConfig};
use wsm_engine::RunnerConfig;

use crate::env;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("invalid {var}={value:?}: {reason}")]
    Env { var: &'static str, value: String, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Retry backoff for failed reconcile passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackoffConfig {
    #[serde(with = "serde_duration")]
    pub base: Duration,
    #[serde(with = "serde_duration")]
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self { base: Duration::from_millis(500), max: Duration::from_secs(300) }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Namespace watched for workspaces and pods
    pub namespace: String,
    /// Concurrent passes per reconciler
    pub workers: usize,
    /// Deadline for a single reconcile pass
    #[serde(with = "serde_duration")]
    pub pass_deadline: Duration,
    pub backoff: BackoffConfig,
    pub timeouts: TimeoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            workers: 4,
            pass_deadline: Duration::from_secs(5),
            backoff: BackoffConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Config {
    /// Load from `WSM_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(env::var)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Overlay environment overrides, read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(ns) = lookup(env::NAMESPACE) {
            self.namespace = ns;
        }
        if let Some(raw) = lookup(env::WORKERS) {
            self.workers = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: env::WORKERS,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(raw) = lookup(env::HEARTBEAT_INTERVAL) {
            self.timeouts.heartbeat_interval =
                parse_duration(&raw).map_err(|e| ConfigError::Env {
                    var: env::HEARTBEAT_INTERVAL,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }
        if let Some(raw) = lookup(env::PASS_DEADLINE_MS) {
            let ms: u64 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: env::PASS_DEADLINE_MS,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            self.pass_deadline = Duration::from_millis(ms);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".to_string()));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.pass_deadline.is_zero() {
            return Err(ConfigError::Invalid("pass_deadline must be positive".to_string()));
        }
        if self.timeouts.heartbeat_interval.is_zero() {
            return Err(ConfigError::Invalid("heartbeat_interval must be positive".to_string()));
        }
        if self.backoff.base.is_zero() || self.backoff.base > self.backoff.max {
            return Err(ConfigError::Invalid(
                "backoff.base must be positive and not exceed backoff.max".to_string(),
            ));
        }
        Ok(())
    }

    /// Runner settings shared by both reconcilers.
    pub fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            workers: self.workers,
            pass_deadline: self.pass_deadline,
            backoff_base: self.backoff.base,
            backoff_max: self.backoff.max,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
