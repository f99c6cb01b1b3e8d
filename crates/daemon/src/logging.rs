// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, registry, EnvFilter};

const LOG_FILE: &str = "wsmd.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log dir {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Filter from `RUST_LOG`, defaulting to `info` with noisy client crates
/// turned down.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,kube_client=warn,kube_runtime=warn,hyper=warn,tower=warn")
    })
}

/// Install the global subscriber.
///
/// With `log_dir`, events go to a daily-rolling file through a
/// non-blocking writer; the returned guard must live until shutdown or
/// buffered lines are lost. Without it, events go to stderr.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let subscriber = registry().with(env_filter());
    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|source| LoggingError::CreateDir { path: dir.to_path_buf(), source })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            subscriber
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
