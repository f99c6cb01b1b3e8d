// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wsmd: workspace lifecycle daemon.

use std::process::ExitCode;
use wsm_adapters::WorkspaceActivity;
use wsm_daemon::{env, logging, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("wsmd: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init(env::log_dir().as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("wsmd: failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    // No heartbeat source is wired into wsmd itself, so activity comes from
    // the `UserActivity` condition on each workspace.
    match wsm_daemon::run(config, WorkspaceActivity::new()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "daemon failed");
            ExitCode::FAILURE
        }
    }
}
