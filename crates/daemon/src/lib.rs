// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsm-daemon: process wiring for the workspace lifecycle controllers.

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use config::{BackoffConfig, Config, ConfigError};
pub use lifecycle::{run, spawn_reconcilers, LifecycleError, Reconcilers};
pub use logging::LoggingError;
