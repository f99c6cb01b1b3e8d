// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsm-engine: the workspace lifecycle control loops.
//!
//! Two reconcilers share one workspace object:
//!
//! - [`StatusReconciler`] maps the workspace's pod onto a phase, conditions
//!   and runtime info, writing back only on change.
//! - [`TimeoutReconciler`] checks the [`timeout`] policy on every trigger and
//!   on a fixed self-requeue, latching `Timeout=True` once.
//!
//! Each is driven by a [`Runner`], which serialises passes per workspace and
//! applies the retry policy for conflicts and infrastructure errors.

mod error;
pub mod failure;
mod runner;
mod scheduler;
pub mod status;
pub mod timeout;
mod timeout_reconciler;

pub use error::ReconcileError;
pub use failure::{extract_failure, failure_from_logs, Failure, KILLED_EXIT_CODE, UNKNOWN_EXIT_CODE};
pub use runner::{Action, Reconciler, Runner, RunnerConfig};
pub use scheduler::{Backoff, WorkQueue};
pub use status::{decide_phase, update_status, PhaseDecision, StatusReconciler, MULTIPLE_PODS_MESSAGE};
pub use timeout::{is_timed_out, last_activity, Activity, TimeoutInputs, TimeoutReason};
pub use timeout_reconciler::{evaluate, TimeoutPass, TimeoutReconciler};
