// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsm-adapters: seams between the reconcilers and the outside world.
//!
//! - [`store`]: read a workspace and its pods, write status conditionally
//! - [`activity`]: last-seen-active timestamps fed by the heartbeat service
//! - [`k8s`]: Kubernetes implementation of the store plus watch triggers

pub mod activity;
pub mod k8s;
pub mod store;

pub use activity::{ActivityLookup, WorkspaceActivity};
pub use k8s::{
    spawn_triggers, KubeWorkspaceStore, WorkspaceResource, WorkspaceResourceSpec, WORKSPACE_ID_LABEL,
};
pub use store::{StoreError, WorkspaceStore};

#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeWorkspaceStore, StatusWrite};
