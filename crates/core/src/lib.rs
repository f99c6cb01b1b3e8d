// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsm-core: value records for the workspace lifecycle controllers.
//!
//! Nothing in this crate performs I/O. The reconcilers in `wsm-engine` read
//! these records, compute a new status, and hand it back to a store adapter.

pub mod macros;

pub mod clock;
pub mod condition;
pub mod phase;
pub mod pod;
pub mod time_fmt;
pub mod timeout;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use condition::{Condition, ConditionSet, ConditionStatus, ConditionType};
pub use phase::{PodPhase, WorkspacePhase};
pub use pod::{ContainerState, ContainerStatus, PodSnapshot, Terminated, DISPOSAL_FINALIZER};
pub use time_fmt::{format_hours_minutes, parse_duration, TimeFmtError};
pub use timeout::TimeoutConfig;
pub use workspace::{Workspace, WorkspaceId, WorkspaceRuntime, WorkspaceStatus};
