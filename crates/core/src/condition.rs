// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace conditions and the append-biased set that holds them.
//!
//! A [`ConditionSet`] holds at most one [`Condition`] per [`ConditionType`].
//! All mutation goes through [`ConditionSet::upsert`], which is a no-op when
//! the incoming condition carries the same status and message as the stored
//! one, and which refuses to touch a latched condition.
//!
//! # Latches
//!
//! `Failed` and `Timeout` are one-way latches: once present with
//! `status=True` they are never overwritten or cleared, even if the pod later
//! looks healthy again. Every other type is a plain upsert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Reason recorded when a condition is upserted without one.
pub const UNKNOWN_REASON: &str = "unknown";

/// Named fact attached to a workspace.
///
/// Types this controller does not know about (written by other actors) are
/// kept verbatim in [`ConditionType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    /// A pod has existed for this workspace
    Deployed,
    /// Latched failure with a human-readable message
    Failed,
    /// Latched timeout with the timeout reason as message
    Timeout,
    /// Disposal finished uploading the workspace content
    BackupComplete,
    /// Disposal gave up on uploading the workspace content
    BackupFailure,
    /// Content initialisation outcome
    ContentReady,
    /// The user closed the workspace (set externally)
    Closed,
    /// Last user activity; its transition time is the activity timestamp
    UserActivity,
    Other(SmolStr),
}

impl ConditionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionType::Deployed => "Deployed",
            ConditionType::Failed => "Failed",
            ConditionType::Timeout => "Timeout",
            ConditionType::BackupComplete => "BackupComplete",
            ConditionType::BackupFailure => "BackupFailure",
            ConditionType::ContentReady => "ContentReady",
            ConditionType::Closed => "Closed",
            ConditionType::UserActivity => "UserActivity",
            ConditionType::Other(s) => s,
        }
    }

    /// Latched types can be set to `True` once and never change afterwards.
    pub fn is_sticky(&self) -> bool {
        matches!(self, ConditionType::Failed | ConditionType::Timeout)
    }
}

impl From<&str> for ConditionType {
    fn from(s: &str) -> Self {
        match s {
            "Deployed" => ConditionType::Deployed,
            "Failed" => ConditionType::Failed,
            "Timeout" => ConditionType::Timeout,
            "BackupComplete" => ConditionType::BackupComplete,
            "BackupFailure" => ConditionType::BackupFailure,
            "ContentReady" => ConditionType::ContentReady,
            "Closed" => ConditionType::Closed,
            "UserActivity" => ConditionType::UserActivity,
            other => ConditionType::Other(SmolStr::new(other)),
        }
    }
}

impl From<String> for ConditionType {
    fn from(s: String) -> Self {
        ConditionType::from(s.as_str())
    }
}

impl From<ConditionType> for String {
    fn from(ty: ConditionType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

crate::wire_enum! {
    ConditionStatus {
        True => "True",
        False => "False",
        Unknown => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: ConditionType,
    pub status: ConditionStatus,
    pub last_transition_time: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
}

impl Condition {
    pub fn new(type_: ConditionType, status: ConditionStatus, at: DateTime<Utc>) -> Self {
        Self { type_, status, last_transition_time: at, message: String::new(), reason: String::new() }
    }

    /// Shorthand for a `status=True` condition.
    pub fn truthy(type_: ConditionType, at: DateTime<Utc>) -> Self {
        Self::new(type_, ConditionStatus::True, at)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    fn is_latched(&self) -> bool {
        self.type_.is_sticky() && self.is_true()
    }
}

/// Ordered set of conditions keyed by type.
///
/// Insertion order is preserved so that serialised status is stable across
/// reconcile passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the condition of `condition.type_`.
    ///
    /// Returns `true` if the set changed. Returns `false` when
    /// - a condition of that type is latched (`Failed`/`Timeout` with `True`), or
    /// - the stored condition already has the same status and message
    ///   (the stored transition time is kept).
    pub fn upsert(&mut self, mut condition: Condition) -> bool {
        if condition.reason.is_empty() {
            condition.reason = UNKNOWN_REASON.to_string();
        }

        match self.0.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(existing) if existing.is_latched() => false,
            Some(existing)
                if existing.status == condition.status && existing.message == condition.message =>
            {
                false
            }
            Some(existing) => {
                *existing = condition;
                true
            }
            None => {
                self.0.push(condition);
                true
            }
        }
    }

    pub fn get(&self, type_: &ConditionType) -> Option<&Condition> {
        self.0.iter().find(|c| &c.type_ == type_)
    }

    /// True if a condition of this type is present with `status=True`.
    pub fn is_true(&self, type_: &ConditionType) -> bool {
        self.get(type_).is_some_and(Condition::is_true)
    }

    /// True if a condition of this type is present with exactly this status
    /// and reason.
    pub fn has_status_with_reason(
        &self,
        type_: &ConditionType,
        status: ConditionStatus,
        reason: &str,
    ) -> bool {
        self.get(type_).is_some_and(|c| c.status == status && c.reason == reason)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Condition> {
        self.0
    }
}

impl From<Vec<Condition>> for ConditionSet {
    /// Collapse duplicates, keeping the first occurrence of each type.
    fn from(conditions: Vec<Condition>) -> Self {
        let mut set = ConditionSet::new();
        for condition in conditions {
            if set.get(&condition.type_).is_none() {
                set.0.push(condition);
            }
        }
        set
    }
}

impl From<ConditionSet> for Vec<Condition> {
    fn from(set: ConditionSet) -> Self {
        set.0
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
