// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile errors

use std::time::Duration;
use thiserror::Error;
use wsm_adapters::StoreError;

/// Errors that end a reconcile pass early.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("reconcile pass exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),

    #[error("reconcile pass aborted: {0}")]
    Aborted(String),
}

impl ReconcileError {
    /// Stale write; requeue immediately and re-read.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ReconcileError::Store(StoreError::Conflict(_)))
    }

    /// The workspace is gone; nothing left to do.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::Store(StoreError::NotFound(_)))
    }
}
