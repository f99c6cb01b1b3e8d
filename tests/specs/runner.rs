// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner specs: triggers in, persisted status out.

use crate::prelude::*;
use crate::prelude::assert_eq;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn conflicting_write_is_retried_until_it_lands() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(PodSnapshot::builder().build());
    world.store.fail_next_update(StoreError::Conflict(world.id.to_string()));
    world.store.fail_next_update(StoreError::Conflict(world.id.to_string()));

    let (tx, rx) = mpsc::channel(8);
    let runner = Runner::new(world.status_reconciler(), RunnerConfig::default());
    let handle = tokio::spawn(runner.run(rx, CancellationToken::new()));

    tx.send(world.id.clone()).await.unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(world.phase(), Some(WorkspacePhase::Running));
    assert_eq!(world.store.write_count(), 1);
    assert_eq!(world.store.get_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn api_errors_back_off_before_retrying() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(PodSnapshot::builder().build());
    world.store.fail_next_get(StoreError::Api("connection refused".to_string()));

    let (tx, rx) = mpsc::channel(8);
    let runner = Runner::new(world.status_reconciler(), RunnerConfig::default());
    let handle = tokio::spawn(runner.run(rx, CancellationToken::new()));

    let started = tokio::time::Instant::now();
    tx.send(world.id.clone()).await.unwrap();
    drop(tx);
    handle.await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(world.phase(), Some(WorkspacePhase::Running));
}

#[tokio::test(start_paused = true)]
async fn trigger_for_deleted_workspace_is_dropped() {
    let world = World::new(Workspace::builder().build());
    world.store.remove(&world.id);

    let (tx, rx) = mpsc::channel(8);
    let runner = Runner::new(world.status_reconciler(), RunnerConfig::default());
    let handle = tokio::spawn(runner.run(rx, CancellationToken::new()));

    tx.send(world.id.clone()).await.unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(world.store.get_count(), 1);
    assert_eq!(world.store.write_count(), 0);
}
