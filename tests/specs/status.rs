// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status reconciler specs: phase mapping, latches and write discipline.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn unchanged_inputs_write_once() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(PodSnapshot::builder().build());
    let reconciler = world.status_reconciler();

    reconciler.reconcile(&world.id).await.unwrap();
    let first = world.workspace().status;

    world.clock.advance(minutes(5));
    reconciler.reconcile(&world.id).await.unwrap();

    assert_eq!(world.workspace().status, first);
    assert_eq!(world.store.write_count(), 1);
}

#[tokio::test]
async fn failed_latch_survives_a_healthy_pod() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(
        PodSnapshot::builder()
            .containers(vec![terminated_container("workspace", 1, "Error", "")])
            .build(),
    );
    let reconciler = world.status_reconciler();
    reconciler.reconcile(&world.id).await.unwrap();

    let failed = world.workspace().status.conditions.get(&ConditionType::Failed).cloned().unwrap();
    assert_eq!(failed.message, "container workspace ran with an error: exit code 1");

    // The pod recovers; the failure stays on record
    world.clock.advance(minutes(1));
    world.set_pod(PodSnapshot::builder().build());
    reconciler.reconcile(&world.id).await.unwrap();

    let ws = world.workspace();
    assert_eq!(ws.phase(), Some(WorkspacePhase::Running));
    assert_eq!(ws.status.conditions.get(&ConditionType::Failed), Some(&failed));
}

#[tokio::test]
async fn timeout_latch_is_left_alone_by_status_passes() {
    let clock = FakeClock::new();
    let timeout = Condition::truthy(ConditionType::Timeout, clock.now()).with_message("too slow");
    let world = World::new(
        Workspace::builder().phase(WorkspacePhase::Running).condition_with(timeout.clone()).build(),
    );
    world.set_pod(PodSnapshot::builder().build());
    world.status_reconciler().reconcile(&world.id).await.unwrap();

    assert_eq!(world.workspace().status.conditions.get(&ConditionType::Timeout), Some(&timeout));
}

#[tokio::test]
async fn zero_pods_stop_a_running_workspace() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    world.status_reconciler().reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Stopped));
}

#[tokio::test]
async fn zero_pods_leave_a_new_workspace_pending() {
    let world = World::new(Workspace::builder().build());
    world.status_reconciler().reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Pending));
}

#[tokio::test]
async fn two_pods_fail_without_touching_phase() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    world.store.set_pods(
        &world.id,
        vec![PodSnapshot::builder().name("a").build(), PodSnapshot::builder().name("b").build()],
    );
    world.status_reconciler().reconcile(&world.id).await.unwrap();

    let ws = world.workspace();
    assert_eq!(ws.phase(), Some(WorkspacePhase::Running));
    let failed = ws.status.conditions.get(&ConditionType::Failed).unwrap();
    assert!(failed.is_true());
    assert_eq!(failed.message, MULTIPLE_PODS_MESSAGE);
}

#[tokio::test]
async fn deleted_pod_without_finalizer_stops_immediately() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    world.set_pod(PodSnapshot::builder().deleted_at(world.clock.now()).build());
    world.status_reconciler().reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Stopped));
}

#[tokio::test]
async fn deleted_pod_with_finalizer_waits_for_backup() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    world.set_pod(
        PodSnapshot::builder().deleted_at(world.clock.now()).with_disposal_finalizer().build(),
    );
    let reconciler = world.status_reconciler();
    reconciler.reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Stopping));

    let now = world.clock.now();
    world.store.modify(&world.id, |ws| {
        ws.status.conditions.upsert(Condition::truthy(ConditionType::BackupFailure, now));
    });
    reconciler.reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Stopped));
}

#[tokio::test]
async fn image_pull_trouble_reports_creating() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(
        PodSnapshot::builder()
            .phase(PodPhase::Pending)
            .containers(vec![waiting_container("workspace", "ImagePullBackOff", "no such image")])
            .build(),
    );
    world.status_reconciler().reconcile(&world.id).await.unwrap();

    let ws = world.workspace();
    assert_eq!(ws.phase(), Some(WorkspacePhase::Creating));
    assert_eq!(
        ws.status.conditions.get(&ConditionType::Failed).map(|c| c.message.as_str()),
        Some("cannot pull image: no such image")
    );
}

#[tokio::test]
async fn crash_message_is_parsed_from_log_tail() {
    let tail = concat!(
        r#"{"level":"info","msg":"starting"}"#,
        "\n",
        r#"{"level":"info","message":""}"#,
        "\n",
        r#"{"message":"boom","error":"x"}"#,
        "\n",
    );
    assert_eq!(failure_from_logs(tail.as_bytes()), "boom: x");

    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    world.set_pod(
        PodSnapshot::builder()
            .containers(vec![terminated_container("workspace", 2, "Error", tail)])
            .build(),
    );
    world.status_reconciler().reconcile(&world.id).await.unwrap();

    let ws = world.workspace();
    assert_eq!(
        ws.status.conditions.get(&ConditionType::Failed).map(|c| c.message.as_str()),
        Some("boom: x")
    );
}

#[tokio::test]
async fn deleted_workspace_is_ignored() {
    let world = World::new(Workspace::builder().build());
    world.store.remove(&world.id);
    let action = world.status_reconciler().reconcile(&world.id).await.unwrap();
    assert_eq!(action, Action::AwaitChange);
    assert_eq!(world.store.write_count(), 0);
}

#[tokio::test]
async fn stale_write_surfaces_as_conflict() {
    let world = World::new(Workspace::builder().build());
    world.set_pod(PodSnapshot::builder().build());
    world.store.fail_next_update(StoreError::Conflict(world.id.to_string()));

    let err = world.status_reconciler().reconcile(&world.id).await.unwrap_err();
    assert!(err.is_conflict(), "{err}");

    // The retry re-reads and succeeds
    world.status_reconciler().reconcile(&world.id).await.unwrap();
    assert_eq!(world.phase(), Some(WorkspacePhase::Running));
}
