// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A workspace walking its whole lifecycle, one pod state at a time.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn workspace_walks_from_pending_to_stopped() {
    let world = World::new(Workspace::builder().id("ws-walk").build());
    let status = world.status_reconciler();
    let timeouts = world.timeout_reconciler(WorkspaceActivity::new(), TimeoutConfig::default());

    let mut seen = Vec::new();
    let step = |pods: Vec<PodSnapshot>| {
        world.store.set_pods(&world.id, pods);
        world.clock.advance(Duration::from_secs(10));
    };

    step(vec![PodSnapshot::builder().phase(PodPhase::Pending).containers(vec![]).unscheduled().build()]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    step(vec![PodSnapshot::builder()
        .phase(PodPhase::Pending)
        .containers(vec![waiting_container("workspace", "ContainerCreating", "")])
        .build()]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    step(vec![PodSnapshot::builder().containers(vec![starting_container("workspace")]).build()]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    step(vec![PodSnapshot::builder().with_disposal_finalizer().build()]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    let deleted_at = world.clock.now();
    step(vec![PodSnapshot::builder().with_disposal_finalizer().deleted_at(deleted_at).build()]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    let now = world.clock.now();
    world.store.modify(&world.id, |ws| {
        ws.status.conditions.upsert(Condition::truthy(ConditionType::BackupComplete, now));
    });
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    step(vec![]);
    status.reconcile(&world.id).await.unwrap();
    seen.push(world.phase());

    assert_eq!(
        seen,
        vec![
            Some(WorkspacePhase::Pending),
            Some(WorkspacePhase::Creating),
            Some(WorkspacePhase::Initializing),
            Some(WorkspacePhase::Running),
            Some(WorkspacePhase::Stopping),
            Some(WorkspacePhase::Stopped),
            Some(WorkspacePhase::Stopped),
        ]
    );

    // Runtime info was captured once the pod was scheduled
    let ws = world.workspace();
    assert_eq!(ws.status.runtime.node_name.as_deref(), Some("node-1"));
    assert!(ws.status.conditions.is_true(&ConditionType::Deployed));
    assert!(!ws.status.conditions.is_true(&ConditionType::Failed));

    // Nothing here ran long enough to time out
    timeouts.reconcile(&world.id).await.unwrap();
    assert!(!world.workspace().status.conditions.is_true(&ConditionType::Timeout));
}

#[tokio::test]
async fn headless_workspace_stops_when_its_pod_succeeds() {
    let world = World::new(Workspace::builder().headless(true).phase(WorkspacePhase::Running).build());
    world.set_pod(
        PodSnapshot::builder()
            .phase(PodPhase::Succeeded)
            .containers(vec![terminated_container("workspace", 0, "Completed", "")])
            .build(),
    );
    world.status_reconciler().reconcile(&world.id).await.unwrap();

    let ws = world.workspace();
    assert_eq!(ws.phase(), Some(WorkspacePhase::Stopping));
    assert!(!ws.status.conditions.is_true(&ConditionType::Failed));
}

#[test]
fn status_computation_is_pure() {
    let clock = FakeClock::new();
    let ws = Workspace::builder().build();
    let pods = [PodSnapshot::builder().build()];

    let a = update_status(&ws, &pods, clock.now());
    let b = update_status(&ws, &pods, clock.now());
    assert_eq!(a, b);
    assert_eq!(ws.status.phase, None);
}
