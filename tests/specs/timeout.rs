// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout reconciler specs: limits, precedence and sampling.

use crate::prelude::*;
use crate::prelude::assert_eq;

fn pending_for(clock: &FakeClock, age: Duration) -> Workspace {
    Workspace::builder().phase(WorkspacePhase::Pending).created_at(clock.ago(age)).build()
}

#[test]
fn pending_past_initialization_times_out_with_rounded_durations() {
    let clock = FakeClock::new();
    let ws = pending_for(&clock, minutes(31));
    let cfg = TimeoutConfig { initialization: minutes(30), ..TimeoutConfig::default() };

    let pass = evaluate(&ws, &[], None, &cfg, clock.now());
    let reason = pass.reason.expect("timed out").to_string();
    assert!(reason.contains("31m"), "{reason}");
    assert!(reason.contains("30m"), "{reason}");
    assert_eq!(
        reason,
        "workspace timed out after initialization (00h31m) took longer than 00h30m"
    );
    assert!(pass.status.is_some());
}

#[test]
fn pending_within_a_longer_limit_does_not_time_out() {
    let clock = FakeClock::new();
    let ws = pending_for(&clock, minutes(31));
    let cfg = TimeoutConfig { initialization: minutes(45), ..TimeoutConfig::default() };

    let pass = evaluate(&ws, &[], None, &cfg, clock.now());
    assert_eq!(pass.reason, None);
    assert_eq!(pass.status, None);
}

#[test]
fn max_lifetime_wins_over_recent_activity() {
    let clock = FakeClock::new();
    let ws = Workspace::builder()
        .phase(WorkspacePhase::Running)
        .created_at(clock.ago(hours(37)))
        .build();

    let pass = evaluate(&ws, &[], Some(clock.ago(minutes(1))), &TimeoutConfig::default(), clock.now());
    let reason = pass.reason.expect("timed out");
    assert_eq!(reason.to_string(), "workspace timed out after maximum lifetime (37h00m) took longer than 36h00m");
}

#[test]
fn heartbeat_interval_sets_the_sampling_period() {
    let clock = FakeClock::new();
    let cfg = TimeoutConfig { heartbeat_interval: minutes(4), ..TimeoutConfig::default() };
    let ws = Workspace::builder().phase(WorkspacePhase::Running).build();

    let pass = evaluate(&ws, &[], Some(clock.now()), &cfg, clock.now());
    assert_eq!(pass.requeue_after, minutes(2));
}

#[tokio::test]
async fn inactivity_is_measured_from_the_last_heartbeat() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Running).build());
    let activity = WorkspaceActivity::new();
    let reconciler = world.timeout_reconciler(activity.clone(), TimeoutConfig::default());

    activity.record(&world.id, world.clock.now());
    world.clock.advance(minutes(29));
    assert_eq!(
        reconciler.reconcile(&world.id).await.unwrap(),
        Action::Requeue(Duration::from_secs(15))
    );
    assert_eq!(world.store.write_count(), 0);

    world.clock.advance(minutes(1));
    reconciler.reconcile(&world.id).await.unwrap();
    let ws = world.workspace();
    let timeout = ws.status.conditions.get(&ConditionType::Timeout).expect("latched");
    assert!(timeout.is_true());
    assert_eq!(
        timeout.message,
        "workspace timed out after period of inactivity (00h30m) took longer than 00h30m"
    );
}

#[tokio::test]
async fn timeout_is_written_once() {
    let clock = FakeClock::new();
    let world = World::new(pending_for(&clock, hours(2)));
    let reconciler = world.timeout_reconciler(WorkspaceActivity::new(), TimeoutConfig::default());

    reconciler.reconcile(&world.id).await.unwrap();
    let first = world.workspace().status.conditions.get(&ConditionType::Timeout).cloned();
    assert!(first.is_some());

    world.clock.advance(hours(1));
    reconciler.reconcile(&world.id).await.unwrap();
    assert_eq!(world.workspace().status.conditions.get(&ConditionType::Timeout).cloned(), first);
    assert_eq!(world.store.write_count(), 1);
}

#[tokio::test]
async fn stopping_is_measured_from_pod_deletion() {
    let world = World::new(Workspace::builder().phase(WorkspacePhase::Stopping).build());
    let deleted_at = world.clock.now();
    world.set_pod(PodSnapshot::builder().deleted_at(deleted_at).with_disposal_finalizer().build());
    let reconciler = world.timeout_reconciler(WorkspaceActivity::new(), TimeoutConfig::default());

    world.clock.advance(minutes(59));
    reconciler.reconcile(&world.id).await.unwrap();
    assert_eq!(world.store.write_count(), 0);

    world.clock.advance(minutes(1));
    reconciler.reconcile(&world.id).await.unwrap();
    let message = world.workspace().status.conditions.get(&ConditionType::Timeout).unwrap().message.clone();
    assert!(message.starts_with("workspace timed out after stopping"), "{message}");
}

#[tokio::test]
async fn stopped_workspaces_never_time_out() {
    let clock = FakeClock::new();
    let world = World::new(
        Workspace::builder().phase(WorkspacePhase::Stopped).created_at(clock.ago(hours(100))).build(),
    );
    let reconciler = world.timeout_reconciler(WorkspaceActivity::new(), TimeoutConfig::default());
    let action = reconciler.reconcile(&world.id).await.unwrap();
    assert_eq!(action, Action::Requeue(Duration::from_secs(15)));
    assert_eq!(world.store.write_count(), 0);
}
