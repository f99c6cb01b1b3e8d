// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn queue_dispatches_due_keys_in_deadline_order() {
    let start = Instant::now();
    let mut queue = WorkQueue::new();
    queue.schedule("b", start + secs(2));
    queue.schedule("a", start + secs(5));
    queue.schedule("c", start + secs(1));

    assert_eq!(queue.pop_ready(start), None);
    assert_eq!(queue.next_deadline(), Some(start + secs(1)));

    let now = start + secs(10);
    assert_eq!(queue.pop_ready(now), Some("c"));
    assert_eq!(queue.pop_ready(now), Some("b"));
    assert_eq!(queue.pop_ready(now), Some("a"));
    assert_eq!(queue.pop_ready(now), None);
}

#[test]
fn queue_keeps_earliest_deadline() {
    let start = Instant::now();
    let mut queue = WorkQueue::new();
    queue.schedule("a", start + secs(30));
    queue.schedule("a", start + secs(1));
    queue.schedule("a", start + secs(60));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.next_deadline(), Some(start + secs(1)));
}

#[test]
fn queue_holds_keys_while_in_flight() {
    let start = Instant::now();
    let mut queue = WorkQueue::new();
    queue.schedule("a", start);
    assert_eq!(queue.pop_ready(start), Some("a"));
    assert!(queue.is_in_flight(&"a"));

    // Triggered again mid-pass
    queue.schedule("a", start);
    assert!(queue.is_scheduled(&"a"));
    assert_eq!(queue.pop_ready(start + secs(1)), None);
    assert_eq!(queue.next_deadline(), None);

    queue.complete(&"a");
    assert_eq!(queue.next_deadline(), Some(start));
    assert_eq!(queue.pop_ready(start + secs(1)), Some("a"));
}

#[test]
fn queue_is_empty_only_when_idle() {
    let start = Instant::now();
    let mut queue = WorkQueue::new();
    assert!(queue.is_empty());
    queue.schedule("a", start);
    queue.pop_ready(start);
    assert!(!queue.is_empty());
    queue.complete(&"a");
    assert!(queue.is_empty());
}

#[test]
fn queue_breaks_deadline_ties_by_key() {
    let start = Instant::now();
    let mut queue = WorkQueue::new();
    queue.schedule("z", start);
    queue.schedule("m", start);
    assert_eq!(queue.pop_ready(start), Some("m"));
}

#[test]
fn backoff_doubles_and_caps() {
    let mut backoff = Backoff::new(Duration::from_millis(500), secs(5));
    let delays: Vec<_> = (0..6).map(|_| backoff.next_delay("a")).collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(500),
            secs(1),
            secs(2),
            secs(4),
            secs(5),
            secs(5),
        ]
    );
    assert_eq!(backoff.failures(&"a"), 6);
}

#[test]
fn backoff_is_per_key_and_resets() {
    let mut backoff = Backoff::new(secs(1), secs(300));
    backoff.next_delay("a");
    backoff.next_delay("a");
    assert_eq!(backoff.next_delay("b"), secs(1));

    backoff.reset(&"a");
    assert_eq!(backoff.failures(&"a"), 0);
    assert_eq!(backoff.next_delay("a"), secs(1));
}

#[test]
fn backoff_survives_many_failures() {
    let mut backoff = Backoff::new(secs(1), secs(300));
    for _ in 0..100 {
        backoff.next_delay("a");
    }
    assert_eq!(backoff.next_delay("a"), secs(300));
}
