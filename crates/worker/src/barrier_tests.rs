// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fm_adapters::{ApplierCall, FakeLog, FakeStateApplier, LogError};
use std::time::Duration;

fn barrier() -> InitBarrier {
    InitBarrier::new(OriginId::new("w1-1"), "w1")
}

#[tokio::test]
async fn emit_marker_publishes_own_origin() {
    let log = FakeLog::new();
    let barrier = barrier();

    let entry_id = barrier.emit_marker(&log).await.unwrap();

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, entry_id);

    let decoded = fm_core::decode(&entry_id, &entries[0].data).unwrap();
    assert_eq!(
        decoded.record,
        MutationRecord::marker(OriginId::new("w1-1"))
    );
    assert_eq!(decoded.worker_id.as_deref(), Some("w1"));
}

#[tokio::test]
async fn emit_marker_does_not_satisfy_barrier() {
    let log = FakeLog::new();
    let barrier = barrier();

    barrier.emit_marker(&log).await.unwrap();
    assert!(!barrier.is_satisfied());
}

#[tokio::test]
async fn emit_marker_reports_publish_failure() {
    let log = FakeLog::new();
    log.fail_publish(LogError::Transport("no producer".into()));

    let err = barrier().emit_marker(&log).await.unwrap_err();
    assert!(matches!(err, TailerError::Publish(_)), "got: {err}");
}

#[tokio::test]
async fn own_marker_confirms_exactly_once() {
    let applier = FakeStateApplier::new();
    let barrier = barrier();
    let own = OriginId::new("w1-1");

    assert!(barrier.on_marker_observed(&own, &applier).await.unwrap());
    assert!(!barrier.on_marker_observed(&own, &applier).await.unwrap());

    assert!(barrier.is_satisfied());
    assert_eq!(applier.calls(), vec![ApplierCall::OwnMarkerConfirmed]);
}

#[tokio::test]
async fn foreign_marker_is_ignored() {
    let applier = FakeStateApplier::new();
    let barrier = barrier();

    let confirmed = barrier
        .on_marker_observed(&OriginId::new("w2-1"), &applier)
        .await
        .unwrap();

    assert!(!confirmed);
    assert!(!barrier.is_satisfied());
    assert!(applier.calls().is_empty());
}

#[tokio::test]
async fn waiter_resolves_when_satisfied() {
    let applier = FakeStateApplier::new();
    let barrier = barrier();
    let mut waiter = barrier.waiter();

    let wait = tokio::spawn(async move { waiter.wait().await });
    barrier
        .on_marker_observed(&OriginId::new("w1-1"), &applier)
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(1), wait)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn waiter_created_after_satisfaction_resolves_immediately() {
    let applier = FakeStateApplier::new();
    let barrier = barrier();
    barrier
        .on_marker_observed(&OriginId::new("w1-1"), &applier)
        .await
        .unwrap();

    let mut waiter = barrier.waiter();
    assert!(waiter.is_satisfied());
    waiter.wait().await.unwrap();
}

#[tokio::test]
async fn abandon_fails_pending_waiters() {
    let barrier = barrier();
    let mut waiter = barrier.waiter();

    barrier.abandon();
    assert_eq!(waiter.wait().await, Err(BarrierError::Abandoned));
}

#[tokio::test]
async fn abandon_after_satisfaction_keeps_success() {
    let applier = FakeStateApplier::new();
    let barrier = barrier();
    barrier
        .on_marker_observed(&OriginId::new("w1-1"), &applier)
        .await
        .unwrap();

    barrier.abandon();
    assert!(barrier.waiter().wait().await.is_ok());
}

#[tokio::test]
async fn abandon_during_confirmation_stays_abandoned() {
    let applier = FakeStateApplier::new();
    applier.set_delay(Duration::from_millis(50));
    let barrier = barrier();
    let mut early = barrier.waiter();
    let origin = OriginId::new("w1-1");

    let (confirmed, ()) = tokio::join!(
        barrier.on_marker_observed(&origin, &applier),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            barrier.abandon();
        }
    );

    assert!(!confirmed.unwrap());
    assert_eq!(applier.confirmations(), 1);
    assert!(!barrier.is_satisfied());
    assert_eq!(early.wait().await, Err(BarrierError::Abandoned));
    assert_eq!(barrier.waiter().wait().await, Err(BarrierError::Abandoned));
}

#[tokio::test]
async fn dropped_barrier_fails_waiters() {
    let barrier = barrier();
    let mut waiter = barrier.waiter();
    drop(barrier);

    assert_eq!(waiter.wait().await, Err(BarrierError::Abandoned));
}

#[tokio::test]
async fn failed_confirmation_leaves_barrier_pending() {
    struct Failing;

    #[async_trait::async_trait]
    impl StateApplier for Failing {
        async fn apply_upsert(&self, _: String, _: serde_json::Value) -> Result<(), ApplyError> {
            Ok(())
        }
        async fn apply_delete(&self, _: String) -> Result<(), ApplyError> {
            Ok(())
        }
        async fn on_own_marker_confirmed(&self) -> Result<(), ApplyError> {
            Err(ApplyError::Unavailable("runtime not ready".into()))
        }
    }

    let barrier = barrier();
    let result = barrier
        .on_marker_observed(&OriginId::new("w1-1"), &Failing)
        .await;

    assert!(result.is_err());
    assert!(!barrier.is_satisfied());
}
