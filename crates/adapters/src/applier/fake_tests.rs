// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn fake_applier_records_calls_in_order() {
    let applier = FakeStateApplier::new();

    applier.on_own_marker_confirmed().await.unwrap();
    applier
        .apply_upsert("f1".into(), json!("p1"))
        .await
        .unwrap();
    applier.apply_delete("f1".into()).await.unwrap();

    assert_eq!(
        applier.calls(),
        vec![
            ApplierCall::OwnMarkerConfirmed,
            ApplierCall::Upsert {
                key: "f1".into(),
                payload: json!("p1")
            },
            ApplierCall::Delete { key: "f1".into() },
        ]
    );
    assert_eq!(applier.confirmations(), 1);
}

#[tokio::test]
async fn rejected_key_is_recorded_and_fails() {
    let applier = FakeStateApplier::new();
    applier.reject_key("bad", "invalid function config");

    let err = applier.apply_upsert("bad".into(), json!({})).await.unwrap_err();
    assert_eq!(
        err,
        ApplyError::Rejected {
            key: "bad".into(),
            reason: "invalid function config".into()
        }
    );
    assert_eq!(applier.calls().len(), 1);
    assert!(applier.apply_delete("good".into()).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_calls_are_counted() {
    let applier = FakeStateApplier::new();
    applier.set_delay(Duration::from_millis(50));

    let a = applier.clone();
    let b = applier.clone();
    let (ra, rb) = tokio::join!(
        a.apply_delete("x".into()),
        b.apply_delete("y".into())
    );
    ra.unwrap();
    rb.unwrap();

    assert_eq!(applier.max_in_flight(), 2);
}
