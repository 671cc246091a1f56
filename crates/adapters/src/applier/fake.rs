// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake state applier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ApplyError, StateApplier};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded applier call
#[derive(Debug, Clone, PartialEq)]
pub enum ApplierCall {
    Upsert { key: String, payload: Value },
    Delete { key: String },
    OwnMarkerConfirmed,
}

/// Fake state applier for testing
///
/// Records every call in order and tracks how many calls overlap in time.
#[derive(Clone, Default)]
pub struct FakeStateApplier {
    calls: Arc<Mutex<Vec<ApplierCall>>>,
    rejections: Arc<Mutex<HashMap<String, String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeStateApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ApplierCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of times the own marker was confirmed
    pub fn confirmations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApplierCall::OwnMarkerConfirmed))
            .count()
    }

    /// Reject any upsert or delete for `key`
    pub fn reject_key(&self, key: &str, reason: &str) {
        self.rejections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), reason.to_string());
    }

    /// Make every call take `delay` before returning
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = Some(delay);
    }

    /// Highest number of calls observed in progress at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn record(&self, call: ApplierCall) -> Result<(), ApplyError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let rejection = match &call {
            ApplierCall::Upsert { key, .. } | ApplierCall::Delete { key } => self
                .rejections
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .map(|reason| ApplyError::Rejected {
                    key: key.clone(),
                    reason: reason.clone(),
                }),
            ApplierCall::OwnMarkerConfirmed => None,
        };

        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match rejection {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StateApplier for FakeStateApplier {
    async fn apply_upsert(&self, key: String, payload: Value) -> Result<(), ApplyError> {
        self.record(ApplierCall::Upsert { key, payload }).await
    }

    async fn apply_delete(&self, key: String) -> Result<(), ApplyError> {
        self.record(ApplierCall::Delete { key }).await
    }

    async fn on_own_marker_confirmed(&self) -> Result<(), ApplyError> {
        self.record(ApplierCall::OwnMarkerConfirmed).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
