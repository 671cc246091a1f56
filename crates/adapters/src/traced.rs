// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::applier::{ApplyError, StateApplier};
use crate::log::{LogClient, LogEntry, LogError};
use async_trait::async_trait;
use fm_core::EntryId;
use serde_json::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any LogClient
#[derive(Clone)]
pub struct TracedLogClient<L> {
    inner: L,
}

impl<L> TracedLogClient<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: LogClient> LogClient for TracedLogClient<L> {
    async fn read_next(&self) -> Result<LogEntry, LogError> {
        let start = std::time::Instant::now();
        let result = self
            .inner
            .read_next()
            .instrument(tracing::debug_span!("log.read_next"))
            .await;
        let waited_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(entry) => tracing::trace!(
                entry_id = %entry.id,
                len = entry.data.len(),
                waited_ms,
                "entry received"
            ),
            Err(e) => tracing::error!(waited_ms, error = %e, "read failed"),
        }

        result
    }

    async fn publish(&self, data: Vec<u8>) -> Result<EntryId, LogError> {
        let span = tracing::info_span!("log.publish", len = data.len());

        async {
            let start = std::time::Instant::now();
            let result = self.inner.publish(data).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(id) => tracing::info!(entry_id = %id, elapsed_ms, "published"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "publish failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn close(&self) -> Result<(), LogError> {
        let result = self
            .inner
            .close()
            .instrument(tracing::info_span!("log.close"))
            .await;
        // close() failing is reported by the owner; only note it here
        match &result {
            Ok(()) => tracing::info!("subscription released"),
            Err(e) => tracing::warn!(error = %e, "close failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any StateApplier
#[derive(Clone)]
pub struct TracedStateApplier<A> {
    inner: A,
}

impl<A> TracedStateApplier<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: StateApplier> StateApplier for TracedStateApplier<A> {
    async fn apply_upsert(&self, key: String, payload: Value) -> Result<(), ApplyError> {
        let span = tracing::info_span!("applier.upsert", key = %key);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.apply_upsert(key, payload).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "applied"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "upsert rejected"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn apply_delete(&self, key: String) -> Result<(), ApplyError> {
        let span = tracing::info_span!("applier.delete", key = %key);

        async {
            let result = self.inner.apply_delete(key).await;
            match &result {
                Ok(()) => tracing::debug!("applied"),
                Err(e) => tracing::error!(error = %e, "delete rejected"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn on_own_marker_confirmed(&self) -> Result<(), ApplyError> {
        let result = self.inner.on_own_marker_confirmed().await;
        match &result {
            Ok(()) => tracing::info!("metadata replay caught up with startup marker"),
            Err(e) => tracing::error!(error = %e, "marker confirmation failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
