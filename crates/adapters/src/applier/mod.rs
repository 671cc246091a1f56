// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime state applier adapter

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApplierCall, FakeStateApplier};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from applying a record to runtime state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("record for {key} rejected: {reason}")]
    Rejected { key: String, reason: String },
    #[error("runtime unavailable: {0}")]
    Unavailable(String),
}

/// Materializes ordered mutation records into worker-visible runtime state
///
/// Records arrive one at a time through a single ordered path. Each call must
/// return only once its effect is safely applied; the tailer does not fetch the
/// next record until then.
#[async_trait]
pub trait StateApplier: Send + Sync + 'static {
    /// Install or replace the definition stored under `key`
    async fn apply_upsert(&self, key: String, payload: Value) -> Result<(), ApplyError>;

    /// Remove the definition stored under `key`
    async fn apply_delete(&self, key: String) -> Result<(), ApplyError>;

    /// Replay has caught up with everything published before this worker started
    async fn on_own_marker_confirmed(&self) -> Result<(), ApplyError>;
}
