// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory function metadata materialized from the topic

use async_trait::async_trait;
use fm_adapters::{ApplyError, StateApplier};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Function definitions keyed by fully qualified name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataState {
    pub functions: BTreeMap<String, Value>,
    /// Upserts and deletes applied so far, including no-op deletes
    pub applied: u64,
    /// Replay has reached the owning tailer's startup marker
    pub initialized: bool,
}

impl MetadataState {
    /// Apply an upsert; returns true when it replaced an existing definition
    pub fn upsert(&mut self, key: String, payload: Value) -> bool {
        self.applied += 1;
        self.functions.insert(key, payload).is_some()
    }

    /// Apply a delete; returns true when a definition was removed
    pub fn delete(&mut self, key: &str) -> bool {
        self.applied += 1;
        self.functions.remove(key).is_some()
    }
}

/// Shared, clonable store that a tailer applies records into
///
/// Clones share the same state, so one clone can be handed to the tailer while
/// another serves reads.
#[derive(Clone, Default)]
pub struct MetadataStore {
    state: Arc<RwLock<MetadataState>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MetadataState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MetadataState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().functions.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().functions.contains_key(key)
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.read().functions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().functions.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.read().initialized
    }

    pub fn applied_count(&self) -> u64 {
        self.read().applied
    }

    /// Point-in-time copy of the whole state
    pub fn snapshot(&self) -> MetadataState {
        self.read().clone()
    }
}

#[async_trait]
impl StateApplier for MetadataStore {
    async fn apply_upsert(&self, key: String, payload: Value) -> Result<(), ApplyError> {
        if key.is_empty() {
            return Err(ApplyError::Rejected {
                key,
                reason: "empty function name".into(),
            });
        }
        let replaced = self.write().upsert(key.clone(), payload);
        if replaced {
            debug!(key = %key, "Replaced function metadata");
        } else {
            debug!(key = %key, "Installed function metadata");
        }
        Ok(())
    }

    async fn apply_delete(&self, key: String) -> Result<(), ApplyError> {
        if self.write().delete(&key) {
            debug!(key = %key, "Removed function metadata");
        } else {
            debug!(key = %key, "Delete for unknown function ignored");
        }
        Ok(())
    }

    async fn on_own_marker_confirmed(&self) -> Result<(), ApplyError> {
        let count = {
            let mut state = self.write();
            state.initialized = true;
            state.functions.len()
        };
        info!(functions = count, "Function metadata initialized");
        Ok(())
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
