// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for log entries and marker origins

use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque identifier of one entry in the metadata topic.
///
/// Assigned by the log client. Only used for error reporting and logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity stamped on an initialization marker by the tailer that wrote it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct OriginId(pub String);

impl OriginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OriginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates marker origin ids, one per tailer instance
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> OriginId;
}

/// UUID-based generator for production use
///
/// Ids look like `{worker_id}-{uuid}` so a marker in the topic can be traced
/// back to the worker that wrote it.
#[derive(Clone, Debug)]
pub struct UuidIdGen {
    worker_id: String,
}

impl UuidIdGen {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
        }
    }
}

impl Default for UuidIdGen {
    fn default() -> Self {
        Self::new("worker")
    }
}

impl IdGen for UuidIdGen {
    fn next(&self) -> OriginId {
        OriginId(format!("{}-{}", self.worker_id, uuid::Uuid::new_v4()))
    }
}

/// Sequential generator for testing
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("origin")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> OriginId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        OriginId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_gen_creates_unique_ids() {
        let id_gen = UuidIdGen::new("w1");
        let id1 = id_gen.next();
        let id2 = id_gen.next();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("w1-"));
        // "w1-" + UUID
        assert_eq!(id1.as_str().len(), 3 + 36);
    }

    #[test]
    fn sequential_gen_creates_predictable_ids() {
        let id_gen = SequentialIdGen::new("test");
        assert_eq!(id_gen.next(), OriginId::new("test-1"));
        assert_eq!(id_gen.next(), OriginId::new("test-2"));
    }

    #[test]
    fn sequential_gen_is_cloneable_and_shared() {
        let id_gen1 = SequentialIdGen::new("shared");
        let id_gen2 = id_gen1.clone();
        assert_eq!(id_gen1.next().as_str(), "shared-1");
        assert_eq!(id_gen2.next().as_str(), "shared-2");
        assert_eq!(id_gen1.next().as_str(), "shared-3");
    }

    #[test]
    fn entry_id_displays_inner_value() {
        assert_eq!(EntryId::new("3:14:-1").to_string(), "3:14:-1");
    }
}
