// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metadata topic client adapter
//!
//! The tailer never sees the log's cursor. It only asks the client for the
//! next entry, and the client owns its position, durability and resumption.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLog;

use async_trait::async_trait;
use fm_core::EntryId;
use thiserror::Error;

/// Errors from the log client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("log client is closed")]
    Closed,
    #[error("transport error: {0}")]
    Transport(String),
}

/// One entry read from the metadata topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub data: Vec<u8>,
}

impl LogEntry {
    pub fn new(id: EntryId, data: Vec<u8>) -> Self {
        Self { id, data }
    }
}

/// Client for an append-only, totally ordered log
///
/// Entries must be read back in the order they were published.
#[async_trait]
pub trait LogClient: Send + Sync + 'static {
    /// Wait for the next entry after the client's cursor
    ///
    /// Stays pending while the log has nothing new; an exhausted log is not
    /// an error.
    async fn read_next(&self) -> Result<LogEntry, LogError>;

    /// Append an entry, resolving once the log has acknowledged it
    async fn publish(&self, data: Vec<u8>) -> Result<EntryId, LogError>;

    /// Release the read subscription
    ///
    /// Must be idempotent and safe to call while a `read_next` is outstanding.
    async fn close(&self) -> Result<(), LogError>;
}
