// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake in-memory metadata topic for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LogClient, LogEntry, LogError};
use async_trait::async_trait;
use fm_core::{EntryId, RecordEnvelope};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
struct FakeLogState {
    entries: Vec<LogEntry>,
    cursor: usize,
    closed: bool,
    reads_held: bool,
    read_calls: usize,
    close_calls: usize,
    /// Injected failures keyed by read call index
    read_failures: HashMap<usize, LogError>,
    failed: bool,
    /// Per-read completion delays, cycled by read call index
    read_delays: Vec<Duration>,
    publish_failure: Option<LogError>,
    publish_delay: Option<Duration>,
    close_failure: Option<LogError>,
}

/// Fake log client backed by an in-memory topic
///
/// Reads return entries in publish order and stay pending while the topic is
/// exhausted. Once an injected read failure has been returned, any further
/// `read_next` call fails the test.
#[derive(Clone, Default)]
pub struct FakeLog {
    state: Arc<Mutex<FakeLogState>>,
    wake: Arc<Notify>,
}

impl FakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeLogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append raw entry bytes to the topic
    pub fn push_raw(&self, data: impl Into<Vec<u8>>) -> EntryId {
        let id = {
            let mut state = self.lock();
            let id = EntryId(format!("fake:{}", state.entries.len()));
            state.entries.push(LogEntry::new(id.clone(), data.into()));
            id
        };
        self.wake.notify_waiters();
        id
    }

    /// Encode and append a record to the topic
    #[allow(clippy::expect_used)]
    pub fn push(&self, record: impl Into<RecordEnvelope>) -> EntryId {
        let data = fm_core::encode(&record.into()).expect("encoding a record cannot fail");
        self.push_raw(data)
    }

    /// Every entry on the topic, in publish order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    /// Number of entries handed out by `read_next`
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    /// Number of `read_next` calls, including failed ones
    pub fn read_calls(&self) -> usize {
        self.lock().read_calls
    }

    /// Number of `close` calls
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Whether the read subscription has been released
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Fail the `read_next` call with the given index (0-based)
    pub fn fail_read_at(&self, index: usize, error: LogError) {
        self.lock().read_failures.insert(index, error);
    }

    /// Fail the next `read_next` call
    pub fn fail_next_read(&self, error: LogError) {
        let mut state = self.lock();
        let index = state.read_calls;
        state.read_failures.insert(index, error);
    }

    /// Delay read completions, cycling through `delays` by read index
    pub fn set_read_delays(&self, delays: Vec<Duration>) {
        self.lock().read_delays = delays;
    }

    /// Keep reads pending even when entries are available
    pub fn hold_reads(&self) {
        self.lock().reads_held = true;
    }

    /// Let held reads complete
    pub fn release_reads(&self) {
        self.lock().reads_held = false;
        self.wake.notify_waiters();
    }

    pub fn fail_publish(&self, error: LogError) {
        self.lock().publish_failure = Some(error);
    }

    pub fn set_publish_delay(&self, delay: Duration) {
        self.lock().publish_delay = Some(delay);
    }

    pub fn fail_close(&self, error: LogError) {
        self.lock().close_failure = Some(error);
    }

    /// Start a read: count it, and apply closed state or injected failures
    fn begin_read(&self) -> Result<Option<Duration>, LogError> {
        let mut state = self.lock();
        assert!(
            !state.failed,
            "read_next called after an injected read failure"
        );

        let index = state.read_calls;
        state.read_calls += 1;

        if state.closed {
            return Err(LogError::Closed);
        }
        if let Some(error) = state.read_failures.remove(&index) {
            state.failed = true;
            return Err(error);
        }

        if state.read_delays.is_empty() {
            Ok(None)
        } else {
            Ok(Some(state.read_delays[index % state.read_delays.len()]))
        }
    }

    /// Take the next entry if one is available to an in-flight read
    fn try_take(&self) -> Result<Option<LogEntry>, LogError> {
        let mut state = self.lock();
        if state.reads_held {
            return Ok(None);
        }
        match state.entries.get(state.cursor).cloned() {
            Some(entry) => {
                state.cursor += 1;
                Ok(Some(entry))
            }
            None if state.closed => Err(LogError::Closed),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LogClient for FakeLog {
    async fn read_next(&self) -> Result<LogEntry, LogError> {
        let delay = self.begin_read()?;

        loop {
            // Register for wakeups before checking, so a publish in between is not missed
            let notified = self.wake.notified();
            if let Some(entry) = self.try_take()? {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                return Ok(entry);
            }
            notified.await;
        }
    }

    async fn publish(&self, data: Vec<u8>) -> Result<EntryId, LogError> {
        let delay = {
            let state = self.lock();
            if let Some(error) = state.publish_failure.clone() {
                return Err(error);
            }
            state.publish_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.push_raw(data))
    }

    async fn close(&self) -> Result<(), LogError> {
        let result = {
            let mut state = self.lock();
            state.close_calls += 1;
            state.closed = true;
            match state.close_failure.clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        };
        self.wake.notify_waiters();
        result
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
