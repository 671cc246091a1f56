// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Initialization barrier
//!
//! At startup the tailer publishes a marker carrying an origin id unique to
//! itself. The topic is a single ordered stream, so reading that marker back
//! means every record published before startup has already been applied.

use crate::error::{BarrierError, TailerError};
use fm_adapters::{ApplyError, LogClient, StateApplier};
use fm_core::{EntryId, MutationRecord, OriginId, RecordEnvelope};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarrierStatus {
    Pending,
    Satisfied,
    Abandoned,
}

/// Tracks whether replay has reached this tailer's own startup marker
pub struct InitBarrier {
    origin_id: OriginId,
    worker_id: String,
    status: watch::Sender<BarrierStatus>,
}

impl InitBarrier {
    pub fn new(origin_id: OriginId, worker_id: impl Into<String>) -> Self {
        let (status, _) = watch::channel(BarrierStatus::Pending);
        Self {
            origin_id,
            worker_id: worker_id.into(),
            status,
        }
    }

    pub fn origin_id(&self) -> &OriginId {
        &self.origin_id
    }

    /// Publish this tailer's marker to the topic
    ///
    /// Returns once the log acknowledges the publish. Does not wait for the
    /// marker to come back on the read path.
    pub async fn emit_marker<L: LogClient + ?Sized>(&self, log: &L) -> Result<EntryId, TailerError> {
        let envelope = RecordEnvelope::new(MutationRecord::marker(self.origin_id.clone()))
            .with_worker_id(self.worker_id.clone());
        let data = fm_core::encode(&envelope)?;

        let entry_id = log.publish(data).await.map_err(TailerError::Publish)?;
        info!(origin_id = %self.origin_id, entry_id = %entry_id, "Sent initialization marker");
        Ok(entry_id)
    }

    /// Handle a marker read back from the topic
    ///
    /// Confirms to the applier exactly once, on the first marker carrying our
    /// own origin id. Returns whether this call satisfied the barrier; false
    /// if the barrier was abandoned while the confirmation was in flight.
    pub async fn on_marker_observed<A: StateApplier + ?Sized>(
        &self,
        origin_id: &OriginId,
        applier: &A,
    ) -> Result<bool, ApplyError> {
        if origin_id != &self.origin_id {
            debug!(origin_id = %origin_id, "Ignoring marker from another tailer");
            return Ok(false);
        }
        if *self.status.borrow() != BarrierStatus::Pending {
            debug!(origin_id = %origin_id, "Own marker already handled");
            return Ok(false);
        }

        applier.on_own_marker_confirmed().await?;

        // An abandon that landed while the applier was confirming stands
        let satisfied = self.status.send_if_modified(|status| {
            if *status == BarrierStatus::Pending {
                *status = BarrierStatus::Satisfied;
                true
            } else {
                false
            }
        });
        if satisfied {
            info!(origin_id = %origin_id, "Metadata state initialized");
        } else {
            debug!(origin_id = %origin_id, "Tailer stopped while confirming own marker");
        }
        Ok(satisfied)
    }

    pub fn is_satisfied(&self) -> bool {
        *self.status.borrow() == BarrierStatus::Satisfied
    }

    /// Handle for waiting until the barrier is satisfied
    pub fn waiter(&self) -> BarrierWaiter {
        BarrierWaiter {
            status: self.status.subscribe(),
        }
    }

    /// Release waiters when the tailer stops before seeing its marker
    pub(crate) fn abandon(&self) {
        self.status.send_if_modified(|status| {
            if *status == BarrierStatus::Pending {
                *status = BarrierStatus::Abandoned;
                true
            } else {
                false
            }
        });
    }
}

/// Waits for replay to catch up with the tailer's startup marker
#[derive(Clone)]
pub struct BarrierWaiter {
    status: watch::Receiver<BarrierStatus>,
}

impl BarrierWaiter {
    /// Resolve once the own marker has been applied
    ///
    /// Fails if the tailer stopped first.
    pub async fn wait(&mut self) -> Result<(), BarrierError> {
        let status = self
            .status
            .wait_for(|status| *status != BarrierStatus::Pending)
            .await
            .map(|status| *status)
            .map_err(|_| BarrierError::Abandoned)?;

        match status {
            BarrierStatus::Satisfied => Ok(()),
            BarrierStatus::Pending | BarrierStatus::Abandoned => Err(BarrierError::Abandoned),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        *self.status.borrow() == BarrierStatus::Satisfied
    }
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;
