// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential tailer for the function metadata topic
//!
//! One task drives the loop: fetch the next entry, decode it, dispatch it to the
//! state applier, and only then fetch again. Records are therefore applied in
//! log order with never more than one application in flight.
//!
//! Fetch, decode and apply failures are fatal. The loop stops issuing fetches,
//! releases the subscription, and returns the error through
//! [`TailerHandle::join`]. Restarting means building a new tailer.
//!
//! [`TailerHandle::close`] waits for an in-flight application to finish, so no
//! record is applied once it returns. Dropping the handle without closing
//! stops the loop and releases the subscription from a background task.

use crate::barrier::{BarrierWaiter, InitBarrier};
use crate::error::TailerError;
use fm_adapters::{LogClient, StateApplier};
use fm_core::{
    IdGen, MutationRecord, OriginId, StateError, TailerConfig, TailerState, UuidIdGen,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

/// State shared between the tailer task and its handle
struct Shared<L> {
    log: L,
    barrier: InitBarrier,
    state: watch::Sender<TailerState>,
    released: AtomicBool,
    processed: AtomicU64,
    /// Held from the post-fetch state check through dispatch
    dispatch_gate: Mutex<()>,
}

impl<L: LogClient> Shared<L> {
    fn current(&self) -> TailerState {
        *self.state.borrow()
    }

    fn is_running(&self) -> bool {
        self.current().is_running()
    }

    fn transition(
        &self,
        step: impl FnOnce(TailerState) -> Result<TailerState, StateError>,
    ) -> Result<TailerState, StateError> {
        let mut result = Err(StateError {
            from: self.current(),
            operation: "transition",
        });
        self.state.send_if_modified(|state| match step(*state) {
            Ok(next) => {
                *state = next;
                result = Ok(next);
                true
            }
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result
    }

    /// Move to `Closed`; returns false if already closed
    fn mark_closed(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_closed() {
                false
            } else {
                *state = state.close();
                true
            }
        })
    }

    /// Release the read subscription once; failures are logged, not returned
    async fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.log.close().await {
            error!(error = %e, "Failed to stop function metadata consumer");
        }
    }

    async fn shutdown(&self) {
        self.mark_closed();
        self.release().await;
        self.barrier.abandon();
    }

    /// Shut down once any in-flight dispatch has finished
    async fn close(&self) {
        {
            let _gate = self.dispatch_gate.lock().await;
            self.mark_closed();
        }
        self.shutdown().await;
    }

    async fn dispatch<A: StateApplier>(
        &self,
        record: MutationRecord,
        applier: &A,
    ) -> Result<(), TailerError> {
        match record {
            MutationRecord::Marker { origin_id } => {
                self.barrier.on_marker_observed(&origin_id, applier).await?;
            }
            MutationRecord::Upsert { key, payload } => {
                applier.apply_upsert(key, payload).await?;
            }
            MutationRecord::Delete { key } => {
                applier.apply_delete(key).await?;
            }
            MutationRecord::Unknown { raw_type } => {
                warn!(raw_type = %raw_type, "Received request with unrecognized type");
            }
        }
        Ok(())
    }

    /// Fetch-decode-dispatch until closed or a fatal error
    async fn tail<A: StateApplier>(&self, applier: &A) -> Result<(), TailerError> {
        while self.is_running() {
            let fetched = self.log.read_next().await;
            let _gate = self.dispatch_gate.lock().await;

            // A fetch that completes after close is dropped unapplied
            if !self.is_running() {
                debug!("Discarding fetch completed after close");
                break;
            }

            let entry = fetched.map_err(TailerError::Fetch)?;
            let envelope = fm_core::decode(&entry.id, &entry.data)?;
            debug!(
                entry_id = %entry.id,
                record_type = envelope.record.type_tag(),
                key = envelope.record.key(),
                request_id = envelope.request_id.as_deref(),
                worker_id = envelope.worker_id.as_deref(),
                "Received metadata request"
            );

            self.dispatch(envelope.record, applier).await?;
            self.processed.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

async fn run<L: LogClient, A: StateApplier>(
    shared: Arc<Shared<L>>,
    applier: A,
) -> Result<(), TailerError> {
    let result = shared.tail(&applier).await;
    if let Err(e) = &result {
        error!(error = %e, "Failed to process function metadata topic; tailer stopped");
    }
    shared.shutdown().await;
    result
}

/// Tailer that has not been started yet
pub struct Tailer<L, A> {
    shared: Arc<Shared<L>>,
    applier: A,
    config: TailerConfig,
}

impl<L: LogClient, A: StateApplier> Tailer<L, A> {
    /// Create a tailer whose marker origin id is `{worker_id}-{uuid}`
    pub fn new(log: L, applier: A, config: TailerConfig) -> Self {
        let id_gen = UuidIdGen::new(config.worker_id.clone());
        Self::with_id_gen(log, applier, config, &id_gen)
    }

    /// Create a tailer with a caller-supplied origin id generator
    pub fn with_id_gen(log: L, applier: A, config: TailerConfig, id_gen: &impl IdGen) -> Self {
        let (state, _) = watch::channel(TailerState::Created);
        let barrier = InitBarrier::new(id_gen.next(), config.worker_id.clone());
        Self {
            shared: Arc::new(Shared {
                log,
                barrier,
                state,
                released: AtomicBool::new(false),
                processed: AtomicU64::new(0),
                dispatch_gate: Mutex::new(()),
            }),
            applier,
            config,
        }
    }

    pub fn state(&self) -> TailerState {
        self.shared.current()
    }

    pub fn origin_id(&self) -> &OriginId {
        self.shared.barrier.origin_id()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TailerState> {
        self.shared.state.subscribe()
    }

    /// Emit the initialization marker, then start tailing on a new task
    ///
    /// On failure the tailer ends `Closed` with its subscription released.
    pub async fn start(self) -> Result<TailerHandle<L>, TailerError> {
        let Tailer {
            shared,
            applier,
            config,
        } = self;
        let span = tracing::info_span!("tailer", origin_id = %shared.barrier.origin_id());

        async {
            shared.transition(TailerState::start)?;
            info!("Initializing function metadata state");

            let timeout = config.marker_publish_timeout;
            let emitted = match tokio::time::timeout(
                timeout,
                shared.barrier.emit_marker(&shared.log),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(TailerError::MarkerTimeout(timeout)),
            };
            if let Err(e) = emitted {
                error!(error = %e, "Failed to initialize function metadata state");
                shared.shutdown().await;
                return Err(e);
            }

            shared.transition(TailerState::marker_emitted)?;
            info!("Tailing function metadata topic");

            let task = tokio::spawn(run(Arc::clone(&shared), applier).in_current_span());
            Ok::<_, TailerError>(TailerHandle {
                shared,
                task: Some(task),
            })
        }
        .instrument(span)
        .await
    }

    /// Close a tailer that was never started, releasing its subscription
    pub async fn close(self) {
        info!(origin_id = %self.origin_id(), "Closing unstarted metadata tailer");
        self.shared.shutdown().await;
    }
}

/// Handle to a running tailer
///
/// Dropping it without [`close`](Self::close) stops the tailer.
pub struct TailerHandle<L: LogClient> {
    shared: Arc<Shared<L>>,
    /// Taken by `join`
    task: Option<JoinHandle<Result<(), TailerError>>>,
}

impl<L: LogClient> TailerHandle<L> {
    pub fn state(&self) -> TailerState {
        self.shared.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TailerState> {
        self.shared.state.subscribe()
    }

    pub fn origin_id(&self) -> &OriginId {
        self.shared.barrier.origin_id()
    }

    /// Wait handle that resolves once replay reaches this tailer's marker
    pub fn initialized(&self) -> BarrierWaiter {
        self.shared.barrier.waiter()
    }

    /// Number of records fetched, decoded and dispatched so far
    pub fn records_processed(&self) -> u64 {
        self.shared.processed.load(Ordering::Relaxed)
    }

    /// Whether the tailer task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop tailing and release the subscription
    ///
    /// Waits for a record already being applied. An outstanding fetch is not
    /// aborted; whatever it returns is discarded. Errors from releasing the
    /// subscription are logged, not returned.
    pub async fn close(&self) {
        info!(origin_id = %self.origin_id(), "Stopping function metadata consumer");
        self.shared.close().await;
        info!(origin_id = %self.origin_id(), "Stopped function metadata consumer");
    }

    /// Wait for the tailer task to exit and return why it stopped
    ///
    /// `Ok(())` after a [`close`](Self::close); the fatal error otherwise.
    pub async fn join(mut self) -> Result<(), TailerError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match task.await {
            Ok(result) => result,
            Err(e) => {
                self.shared.shutdown().await;
                Err(TailerError::Task(e.to_string()))
            }
        }
    }
}

impl<L: LogClient> Drop for TailerHandle<L> {
    fn drop(&mut self) {
        if !self.shared.mark_closed() {
            return;
        }
        warn!(origin_id = %self.origin_id(), "Tailer handle dropped without close");
        self.shared.barrier.abandon();

        // Releasing the subscription also completes the pending fetch
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let shared = Arc::clone(&self.shared);
                runtime.spawn(async move { shared.release().await });
            }
            Err(_) => {
                if let Some(task) = &self.task {
                    task.abort();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tailer_tests.rs"]
mod tests;
