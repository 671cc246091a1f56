// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the metadata tailer

use fm_adapters::{ApplyError, LogError};
use fm_core::{DecodeError, StateError};
use std::time::Duration;
use thiserror::Error;

/// Fatal conditions that stop a tailer
///
/// Any of these leaves the worker's metadata view untrustworthy, so the tailer
/// stops fetching and the owner decides whether to restart it.
#[derive(Debug, Error)]
pub enum TailerError {
    #[error("failed to fetch from metadata topic: {0}")]
    Fetch(#[source] LogError),
    #[error("bad metadata request: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to apply metadata request: {0}")]
    Apply(#[from] ApplyError),
    #[error("failed to publish initialization marker: {0}")]
    Publish(#[source] LogError),
    #[error("timed out after {0:?} publishing initialization marker")]
    MarkerTimeout(Duration),
    #[error("failed to encode initialization marker: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("tailer task failed: {0}")]
    Task(String),
}

/// The initialization barrier can no longer be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarrierError {
    #[error("tailer stopped before replay reached its initialization marker")]
    Abandoned,
}
