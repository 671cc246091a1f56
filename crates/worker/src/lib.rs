// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fm-worker: Tails the function metadata topic into worker state
//!
//! A [`Tailer`] publishes a startup marker, then replays the topic in order
//! through a [`StateApplier`](fm_adapters::StateApplier). When replay reaches
//! its own marker the worker's view is known to include everything published
//! before it started, and [`TailerHandle::initialized`] resolves.

pub mod barrier;
pub mod error;
pub mod metadata;
pub mod tailer;

pub use barrier::{BarrierWaiter, InitBarrier};
pub use error::{BarrierError, TailerError};
pub use metadata::{MetadataState, MetadataStore};
pub use tailer::{Tailer, TailerHandle};
