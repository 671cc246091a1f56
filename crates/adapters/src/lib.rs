// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the tailer's external collaborators: the metadata topic and
//! the runtime state it is applied to

pub mod applier;
pub mod log;
pub mod traced;

pub use applier::{ApplyError, StateApplier};
pub use log::{LogClient, LogEntry, LogError};
pub use traced::{TracedLogClient, TracedStateApplier};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use applier::{ApplierCall, FakeStateApplier};
#[cfg(any(test, feature = "test-support"))]
pub use log::FakeLog;
