// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fm-core: Core types for the function metadata tailer
//!
//! This crate provides:
//! - The mutation record model carried on the metadata topic
//! - The envelope codec for topic entries
//! - The tailer lifecycle state machine
//! - Identifiers and tailer configuration

pub mod codec;
pub mod config;
pub mod id;
pub mod record;
pub mod state;

pub use codec::{decode, encode, DecodeError};
pub use config::{ConfigError, TailerConfig};
pub use id::{EntryId, IdGen, OriginId, SequentialIdGen, UuidIdGen};
pub use record::{MutationRecord, RecordEnvelope, DELETE_TAG, MARKER_TAG, UPSERT_TAG};
pub use state::{StateError, TailerState};
