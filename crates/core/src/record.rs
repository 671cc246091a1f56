// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation records carried on the metadata topic
//!
//! Each log entry decodes to exactly one [`MutationRecord`]. Records are
//! dispatched once and then dropped; nothing in the tailer keeps them around.

use crate::id::OriginId;
use serde_json::Value;

/// Wire tag for an initialization marker
pub const MARKER_TAG: &str = "MARKER";
/// Wire tag for an install-or-replace of a function definition
pub const UPSERT_TAG: &str = "UPSERT";
/// Wire tag for a function definition removal
pub const DELETE_TAG: &str = "DELETE";

/// One mutation of the worker's function metadata view
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRecord {
    /// Initialization token written by a tailer at startup
    Marker { origin_id: OriginId },
    /// Install or replace the definition stored under `key`
    Upsert { key: String, payload: Value },
    /// Remove the definition stored under `key`
    Delete { key: String },
    /// A type tag this version does not understand
    Unknown { raw_type: String },
}

impl MutationRecord {
    pub fn marker(origin_id: OriginId) -> Self {
        MutationRecord::Marker { origin_id }
    }

    pub fn upsert(key: impl Into<String>, payload: impl Into<Value>) -> Self {
        MutationRecord::Upsert {
            key: key.into(),
            payload: payload.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        MutationRecord::Delete { key: key.into() }
    }

    /// The wire tag this record is encoded under
    pub fn type_tag(&self) -> &str {
        match self {
            MutationRecord::Marker { .. } => MARKER_TAG,
            MutationRecord::Upsert { .. } => UPSERT_TAG,
            MutationRecord::Delete { .. } => DELETE_TAG,
            MutationRecord::Unknown { raw_type } => raw_type,
        }
    }

    /// The metadata key touched by this record, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            MutationRecord::Upsert { key, .. } | MutationRecord::Delete { key } => Some(key),
            MutationRecord::Marker { .. } | MutationRecord::Unknown { .. } => None,
        }
    }
}

/// A decoded record together with the request metadata it was published with
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEnvelope {
    /// Request identifier assigned by the publisher, if any
    pub request_id: Option<String>,
    /// Worker that published the request, if any
    pub worker_id: Option<String>,
    pub record: MutationRecord,
}

impl RecordEnvelope {
    pub fn new(record: MutationRecord) -> Self {
        Self {
            request_id: None,
            worker_id: None,
            record,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = Some(worker_id.into());
        self
    }
}

impl From<MutationRecord> for RecordEnvelope {
    fn from(record: MutationRecord) -> Self {
        Self::new(record)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
