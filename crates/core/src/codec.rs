// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Envelope codec for metadata topic entries
//!
//! Entries are JSON objects with a `type` tag, optional `request_id` and
//! `worker_id`, and the body fields of the tagged record flattened next to them:
//!
//! ```text
//! {"type":"UPSERT","request_id":"r-7","worker_id":"w1","key":"fn-a","payload":{...}}
//! {"type":"DELETE","key":"fn-a"}
//! {"type":"MARKER","origin_id":"w1-3f2c..."}
//! ```
//!
//! Unrecognized tags decode to [`MutationRecord::Unknown`] rather than failing,
//! so newer publishers can add record types without stopping older workers.

use crate::id::{EntryId, OriginId};
use crate::record::{MutationRecord, RecordEnvelope, DELETE_TAG, MARKER_TAG, UPSERT_TAG};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// An entry's bytes are not a valid encoding of a known record
#[derive(Debug, Error)]
#[error("malformed record at entry {entry_id}: {cause}")]
pub struct DecodeError {
    pub entry_id: EntryId,
    #[source]
    pub cause: serde_json::Error,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    worker_id: Option<String>,
    #[serde(flatten)]
    body: Map<String, Value>,
}

#[derive(Deserialize)]
struct MarkerBody {
    origin_id: OriginId,
}

#[derive(Deserialize)]
struct UpsertBody {
    key: String,
    payload: Value,
}

#[derive(Deserialize)]
struct DeleteBody {
    key: String,
}

/// Decode one log entry into a record envelope
pub fn decode(entry_id: &EntryId, bytes: &[u8]) -> Result<RecordEnvelope, DecodeError> {
    let malformed = |cause| DecodeError {
        entry_id: entry_id.clone(),
        cause,
    };

    let raw: RawEnvelope = serde_json::from_slice(bytes).map_err(malformed)?;
    let body = Value::Object(raw.body);

    let record = match raw.record_type.as_str() {
        MARKER_TAG => {
            let marker: MarkerBody = serde_json::from_value(body).map_err(malformed)?;
            MutationRecord::Marker {
                origin_id: marker.origin_id,
            }
        }
        UPSERT_TAG => {
            let upsert: UpsertBody = serde_json::from_value(body).map_err(malformed)?;
            MutationRecord::Upsert {
                key: upsert.key,
                payload: upsert.payload,
            }
        }
        DELETE_TAG => {
            let delete: DeleteBody = serde_json::from_value(body).map_err(malformed)?;
            MutationRecord::Delete { key: delete.key }
        }
        other => MutationRecord::Unknown {
            raw_type: other.to_string(),
        },
    };

    Ok(RecordEnvelope {
        request_id: raw.request_id,
        worker_id: raw.worker_id,
        record,
    })
}

/// Encode a record envelope into entry bytes
///
/// `Unknown` records encode as a bare tag with no body.
pub fn encode(envelope: &RecordEnvelope) -> Result<Vec<u8>, serde_json::Error> {
    let mut fields = Map::new();
    fields.insert(
        "type".to_string(),
        Value::String(envelope.record.type_tag().to_string()),
    );
    if let Some(request_id) = &envelope.request_id {
        fields.insert("request_id".to_string(), Value::String(request_id.clone()));
    }
    if let Some(worker_id) = &envelope.worker_id {
        fields.insert("worker_id".to_string(), Value::String(worker_id.clone()));
    }

    match &envelope.record {
        MutationRecord::Marker { origin_id } => {
            fields.insert("origin_id".to_string(), Value::String(origin_id.0.clone()));
        }
        MutationRecord::Upsert { key, payload } => {
            fields.insert("key".to_string(), Value::String(key.clone()));
            fields.insert("payload".to_string(), payload.clone());
        }
        MutationRecord::Delete { key } => {
            fields.insert("key".to_string(), Value::String(key.clone()));
        }
        MutationRecord::Unknown { .. } => {}
    }

    serde_json::to_vec(&Value::Object(fields))
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
