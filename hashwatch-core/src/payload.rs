// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Payloads carried by the bus.
//!
//! The bus itself is schema-less: every event is a JSON value. Typed
//! snapshots are decoded at the receiving end, where the expected shape is
//! known from the topic the payload arrived on.

use crate::Topic;
use hashwatch_error::{HashwatchError, IntoHashwatchError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A single event payload.
pub type Payload = serde_json::Value;

/// Decodes `payload` into `T`.
///
/// `source_kind` names the logical source the payload is expected to describe
/// and only appears in the error.
///
/// # Errors
///
/// Returns [`HashwatchError::MalformedPayload`] when the payload does not have
/// the shape of `T`.
pub fn decode<T: DeserializeOwned>(topic: &Topic, source_kind: &str, payload: &Payload) -> Result<T> {
    T::deserialize(payload)
        .map_err(|e| HashwatchError::malformed_payload(topic.as_str(), source_kind, e.to_string()))
}

/// Encodes a typed value as a bus payload.
///
/// # Errors
///
/// Fails only for values `serde_json` cannot represent (for example maps with
/// non-string keys).
pub fn encode<T: Serialize>(value: &T) -> Result<Payload> {
    serde_json::to_value(value).map_err(IntoHashwatchError::into_hashwatch)
}
