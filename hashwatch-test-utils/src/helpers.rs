// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hashwatch_core::{EventBus, Payload, Topic};
use hashwatch_error::Result;

/// Publishes `payload` on `update:data:<source_id>` and returns the bus's
/// answer, handler failures included.
pub fn try_publish_data(bus: &dyn EventBus, source_id: &str, payload: Payload) -> Result<usize> {
    let topic = Topic::data_update(source_id)?;
    bus.publish(&topic, &payload)
}

/// Publishes `payload` on `update:data:<source_id>`, panicking on failure.
pub fn publish_data(bus: &dyn EventBus, source_id: &str, payload: Payload) -> usize {
    try_publish_data(bus, source_id, payload).expect("publish should succeed")
}

/// Asserts two floats agree to within a relative tolerance of 1e-9.
pub fn assert_approx_eq(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
