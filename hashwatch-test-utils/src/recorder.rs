// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hashwatch_core::{handler, EventBus, Topic};
use hashwatch_revenue::{RecomputeEngine, RevenueModule, RevenueResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every result published on a topic.
#[derive(Clone, Default)]
pub struct ResultRecorder {
    results: Arc<Mutex<Vec<RevenueResult>>>,
}

impl ResultRecorder {
    /// Records the results `module` publishes from now on.
    pub fn attach<E: RecomputeEngine>(module: &RevenueModule<E>) -> Self {
        Self::on(module.events().as_ref(), module.output_topic())
    }

    /// Records results published on `topic` of `bus`.
    pub fn on(bus: &dyn EventBus, topic: &Topic) -> Self {
        let recorder = Self::default();
        let results = Arc::clone(&recorder.results);
        bus.subscribe(
            topic,
            handler(move |topic, payload| {
                let result = hashwatch_core::decode(topic, "result", payload)?;
                results.lock().push(result);
                Ok(())
            }),
        )
        .expect("recorder subscription should succeed");
        recorder
    }

    pub fn results(&self) -> Vec<RevenueResult> {
        self.results.lock().clone()
    }

    pub fn last(&self) -> Option<RevenueResult> {
        self.results.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.results.lock().len()
    }

    pub fn clear(&self) {
        self.results.lock().clear();
    }
}
