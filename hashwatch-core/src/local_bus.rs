// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronous in-process event bus.
//!
//! [`LocalBus`] delivers each published payload to the handlers registered
//! for that exact topic, in registration order, on the publisher's thread,
//! before `publish` returns. Two publishes never interleave inside a single
//! handler chain unless a handler itself publishes.
//!
//! ## Re-entrancy
//!
//! The registry lock is released before handlers run, so a handler may
//! publish, subscribe or unsubscribe. A registration added during delivery
//! does not see the payload currently being delivered.
//!
//! ## Example
//!
//! ```
//! use hashwatch_core::{handler, EventBus, LocalBus, Topic};
//! use serde_json::json;
//!
//! let bus = LocalBus::new();
//! let topic = Topic::data_update("rig-1").unwrap();
//!
//! bus.subscribe(&topic, handler(|_topic, payload| {
//!     assert_eq!(payload["avgHashrate"], 2.0);
//!     Ok(())
//! }))
//! .unwrap();
//!
//! assert_eq!(bus.publish(&topic, &json!({ "avgHashrate": 2.0 })).unwrap(), 1);
//! ```

use crate::logging::{debug, warn};
use crate::{EventBus, Handler, Payload, SubscriptionId, Topic};
use hashwatch_error::{HashwatchError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct Registration {
    id: SubscriptionId,
    handler: Handler,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    topics: HashMap<Topic, Vec<Registration>>,
}

/// In-process, synchronous topic dispatcher.
///
/// Cheap to clone; all clones share the same registry.
#[derive(Clone, Default)]
pub struct LocalBus {
    state: Arc<Mutex<BusState>>,
}

impl LocalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers currently registered for `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.state.lock().topics.get(topic).map_or(0, Vec::len)
    }

    /// Topics with at least one registration, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.state.lock().topics.keys().cloned().collect();
        topics.sort();
        topics
    }
}

impl EventBus for LocalBus {
    fn subscribe(&self, topic: &Topic, handler: Handler) -> Result<SubscriptionId> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state
            .topics
            .entry(topic.clone())
            .or_default()
            .push(Registration { id, handler });

        debug!("subscribed {} to '{}'", id, topic);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let mut state = self.state.lock();

        let found = state.topics.iter_mut().find_map(|(topic, registrations)| {
            let position = registrations.iter().position(|r| r.id == id)?;
            registrations.remove(position);
            Some((topic.clone(), registrations.is_empty()))
        });

        match found {
            Some((topic, now_empty)) => {
                if now_empty {
                    state.topics.remove(&topic);
                }
                debug!("unsubscribed {} from '{}'", id, topic);
                Ok(())
            }
            None => Err(HashwatchError::UnknownSubscription { id: id.0 }),
        }
    }

    fn publish(&self, topic: &Topic, payload: &Payload) -> Result<usize> {
        let handlers: Vec<Handler> = {
            let state = self.state.lock();
            match state.topics.get(topic) {
                Some(registrations) => registrations.iter().map(|r| Arc::clone(&r.handler)).collect(),
                None => return Ok(0),
            }
        };

        let mut errors = Vec::new();
        for handler in &handlers {
            if let Err(e) = handler(topic, payload) {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(handlers.len())
        } else {
            warn!("{} of {} handler(s) failed on '{}'", errors.len(), handlers.len(), topic);
            Err(HashwatchError::handler_failures(topic.as_str(), errors))
        }
    }
}
