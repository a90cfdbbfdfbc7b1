// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber bridge from a bus topic to async streams.
//!
//! A [`TopicSubject`] broadcasts each payload it receives to all active
//! stream subscribers. Attached to a bus topic, it turns synchronous handler
//! callbacks into `Stream`s that a rendering layer can poll at its own pace.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past payloads.
//! - **Unbounded**: Uses unbounded mpsc channels internally (no backpressure).
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//!
//! ## Example
//!
//! ```
//! use hashwatch_core::{EventBus, LocalBus, Topic, TopicSubject};
//! use futures::StreamExt;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = LocalBus::new();
//! let topic = Topic::aggregate();
//! let subject = TopicSubject::new();
//! subject.attach(&bus, &topic).unwrap();
//!
//! let mut results = subject.subscribe().unwrap();
//! bus.publish(&topic, &json!({ "value": 1.0 })).unwrap();
//! subject.close();
//!
//! assert_eq!(results.next().await, Some(json!({ "value": 1.0 })));
//! assert_eq!(results.next().await, None);
//! # }
//! ```

use crate::{handler, EventBus, Payload, SubscriptionId, Topic};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use hashwatch_error::{HashwatchError, Result};
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Stream of payloads handed out by [`TopicSubject::subscribe`].
pub type PayloadStream = Pin<Box<dyn Stream<Item = Payload> + Send + Sync + 'static>>;

struct SubjectState {
    closed: bool,
    senders: Vec<UnboundedSender<Payload>>,
}

// A Sync-capable wrapper around the unbounded receiver used by subscriptions.
struct SubjectStream {
    inner: Arc<Mutex<UnboundedReceiver<Payload>>>,
}

impl SubjectStream {
    fn into_boxed_stream(rx: UnboundedReceiver<Payload>) -> PayloadStream {
        Box::pin(Self {
            inner: Arc::new(Mutex::new(rx)),
        })
    }
}

impl Stream for SubjectStream {
    type Item = Payload;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut guard = self.inner.lock();
        Pin::new(&mut *guard).poll_next(cx)
    }
}

/// A hot, unbounded subject that broadcasts payloads to all current stream
/// subscribers.
///
/// See the [module documentation](self) for examples and more details.
#[derive(Clone)]
pub struct TopicSubject {
    state: Arc<Mutex<SubjectState>>,
}

impl TopicSubject {
    /// Creates an open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive a stream of every payload sent from now on.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::SubjectClosed`] if the subject has been closed.
    pub fn subscribe(&self) -> Result<PayloadStream> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(HashwatchError::SubjectClosed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(SubjectStream::into_boxed_stream(rx))
    }

    /// Send a payload to all active subscribers.
    ///
    /// Subscribers whose stream has been dropped are pruned here.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::SubjectClosed`] if the subject has been closed.
    pub fn send(&self, payload: &Payload) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(HashwatchError::SubjectClosed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(payload.clone()).is_ok());
        Ok(())
    }

    /// Forwards every payload published on `topic` into this subject.
    ///
    /// Once the subject is closed the forwarding handler drops payloads
    /// silently; unsubscribe it with the returned id to detach it.
    ///
    /// # Errors
    ///
    /// Propagates the bus's subscription error.
    pub fn attach(&self, bus: &dyn EventBus, topic: &Topic) -> Result<SubscriptionId> {
        let subject = self.clone();
        bus.subscribe(
            topic,
            handler(move |_topic, payload| match subject.send(payload) {
                Ok(()) | Err(HashwatchError::SubjectClosed) => Ok(()),
                Err(e) => Err(e),
            }),
        )
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently active subscribers.
    ///
    /// Note: dropped subscribers are removed on the next `send()` call, not
    /// immediately when dropped.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl Default for TopicSubject {
    fn default() -> Self {
        Self::new()
    }
}
