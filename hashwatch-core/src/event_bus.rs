// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The publish/subscribe capability modules depend on.
//!
//! A module never names a concrete bus. Anything that can register a handler
//! for an exact topic and deliver payloads to it can host Hashwatch modules:
//! the in-process [`LocalBus`](crate::LocalBus), a channel-based dispatcher or
//! a broker client.

use crate::{Payload, Topic};
use core::fmt;
use hashwatch_error::Result;
use std::sync::Arc;

/// Callback invoked for every payload published on a subscribed topic.
///
/// Returning an error does not stop delivery to other handlers; the bus
/// collects failures and reports them to the publisher.
pub type Handler = Arc<dyn Fn(&Topic, &Payload) -> Result<()> + Send + Sync>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Topic, &Payload) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identifies one registration on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Publish/subscribe keyed by exact topic name.
pub trait EventBus: Send + Sync {
    /// Registers `handler` for `topic`.
    ///
    /// # Errors
    ///
    /// Implementations may refuse registrations, for example once closed.
    fn subscribe(&self, topic: &Topic, handler: Handler) -> Result<SubscriptionId>;

    /// Removes a registration.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::UnknownSubscription`](hashwatch_error::HashwatchError::UnknownSubscription)
    /// if `id` is not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> Result<()>;

    /// Delivers `payload` to every handler registered for `topic` and returns
    /// how many handlers received it.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::HandlerFailures`](hashwatch_error::HashwatchError::HandlerFailures)
    /// if one or more handlers failed. Every handler still sees the payload.
    fn publish(&self, topic: &Topic, payload: &Payload) -> Result<usize>;
}

impl<B: EventBus + ?Sized> EventBus for Arc<B> {
    fn subscribe(&self, topic: &Topic, handler: Handler) -> Result<SubscriptionId> {
        (**self).subscribe(topic, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        (**self).unsubscribe(id)
    }

    fn publish(&self, topic: &Topic, payload: &Payload) -> Result<usize> {
        (**self).publish(topic, payload)
    }
}
