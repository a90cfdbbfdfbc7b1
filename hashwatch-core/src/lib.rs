// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core plumbing for Hashwatch: topics, payloads and the event bus capability.

pub mod event_bus;
pub mod local_bus;
mod logging;
pub mod payload;
pub mod topic;
pub mod topic_subject;

pub use self::event_bus::{handler, EventBus, Handler, SubscriptionId};
pub use self::local_bus::LocalBus;
pub use self::payload::{decode, encode, Payload};
pub use self::topic::{Topic, UPDATE_DATA};
pub use self::topic_subject::{PayloadStream, TopicSubject};
pub use hashwatch_error::{HashwatchError, Result};
