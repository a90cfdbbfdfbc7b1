// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Hashwatch
//!
//! Reactive dashboard modules for cryptocurrency miners.
//!
//! ## Overview
//!
//! Data feeds (miner telemetry, market quotes, network parameters) publish
//! snapshots on an [`EventBus`] under `update:data:<sourceId>`. A
//! [`RevenueModule`] subscribes to the feeds named in its
//! [`RevenueConfig`], keeps the latest snapshot of each, and publishes the
//! expected revenue on `update:data` after every update.
//!
//! - [`hashwatch_core`]: topics, payloads, the [`LocalBus`] and the
//!   [`TopicSubject`] bridge to async streams
//! - [`hashwatch_revenue`]: configuration, aggregation state and the solo and
//!   pool revenue models
//! - [`hashwatch_error`]: the shared [`HashwatchError`] type
//!
//! ## Quick Start
//!
//! ```rust
//! use hashwatch::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn main() -> hashwatch::Result<()> {
//!     let bus = Arc::new(LocalBus::new());
//!     let config = RevenueConfig::from_json_str(
//!         r#"{ "miner": ["rig-1", "rig-2"], "market": "nmc", "technical": "net" }"#,
//!     )?;
//!     let module = SoloRevenue::new(bus.clone(), config)?;
//!
//!     bus.publish(&Topic::data_update("net")?, &json!({ "btcPerBlock": 10.0, "probability": 0.0001 }))?;
//!     bus.publish(&Topic::data_update("nmc")?, &json!({ "ask": 100.0, "currency": "NMC" }))?;
//!     bus.publish(&Topic::data_update("rig-1")?, &json!({ "avgHashrate": 0.5e-6 }))?;
//!     bus.publish(&Topic::data_update("rig-2")?, &json!({ "avgHashrate": 0.5e-6 }))?;
//!
//!     assert_eq!(module.latest().map(|r| r.value), Some(8640.0));
//!     Ok(())
//! }
//! ```

pub use hashwatch_core::{
    handler, EventBus, Handler, LocalBus, Payload, PayloadStream, SubscriptionId, Topic,
    TopicSubject, UPDATE_DATA,
};
pub use hashwatch_error::{HashwatchError, IntoHashwatchError, Result, ResultExt};
pub use hashwatch_revenue::{
    Interval, MinerIds, PoolEngine, PoolRevenue, RecomputeEngine, RevenueConfig, RevenueModule,
    RevenueResult, SoloEngine, SoloRevenue,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use hashwatch_core::{EventBus, LocalBus, Payload, Topic};
    pub use hashwatch_error::{HashwatchError, Result};
    pub use hashwatch_revenue::{
        Interval, PoolRevenue, RecomputeEngine, RevenueConfig, RevenueModule, RevenueResult,
        SoloRevenue,
    };
}
