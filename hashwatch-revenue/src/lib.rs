// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Reactive expected-revenue modules for mining dashboards.
//!
//! A module listens to three kinds of data feeds on an event bus:
//!
//! - miner telemetry (`update:data:<minerId>`, one topic per worker),
//! - a market quote (`update:data:<marketId>`),
//! - network parameters (`update:data:<technicalId>`),
//!
//! and republishes the expected revenue on `update:data` every time any of
//! them changes.
//!
//! The pieces are usable on their own:
//!
//! - [`SourceBindings`] resolves a [`RevenueConfig`] into subscriptions,
//! - [`AggregationState`] holds the latest snapshot per source,
//! - a [`RecomputeEngine`] ([`SoloEngine`], [`PoolEngine`]) turns state into a
//!   [`RevenueResult`],
//! - [`RevenueModule`] wires them onto an [`EventBus`](hashwatch_core::EventBus).

pub mod config;
pub mod engine;
pub mod interval;
mod logging;
pub mod module;
pub mod snapshot;
pub mod sources;
pub mod state;

pub use self::config::{MinerIds, RevenueConfig};
pub use self::engine::{
    expected_revenue, normalized_hashrate, PoolEngine, RecomputeEngine, SoloEngine,
    HASHRATE_UNIT_SCALE,
};
pub use self::interval::Interval;
pub use self::module::{PoolRevenue, RevenueModule, SoloRevenue};
pub use self::snapshot::{MarketSnapshot, MinerSnapshot, RevenueResult, TechnicalSnapshot};
pub use self::sources::{SourceBinding, SourceBindings, SourceRole};
pub use self::state::{AggregationState, SourceUpdate};
