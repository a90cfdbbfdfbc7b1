// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recompute engines: pure functions from aggregation state to a result.
//!
//! A [`RevenueModule`](crate::RevenueModule) owns the subscriptions and the
//! state; the engine is the only part that differs between revenue models.
//!
//! ## Solo model
//!
//! ```text
//! value = (total_hashrate × HASHRATE_UNIT_SCALE)
//!       × probability × btc_per_block × ask × interval_seconds
//! ```
//!
//! Until both a market quote and network parameters are known the value is
//! zero. The currency always comes from the latest market quote, or is empty
//! while no quote has arrived.

mod pool;
mod solo;

pub use pool::PoolEngine;
pub use solo::SoloEngine;

use crate::{AggregationState, Interval, RevenueConfig, RevenueResult};
use hashwatch_error::Result;

/// Factor from feed hashrate units to the unit the block-find probability
/// is expressed in. A feed value of `1e-6` normalizes to `1`.
pub const HASHRATE_UNIT_SCALE: f64 = 1e6;

/// A revenue model.
pub trait RecomputeEngine: Send + Sync + 'static {
    /// Builds the engine from module configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the model's parameters are invalid.
    fn from_config(config: &RevenueConfig) -> Result<Self>
    where
        Self: Sized;

    /// Title used when the configuration does not set one.
    fn default_title(&self) -> &'static str;

    /// Derives the result from the current state.
    fn recompute(&self, state: &AggregationState) -> RevenueResult;
}

/// Total tracked hashrate converted to probability units.
#[must_use]
pub fn normalized_hashrate(state: &AggregationState) -> f64 {
    state.total_hashrate() * HASHRATE_UNIT_SCALE
}

/// Expected solo-mining revenue over `interval`, in the market currency.
///
/// Zero while the market or technical snapshot is missing.
#[must_use]
pub fn expected_revenue(state: &AggregationState, interval: Interval) -> f64 {
    match (state.market(), state.technical()) {
        (Some(market), Some(technical)) => {
            normalized_hashrate(state)
                * technical.probability
                * technical.btc_per_block
                * market.ask
                * interval.seconds()
        }
        _ => 0.0,
    }
}

fn result_for(state: &AggregationState, value: f64, interval: Interval) -> RevenueResult {
    let currency = state
        .market()
        .map(|market| market.currency.clone())
        .unwrap_or_default();
    RevenueResult::new(value, currency, interval)
}
