// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{expected_revenue, result_for, RecomputeEngine};
use crate::{AggregationState, Interval, RevenueConfig, RevenueResult};
use hashwatch_error::{HashwatchError, Result};

/// Expected revenue of mining in a pay-per-share pool.
///
/// The pool smooths variance and keeps `fee` of the expected value, so the
/// payout is the solo expectation scaled by `1 - fee`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolEngine {
    interval: Interval,
    fee: f64,
}

impl PoolEngine {
    /// # Errors
    ///
    /// Returns a configuration error if `fee` is not in `[0, 1)`.
    pub fn new(interval: Interval, fee: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&fee) {
            return Err(HashwatchError::config(format!(
                "fee must be a fraction in [0, 1), got {fee}"
            )));
        }
        Ok(Self { interval, fee })
    }

    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub const fn fee(&self) -> f64 {
        self.fee
    }
}

impl RecomputeEngine for PoolEngine {
    fn from_config(config: &RevenueConfig) -> Result<Self> {
        Self::new(config.interval, config.fee.unwrap_or(0.0))
    }

    fn default_title(&self) -> &'static str {
        "Pool Revenue"
    }

    fn recompute(&self, state: &AggregationState) -> RevenueResult {
        let value = expected_revenue(state, self.interval) * (1.0 - self.fee);
        result_for(state, value, self.interval)
    }
}
