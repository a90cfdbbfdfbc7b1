// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{expected_revenue, result_for, RecomputeEngine};
use crate::{AggregationState, Interval, RevenueConfig, RevenueResult};
use hashwatch_error::Result;

/// Expected revenue of mining alone: every block found pays the full reward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoloEngine {
    interval: Interval,
}

impl SoloEngine {
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self { interval }
    }

    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }
}

impl RecomputeEngine for SoloEngine {
    fn from_config(config: &RevenueConfig) -> Result<Self> {
        Ok(Self::new(config.interval))
    }

    fn default_title(&self) -> &'static str {
        "Revenue"
    }

    fn recompute(&self, state: &AggregationState) -> RevenueResult {
        result_for(state, expected_revenue(state, self.interval), self.interval)
    }
}
