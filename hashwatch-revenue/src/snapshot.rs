// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Snapshots received from data feeds and the result a module publishes.
//!
//! Every snapshot is the complete latest payload of its source. A new
//! snapshot replaces the previous one wholesale: fields missing from the new
//! payload are absent afterwards, never carried over.

use crate::Interval;
use serde::{Deserialize, Serialize};

/// Latest telemetry of one miner (worker).
///
/// Both fields are optional on the wire. A miner that reports
/// `connected: false` contributes nothing, whatever hashrate it reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_hashrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
}

impl MinerSnapshot {
    #[must_use]
    pub const fn with_hashrate(avg_hashrate: f64) -> Self {
        Self {
            avg_hashrate: Some(avg_hashrate),
            connected: None,
        }
    }

    #[must_use]
    pub const fn disconnected() -> Self {
        Self {
            avg_hashrate: None,
            connected: Some(false),
        }
    }

    /// Only an explicit `connected: false` counts as disconnected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected != Some(false)
    }

    /// Hashrate this miner adds to the total, in feed units.
    #[must_use]
    pub fn contribution(&self) -> f64 {
        if self.is_connected() {
            self.avg_hashrate.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Latest market quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub ask: f64,
    pub currency: String,
}

impl MarketSnapshot {
    pub fn new(ask: f64, currency: impl Into<String>) -> Self {
        Self {
            ask,
            currency: currency.into(),
        }
    }
}

/// Latest network parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSnapshot {
    /// Block reward in coins.
    pub btc_per_block: f64,
    /// Probability of finding a block per normalized hash.
    pub probability: f64,
}

impl TechnicalSnapshot {
    #[must_use]
    pub const fn new(btc_per_block: f64, probability: f64) -> Self {
        Self {
            btc_per_block,
            probability,
        }
    }
}

/// Expected revenue published on `update:data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueResult {
    pub value: f64,
    pub currency: String,
    pub interval: String,
}

impl RevenueResult {
    pub fn new(value: f64, currency: impl Into<String>, interval: Interval) -> Self {
        Self {
            value,
            currency: currency.into(),
            interval: interval.label().to_string(),
        }
    }
}
