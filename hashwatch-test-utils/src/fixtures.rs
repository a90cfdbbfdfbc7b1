// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hashwatch_core::Payload;
use hashwatch_revenue::{Interval, RevenueConfig, RevenueResult};
use serde_json::json;

pub const MINER_ID: &str = "minerId";
pub const MINER_ID_1: &str = "minerId1";
pub const MINER_ID_2: &str = "minerId2";
pub const MARKET_ID: &str = "marketId";
pub const TECHNICAL_ID: &str = "technicalId";

/// Feed hashrate that normalizes to exactly one unit.
pub const ONE_UNIT_HASHRATE: f64 = 1e-6;

/// Daily value of one normalized unit under the reference market and network.
pub const REFERENCE_DAILY_VALUE: f64 = 8640.0;

pub fn single_miner_config() -> RevenueConfig {
    RevenueConfig::new()
        .with_miner(MINER_ID)
        .with_market(MARKET_ID)
        .with_technical(TECHNICAL_ID)
}

pub fn two_miner_config() -> RevenueConfig {
    RevenueConfig::new()
        .with_miners([MINER_ID_1, MINER_ID_2])
        .with_market(MARKET_ID)
        .with_technical(TECHNICAL_ID)
}

pub fn miner_hashrate(avg_hashrate: f64) -> Payload {
    json!({ "avgHashrate": avg_hashrate })
}

pub fn miner_connected(avg_hashrate: f64) -> Payload {
    json!({ "avgHashrate": avg_hashrate, "connected": true })
}

pub fn miner_disconnected() -> Payload {
    json!({ "connected": false })
}

pub fn market(ask: f64, currency: &str) -> Payload {
    json!({ "ask": ask, "currency": currency })
}

pub fn market_nmc() -> Payload {
    market(100.0, "NMC")
}

pub fn market_usd() -> Payload {
    market(250.0, "USD")
}

pub fn technical(btc_per_block: f64, probability: f64) -> Payload {
    json!({ "btcPerBlock": btc_per_block, "probability": probability })
}

pub fn technical_reference() -> Payload {
    technical(10.0, 0.0001)
}

pub fn daily(value: f64, currency: &str) -> RevenueResult {
    RevenueResult::new(value, currency, Interval::Day)
}
